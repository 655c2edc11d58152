//! Session-bound display names.
//!
//! A visitor "logs in" by picking a username; the name is stored in their
//! `tower-sessions` record and read back by the [`CurrentUser`] extractor, so
//! every handler that needs the caller's identity takes it as an explicit
//! parameter.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::error::{Error, Result};

/// Session key holding the display name.
pub const USERNAME_KEY: &str = "username";

/// Longest accepted display name, matching the `vote.username` column.
pub const MAX_USERNAME_LEN: usize = 100;

/// The display name bound to the caller's session.
///
/// Extracting `CurrentUser` rejects with [`Error::Unauthorized`] when nobody
/// is logged in; extract `Option<CurrentUser>` for endpoints that work
/// anonymously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl CurrentUser {
    pub fn username(&self) -> &str {
        &self.0
    }
}

/// Trims and validates a requested display name.
pub fn normalize_username(raw: &str) -> Result<String> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(Error::Validation("Username is required".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(Error::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(username.to_string())
}

/// Binds `username` to the session, rotating the session id.
pub async fn login(session: &Session, username: &str) -> Result<String> {
    let username = normalize_username(username)?;
    session.cycle_id().await?;
    session.insert(USERNAME_KEY, &username).await?;
    tracing::info!(%username, "user logged in");
    Ok(username)
}

/// Drops the session and its identity.
pub async fn logout(session: &Session) -> Result<()> {
    session.flush().await?;
    Ok(())
}

async fn session_user<S>(parts: &mut Parts, state: &S) -> Result<Option<CurrentUser>>
where
    S: Send + Sync,
{
    let session = Session::from_request_parts(parts, state)
        .await
        .map_err(|(_, msg)| {
            tracing::error!(msg, "session layer missing");
            Error::Unauthorized
        })?;

    let username: Option<String> = session.get(USERNAME_KEY).await?;
    Ok(username.map(CurrentUser))
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        session_user(parts, state).await?.ok_or(Error::Unauthorized)
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        session_user(parts, state).await
    }
}

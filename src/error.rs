//! Error types with HTTP status code mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything a request or CLI command can fail with.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed client input (400).
    #[error("{0}")]
    Validation(String),

    /// No display name bound to the session (401).
    #[error("Not logged in")]
    Unauthorized,

    /// Unknown creature id (404).
    #[error("Pokemon {0} not found")]
    CreatureNotFound(i32),

    /// The user has voted on every creature the selector can offer (404).
    #[error("No more pokemon to vote on")]
    AllVoted,

    /// Relational store failure (500).
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Session backend failure (500).
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Catalog file could not be read or parsed.
    #[error("Catalog import failed: {0}")]
    Import(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    all_voted: bool,
}

impl Error {
    /// Map error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::CreatureNotFound(_) | Error::AllVoted => StatusCode::NOT_FOUND,
            Error::Database(_) | Error::Session(_) | Error::Import(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error,
            all_voted: matches!(self, Error::AllVoted),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_status() {
        assert_eq!(
            Error::Validation("Username is required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::CreatureNotFound(999).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::AllVoted.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_errors_are_internal() {
        let err = Error::from(DbErr::Custom("boom".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

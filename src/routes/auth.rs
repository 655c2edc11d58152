use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;

use crate::error::{Error, Result};
use crate::identity::{self, CurrentUser};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
}

/// `POST /api/login/`
pub async fn login(
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(request) = payload.map_err(|_| Error::Validation("Invalid JSON".to_string()))?;
    let username = identity::login(&session, &request.username).await?;
    Ok(Json(json!({ "status": "success", "username": username })))
}

/// `POST /api/logout/`
pub async fn logout(session: Session) -> Result<Json<Value>> {
    identity::logout(&session).await?;
    Ok(Json(json!({ "status": "success" })))
}

/// `GET /api/username/`
pub async fn username(user: CurrentUser) -> Json<Value> {
    Json(json!({ "username": user.username() }))
}

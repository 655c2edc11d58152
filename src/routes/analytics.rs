use axum::extract::{Path, State};
use axum::Json;

use crate::error::Result;
use crate::stats::{self, Gallery, UserStats};
use crate::state::AppState;

/// `GET /analytics/`
pub async fn index(State(state): State<AppState>) -> Result<Json<Gallery>> {
    Ok(Json(stats::gallery(&state.db).await?))
}

/// `GET /analytics/user/{username}/`
pub async fn user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserStats>> {
    Ok(Json(stats::user_stats(&state.db, &username).await?))
}

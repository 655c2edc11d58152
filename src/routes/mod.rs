//! HTTP route handlers and router configuration

mod analytics;
mod auth;
mod game;

use axum::{
    routing::{get, post},
    Router,
};
use time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::session_store::DbSessionStore;
use crate::state::AppState;

/// Build the application router, wrapped in the session layer.
pub fn build_router(state: AppState, sessions: SessionManagerLayer<DbSessionStore>) -> Router {
    Router::new()
        // Identity
        .route("/api/login/", post(auth::login))
        .route("/api/logout/", post(auth::logout))
        .route("/api/username/", get(auth::username))
        // Voting
        .route("/api/start/", get(game::start))
        .route("/api/random/", get(game::random))
        .route("/api/next/", get(game::next))
        .route("/api/pokemon/{id}/", get(game::pokemon))
        .route("/api/vote/{id}/", post(game::vote))
        // Reporting
        .route("/analytics/", get(analytics::index))
        .route("/analytics/user/{username}/", get(analytics::user))
        .with_state(state)
        .layer(sessions)
}

/// Session layer keyed by an opaque cookie, expiring after `inactivity_hours`
/// without requests.
pub fn session_layer(
    store: DbSessionStore,
    secure: bool,
    inactivity_hours: i64,
) -> SessionManagerLayer<DbSessionStore> {
    SessionManagerLayer::new(store)
        .with_secure(secure)
        .with_expiry(Expiry::OnInactivity(Duration::hours(inactivity_hours)))
}

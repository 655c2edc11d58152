use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::catalog::{self, Action, CreatureView};
use crate::error::{Error, Result};
use crate::identity::CurrentUser;
use crate::recorder::{self, VoteChange};
use crate::selector::{Random, Selection, Selector, Sequential};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    action: Action,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    status: &'static str,
    smash_count: i32,
    pass_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// `GET /api/start/`: the lowest id the user has not voted on.
pub async fn start(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Value>> {
    let selector = Sequential {
        catalog_size: state.catalog_size,
    };
    let body = match selector.select(&state.db, user.username()).await? {
        Selection::Next(id) => json!({ "id": id, "all_voted": false }),
        Selection::AllVoted { restart_at } => {
            json!({ "id": restart_at.unwrap_or(1), "all_voted": true })
        }
    };
    Ok(Json(body))
}

/// `GET /api/random/`
pub async fn random(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<CreatureView>> {
    serve_selection(&state, &Random, &user).await
}

/// `GET /api/next/`: whichever policy the server is configured with.
pub async fn next(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<CreatureView>> {
    serve_selection(&state, state.selector.as_ref(), &user).await
}

async fn serve_selection(
    state: &AppState,
    selector: &dyn Selector,
    user: &CurrentUser,
) -> Result<Json<CreatureView>> {
    match selector.select(&state.db, user.username()).await? {
        Selection::Next(id) => {
            let view = catalog::view(&state.db, id, Some(user.username())).await?;
            Ok(Json(view))
        }
        Selection::AllVoted { .. } => Err(Error::AllVoted),
    }
}

fn creature_id(path: Result<Path<i32>, PathRejection>) -> Result<i32> {
    let Path(id) = path.map_err(|rejection| {
        Error::Validation(format!("Invalid pokemon id: {}", rejection.body_text()))
    })?;
    Ok(id)
}

/// `GET /api/pokemon/{id}/`
pub async fn pokemon(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    user: Option<CurrentUser>,
) -> Result<Json<CreatureView>> {
    let id = creature_id(path)?;
    let username = user.as_ref().map(CurrentUser::username);
    Ok(Json(catalog::view(&state.db, id, username).await?))
}

/// `POST /api/vote/{id}/`
pub async fn vote(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    user: CurrentUser,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>> {
    let id = creature_id(path)?;
    let Json(request) = payload.map_err(|rejection| {
        Error::Validation(format!("Invalid vote: {}", rejection.body_text()))
    })?;

    let outcome = recorder::record_vote(&state.db, user.username(), id, request.action).await?;
    let status = match outcome.change {
        VoteChange::Created | VoteChange::Flipped => "success",
        VoteChange::Unchanged | VoteChange::AlreadyVoted => "unchanged",
    };

    Ok(Json(VoteResponse {
        status,
        smash_count: outcome.tally.smash_count,
        pass_count: outcome.tally.pass_count,
        message: recorder::noop_message(outcome.change, request.action),
    }))
}

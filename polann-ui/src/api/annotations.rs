//! Judgment submission and adjudication
//!
//! The acting role is part of every path. Annotators may only touch their
//! own judgment; only the adjudicator may write final decisions.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::put,
    Json, Router,
};
use polann_common::db;
use polann_common::disagreement::ItemState;
use polann_common::{FinalDecision, Judgment, LabelPair, Role};
use serde::Serialize;
use tracing::info;

use crate::api::load_item_state;
use crate::{ApiResult, AppState};

/// Saved judgment plus the item's resulting state
#[derive(Debug, Serialize)]
pub struct JudgmentResponse {
    pub judgment: Judgment,
    pub state: ItemState,
}

/// Saved final decision plus the item's resulting state
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub final_decision: FinalDecision,
    pub state: ItemState,
}

/// Outcome of a clear operation
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub deleted: bool,
    pub state: ItemState,
}

/// PUT /api/items/:id/judgments/:role
///
/// **Request:** `{"sentiment": "positive", "discourse": "partisan"}`
pub async fn put_judgment(
    State(state): State<AppState>,
    path: Result<Path<(i64, String)>, PathRejection>,
    body: Result<Json<LabelPair>, JsonRejection>,
) -> ApiResult<Json<JudgmentResponse>> {
    let Path((item_id, role)) = path?;
    let Json(labels) = body?;
    let annotator = role.parse::<Role>()?.annotator()?;

    let judgment = db::upsert_judgment(&state.db, item_id, annotator, labels).await?;
    let item_state = load_item_state(&state.db, item_id).await?;

    info!(
        item_id,
        role = annotator.as_str(),
        state = ?item_state,
        "Judgment submitted"
    );

    Ok(Json(JudgmentResponse {
        judgment,
        state: item_state,
    }))
}

/// DELETE /api/items/:id/judgments/:role
pub async fn delete_judgment(
    State(state): State<AppState>,
    path: Result<Path<(i64, String)>, PathRejection>,
) -> ApiResult<Json<ClearResponse>> {
    let Path((item_id, role)) = path?;
    let annotator = role.parse::<Role>()?.annotator()?;

    db::require_item(&state.db, item_id).await?;
    let deleted = db::delete_judgment(&state.db, item_id, annotator).await?;
    let item_state = load_item_state(&state.db, item_id).await?;

    if deleted {
        info!(item_id, role = annotator.as_str(), "Judgment cleared");
    }

    Ok(Json(ClearResponse {
        deleted,
        state: item_state,
    }))
}

/// PUT /api/items/:id/decision/:role
pub async fn put_decision(
    State(state): State<AppState>,
    path: Result<Path<(i64, String)>, PathRejection>,
    body: Result<Json<LabelPair>, JsonRejection>,
) -> ApiResult<Json<DecisionResponse>> {
    let Path((item_id, role)) = path?;
    let Json(labels) = body?;
    role.parse::<Role>()?.require_adjudicator()?;

    let final_decision = db::upsert_final_decision(&state.db, item_id, labels).await?;

    Ok(Json(DecisionResponse {
        final_decision,
        state: ItemState::Finalized,
    }))
}

/// DELETE /api/items/:id/decision/:role
pub async fn delete_decision(
    State(state): State<AppState>,
    path: Result<Path<(i64, String)>, PathRejection>,
) -> ApiResult<Json<ClearResponse>> {
    let Path((item_id, role)) = path?;
    role.parse::<Role>()?.require_adjudicator()?;

    db::require_item(&state.db, item_id).await?;
    let deleted = db::delete_final_decision(&state.db, item_id).await?;
    let item_state = load_item_state(&state.db, item_id).await?;

    if deleted {
        info!(item_id, state = ?item_state, "Final decision withdrawn");
    }

    Ok(Json(ClearResponse {
        deleted,
        state: item_state,
    }))
}

/// Build judgment and adjudication routes
pub fn annotation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/items/:id/judgments/:role",
            put(put_judgment).delete(delete_judgment),
        )
        .route(
            "/api/items/:id/decision/:role",
            put(put_decision).delete(delete_decision),
        )
}

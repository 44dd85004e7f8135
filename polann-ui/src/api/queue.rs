//! Work-queue navigation
//!
//! Adjudicator: disagreements first, then agreed items lacking a decision.
//! Annotators: the next item they have not labelled yet.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use polann_common::db;
use polann_common::disagreement::ItemState;
use polann_common::queue::{next_unannotated, QueueSummary};
use polann_common::Role;
use serde::Serialize;

use crate::api::load_queue;
use crate::{ApiResult, AppState};

/// Next item for the adjudicator; all fields empty when the queue is drained
#[derive(Debug, Serialize)]
pub struct NextWorkResponse {
    pub item_id: Option<i64>,
    pub state: Option<ItemState>,
}

/// Next unlabelled item for an annotator
#[derive(Debug, Serialize)]
pub struct NextUnannotatedResponse {
    pub role: Role,
    pub item_id: Option<i64>,
}

/// GET /api/queue/next
pub async fn next_work_item(State(state): State<AppState>) -> ApiResult<Json<NextWorkResponse>> {
    let queue = load_queue(&state.db).await?;
    let next = queue.next_work_item();

    Ok(Json(NextWorkResponse {
        item_id: next.map(|w| w.item_id),
        state: next.map(|w| w.state),
    }))
}

/// GET /api/queue/summary
pub async fn queue_summary(State(state): State<AppState>) -> ApiResult<Json<QueueSummary>> {
    let queue = load_queue(&state.db).await?;
    Ok(Json(queue.summary()))
}

/// GET /api/annotators/:role/next
pub async fn next_for_annotator(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> ApiResult<Json<NextUnannotatedResponse>> {
    let role = role.parse::<Role>()?;
    let annotator = role.annotator()?;

    let item_ids = db::list_item_ids(&state.db).await?;
    let judgments = db::list_judgments(&state.db, None).await?;

    Ok(Json(NextUnannotatedResponse {
        role,
        item_id: next_unannotated(&item_ids, &judgments, annotator),
    }))
}

/// Build queue routes
pub fn queue_routes() -> Router<AppState> {
    Router::new()
        .route("/api/queue/next", get(next_work_item))
        .route("/api/queue/summary", get(queue_summary))
        .route("/api/annotators/:role/next", get(next_for_annotator))
}

//! Item registration and browsing

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::get,
    Json, Router,
};
use polann_common::db;
use polann_common::disagreement::{
    classify_item, disagreement_detail, DisagreementDetail, ItemState,
};
use polann_common::{FinalDecision, Item, Judgment, NewItem};
use serde::Serialize;
use tracing::debug;

use crate::api::load_queue;
use crate::{ApiError, ApiResult, AppState};

/// Response to an item registration batch
#[derive(Debug, Serialize)]
pub struct InsertItemsResponse {
    pub submitted: usize,
    pub inserted: u64,
}

/// Item with its adjudication state
#[derive(Debug, Serialize)]
pub struct ItemOverview {
    #[serde(flatten)]
    pub item: Item,
    pub state: ItemState,
}

/// Everything known about one item
#[derive(Debug, Serialize)]
pub struct ItemDetail {
    pub item: Item,
    pub judgments: Vec<Judgment>,
    pub final_decision: Option<FinalDecision>,
    pub state: ItemState,
    /// Present once both annotators have submitted
    pub disagreement: Option<DisagreementDetail>,
}

/// POST /api/items
///
/// Registers items from a JSON array. Existing external keys are skipped.
pub async fn insert_items(
    State(state): State<AppState>,
    body: Result<Json<Vec<NewItem>>, JsonRejection>,
) -> ApiResult<Json<InsertItemsResponse>> {
    let Json(items) = body?;
    if items.is_empty() {
        return Err(ApiError::BadRequest("no items submitted".to_string()));
    }

    let inserted = db::insert_items(&state.db, &items).await?;

    Ok(Json(InsertItemsResponse {
        submitted: items.len(),
        inserted,
    }))
}

/// GET /api/items
pub async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<ItemOverview>>> {
    let items = db::list_items(&state.db).await?;
    let queue = load_queue(&state.db).await?;

    let overview = items
        .into_iter()
        .map(|item| ItemOverview {
            state: queue.state_of(item.id).unwrap_or(ItemState::Incomplete),
            item,
        })
        .collect();

    Ok(Json(overview))
}

/// GET /api/items/:id
pub async fn get_item(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ItemDetail>> {
    let Path(item_id) = path?;
    let item = db::get_item(&state.db, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("item {}", item_id)))?;

    let judgments = db::list_judgments(&state.db, Some(item_id)).await?;
    let final_decision = db::get_final_decision(&state.db, item_id).await?;
    let item_state = classify_item(&judgments, final_decision.is_some())?;
    let disagreement = disagreement_detail(&judgments)?;

    if item_state == ItemState::CompleteDisagree {
        debug!(item_id, "Item awaiting adjudication");
    }

    Ok(Json(ItemDetail {
        item,
        judgments,
        final_decision,
        state: item_state,
        disagreement,
    }))
}

/// Build item routes
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/api/items", get(list_items).post(insert_items))
        .route("/api/items/:id", get(get_item))
}

//! HTTP API handlers for polann-ui

pub mod agreement;
pub mod annotations;
pub mod items;
pub mod queue;
pub mod service;

pub use agreement::agreement_routes;
pub use annotations::annotation_routes;
pub use items::item_routes;
pub use queue::queue_routes;
pub use service::{service_routes, BuildInfo};

use polann_common::db;
use polann_common::disagreement::{classify_item, ItemState};
use polann_common::queue::AdjudicationQueue;
use sqlx::SqlitePool;

use crate::ApiResult;

/// Fresh adjudication state for every item
pub(crate) async fn load_queue(pool: &SqlitePool) -> ApiResult<AdjudicationQueue> {
    let item_ids = db::list_item_ids(pool).await?;
    let judgments = db::list_judgments(pool, None).await?;
    let decisions = db::list_final_decisions(pool).await?;

    Ok(AdjudicationQueue::from_snapshot(&item_ids, &judgments, &decisions)?)
}

/// Current state of a single item
pub(crate) async fn load_item_state(pool: &SqlitePool, item_id: i64) -> ApiResult<ItemState> {
    let judgments = db::list_judgments(pool, Some(item_id)).await?;
    let decision = db::get_final_decision(pool, item_id).await?;

    Ok(classify_item(&judgments, decision.is_some())?)
}

//! Inter-annotator agreement endpoint
//!
//! Recomputed from the full judgment snapshot on every request.

use axum::{extract::State, routing::get, Json, Router};
use polann_common::agreement::{summarize_agreement, AgreementSummary};
use polann_common::db;

use crate::{ApiResult, AppState};

/// GET /api/agreement
///
/// Both dimensions are always present; a dimension without complete pairs
/// carries a `notice` instead of a report.
pub async fn get_agreement(State(state): State<AppState>) -> ApiResult<Json<AgreementSummary>> {
    let item_ids = db::list_item_ids(&state.db).await?;
    let judgments = db::list_judgments(&state.db, None).await?;

    let summary = summarize_agreement(item_ids.len(), &judgments)?;

    Ok(Json(summary))
}

/// Build agreement routes
pub fn agreement_routes() -> Router<AppState> {
    Router::new().route("/api/agreement", get(get_agreement))
}

//! polann-ui library - annotation workflow service
//!
//! Serves the item, judgment, adjudication, agreement and queue endpoints
//! over a shared SQLite store.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::item_routes())
        .merge(api::annotation_routes())
        .merge(api::agreement_routes())
        .merge(api::queue_routes())
        .merge(api::service_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

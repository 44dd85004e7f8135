//! Error types for polann-ui

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use polann_common::Error as CommonError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Request body missing, malformed, or outside the label sets (400)
    #[error("Invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),

    /// Path segment failed to parse, e.g. a non-numeric item id (400)
    #[error("Invalid path: {}", .0.body_text())]
    Path(#[from] PathRejection),

    /// polann-common error, mapped by kind
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Body(rejection) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", rejection.body_text())
            }
            ApiError::Path(rejection) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", rejection.body_text())
            }
            ApiError::Common(err) => {
                let (status, code) = match &err {
                    CommonError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    CommonError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
                    CommonError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                    CommonError::InsufficientData(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_DATA")
                    }
                    CommonError::DataIntegrity(_) => {
                        error!("Data integrity violation: {}", err);
                        (StatusCode::UNPROCESSABLE_ENTITY, "DATA_INTEGRITY")
                    }
                    CommonError::Database(_)
                    | CommonError::Io(_)
                    | CommonError::Config(_)
                    | CommonError::Internal(_) => {
                        error!("Request failed: {}", err);
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                (status, code, err.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

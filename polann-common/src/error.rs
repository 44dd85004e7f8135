//! Common error types for polann

use thiserror::Error;

/// Common result type for polann operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the annotation core and its services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Role is not permitted to perform the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not enough complete pairs to compute agreement.
    ///
    /// Non-fatal: callers surface it as a notice and skip the computation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Upstream data broke an invariant (unknown label, duplicate judgment)
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),
}

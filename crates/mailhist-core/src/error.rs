//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in pipeline operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Document store operation failed.
    #[error("Document store error: {0}")]
    DocumentStore(#[from] mongodb::error::Error),

    /// The pre-publish liveness probe failed; neither store was touched.
    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    /// Relational store operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for archive scanning.

/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Scan error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The archive could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A scanner pattern failed to compile.
    #[error("Invalid scan pattern: {0}")]
    Pattern(#[from] regex::Error),
}

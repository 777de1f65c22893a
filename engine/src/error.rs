//! Error types for the history ordering engine.

use thiserror::Error;

/// All possible errors from the history ordering engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Comparison errors
    #[error("cannot compare field '{field}': {left} is not comparable with {right}")]
    Incomparable {
        field: String,
        left: String,
        right: String,
    },

    // Input errors
    #[error("invalid history record: {0}")]
    InvalidRecord(String),

    #[error("invalid comparator config: {0}")]
    InvalidConfig(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for warrant core.

use thiserror::Error;

/// Errors raised while building or decoding core values.
///
/// Evaluation itself never fails; these only surface when callers hand the
/// engine malformed input at its boundaries.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("resource must be a JSON object, got {0}")]
    ResourceNotObject(&'static str),

    #[error("malformed predicate: {0}")]
    MalformedPredicate(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

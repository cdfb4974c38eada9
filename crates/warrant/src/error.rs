//! Error types for the engine.

use thiserror::Error;
use warrant_policy::PolicyError;

/// Errors that can occur while building or querying the engine.
#[derive(Debug, Error)]
pub enum WarrantError {
    /// Policy error.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    /// A resource type the engine was told to expect has no policy.
    #[error("resource type {0:?} is required but has no policy")]
    MissingPolicy(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, WarrantError>;

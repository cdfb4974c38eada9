//! Error types for policy construction and lookup.

use thiserror::Error;
use warrant_rules::RuleError;

/// Errors that can occur while building or selecting policies.
///
/// Every variant is a setup-time failure. Evaluating a built policy never
/// errors: missing data degrades to "restriction inapplicable" or "claim not
/// held", and unconfigured actions fall back to denying everyone.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// No policy is registered for the resource type.
    #[error("no policy registered for resource type {0:?}")]
    UnknownResourceType(String),

    /// A policy for the resource type is already registered.
    #[error("policy for resource type {0:?} is already registered")]
    DuplicateResourceType(String),

    /// A rule unit could not be built.
    #[error("rule error in policy {policy:?}, action {action:?}: {source}")]
    Rule {
        policy: String,
        action: String,
        #[source]
        source: RuleError,
    },

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;

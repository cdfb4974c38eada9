//! Error types for rule unit construction.

use thiserror::Error;

/// Errors raised while building rule units from configuration.
///
/// All of these surface at setup time. A built rule unit never fails.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The configured identifier names no known rule unit.
    #[error("unknown rule unit: {kind}")]
    UnknownRuleUnit { kind: String },

    /// A parameter is missing, unexpected or has the wrong type.
    #[error("invalid parameter {param:?} for rule unit {kind}: {reason}")]
    InvalidParameter {
        kind: String,
        param: String,
        reason: String,
    },

    /// A network address could not be parsed.
    #[error("invalid network address {0:?}")]
    InvalidAddress(String),

    /// An address range mixes address families.
    #[error("invalid address range {start}..={end}: {reason}")]
    InvalidRange {
        start: String,
        end: String,
        reason: &'static str,
    },
}

/// Result type for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;

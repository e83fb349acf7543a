//! Error types for reputation operations.

use thiserror::Error;

/// Errors that can occur during reputation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReputationError {
    /// Trust below the floor required for an action.
    #[error("Insufficient trust: required {required:.2}, have {actual:.2}")]
    InsufficientTrust {
        /// Required trust.
        required: f64,
        /// Actual trust.
        actual: f64,
    },

    /// A model parameter is outside its valid range.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Vote direction outside {+1, -1}.
    #[error("Invalid vote direction: {0} (expected 1 or -1)")]
    InvalidDirection(i64),

    /// Malformed claim identifier.
    #[error("Invalid claim id: {0}")]
    InvalidClaimId(String),
}

/// Result type for reputation operations.
pub type Result<T> = std::result::Result<T, ReputationError>;

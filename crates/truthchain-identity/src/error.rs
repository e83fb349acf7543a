//! Error types for identity operations.

use thiserror::Error;

/// Errors that can occur during identity operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The identifier hash is already registered.
    #[error("Identifier already registered (one account per identifier)")]
    DuplicateIdentity,

    /// The derived pseudonym is already bound to another identity.
    #[error("Pseudonym already taken: {0}")]
    PseudonymTaken(String),

    /// The identifier is empty after normalisation.
    #[error("Identifier is empty")]
    EmptyIdentifier,

    /// A pseudonym string does not have the expected format.
    #[error("Invalid pseudonym: {reason}")]
    InvalidPseudonym {
        /// Reason for invalidity.
        reason: String,
    },

    /// Hex decoding of a stored hash failed.
    #[error("Invalid hash encoding: {0}")]
    InvalidHash(String),
}

/// Result type for identity operations.
pub type Result<T> = std::result::Result<T, IdentityError>;

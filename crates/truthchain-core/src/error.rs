//! Error types for engine operations.
//!
//! Every variant is a caller-recoverable rejection. No operation mutates
//! state before it has decided to succeed.

use thiserror::Error;
use truthchain_identity::{IdentityError, Pseudonym};
use truthchain_reputation::{ClaimId, ReputationError};

use crate::claim::ClaimStatus;
use crate::config::ConfigError;

/// Why a vote was refused.
///
/// Checks run in declaration order; the first failure is reported.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum VoteRejection {
    /// Voter trust is below the voting threshold.
    #[error("Insufficient trust score ({actual:.2} < {required})")]
    InsufficientTrust {
        /// Threshold.
        required: f64,
        /// Voter's trust.
        actual: f64,
    },

    /// The voter already voted on this claim.
    #[error("Already voted on this claim")]
    DuplicateVote,

    /// Authors cannot vote on their own claims.
    #[error("Authors cannot vote on their own claims")]
    SelfVote,

    /// The claim is no longer pending.
    #[error("Claim is no longer accepting votes (status: {status})")]
    ClaimClosed {
        /// Current status.
        status: ClaimStatus,
    },

    /// The voting window has closed.
    #[error("Voting window has closed for this claim")]
    DeadlinePassed,
}

/// Errors returned by engine operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Registration blocked by the uniqueness constraint.
    #[error("Identifier already registered (one account per identifier)")]
    DuplicateIdentity,

    /// Actor trust below the floor for the attempted action.
    #[error("Insufficient trust score ({actual:.2} < {required})")]
    InsufficientTrust {
        /// Threshold.
        required: f64,
        /// Actor's trust.
        actual: f64,
    },

    /// The voter already voted on this claim.
    #[error("Already voted on this claim")]
    DuplicateVote,

    /// Authors cannot vote on their own claims.
    #[error("Authors cannot vote on their own claims")]
    SelfVote,

    /// The claim is no longer pending.
    #[error("Claim is no longer accepting votes (status: {status})")]
    ClaimClosed {
        /// Current status.
        status: ClaimStatus,
    },

    /// The voting window has closed.
    #[error("Voting window has closed for this claim")]
    DeadlinePassed,

    /// Only the author may withdraw a claim.
    #[error("Only the author may withdraw a claim")]
    NotAuthor,

    /// No claim with this id.
    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimId),

    /// No participant with this pseudonym.
    #[error("Participant not found: {0}")]
    ParticipantNotFound(Pseudonym),

    /// Invalid engine configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Identity error.
    #[error("Identity error: {0}")]
    Identity(IdentityError),

    /// Reputation error.
    #[error("Reputation error: {0}")]
    Reputation(#[from] ReputationError),
}

impl From<IdentityError> for CoreError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::DuplicateIdentity => Self::DuplicateIdentity,
            other => Self::Identity(other),
        }
    }
}

impl From<VoteRejection> for CoreError {
    fn from(rejection: VoteRejection) -> Self {
        match rejection {
            VoteRejection::InsufficientTrust { required, actual } => {
                Self::InsufficientTrust { required, actual }
            }
            VoteRejection::DuplicateVote => Self::DuplicateVote,
            VoteRejection::SelfVote => Self::SelfVote,
            VoteRejection::ClaimClosed { status } => Self::ClaimClosed { status },
            VoteRejection::DeadlinePassed => Self::DeadlinePassed,
        }
    }
}

impl CoreError {
    /// Whether this error is one of the vote rejections.
    #[must_use]
    pub fn is_vote_rejection(&self) -> bool {
        matches!(
            self,
            Self::InsufficientTrust { .. }
                | Self::DuplicateVote
                | Self::SelfVote
                | Self::ClaimClosed { .. }
                | Self::DeadlinePassed
        )
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, CoreError>;

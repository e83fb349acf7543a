//! Append-only audit records of trust mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use truthchain_identity::Pseudonym;

use crate::ClaimId;

/// What caused a trust mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrustUpdateSource {
    /// Authoritative update when a claim resolved.
    Resolution(ClaimId),
    /// Preview nudge applied when the vote was cast.
    VoteFeedback(ClaimId),
    /// Preview nudge withdrawn once the claim closed.
    FeedbackReverted(ClaimId),
    /// Monthly inactivity decay.
    InactivityDecay,
    /// One-time collusion penalty.
    CollusionPenalty,
}

impl TrustUpdateSource {
    /// The claim involved, if any.
    #[must_use]
    pub fn claim_id(&self) -> Option<ClaimId> {
        match self {
            Self::Resolution(id) | Self::VoteFeedback(id) | Self::FeedbackReverted(id) => {
                Some(*id)
            }
            Self::InactivityDecay | Self::CollusionPenalty => None,
        }
    }

    /// Whether the mutation was driven by the system rather than a claim.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.claim_id().is_none()
    }
}

/// Audit record of one trust mutation. Never modified once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrustUpdate {
    /// Whose trust changed.
    pub pseudonym: Pseudonym,
    /// Why it changed.
    pub source: TrustUpdateSource,
    /// Trust before.
    pub old_trust: f64,
    /// Trust after.
    pub new_trust: f64,
    /// Human-readable explanation.
    pub reason: String,
    /// When the mutation was computed.
    pub timestamp: DateTime<Utc>,
}

impl TrustUpdate {
    /// `new_trust - old_trust`.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.new_trust - self.old_trust
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use truthchain_identity::derive_seeded_pseudonym;

    #[test]
    fn test_source_claim_id() {
        let id = ClaimId::generate();
        assert_eq!(TrustUpdateSource::Resolution(id).claim_id(), Some(id));
        assert_eq!(TrustUpdateSource::VoteFeedback(id).claim_id(), Some(id));
        assert_eq!(TrustUpdateSource::FeedbackReverted(id).claim_id(), Some(id));
        assert!(TrustUpdateSource::InactivityDecay.is_system());
        assert!(TrustUpdateSource::CollusionPenalty.is_system());
    }

    #[test]
    fn test_delta() {
        let update = TrustUpdate {
            pseudonym: derive_seeded_pseudonym("x"),
            source: TrustUpdateSource::InactivityDecay,
            old_trust: 1.0,
            new_trust: 0.95,
            reason: "decay".into(),
            timestamp: Utc::now(),
        };
        assert!((update.delta() + 0.05).abs() < 1e-12);
    }
}

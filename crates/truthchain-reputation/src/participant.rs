//! Pseudonymous participants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use truthchain_identity::{IdentifierHash, Pseudonym};

/// A pseudonymous identity with a bounded trust score.
///
/// Participants are never deleted. Trust is only written through
/// [`TrustModel::set_trust`](crate::TrustModel::set_trust), which keeps it
/// within the model bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable pseudonym.
    pub pseudonym: Pseudonym,
    /// Deduplication digest of the registration identifier.
    pub identifier_hash: IdentifierHash,
    /// Current trust score.
    trust: f64,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last vote or post.
    pub last_active_at: DateTime<Utc>,
    /// Point up to which inactivity decay has been charged.
    pub decayed_through: Option<DateTime<Utc>>,
    /// Votes cast.
    pub total_votes: u64,
    /// Votes that matched a resolved consensus.
    pub correct_votes: u64,
    /// Votes that contradicted a resolved consensus.
    pub incorrect_votes: u64,
    /// Currently flagged for collusion.
    flagged_for_collusion: bool,
    /// Multiplier on future trust updates, in `(0, 1]`.
    collusion_penalty_multiplier: f64,
}

impl Participant {
    /// Create a participant at the given (already clamped) initial trust.
    #[must_use]
    pub fn new(
        pseudonym: Pseudonym,
        identifier_hash: IdentifierHash,
        initial_trust: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            pseudonym,
            identifier_hash,
            trust: initial_trust,
            created_at: now,
            last_active_at: now,
            decayed_through: None,
            total_votes: 0,
            correct_votes: 0,
            incorrect_votes: 0,
            flagged_for_collusion: false,
            collusion_penalty_multiplier: 1.0,
        }
    }

    /// Current trust.
    #[must_use]
    pub fn trust(&self) -> f64 {
        self.trust
    }

    pub(crate) fn store_trust(&mut self, trust: f64) {
        self.trust = trust;
    }

    /// Whether the participant is flagged for collusion.
    #[must_use]
    pub fn is_flagged_for_collusion(&self) -> bool {
        self.flagged_for_collusion
    }

    /// Multiplier applied to future trust updates.
    #[must_use]
    pub fn collusion_penalty_multiplier(&self) -> f64 {
        self.collusion_penalty_multiplier
    }

    /// Flag for collusion with the given multiplier, clamped into `(0, 1]`.
    pub fn flag_for_collusion(&mut self, multiplier: f64) {
        self.flagged_for_collusion = true;
        self.collusion_penalty_multiplier = if multiplier.is_nan() {
            1.0
        } else {
            multiplier.clamp(f64::MIN_POSITIVE, 1.0)
        };
    }

    /// Lift a collusion flag and restore the full multiplier.
    pub fn clear_collusion_flag(&mut self) {
        self.flagged_for_collusion = false;
        self.collusion_penalty_multiplier = 1.0;
    }

    /// Record activity at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active_at = now;
        self.decayed_through = None;
    }

    /// Fraction of resolved votes that matched consensus, if any resolved.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        let resolved = self.correct_votes + self.incorrect_votes;
        (resolved > 0).then(|| self.correct_votes as f64 / resolved as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use truthchain_identity::derive_seeded_pseudonym;

    fn participant() -> Participant {
        Participant::new(
            derive_seeded_pseudonym("p"),
            IdentifierHash::from_identifier("p@campus.edu").unwrap(),
            0.2,
            Utc::now(),
        )
    }

    #[test]
    fn test_new_participant_defaults() {
        let p = participant();
        assert_eq!(p.trust(), 0.2);
        assert!(!p.is_flagged_for_collusion());
        assert_eq!(p.collusion_penalty_multiplier(), 1.0);
        assert_eq!(p.accuracy(), None);
    }

    #[test]
    fn test_flag_and_clear() {
        let mut p = participant();
        p.flag_for_collusion(0.6);
        assert!(p.is_flagged_for_collusion());
        assert_eq!(p.collusion_penalty_multiplier(), 0.6);

        p.clear_collusion_flag();
        assert!(!p.is_flagged_for_collusion());
        assert_eq!(p.collusion_penalty_multiplier(), 1.0);
    }

    #[test]
    fn test_multiplier_stays_in_range() {
        let mut p = participant();
        p.flag_for_collusion(0.0);
        assert!(p.collusion_penalty_multiplier() > 0.0);
        p.flag_for_collusion(3.0);
        assert_eq!(p.collusion_penalty_multiplier(), 1.0);
    }

    #[test]
    fn test_accuracy() {
        let mut p = participant();
        p.correct_votes = 3;
        p.incorrect_votes = 1;
        assert_eq!(p.accuracy(), Some(0.75));
    }
}

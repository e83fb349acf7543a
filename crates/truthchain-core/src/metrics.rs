//! System-wide counters.

use serde::{Deserialize, Serialize};

/// Snapshot of engine totals.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    /// Registered participants.
    pub total_participants: usize,
    /// Claims ever submitted, in any status.
    pub total_claims: usize,
    /// Votes recorded across all claims.
    pub total_votes: usize,
    /// Mean trust over all participants (0 with none).
    pub average_trust: f64,
    /// Participants currently flagged for collusion.
    pub collusion_flags_active: usize,
    /// Claims resolved true.
    pub claims_resolved_true: usize,
    /// Claims resolved false.
    pub claims_resolved_false: usize,
    /// Claims stabilized without a decisive outcome.
    pub claims_uncertain: usize,
    /// Rejected registrations and votes.
    pub attacks_blocked: u64,
}

impl SystemMetrics {
    /// Claims that reached a resolution of any kind.
    #[must_use]
    pub fn claims_resolved(&self) -> usize {
        self.claims_resolved_true + self.claims_resolved_false + self.claims_uncertain
    }
}

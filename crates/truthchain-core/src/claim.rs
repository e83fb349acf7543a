//! Claims and their lifecycle.
//!
//! ```text
//! pending -> stabilized | expired | deleted
//! ```
//!
//! All three targets are terminal.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use truthchain_identity::Pseudonym;
use truthchain_reputation::{ClaimId, Vote, VoteDirection};

use crate::consensus::{credibility_score, total_weight};

/// Category used when a claim is submitted without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Lifecycle status of a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    /// Accepting votes.
    Pending,
    /// Passed the stabilization gate and was resolved.
    Stabilized,
    /// Deadline passed without stabilizing.
    Expired,
    /// Withdrawn by its author.
    Deleted,
}

impl ClaimStatus {
    /// Whether no further transition is possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Stabilized => "stabilized",
            Self::Expired => "expired",
            Self::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// Outcome of resolving a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Credibility at or above the true threshold.
    True,
    /// Credibility at or below the false threshold.
    False,
    /// Somewhere in between.
    Uncertain,
}

impl Resolution {
    /// Whether a vote in `direction` matches this outcome.
    ///
    /// Always false for [`Resolution::Uncertain`].
    #[must_use]
    pub fn agrees_with(self, direction: VoteDirection) -> bool {
        matches!(
            (self, direction),
            (Self::True, VoteDirection::True) | (Self::False, VoteDirection::False)
        )
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::True => "true",
            Self::False => "false",
            Self::Uncertain => "uncertain",
        };
        f.write_str(s)
    }
}

/// A proposition submitted for verification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier.
    pub id: ClaimId,
    /// Author pseudonym.
    pub author: Pseudonym,
    /// Claim text.
    pub content: String,
    /// Free-form category.
    pub category: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Last instant votes are accepted.
    pub deadline: DateTime<Utc>,
    /// Lifecycle status.
    pub status: ClaimStatus,
    /// Running credibility score in `[-1, 1]`.
    pub credibility_score: f64,
    /// Running vote count.
    pub total_votes: usize,
    /// Running sum of vote weights.
    pub total_trust_weight: f64,
    /// Outcome, once stabilized.
    pub resolution: Option<Resolution>,
}

impl Claim {
    /// Create a pending claim accepting votes for `voting_window` after `now`.
    #[must_use]
    pub fn new(
        author: Pseudonym,
        content: impl Into<String>,
        category: impl Into<String>,
        tags: Vec<String>,
        now: DateTime<Utc>,
        voting_window: Duration,
    ) -> Self {
        let category = category.into();
        let category = if category.trim().is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            category
        };

        Self {
            id: ClaimId::generate(),
            author,
            content: content.into(),
            category,
            tags,
            created_at: now,
            deadline: now + voting_window,
            status: ClaimStatus::Pending,
            credibility_score: 0.0,
            total_votes: 0,
            total_trust_weight: 0.0,
            resolution: None,
        }
    }

    /// Whether the claim is still pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ClaimStatus::Pending
    }

    /// Whether `now` is past the voting deadline.
    #[must_use]
    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        now > self.deadline
    }

    /// Recompute count, weight and score from the full vote list.
    pub fn recompute_aggregates(&mut self, votes: &[Vote]) {
        self.total_votes = votes.len();
        self.total_trust_weight = total_weight(votes);
        self.credibility_score = credibility_score(votes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use truthchain_identity::derive_seeded_pseudonym;

    fn claim() -> Claim {
        Claim::new(
            derive_seeded_pseudonym("author"),
            "Library open until 2 AM",
            "",
            vec!["library".into()],
            Utc::now(),
            Duration::days(7),
        )
    }

    #[test]
    fn test_new_claim_is_pending() {
        let c = claim();
        assert!(c.is_pending());
        assert_eq!(c.category, DEFAULT_CATEGORY);
        assert_eq!(c.deadline - c.created_at, Duration::days(7));
        assert_eq!(c.resolution, None);
        assert_eq!(c.credibility_score, 0.0);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!ClaimStatus::Pending.is_terminal());
        assert!(ClaimStatus::Stabilized.is_terminal());
        assert!(ClaimStatus::Expired.is_terminal());
        assert!(ClaimStatus::Deleted.is_terminal());
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let c = claim();
        assert!(!c.deadline_passed(c.deadline));
        assert!(c.deadline_passed(c.deadline + Duration::milliseconds(1)));
    }

    #[test]
    fn test_recompute_aggregates() {
        let mut c = claim();
        let now = Utc::now();
        let votes = vec![
            Vote::new(c.id, derive_seeded_pseudonym("a"), VoteDirection::True, 4.0, now),
            Vote::new(c.id, derive_seeded_pseudonym("b"), VoteDirection::False, 1.0, now),
        ];
        c.recompute_aggregates(&votes);
        assert_eq!(c.total_votes, 2);
        assert!((c.total_trust_weight - 3.0).abs() < 1e-12);
        assert!((c.credibility_score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_resolution_agreement() {
        assert!(Resolution::True.agrees_with(VoteDirection::True));
        assert!(!Resolution::True.agrees_with(VoteDirection::False));
        assert!(Resolution::False.agrees_with(VoteDirection::False));
        assert!(!Resolution::Uncertain.agrees_with(VoteDirection::True));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ClaimStatus::Stabilized).unwrap();
        assert_eq!(json, "\"stabilized\"");
    }
}

//! Property-based tests for consensus scoring.
//!
//! - Credibility stays in `[-1, 1]` for any vote set
//! - Unanimous votes score exactly `+1` or `-1`
//! - Trust updates from a resolution keep every participant in bounds

use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use truthchain_identity::{derive_seeded_pseudonym, IdentifierHash};
use truthchain_reputation::score::limits::{TRUST_MAX, TRUST_MIN};
use truthchain_reputation::{ClaimId, DayClock, Participant, TrustModel, Vote, VoteDirection};

use crate::claim::Claim;
use crate::config::ConsensusConfig;
use crate::consensus::{credibility_score, resolve};

fn ballots(plan: &[(f64, bool)]) -> Vec<Vote> {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let claim_id = ClaimId::from_bytes([7; ClaimId::SIZE]);
    plan.iter()
        .enumerate()
        .map(|(i, &(trust, yes))| {
            let direction = if yes {
                VoteDirection::True
            } else {
                VoteDirection::False
            };
            Vote::new(
                claim_id,
                derive_seeded_pseudonym(&format!("voter_{i}")),
                direction,
                trust,
                now,
            )
        })
        .collect()
}

proptest! {
    /// Credibility is bounded.
    #[test]
    fn credibility_bounded(plan in prop::collection::vec((0.1f64..10.0, any::<bool>()), 0..60)) {
        let score = credibility_score(&ballots(&plan));
        prop_assert!((-1.0..=1.0).contains(&score));
    }

    /// Unanimity yields an exact extreme.
    #[test]
    fn unanimous_is_extreme(trusts in prop::collection::vec(0.1f64..10.0, 1..40), yes in any::<bool>()) {
        let plan: Vec<(f64, bool)> = trusts.into_iter().map(|t| (t, yes)).collect();
        let expected = if yes { 1.0 } else { -1.0 };
        prop_assert_eq!(credibility_score(&ballots(&plan)), expected);
    }

    /// Order of votes does not change the score.
    #[test]
    fn credibility_order_independent(plan in prop::collection::vec((0.1f64..10.0, any::<bool>()), 1..40)) {
        let votes = ballots(&plan);
        let mut reversed = votes.clone();
        reversed.reverse();
        prop_assert!((credibility_score(&votes) - credibility_score(&reversed)).abs() < 1e-12);
    }

    /// Applying a resolution never leaves a voter out of bounds.
    #[test]
    fn resolution_updates_in_bounds(plan in prop::collection::vec((0.1f64..10.0, any::<bool>()), 10..30)) {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let author = derive_seeded_pseudonym("author");
        let mut claim = Claim::new(author, "claim", "General", vec![], start, Duration::days(30));

        let votes: Vec<Vote> = ballots(&plan)
            .into_iter()
            .map(|mut v| {
                v.claim_id = claim.id;
                v
            })
            .collect();
        claim.recompute_aggregates(&votes);

        let participants: HashMap<_, _> = votes
            .iter()
            .map(|v| {
                let hash = IdentifierHash::from_identifier(v.voter.as_str()).unwrap();
                let p = Participant::new(v.voter.clone(), hash, v.trust_at_cast, start);
                (v.voter.clone(), p)
            })
            .collect();

        let result = resolve(
            &claim,
            &votes,
            &participants,
            &TrustModel::default(),
            &ConsensusConfig::default(),
            &DayClock::standard(),
            start + Duration::days(8),
        );
        for update in &result.trust_updates {
            prop_assert!((TRUST_MIN..=TRUST_MAX).contains(&update.new_trust));
        }
    }
}

//! Property-based tests for trust arithmetic.
//!
//! These tests verify invariants that must hold for any input:
//!
//! - Trust stays within `[TRUST_MIN, TRUST_MAX]` after any update or decay
//! - Vote weight is `sqrt` of floored trust and grows sublinearly
//! - Losses exceed gains for the same vote age
//! - Collusion graphs do not depend on vote order

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use truthchain_identity::derive_seeded_pseudonym;

use crate::decay::project_decay;
use crate::numeric::stable_sum;
use crate::score::limits::{TRUST_MAX, TRUST_MIN};
use crate::{
    clamp_trust, effective_weight, simulate_attack, ClaimId, CollusionDetector,
    InactivityDecayConfig, TrustModel, Vote, VoteDirection,
};

proptest! {
    /// Clamping always lands in range.
    #[test]
    fn clamp_in_bounds(trust in -1e6f64..1e6) {
        let clamped = clamp_trust(trust);
        prop_assert!((TRUST_MIN..=TRUST_MAX).contains(&clamped));
    }

    /// Weight is the square root of floored trust.
    #[test]
    fn weight_is_sqrt_of_floor(trust in -10.0f64..20.0) {
        let w = effective_weight(trust);
        prop_assert!((w * w - trust.max(TRUST_MIN)).abs() < 1e-9);
    }

    /// Doubling trust never doubles weight.
    #[test]
    fn weight_sublinear(trust in 0.1f64..5.0) {
        prop_assert!(effective_weight(2.0 * trust) < 2.0 * effective_weight(trust));
    }

    /// Any resolution update stays in bounds.
    #[test]
    fn update_stays_in_bounds(
        trust in 0.1f64..=10.0,
        correct in any::<bool>(),
        days in 0.0f64..400.0,
        multiplier in 0.0f64..=1.0,
    ) {
        let change = TrustModel::default().compute_update(trust, correct, days, multiplier);
        prop_assert!((TRUST_MIN..=TRUST_MAX).contains(&change.new_trust));
        if correct {
            prop_assert!(change.delta >= 0.0);
        } else {
            prop_assert!(change.delta <= 0.0);
        }
    }

    /// Losses are larger than gains at the same age.
    #[test]
    fn loss_exceeds_gain(days in 0.0f64..100.0) {
        let model = TrustModel::default();
        let gain = model.compute_update(1.0, true, days, 1.0).delta;
        let loss = model.compute_update(1.0, false, days, 1.0).delta;
        prop_assert!(loss.abs() > gain);
    }

    /// Decay never raises trust and never crosses the floor.
    #[test]
    fn decay_monotone(trust in 0.1f64..=10.0, months in 0i64..240) {
        let model = TrustModel::default();
        let decayed = model.clamp(project_decay(trust, &InactivityDecayConfig::default(), months));
        prop_assert!(decayed <= trust);
        prop_assert!(decayed >= TRUST_MIN);
    }

    /// Compensated summation is order-insensitive within tolerance.
    #[test]
    fn stable_sum_order_insensitive(values in prop::collection::vec(-1e3f64..1e3, 0..64)) {
        let forward = stable_sum(values.iter().copied());
        let backward = stable_sum(values.iter().rev().copied());
        prop_assert!((forward - backward).abs() < 1e-9);
    }

    /// Attack credibility always lies in [-1, 1].
    #[test]
    fn attack_score_bounded(
        attackers in 0u32..500,
        attacker_trust in 0.1f64..10.0,
        honest in 0u32..500,
        honest_trust in 0.1f64..10.0,
    ) {
        let report = simulate_attack(attackers, attacker_trust, honest, honest_trust);
        prop_assert!((-1.0..=1.0).contains(&report.credibility_score));
        prop_assert!((0.0..=1.0).contains(&report.attacker_weight_share));
    }

    /// Correlation graph is the same for any permutation of votes.
    #[test]
    fn correlation_graph_order_independent(
        directions in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..30),
        seed in any::<u64>(),
    ) {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let voters = [
            derive_seeded_pseudonym("a"),
            derive_seeded_pseudonym("b"),
            derive_seeded_pseudonym("c"),
        ];
        let mut votes = Vec::new();
        for (i, (x, y, z)) in directions.iter().enumerate() {
            let claim = ClaimId::from_bytes([i as u8; 16]);
            let at = start + Duration::days(i as i64);
            for (voter, agree) in voters.iter().zip([x, y, z]) {
                let dir = if *agree { VoteDirection::True } else { VoteDirection::False };
                votes.push(Vote::new(claim, voter.clone(), dir, 1.0, at));
            }
        }

        let detector = CollusionDetector::default();
        let original = detector.build_correlation_graph(&votes);

        let len = votes.len();
        let shift = (seed as usize) % len;
        votes.rotate_left(shift);
        votes.reverse();
        prop_assert_eq!(original, detector.build_correlation_graph(&votes));
    }
}

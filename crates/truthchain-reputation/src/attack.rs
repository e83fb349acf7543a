//! Closed-form Sybil/collusion attack analysis.
//!
//! Attackers all vote false, honest participants all vote true. The report
//! is decision support only; nothing else in the engine consumes it.

use serde::{Deserialize, Serialize};

use crate::collusion::COLLUSION_WEIGHT_PENALTY;
use crate::numeric::{at_most, snap_to_zero, SCORE_EPSILON};
use crate::score::effective_weight;

/// Claim-days an attacker must stay active to build usable trust.
pub const TRUST_BUILD_DAYS: u32 = 30;

/// Assumed opportunity cost per identity per day, in dollars.
pub const COST_PER_IDENTITY_DAY: f64 = 30.0;

/// Coordinated groups at least this large are likely to be detected.
pub const COORDINATED_GROUP_SIZE: u32 = 3;

/// Detection probability for coordinated groups.
pub const DETECTION_PROBABILITY_GROUP: f64 = 0.9;

/// Detection probability for one or two attackers.
pub const DETECTION_PROBABILITY_SMALL: f64 = 0.4;

/// Economic framing of an attack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackEconomics {
    /// Dollars spent building trust on every fabricated identity.
    pub total_attack_cost: f64,
    /// Heuristic chance the collusion detector catches the group.
    pub detection_probability: f64,
    /// Trust forfeited if every attacker is penalized.
    pub expected_trust_loss: f64,
    /// More identities needed to outweigh the honest side (0 if already enough).
    pub additional_identities_needed: u64,
}

/// Outcome of a simulated attack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackReport {
    /// `attacker_count * sqrt(attacker_trust)`.
    pub attacker_weight: f64,
    /// `honest_count * sqrt(honest_trust)`.
    pub honest_weight: f64,
    /// Resulting credibility score, in `[-1, 1]`.
    pub credibility_score: f64,
    /// Whether attackers strictly outweigh honest participants (ties do not flip).
    pub can_flip_consensus: bool,
    /// Attacker share of total weight, in `[0, 1]`.
    pub attacker_weight_share: f64,
    /// Cost and risk to the attackers.
    pub economics: AttackEconomics,
}

impl AttackReport {
    /// One-line human-readable verdict.
    #[must_use]
    pub fn conclusion(&self) -> String {
        if self.can_flip_consensus {
            format!(
                "Attack could succeed but costs ${:.0} with {:.0}% detection risk",
                self.economics.total_attack_cost,
                self.economics.detection_probability * 100.0
            )
        } else {
            format!(
                "Attack fails: attackers control {:.1}% of weight and need {} more accounts",
                self.attacker_weight_share * 100.0,
                self.economics.additional_identities_needed
            )
        }
    }
}

/// Simulate `attacker_count` identities at `attacker_trust` voting against
/// `honest_count` identities at `honest_trust`.
///
/// Trust values are floored the same way live vote weights are.
#[must_use]
pub fn simulate_attack(
    attacker_count: u32,
    attacker_trust: f64,
    honest_count: u32,
    honest_trust: f64,
) -> AttackReport {
    let per_attacker = effective_weight(attacker_trust);
    let attacker_weight = f64::from(attacker_count) * per_attacker;
    let honest_weight = f64::from(honest_count) * effective_weight(honest_trust);
    let total = attacker_weight + honest_weight;

    let (credibility_score, attacker_weight_share) = if total > 0.0 {
        (
            snap_to_zero((honest_weight - attacker_weight) / total),
            attacker_weight / total,
        )
    } else {
        (0.0, 0.0)
    };
    let can_flip_consensus = !at_most(attacker_weight, honest_weight);

    let additional_identities_needed = if can_flip_consensus {
        0
    } else {
        // Smallest n with n * per_attacker > honest_weight.
        let needed = ((honest_weight + SCORE_EPSILON) / per_attacker).floor() as u64 + 1;
        needed.saturating_sub(u64::from(attacker_count)).max(1)
    };

    let detection_probability = if attacker_count >= COORDINATED_GROUP_SIZE {
        DETECTION_PROBABILITY_GROUP
    } else {
        DETECTION_PROBABILITY_SMALL
    };

    AttackReport {
        attacker_weight,
        honest_weight,
        credibility_score,
        can_flip_consensus,
        attacker_weight_share,
        economics: AttackEconomics {
            total_attack_cost: f64::from(attacker_count)
                * f64::from(TRUST_BUILD_DAYS)
                * COST_PER_IDENTITY_DAY,
            detection_probability,
            expected_trust_loss: attacker_trust
                * COLLUSION_WEIGHT_PENALTY
                * f64::from(attacker_count),
            additional_identities_needed,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mob_of_newcomers_ties_experts() {
        // 50 * sqrt(0.2) == 10 * sqrt(5.0)
        let report = simulate_attack(50, 0.2, 10, 5.0);
        assert!(!report.can_flip_consensus);
        assert_eq!(report.credibility_score, 0.0);
        assert!((report.attacker_weight_share - 0.5).abs() < 1e-9);
        assert_eq!(report.economics.additional_identities_needed, 1);
    }

    #[test]
    fn test_small_attack_fails() {
        let report = simulate_attack(5, 0.2, 20, 2.0);
        assert!(!report.can_flip_consensus);
        assert!(report.credibility_score > 0.5);
        assert!(report.economics.additional_identities_needed > 0);

        let needed = report.economics.additional_identities_needed as u32;
        let enough = simulate_attack(5 + needed, 0.2, 20, 2.0);
        assert!(enough.can_flip_consensus);
        let short = simulate_attack(5 + needed - 1, 0.2, 20, 2.0);
        assert!(!short.can_flip_consensus);
    }

    #[test]
    fn test_overwhelming_attack_flips() {
        let report = simulate_attack(100, 4.0, 10, 1.0);
        assert!(report.can_flip_consensus);
        assert!(report.credibility_score < -0.5);
        assert_eq!(report.economics.additional_identities_needed, 0);
        assert!(report.conclusion().contains("could succeed"));
    }

    #[test]
    fn test_economics() {
        let report = simulate_attack(4, 1.0, 10, 1.0);
        assert_eq!(report.economics.total_attack_cost, 4.0 * 30.0 * 30.0);
        assert_eq!(report.economics.detection_probability, 0.9);
        assert!((report.economics.expected_trust_loss - 4.0 * 0.6).abs() < 1e-12);

        let pair = simulate_attack(2, 1.0, 10, 1.0);
        assert_eq!(pair.economics.detection_probability, 0.4);
    }

    #[test]
    fn test_empty_scenario() {
        let report = simulate_attack(0, 1.0, 0, 1.0);
        assert_eq!(report.credibility_score, 0.0);
        assert_eq!(report.attacker_weight_share, 0.0);
        assert!(!report.can_flip_consensus);
    }
}

//! Closed-form payoff comparison of honest and dishonest strategies.
//!
//! ```text
//! honest per round    = alpha * p_correct - beta
//! dishonest per round = -2 * alpha * p_incorrect - beta - gamma * p_detection
//! ratio               = |dishonest| / honest
//! ```
//!
//! With the default trust constants honesty earns +0.025 per round and
//! dishonesty loses 0.31, so lying costs about 12x what honesty pays.

use serde::{Deserialize, Serialize};

use crate::score::limits::{ALPHA, BETA};

/// Behavioral assumptions behind the payoff comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayoffAssumptions {
    /// Probability an honest voter matches consensus.
    pub p_correct_honest: f64,
    /// Probability a dishonest voter contradicts consensus.
    pub p_incorrect_dishonest: f64,
    /// Probability a dishonest voter is caught colluding.
    pub p_detection: f64,
    /// Trust penalty factor on detection (gamma).
    pub detection_penalty: f64,
    /// Learning rate (alpha).
    pub alpha: f64,
    /// Decay baseline (beta).
    pub beta: f64,
}

impl Default for PayoffAssumptions {
    fn default() -> Self {
        Self {
            p_correct_honest: 0.75,
            p_incorrect_dishonest: 0.70,
            p_detection: 0.40,
            detection_penalty: 0.3,
            alpha: ALPHA,
            beta: BETA,
        }
    }
}

impl PayoffAssumptions {
    /// Expected trust change per round for an honest voter.
    #[must_use]
    pub fn honest_per_round(&self) -> f64 {
        self.alpha * self.p_correct_honest - self.beta
    }

    /// Expected trust change per round for a dishonest voter.
    #[must_use]
    pub fn dishonest_per_round(&self) -> f64 {
        -2.0 * self.alpha * self.p_incorrect_dishonest
            - self.beta
            - self.detection_penalty * self.p_detection
    }
}

/// Which strategy pays better.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Vote what you believe.
    Honest,
    /// Vote against the truth.
    Dishonest,
}

/// Payoff of one strategy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyPayoff {
    /// Expected total over all rounds.
    pub total: f64,
    /// Expected change per round.
    pub per_round: f64,
}

/// Honest vs dishonest comparison over a number of rounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayoffReport {
    /// Rounds compared.
    pub rounds: u32,
    /// Honest strategy payoff.
    pub honest: StrategyPayoff,
    /// Dishonest strategy payoff.
    pub dishonest: StrategyPayoff,
    /// `|dishonest| / honest`, per round. Infinite if honesty pays nothing.
    pub ratio: f64,
    /// Strategy with the higher expected payoff.
    pub dominant: Strategy,
}

impl PayoffReport {
    /// Whether honesty strictly dominates.
    #[must_use]
    pub fn honesty_dominates(&self) -> bool {
        self.dominant == Strategy::Honest && self.ratio > 1.0
    }
}

/// Compare strategies over `rounds` using the default assumptions.
#[must_use]
pub fn payoffs(rounds: u32) -> PayoffReport {
    payoffs_with(rounds, &PayoffAssumptions::default())
}

/// Compare strategies over `rounds` under the given assumptions.
#[must_use]
pub fn payoffs_with(rounds: u32, assumptions: &PayoffAssumptions) -> PayoffReport {
    let honest_per_round = assumptions.honest_per_round();
    let dishonest_per_round = assumptions.dishonest_per_round();
    let n = f64::from(rounds);

    let ratio = if honest_per_round > 0.0 {
        dishonest_per_round.abs() / honest_per_round
    } else {
        f64::INFINITY
    };

    let dominant = if honest_per_round > dishonest_per_round {
        Strategy::Honest
    } else {
        Strategy::Dishonest
    };

    PayoffReport {
        rounds,
        honest: StrategyPayoff {
            total: n * honest_per_round,
            per_round: honest_per_round,
        },
        dishonest: StrategyPayoff {
            total: n * dishonest_per_round,
            per_round: dishonest_per_round,
        },
        ratio,
        dominant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_per_round_values() {
        let report = payoffs(100);
        assert!((report.honest.per_round - 0.025).abs() < 1e-12);
        assert!((report.dishonest.per_round + 0.31).abs() < 1e-12);
        assert!((report.honest.total - 2.5).abs() < 1e-9);
        assert!((report.dishonest.total + 31.0).abs() < 1e-9);
    }

    #[test]
    fn test_honesty_dominates_by_default() {
        let report = payoffs(100);
        assert_eq!(report.dominant, Strategy::Honest);
        assert!(report.ratio > 1.0);
        assert!((report.ratio - 12.4).abs() < 1e-9);
        assert!(report.honesty_dominates());
    }

    #[test]
    fn test_ratio_independent_of_rounds() {
        assert!((payoffs(1).ratio - payoffs(1000).ratio).abs() < 1e-12);
    }

    #[test]
    fn test_zero_rounds() {
        let report = payoffs(0);
        assert_eq!(report.honest.total, 0.0);
        assert_eq!(report.dishonest.total, 0.0);
        assert!(report.ratio > 1.0);
    }

    #[test]
    fn test_unrewarding_honesty() {
        let assumptions = PayoffAssumptions {
            p_correct_honest: 0.4,
            ..PayoffAssumptions::default()
        };
        let report = payoffs_with(10, &assumptions);
        assert!(report.honest.per_round < 0.0);
        assert!(report.ratio.is_infinite());
        assert_eq!(report.dominant, Strategy::Honest);
        assert!(report.honesty_dominates());
    }
}

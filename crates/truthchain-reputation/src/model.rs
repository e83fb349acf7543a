//! Trust-score arithmetic.
//!
//! ```text
//! time_factor = e^(-lambda * days_since_claim)
//! base        = alpha * (1 - beta) * time_factor * collusion_multiplier
//! correct     : delta = +base * |gain / alpha|
//! incorrect   : delta = -base * |loss / alpha|
//! new_trust   = clamp(old_trust + delta)
//! ```
//!
//! Losses are 1.5x gains with the default parameters, and early votes earn
//! (or lose) more than late ones.

use serde::{Deserialize, Serialize};

use crate::participant::Participant;
use crate::score::{clamp_between, limits, weight_with_floor};
use crate::{ReputationError, Result};

/// Result of a trust update computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrustChange {
    /// Trust before the update.
    pub old_trust: f64,
    /// Trust after the update, clamped.
    pub new_trust: f64,
    /// Unclamped delta the formula produced.
    pub delta: f64,
}

/// Tunable trust-model parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrustModel {
    /// Lower trust bound.
    pub trust_min: f64,
    /// Upper trust bound.
    pub trust_max: f64,
    /// Trust at registration.
    pub trust_initial: f64,
    /// Minimum trust to vote or post.
    pub vote_threshold: f64,
    /// Learning rate (alpha).
    pub learning_rate: f64,
    /// Decay baseline (beta).
    pub decay_baseline: f64,
    /// Time-decay constant (lambda) per claim-day.
    pub time_decay: f64,
    /// Reward scale for correct outcomes.
    pub gain: f64,
    /// Penalty scale for incorrect outcomes (negative).
    pub loss: f64,
}

impl Default for TrustModel {
    fn default() -> Self {
        Self {
            trust_min: limits::TRUST_MIN,
            trust_max: limits::TRUST_MAX,
            trust_initial: limits::TRUST_INITIAL,
            vote_threshold: limits::VOTE_THRESHOLD,
            learning_rate: limits::ALPHA,
            decay_baseline: limits::BETA,
            time_decay: limits::LAMBDA,
            gain: limits::TRUST_GAIN,
            loss: limits::TRUST_LOSS,
        }
    }
}

impl TrustModel {
    /// Check the parameter invariants.
    ///
    /// # Errors
    ///
    /// Returns `ReputationError::InvalidParameter` naming the first
    /// parameter that breaks `0 < min <= threshold`, `min <= initial <= max`,
    /// or has a non-positive rate.
    pub fn validate(&self) -> Result<()> {
        if !(self.trust_min > 0.0) {
            return Err(invalid("trust_min", "must be greater than zero"));
        }
        if !(self.trust_max > self.trust_min) {
            return Err(invalid("trust_max", "must exceed trust_min"));
        }
        if self.trust_initial < self.trust_min || self.trust_initial > self.trust_max {
            return Err(invalid("trust_initial", "must lie within [trust_min, trust_max]"));
        }
        if self.vote_threshold < self.trust_min || self.vote_threshold > self.trust_initial {
            return Err(invalid(
                "vote_threshold",
                "must lie within [trust_min, trust_initial]",
            ));
        }
        if !(self.learning_rate > 0.0) {
            return Err(invalid("learning_rate", "must be greater than zero"));
        }
        if !(0.0..1.0).contains(&self.decay_baseline) {
            return Err(invalid("decay_baseline", "must lie within [0, 1)"));
        }
        if self.time_decay < 0.0 {
            return Err(invalid("time_decay", "must not be negative"));
        }
        if !(self.gain > 0.0) {
            return Err(invalid("gain", "must be greater than zero"));
        }
        if !(self.loss < 0.0) {
            return Err(invalid("loss", "must be negative"));
        }
        Ok(())
    }

    /// Clamp trust into `[trust_min, trust_max]`.
    #[must_use]
    pub fn clamp(&self, trust: f64) -> f64 {
        clamp_between(trust, self.trust_min, self.trust_max)
    }

    /// Vote weight: `sqrt(max(trust, trust_min))`.
    #[must_use]
    pub fn weight(&self, trust: f64) -> f64 {
        weight_with_floor(trust, self.trust_min)
    }

    /// `e^(-lambda * days)`; negative ages count as zero.
    #[must_use]
    pub fn time_factor(&self, days_since_claim: f64) -> f64 {
        (-self.time_decay * days_since_claim.max(0.0)).exp()
    }

    /// Compute a resolution-time trust update.
    #[must_use]
    pub fn compute_update(
        &self,
        old_trust: f64,
        was_correct: bool,
        days_since_claim: f64,
        collusion_multiplier: f64,
    ) -> TrustChange {
        let time_factor = self.time_factor(days_since_claim);
        let base = self.learning_rate
            * (1.0 - self.decay_baseline)
            * time_factor
            * collusion_multiplier.clamp(0.0, 1.0);

        let delta = if was_correct {
            base * (self.gain / self.learning_rate).abs()
        } else {
            -base * (self.loss / self.learning_rate).abs()
        };

        TrustChange {
            old_trust,
            new_trust: self.clamp(old_trust + delta),
            delta,
        }
    }

    /// Compute the update for a participant, using their penalty multiplier.
    #[must_use]
    pub fn update_for(
        &self,
        participant: &Participant,
        was_correct: bool,
        days_since_claim: f64,
    ) -> TrustChange {
        self.compute_update(
            participant.trust(),
            was_correct,
            days_since_claim,
            participant.collusion_penalty_multiplier(),
        )
    }

    /// Store a clamped trust value on a participant, returning it.
    pub fn set_trust(&self, participant: &mut Participant, trust: f64) -> f64 {
        let clamped = self.clamp(trust);
        participant.store_trust(clamped);
        clamped
    }

    /// Whether `trust` meets the voting/posting floor.
    #[must_use]
    pub fn can_participate(&self, trust: f64) -> bool {
        trust >= self.vote_threshold
    }
}

fn invalid(name: &'static str, reason: &str) -> ReputationError {
    ReputationError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}

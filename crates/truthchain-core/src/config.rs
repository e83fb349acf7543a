//! Configuration for the TruthChain engine.
//!
//! Groups the trust model, consensus gates and collusion thresholds, plus
//! the wall-clock length of one claim-day.
//!
//! # Example
//!
//! ```
//! use truthchain_core::config::{EngineConfig, EngineConfigBuilder};
//!
//! // Use defaults
//! let config = EngineConfig::default();
//! assert!(config.validate().is_ok());
//!
//! // Or use builder for customization
//! let config = EngineConfigBuilder::new()
//!     .with_demo_days()
//!     .with_stabilization(5, 1.0, 3)
//!     .disable_vote_feedback()
//!     .build_validated()
//!     .unwrap();
//! assert_eq!(config.consensus.min_votes, 5);
//! ```

use chrono::Duration;
use serde::{Deserialize, Serialize};
use truthchain_reputation::clock::{DEMO_MS_PER_DAY, MS_PER_DAY};
use truthchain_reputation::{CollusionConfig, DayClock, InactivityDecayConfig, TrustModel};

/// Default minimum votes for stabilization.
const DEFAULT_MIN_VOTES: usize = 10;

/// Default minimum total weight for stabilization.
const DEFAULT_MIN_TRUST_WEIGHT: f64 = 2.0;

/// Default minimum claim age for stabilization, in claim-days.
const DEFAULT_STABILIZATION_WINDOW_DAYS: i64 = 7;

/// Default voting window, in claim-days.
const DEFAULT_VOTING_WINDOW_DAYS: i64 = 7;

/// Default credibility at or above which a claim resolves true.
const DEFAULT_TRUE_THRESHOLD: f64 = 0.5;

/// Default credibility at or below which a claim resolves false.
const DEFAULT_FALSE_THRESHOLD: f64 = -0.5;

/// Main engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Trust model and inactivity decay.
    pub trust: TrustConfig,

    /// Stabilization gate, thresholds and vote feedback.
    pub consensus: ConsensusConfig,

    /// Collusion detection thresholds.
    pub collusion: CollusionConfig,

    /// Length of one claim-day.
    #[serde(with = "duration_ms")]
    pub day_length: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trust: TrustConfig::default(),
            consensus: ConsensusConfig::default(),
            collusion: CollusionConfig::default(),
            day_length: Duration::milliseconds(MS_PER_DAY),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Defaults with one-minute claim-days.
    pub fn demo() -> Self {
        EngineConfigBuilder::new().with_demo_days().build()
    }

    /// Clock derived from `day_length`.
    pub fn clock(&self) -> DayClock {
        DayClock::new(self.day_length)
    }

    /// Validate the configuration.
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Trust model
        if let Err(err) = self.trust.model.validate() {
            return Err(ConfigError::InvalidValue {
                field: "trust.model".into(),
                reason: err.to_string(),
            });
        }
        let decay = &self.trust.inactivity;
        if decay.grace_days < 0 || decay.days_per_month <= 0 {
            return Err(invalid(
                "trust.inactivity",
                "grace period must be non-negative and months must be at least one day",
            ));
        }
        if !(0.0..=1.0).contains(&decay.monthly_rate) {
            return Err(invalid(
                "trust.inactivity.monthly_rate",
                "monthly rate must be between 0.0 and 1.0",
            ));
        }

        // Consensus
        let consensus = &self.consensus;
        if consensus.min_votes == 0 {
            return Err(invalid(
                "consensus.min_votes",
                "stabilization needs at least one vote",
            ));
        }
        if !(consensus.min_trust_weight > 0.0) {
            return Err(invalid(
                "consensus.min_trust_weight",
                "minimum trust weight must be greater than zero",
            ));
        }
        if consensus.stabilization_window_days < 0 || consensus.voting_window_days <= 0 {
            return Err(invalid(
                "consensus.voting_window_days",
                "windows must be positive",
            ));
        }
        if consensus.voting_window_days < consensus.stabilization_window_days {
            return Err(invalid(
                "consensus.voting_window_days",
                "voting window must not close before the stabilization window",
            ));
        }
        if !(consensus.true_threshold > 0.0 && consensus.true_threshold <= 1.0) {
            return Err(invalid(
                "consensus.true_threshold",
                "true threshold must be within (0, 1]",
            ));
        }
        if !(consensus.false_threshold < 0.0 && consensus.false_threshold >= -1.0) {
            return Err(invalid(
                "consensus.false_threshold",
                "false threshold must be within [-1, 0)",
            ));
        }
        if consensus.posting_threshold < self.trust.model.trust_min
            || consensus.posting_threshold > self.trust.model.trust_max
        {
            return Err(invalid(
                "consensus.posting_threshold",
                "posting threshold must lie within the trust bounds",
            ));
        }
        let feedback = &consensus.vote_feedback;
        if feedback.gain < 0.0 || feedback.loss < 0.0 || feedback.participation_reward < 0.0 {
            return Err(invalid(
                "consensus.vote_feedback",
                "feedback amounts must not be negative",
            ));
        }

        // Collusion
        let collusion = &self.collusion;
        if !(0.0..=1.0).contains(&collusion.correlation_threshold) {
            return Err(invalid(
                "collusion.correlation_threshold",
                "correlation threshold must be between 0.0 and 1.0",
            ));
        }
        if collusion.min_shared_claims == 0 {
            return Err(invalid(
                "collusion.min_shared_claims",
                "at least one shared claim is required",
            ));
        }
        if collusion.min_window_days < 0 {
            return Err(invalid(
                "collusion.min_window_days",
                "window must not be negative",
            ));
        }
        if !(collusion.weight_penalty > 0.0 && collusion.weight_penalty <= 1.0) {
            return Err(invalid(
                "collusion.weight_penalty",
                "penalty must be within (0, 1]",
            ));
        }

        // Clock
        if self.day_length <= Duration::zero() {
            return Err(invalid(
                "day_length",
                "day length must be greater than zero",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Trust model and inactivity decay settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Bounds, rates and thresholds of the trust model.
    pub model: TrustModel,

    /// Monthly inactivity decay.
    pub inactivity: InactivityDecayConfig,
}

/// Stabilization gate, resolution thresholds and vote-time feedback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Minimum votes before a claim can stabilize.
    pub min_votes: usize,

    /// Minimum total vote weight before a claim can stabilize.
    pub min_trust_weight: f64,

    /// Minimum claim age before it can stabilize, in claim-days.
    pub stabilization_window_days: i64,

    /// How long a claim accepts votes, in claim-days.
    pub voting_window_days: i64,

    /// Credibility at or above which a claim resolves true.
    pub true_threshold: f64,

    /// Credibility at or below which a claim resolves false.
    pub false_threshold: f64,

    /// Minimum trust to submit a claim.
    pub posting_threshold: f64,

    /// Preview trust nudge applied when a vote is cast.
    pub vote_feedback: VoteFeedbackConfig,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            min_votes: DEFAULT_MIN_VOTES,
            min_trust_weight: DEFAULT_MIN_TRUST_WEIGHT,
            stabilization_window_days: DEFAULT_STABILIZATION_WINDOW_DAYS,
            voting_window_days: DEFAULT_VOTING_WINDOW_DAYS,
            true_threshold: DEFAULT_TRUE_THRESHOLD,
            false_threshold: DEFAULT_FALSE_THRESHOLD,
            posting_threshold: truthchain_reputation::score::limits::VOTE_THRESHOLD,
            vote_feedback: VoteFeedbackConfig::default(),
        }
    }
}

/// Vote-time feedback nudge.
///
/// A preview signal only; the authoritative update happens at resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoteFeedbackConfig {
    /// Apply the nudge at all.
    pub enabled: bool,

    /// Votes on the claim (including the new one) before alignment counts.
    pub min_votes: usize,

    /// Reward for agreeing with the running score, before scaling.
    pub gain: f64,

    /// Penalty for disagreeing with the running score, before scaling.
    pub loss: f64,

    /// Cap on the voter weight used for scaling.
    pub weight_cap: f64,

    /// Flat reward while the claim has fewer than `min_votes` votes.
    pub participation_reward: f64,
}

impl Default for VoteFeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_votes: 3,
            gain: 0.03,
            loss: 0.045,
            weight_cap: 1.5,
            participation_reward: 0.005,
        }
    }
}

/// Builder for [`EngineConfig`].
#[derive(Clone, Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Build the configuration.
    pub fn build(self) -> EngineConfig {
        self.config
    }

    /// Build and validate the configuration.
    pub fn build_validated(self) -> Result<EngineConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }

    // ===== Trust Configuration =====

    /// Replace the whole trust model.
    pub fn with_trust_model(mut self, model: TrustModel) -> Self {
        self.config.trust.model = model;
        self
    }

    /// Set the trust given at registration.
    pub fn with_initial_trust(mut self, trust: f64) -> Self {
        self.config.trust.model.trust_initial = trust;
        self
    }

    /// Set the minimum trust to vote.
    pub fn with_vote_threshold(mut self, threshold: f64) -> Self {
        self.config.trust.model.vote_threshold = threshold;
        self
    }

    /// Replace the inactivity decay settings.
    pub fn with_inactivity_decay(mut self, decay: InactivityDecayConfig) -> Self {
        self.config.trust.inactivity = decay;
        self
    }

    // ===== Consensus Configuration =====

    /// Set the three stabilization gates.
    pub fn with_stabilization(mut self, min_votes: usize, min_weight: f64, window_days: i64) -> Self {
        self.config.consensus.min_votes = min_votes;
        self.config.consensus.min_trust_weight = min_weight;
        self.config.consensus.stabilization_window_days = window_days;
        self
    }

    /// Set how long claims accept votes.
    pub fn with_voting_window_days(mut self, days: i64) -> Self {
        self.config.consensus.voting_window_days = days;
        self
    }

    /// Set the true/false resolution thresholds.
    pub fn with_resolution_thresholds(mut self, true_threshold: f64, false_threshold: f64) -> Self {
        self.config.consensus.true_threshold = true_threshold;
        self.config.consensus.false_threshold = false_threshold;
        self
    }

    /// Set the minimum trust to submit a claim.
    pub fn with_posting_threshold(mut self, threshold: f64) -> Self {
        self.config.consensus.posting_threshold = threshold;
        self
    }

    /// Enable the vote-time feedback nudge.
    pub fn enable_vote_feedback(mut self) -> Self {
        self.config.consensus.vote_feedback.enabled = true;
        self
    }

    /// Disable the vote-time feedback nudge.
    pub fn disable_vote_feedback(mut self) -> Self {
        self.config.consensus.vote_feedback.enabled = false;
        self
    }

    // ===== Collusion Configuration =====

    /// Set the collusion flag thresholds.
    pub fn with_collusion_thresholds(
        mut self,
        correlation: f64,
        min_shared_claims: u32,
        min_window_days: i64,
    ) -> Self {
        self.config.collusion.correlation_threshold = correlation;
        self.config.collusion.min_shared_claims = min_shared_claims;
        self.config.collusion.min_window_days = min_window_days;
        self
    }

    /// Set the collusion penalty multiplier.
    pub fn with_collusion_penalty(mut self, penalty: f64) -> Self {
        self.config.collusion.weight_penalty = penalty;
        self
    }

    // ===== Clock Configuration =====

    /// Set the length of one claim-day.
    pub fn with_day_length(mut self, day_length: Duration) -> Self {
        self.config.day_length = day_length;
        self
    }

    /// Use one-minute claim-days.
    pub fn with_demo_days(mut self) -> Self {
        self.config.day_length = Duration::milliseconds(DEMO_MS_PER_DAY);
        self
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A value is out of range.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Field path.
        field: String,
        /// Why it is invalid.
        reason: String,
    },
}

/// Serde support for `chrono::Duration` as whole milliseconds.
mod duration_ms {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_milliseconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = i64::deserialize(deserializer)?;
        Ok(Duration::milliseconds(ms))
    }
}

//! Trust score limits and the trust-to-weight transform.

/// Trust score limits and model defaults.
pub mod limits {
    /// Minimum trust. Greater than zero so no participant is ever silenced.
    pub const TRUST_MIN: f64 = 0.1;

    /// Maximum trust. Bounds the influence any one participant can accumulate.
    pub const TRUST_MAX: f64 = 10.0;

    /// Trust assigned at registration.
    pub const TRUST_INITIAL: f64 = 0.2;

    /// Minimum trust required to vote or post a claim.
    pub const VOTE_THRESHOLD: f64 = 0.15;

    /// Learning rate (alpha).
    pub const ALPHA: f64 = 0.1;

    /// Decay baseline (beta).
    pub const BETA: f64 = 0.05;

    /// Time-decay constant (lambda), per claim-day.
    pub const LAMBDA: f64 = 0.01;

    /// Reward for a correct outcome.
    pub const TRUST_GAIN: f64 = 0.1;

    /// Penalty for an incorrect outcome.
    pub const TRUST_LOSS: f64 = -0.15;

    /// Monthly inactivity decay (5%).
    pub const INACTIVITY_DECAY: f64 = 0.05;
}

pub use limits::*;

/// Clamp a trust value into `[TRUST_MIN, TRUST_MAX]`.
///
/// Non-finite input collapses to the floor.
#[must_use]
pub fn clamp_trust(trust: f64) -> f64 {
    clamp_between(trust, TRUST_MIN, TRUST_MAX)
}

pub(crate) fn clamp_between(trust: f64, min: f64, max: f64) -> f64 {
    if trust.is_nan() {
        return min;
    }
    trust.clamp(min, max)
}

/// Effective vote weight: `sqrt(max(trust, TRUST_MIN))`.
///
/// Doubling trust multiplies weight by `sqrt(2)`, not 2.
#[must_use]
pub fn effective_weight(trust: f64) -> f64 {
    weight_with_floor(trust, TRUST_MIN)
}

pub(crate) fn weight_with_floor(trust: f64, floor: f64) -> f64 {
    if trust.is_nan() {
        return floor.sqrt();
    }
    trust.max(floor).sqrt()
}

/// Percentile rank (0-100) of `trust` within a population.
///
/// Returns 50 for an empty population and 100 when `trust` exceeds everyone.
#[must_use]
pub fn trust_percentile(trust: f64, all: &[f64]) -> u32 {
    if all.is_empty() {
        return 50;
    }
    let mut sorted = all.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    match sorted.iter().position(|&t| t >= trust) {
        Some(rank) => ((rank as f64 / sorted.len() as f64) * 100.0).round() as u32,
        None => 100,
    }
}

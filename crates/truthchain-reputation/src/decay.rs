//! Inactivity decay toward the trust floor.
//!
//! Participants idle for at least a month lose 5% of their trust per whole
//! month, compounding. The floor is never crossed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::score::limits::INACTIVITY_DECAY;
use crate::{DayClock, Participant, TrustModel, TrustUpdate, TrustUpdateSource};

/// Default grace period before decay starts, in claim-days.
pub const DEFAULT_GRACE_DAYS: i64 = 30;

/// Default claim-days per decay month.
pub const DEFAULT_DAYS_PER_MONTH: i64 = 30;

/// Changes smaller than this are not recorded.
pub const DEFAULT_DECAY_EPSILON: f64 = 0.001;

/// Configuration for inactivity decay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InactivityDecayConfig {
    /// Idle claim-days before decay applies.
    pub grace_days: i64,
    /// Claim-days per compounding period.
    pub days_per_month: i64,
    /// Fraction lost per month (0.0-1.0).
    pub monthly_rate: f64,
    /// Minimum change worth recording.
    pub epsilon: f64,
}

impl Default for InactivityDecayConfig {
    fn default() -> Self {
        Self {
            grace_days: DEFAULT_GRACE_DAYS,
            days_per_month: DEFAULT_DAYS_PER_MONTH,
            monthly_rate: INACTIVITY_DECAY,
            epsilon: DEFAULT_DECAY_EPSILON,
        }
    }
}

impl InactivityDecayConfig {
    /// Create a new decay configuration.
    #[must_use]
    pub fn new(grace_days: i64, days_per_month: i64, monthly_rate: f64) -> Self {
        Self {
            grace_days: grace_days.max(0),
            days_per_month: days_per_month.max(1),
            monthly_rate: monthly_rate.clamp(0.0, 1.0),
            epsilon: DEFAULT_DECAY_EPSILON,
        }
    }
}

/// Fraction of trust kept after `months` of compounding decay.
///
/// Month counts beyond `i32::MAX` saturate.
#[must_use]
pub fn decay_factor(config: &InactivityDecayConfig, months: i64) -> f64 {
    let months = i32::try_from(months.max(0)).unwrap_or(i32::MAX);
    (1.0 - config.monthly_rate).powi(months)
}

/// Trust after `months` of compounding decay, before clamping.
#[must_use]
pub fn project_decay(trust: f64, config: &InactivityDecayConfig, months: i64) -> f64 {
    trust * decay_factor(config, months)
}

/// Whole decay months owed by a participant at `now`.
///
/// Counted from the later of the last activity and the point decay has
/// already been charged through; zero inside the grace period.
#[must_use]
pub fn months_inactive(
    participant: &Participant,
    config: &InactivityDecayConfig,
    clock: &DayClock,
    now: DateTime<Utc>,
) -> i64 {
    let since = reference_time(participant);
    let idle_days = clock.whole_days_between(since, now);
    if idle_days < config.grace_days {
        return 0;
    }
    idle_days / config.days_per_month.max(1)
}

fn reference_time(participant: &Participant) -> DateTime<Utc> {
    match participant.decayed_through {
        Some(t) if t > participant.last_active_at => t,
        _ => participant.last_active_at,
    }
}

/// Compute the decay owed at `now` without applying it.
#[must_use]
pub fn compute_inactivity_decay(
    participant: &Participant,
    model: &TrustModel,
    config: &InactivityDecayConfig,
    clock: &DayClock,
    now: DateTime<Utc>,
) -> Option<TrustUpdate> {
    let months = months_inactive(participant, config, clock, now);
    if months == 0 {
        return None;
    }

    let old_trust = participant.trust();
    let new_trust = model.clamp(project_decay(old_trust, config, months));
    if (new_trust - old_trust).abs() < config.epsilon {
        return None;
    }

    let lost_percent = (1.0 - decay_factor(config, months)) * 100.0;
    Some(TrustUpdate {
        pseudonym: participant.pseudonym.clone(),
        source: TrustUpdateSource::InactivityDecay,
        old_trust,
        new_trust,
        reason: format!("Inactivity decay: {months} month(s) inactive (-{lost_percent:.1}%)"),
        timestamp: now,
    })
}

/// Apply the decay owed at `now`, returning the audit record if trust moved.
///
/// Charged months are remembered so repeated calls do not compound twice.
pub fn apply_inactivity_decay(
    participant: &mut Participant,
    model: &TrustModel,
    config: &InactivityDecayConfig,
    clock: &DayClock,
    now: DateTime<Utc>,
) -> Option<TrustUpdate> {
    let months = months_inactive(participant, config, clock, now);
    let update = compute_inactivity_decay(participant, model, config, clock, now)?;

    model.set_trust(participant, update.new_trust);
    let charged = clock.span(months.saturating_mul(config.days_per_month));
    participant.decayed_through = Some(reference_time(participant) + charged);
    Some(update)
}

//! Claim-day arithmetic.
//!
//! All windows in the model (stabilization, collusion, inactivity) are
//! expressed in claim-days. A `DayClock` maps them onto wall-clock time, so a
//! demo deployment can run a "day" in one minute.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds in a real day.
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Milliseconds in a demo day (one minute).
pub const DEMO_MS_PER_DAY: i64 = 60_000;

/// Converts between wall-clock durations and claim-days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayClock {
    /// Length of one claim-day in milliseconds.
    day_length_ms: i64,
}

impl DayClock {
    /// Create a clock with the given day length (minimum 1 ms).
    #[must_use]
    pub fn new(day_length: Duration) -> Self {
        Self {
            day_length_ms: day_length.num_milliseconds().max(1),
        }
    }

    /// Real 24-hour days.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            day_length_ms: MS_PER_DAY,
        }
    }

    /// One-minute demo days.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            day_length_ms: DEMO_MS_PER_DAY,
        }
    }

    /// Length of one claim-day.
    #[must_use]
    pub fn day_length(&self) -> Duration {
        Duration::milliseconds(self.day_length_ms)
    }

    /// Wall-clock span of `days` claim-days.
    #[must_use]
    pub fn span(&self, days: i64) -> Duration {
        Duration::milliseconds(self.day_length_ms.saturating_mul(days))
    }

    /// Fractional claim-days from `from` to `to` (negative if `to` is earlier).
    #[must_use]
    pub fn days_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
        (to - from).num_milliseconds() as f64 / self.day_length_ms as f64
    }

    /// Whole claim-days from `from` to `to`, rounded down (zero if negative).
    #[must_use]
    pub fn whole_days_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
        ((to - from).num_milliseconds() / self.day_length_ms).max(0)
    }

    /// Whether at least `days` claim-days separate `from` and `to`.
    #[must_use]
    pub fn elapsed_at_least(&self, from: DateTime<Utc>, to: DateTime<Utc>, days: i64) -> bool {
        to - from >= self.span(days)
    }
}

impl Default for DayClock {
    fn default() -> Self {
        Self::standard()
    }
}

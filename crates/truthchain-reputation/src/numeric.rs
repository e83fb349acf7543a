//! Numerically stable accumulation and threshold comparison.

/// Fixed precision for comparing scores against thresholds.
///
/// Values within this distance of a threshold count as reaching it.
pub const SCORE_EPSILON: f64 = 1e-9;

/// Neumaier compensated summation.
#[derive(Clone, Copy, Debug, Default)]
pub struct StableSum {
    sum: f64,
    compensation: f64,
}

impl StableSum {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value.
    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    /// The compensated total.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}

impl FromIterator<f64> for StableSum {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        for value in iter {
            acc.add(value);
        }
        acc
    }
}

/// Compensated sum of an iterator of values.
pub fn stable_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().collect::<StableSum>().total()
}

/// `value >= threshold` at [`SCORE_EPSILON`] precision.
#[must_use]
pub fn at_least(value: f64, threshold: f64) -> bool {
    value >= threshold - SCORE_EPSILON
}

/// `value <= threshold` at [`SCORE_EPSILON`] precision.
#[must_use]
pub fn at_most(value: f64, threshold: f64) -> bool {
    value <= threshold + SCORE_EPSILON
}

/// Snap values within [`SCORE_EPSILON`] of zero to exactly zero.
#[must_use]
pub fn snap_to_zero(value: f64) -> f64 {
    if value.abs() < SCORE_EPSILON {
        0.0
    } else {
        value
    }
}

//! Running statistics for batch reports.

use serde::{Deserialize, Serialize};

/// Mean, variance and range of a stream of samples.
///
/// Updated one sample at a time with Welford's method. All fields are 0
/// until the first sample arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalarStats {
    /// Arithmetic mean
    pub mean: f64,
    /// Population variance (σ²)
    pub variance: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Number of samples
    pub sample_count: u64,
}

impl ScalarStats {
    /// Adds one sample.
    #[allow(clippy::cast_precision_loss)]
    pub fn push(&mut self, value: f64) {
        if self.sample_count == 0 {
            *self = Self {
                mean: value,
                variance: 0.0,
                min: value,
                max: value,
                sample_count: 1,
            };
            return;
        }
        self.sample_count += 1;
        let n = self.sample_count as f64;
        let delta = value - self.mean;
        self.mean += delta / n;
        self.variance = (self.variance * (n - 1.0) + delta * (value - self.mean)) / n;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Standard deviation.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// True when no samples were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}

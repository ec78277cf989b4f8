//! Summary statistics of real-space field samples

use serde::Serialize;
use std::fmt;

/// Mean, variance and extrema of a real buffer
///
/// Accumulated sequentially in buffer order so repeated runs give identical
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStatistics {
    pub mean: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
}

impl FieldStatistics {
    /// Compute statistics of `samples`; an empty slice yields all zeros
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self {
                mean: 0.0,
                variance: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }

        let count = samples.len() as f64;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &value in samples {
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }
        let mean = sum / count;
        let variance = samples
            .iter()
            .map(|&value| (value - mean) * (value - mean))
            .sum::<f64>()
            / count;

        Self {
            mean,
            variance,
            min,
            max,
        }
    }

    /// Root-mean-square deviation from the mean
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

impl fmt::Display for FieldStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean={:.6e} rms={:.6e} min={:.6e} max={:.6e}",
            self.mean,
            self.std_dev(),
            self.min,
            self.max
        )
    }
}

//! Summary statistics over Monte Carlo run totals.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Distribution summary of a set of samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Standard error of the mean
    pub std_error: f64,
    pub min: f64,
    pub max: f64,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

impl SampleSummary {
    /// Summarise samples in their given order; `None` for an empty slice
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;
        let std_dev = variance.sqrt();

        let sorted: Vec<f64> = samples.iter().copied().sorted_by(|a, b| a.total_cmp(b)).collect();
        let percentile = |p: f64| {
            let index = ((p / 100.0) * (n as f64 - 1.0)).round() as usize;
            sorted[index.min(n - 1)]
        };

        Some(Self {
            count: n,
            mean,
            std_dev,
            std_error: std_dev / (n as f64).sqrt(),
            min: sorted[0],
            max: sorted[n - 1],
            p10: percentile(10.0),
            p50: percentile(50.0),
            p90: percentile(90.0),
        })
    }
}

/// Equal-width histogram of per-interval values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width buckets spanning their range.
    ///
    /// The maximum value lands in the last bucket. When every value is equal
    /// all of them land in the first bucket.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }

        let (min, max) = values
            .iter()
            .copied()
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option()?;

        let span = max - min;
        let bin_width = span / bins as f64;
        let mut counts = vec![0; bins];

        for &value in values {
            let index = if span > 0.0 {
                (((value - min) / span) * bins as f64) as usize
            } else {
                0
            };
            counts[index.min(bins - 1)] += 1;
        }

        Some(Self {
            min,
            max,
            bin_width,
            counts,
        })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

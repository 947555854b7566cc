use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use super::PriceSource;
use crate::domain::PriceSeries;

/// Intervals per day at five-minute resolution
pub const INTERVALS_PER_DAY: usize = 288;

/// Uniformly distributed prices, for runs without recorded price data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticPriceSource {
    pub intervals: usize,
    pub low: f64,
    pub high: f64,
    pub seed: u64,
}

impl Default for SyntheticPriceSource {
    /// Thirty days of five-minute prices between 1.5 and 5.0
    fn default() -> Self {
        Self {
            intervals: INTERVALS_PER_DAY * 30,
            low: 1.5,
            high: 5.0,
            seed: 0,
        }
    }
}

impl PriceSource for SyntheticPriceSource {
    fn load(&self) -> Result<PriceSeries> {
        ensure!(self.intervals > 0, "synthetic price series needs at least one interval");
        ensure!(
            self.low.is_finite() && self.high.is_finite() && self.low < self.high,
            "synthetic price range [{}, {}) is empty",
            self.low,
            self.high
        );

        let mut rng = StdRng::seed_from_u64(self.seed);
        let dist = Uniform::new(self.low, self.high);
        let prices = (0..self.intervals).map(|_| dist.sample(&mut rng)).collect();

        Ok(PriceSeries::new(prices)?)
    }

    fn describe(&self) -> String {
        format!(
            "synthetic:{}x[{}, {}) seed {}",
            self.intervals, self.low, self.high, self.seed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_month() {
        let series = SyntheticPriceSource::default().load().unwrap();
        assert_eq!(series.len(), 8_640);
        assert!(series.min() >= 1.5);
        assert!(series.max() < 5.0);
        assert!((series.average() - 3.25).abs() < 0.1);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let source = SyntheticPriceSource {
            intervals: 50,
            seed: 9,
            ..Default::default()
        };
        assert_eq!(source.load().unwrap(), source.load().unwrap());

        let other = SyntheticPriceSource { seed: 10, ..source.clone() };
        assert_ne!(source.load().unwrap(), other.load().unwrap());
    }

    #[test]
    fn test_empty_range_rejected() {
        let source = SyntheticPriceSource {
            low: 2.0,
            high: 2.0,
            ..Default::default()
        };
        assert!(source.load().is_err());

        let source = SyntheticPriceSource {
            intervals: 0,
            ..Default::default()
        };
        assert!(source.load().is_err());
    }
}

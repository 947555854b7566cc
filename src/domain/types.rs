use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::error::{SimError, SimResult};

/// Ordered per-interval electricity prices (currency per kWh).
///
/// The series is immutable once built and cheap to clone, so every Monte Carlo
/// repetition and worker thread shares the same backing buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct PriceSeries {
    prices: Arc<[f64]>,
    average: f64,
}

impl PriceSeries {
    /// Build a price series, rejecting empty or non-finite input
    pub fn new(prices: Vec<f64>) -> SimResult<Self> {
        if prices.is_empty() {
            return Err(SimError::invalid("price series must not be empty"));
        }

        if let Some((idx, price)) = prices.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(SimError::invalid(format!(
                "price at interval {} is not finite ({})",
                idx, price
            )));
        }

        let average = prices.iter().sum::<f64>() / prices.len() as f64;

        Ok(Self {
            prices: prices.into(),
            average,
        })
    }

    /// Mean unit price over the whole horizon
    pub fn average(&self) -> f64 {
        self.average
    }

    pub fn min(&self) -> f64 {
        self.prices.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.prices.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// True when every interval has the same price
    pub fn is_flat(&self) -> bool {
        self.min() == self.max()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }
}

impl Deref for PriceSeries {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.prices
    }
}

impl TryFrom<Vec<f64>> for PriceSeries {
    type Error = SimError;

    fn try_from(prices: Vec<f64>) -> SimResult<Self> {
        Self::new(prices)
    }
}

impl From<PriceSeries> for Vec<f64> {
    fn from(series: PriceSeries) -> Self {
        series.prices.to_vec()
    }
}

impl fmt::Display for PriceSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} intervals, avg {:.3}, range [{:.3}, {:.3}]",
            self.len(),
            self.average,
            self.min(),
            self.max()
        )
    }
}

//! Sources of per-interval electricity prices fed into the simulation.

pub mod csv;
pub mod synthetic;

use anyhow::Result;

use crate::domain::PriceSeries;

pub use self::csv::CsvPriceSource;
pub use self::synthetic::SyntheticPriceSource;

pub trait PriceSource: Send + Sync {
    fn load(&self) -> Result<PriceSeries>;
    fn describe(&self) -> String;
}

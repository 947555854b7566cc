use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::PriceSource;
use crate::domain::PriceSeries;

/// Reads prices from a two-column CSV file (`timestamp,price`).
///
/// The first line is a header and is skipped; only the second column is used.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PriceSource for CsvPriceSource {
    fn load(&self) -> Result<PriceSeries> {
        let body = std::fs::read_to_string(&self.path)
            .with_context(|| format!("price file '{}' could not be read", self.path.display()))?;
        let series = parse_price_csv(&body)
            .with_context(|| format!("price file '{}' is malformed", self.path.display()))?;

        info!(path = %self.path.display(), %series, "loaded price series");
        Ok(series)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

/// Parse CSV text into a price series, skipping the header and blank lines
pub fn parse_price_csv(body: &str) -> Result<PriceSeries> {
    let mut prices = Vec::new();

    for (idx, line) in body.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let field = match line.split(',').nth(1) {
            Some(f) => f.trim().trim_matches('"').trim(),
            None => bail!("line {}: expected two columns, got '{}'", line_no, line),
        };

        let price: f64 = field
            .parse()
            .with_context(|| format!("line {}: '{}' is not a valid price", line_no, field))?;
        prices.push(price);
    }

    debug!(rows = prices.len(), "parsed price rows");
    Ok(PriceSeries::new(prices)?)
}

//! Data handed to presentation tools: mean cost per thermostat variant,
//! temperature and cost series of an informational run, and the
//! per-interval cost distribution.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::IntoEnumIterator;
use tracing::info;

use crate::config::AppConfig;
use crate::controller::ControllerKind;
use crate::domain::PriceSeries;
use crate::error::{SimError, SimResult};
use crate::simulation::{
    repetition_rng, CostAccumulator, Histogram, MonteCarloDriver, MonteCarloEstimate,
    SimulationRun, TracedRun,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOverview {
    pub source: String,
    pub intervals: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

impl PriceOverview {
    pub fn new(source: impl Into<String>, prices: &PriceSeries) -> Self {
        Self {
            source: source.into(),
            intervals: prices.len(),
            average: prices.average(),
            min: prices.min(),
            max: prices.max(),
        }
    }
}

/// Totals of the single informational run kept for plotting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub costs: CostAccumulator,
    pub total_cost: f64,
    pub compressor_intervals: usize,
    pub door_open_intervals: usize,
    pub final_temp_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantReport {
    pub controller: ControllerKind,
    pub target_temp_c: f64,
    pub estimate: MonteCarloEstimate,
    pub informational_run: RunSummary,
    /// Temperature history, starting with the initial temperature
    pub temperature_preview: Vec<f64>,
    pub energy_cost_preview: Vec<f64>,
    pub food_loss_cost_preview: Vec<f64>,
    /// Per-interval total cost over the full horizon
    pub interval_cost_histogram: Histogram,
}

impl VariantReport {
    pub fn new(
        target_temp_c: f64,
        estimate: MonteCarloEstimate,
        run_seed: u64,
        traced: &TracedRun,
        preview_intervals: usize,
        histogram_bins: usize,
    ) -> SimResult<Self> {
        let outcome = &traced.outcome;
        let preview = |values: Vec<f64>| values.into_iter().take(preview_intervals).collect::<Vec<_>>();

        let interval_cost_histogram = Histogram::from_values(&traced.total_costs(), histogram_bins)
            .ok_or_else(|| SimError::invalid("histogram needs at least one interval and one bin"))?;

        Ok(Self {
            controller: estimate.controller,
            target_temp_c,
            informational_run: RunSummary {
                seed: run_seed,
                costs: outcome.costs,
                total_cost: outcome.total_cost(),
                compressor_intervals: outcome.compressor_intervals,
                door_open_intervals: outcome.door_open_intervals,
                final_temp_c: outcome.room.temperature_c(),
            },
            estimate,
            temperature_preview: preview(outcome.temperature_history().to_vec()),
            energy_cost_preview: preview(traced.energy_costs()),
            food_loss_cost_preview: preview(traced.food_loss_costs()),
            interval_cost_histogram,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub generated_at: DateTime<Utc>,
    pub prices: PriceOverview,
    pub variants: Vec<VariantReport>,
}

impl ComparisonReport {
    /// Estimate every controller variant and record an informational run of each.
    ///
    /// The informational run uses the stream right after the last Monte Carlo
    /// repetition, so it never duplicates one of the averaged runs.
    pub fn generate(cfg: &AppConfig, prices: &PriceSeries, source: &str) -> SimResult<Self> {
        cfg.validate()?;

        let driver = MonteCarloDriver::new(cfg.monte_carlo.repetitions)?
            .with_optional_seed(cfg.monte_carlo.seed)
            .with_parallel(cfg.monte_carlo.parallel);

        let mut variants = Vec::new();
        for kind in ControllerKind::iter() {
            let sim_cfg = cfg.simulation_config(kind);
            let estimate = driver.estimate(&sim_cfg, prices)?;

            let run = SimulationRun::new(&sim_cfg, prices)?;
            let policy = kind.build(&sim_cfg);
            let run_seed = estimate.seed.wrapping_add(estimate.repetitions as u64);
            let mut rng = repetition_rng(run_seed, 0);
            let traced = run.run_traced(policy.as_ref(), &mut rng);

            info!(
                controller = %kind,
                mean_cost = estimate.mean,
                std_error = estimate.summary.std_error,
                "controller estimated"
            );

            variants.push(VariantReport::new(
                sim_cfg.target_temp_c,
                estimate,
                run_seed,
                &traced,
                cfg.report.preview_intervals,
                cfg.report.histogram_bins,
            )?);
        }

        Ok(Self {
            generated_at: Utc::now(),
            prices: PriceOverview::new(source, prices),
            variants,
        })
    }

    pub fn variant(&self, kind: ControllerKind) -> Option<&VariantReport> {
        self.variants.iter().find(|v| v.controller == kind)
    }

    /// Mean monthly saving of the price-aware thermostat over the simple one
    pub fn price_aware_saving(&self) -> Option<f64> {
        let simple = self.variant(ControllerKind::Simple)?;
        let smart = self.variant(ControllerKind::PriceAware)?;
        Some(simple.estimate.mean - smart.estimate.mean)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("could not create '{}'", parent.display()))?;
        }
        let body = serde_json::to_string_pretty(self)?;
        std::fs::write(path, body)
            .with_context(|| format!("could not write report to '{}'", path.display()))?;
        info!(path = %path.display(), "report written");
        Ok(())
    }
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::run::SimulationRun;
use super::stats::SampleSummary;
use super::SimulationConfig;
use crate::controller::ControllerKind;
use crate::domain::PriceSeries;
use crate::error::{SimError, SimResult};

/// Random stream for repetition `index` of a Monte Carlo batch.
///
/// Streams depend only on the base seed and the index, so a batch produces the
/// same totals whether it runs on one thread or many.
pub fn repetition_rng(base_seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(base_seed.wrapping_add(index as u64))
}

/// Expected-cost estimate for one controller variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloEstimate {
    pub controller: ControllerKind,
    pub repetitions: usize,
    pub seed: u64,
    pub mean: f64,
    pub summary: SampleSummary,
}

/// Repeats independent stochastic runs and averages their total cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonteCarloDriver {
    repetitions: usize,
    seed: Option<u64>,
    parallel: bool,
}

impl MonteCarloDriver {
    pub fn new(repetitions: usize) -> SimResult<Self> {
        if repetitions == 0 {
            return Err(SimError::invalid("repetitions must be >= 1"));
        }

        Ok(Self {
            repetitions,
            seed: None,
            parallel: cfg!(feature = "parallel"),
        })
    }

    /// Fix the base seed; repetition `i` uses `seed + i`
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_optional_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Run repetitions on the rayon pool (ignored without the `parallel` feature)
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel && cfg!(feature = "parallel");
        self
    }

    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Mean total cost over all repetitions
    pub fn estimate_mean_cost(&self, config: &SimulationConfig, prices: &PriceSeries) -> SimResult<f64> {
        Ok(self.estimate(config, prices)?.mean)
    }

    pub fn estimate(&self, config: &SimulationConfig, prices: &PriceSeries) -> SimResult<MonteCarloEstimate> {
        let (seed, totals) = self.run_totals(config, prices)?;

        let summary = SampleSummary::from_samples(&totals)
            .ok_or_else(|| SimError::invalid("no repetitions were executed"))?;

        Ok(MonteCarloEstimate {
            controller: config.controller,
            repetitions: self.repetitions,
            seed,
            mean: summary.mean,
            summary,
        })
    }

    /// Total cost of every repetition, in repetition order, with the base seed used
    pub fn run_totals(&self, config: &SimulationConfig, prices: &PriceSeries) -> SimResult<(u64, Vec<f64>)> {
        let run = SimulationRun::new(config, prices)?;
        let policy = config.controller.build(config);
        let seed = self
            .seed
            .unwrap_or_else(|| StdRng::from_entropy().gen());

        if prices.is_flat() && config.controller == ControllerKind::PriceAware {
            warn!("flat price series: price-aware thermostat behaves like the simple one");
        }

        info!(
            controller = %config.controller,
            repetitions = self.repetitions,
            intervals = prices.len(),
            seed,
            parallel = self.parallel,
            "starting Monte Carlo batch"
        );
        let started = Instant::now();

        let simulate = |index: usize| {
            let mut rng = repetition_rng(seed, index);
            run.run_once(policy.as_ref(), &mut rng).total_cost()
        };

        #[cfg(feature = "parallel")]
        let totals: Vec<f64> = if self.parallel {
            (0..self.repetitions).into_par_iter().map(simulate).collect()
        } else {
            (0..self.repetitions).map(simulate).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let totals: Vec<f64> = (0..self.repetitions).map(simulate).collect();

        info!(
            controller = %config.controller,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Monte Carlo batch complete"
        );

        Ok((seed, totals))
    }
}

/// Mean total cost of `repetitions` runs seeded from OS entropy
pub fn estimate_mean_cost(
    config: &SimulationConfig,
    prices: &PriceSeries,
    repetitions: usize,
) -> SimResult<f64> {
    MonteCarloDriver::new(repetitions)?.estimate_mean_cost(config, prices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices() -> PriceSeries {
        PriceSeries::new((0..288).map(|i| 1.5 + (i % 7) as f64 * 0.5).collect()).unwrap()
    }

    #[test]
    fn test_zero_repetitions_rejected() {
        assert!(matches!(
            MonteCarloDriver::new(0),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_single_repetition_equals_single_run() {
        let config = SimulationConfig::default();
        let prices = prices();

        let mean = MonteCarloDriver::new(1)
            .unwrap()
            .with_seed(17)
            .estimate_mean_cost(&config, &prices)
            .unwrap();

        let run = SimulationRun::new(&config, &prices).unwrap();
        let policy = config.controller.build(&config);
        let single = run.run_once(policy.as_ref(), &mut StdRng::seed_from_u64(17));

        assert_eq!(mean, single.total_cost());
    }

    #[test]
    fn test_seeded_estimates_are_reproducible() {
        let config = SimulationConfig::default().with_controller(ControllerKind::PriceAware, 6.0);
        let prices = prices();
        let driver = MonteCarloDriver::new(20).unwrap().with_seed(42);

        let a = driver.estimate(&config, &prices).unwrap();
        let b = driver.estimate(&config, &prices).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.seed, 42);
        assert_eq!(a.controller, ControllerKind::PriceAware);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = SimulationConfig::default();
        let prices = prices();
        let driver = MonteCarloDriver::new(32).unwrap().with_seed(7);

        let (_, parallel) = driver.with_parallel(true).run_totals(&config, &prices).unwrap();
        let (_, sequential) = driver.with_parallel(false).run_totals(&config, &prices).unwrap();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_repetitions_use_distinct_streams() {
        let config = SimulationConfig::default();
        let prices = prices();
        let (_, totals) = MonteCarloDriver::new(10)
            .unwrap()
            .with_seed(1)
            .run_totals(&config, &prices)
            .unwrap();

        let first = totals[0];
        assert!(totals.iter().any(|t| *t != first));
    }

    #[test]
    fn test_invalid_config_fails_before_any_run() {
        let config = SimulationConfig {
            interval_seconds: -1.0,
            ..SimulationConfig::default()
        };
        let driver = MonteCarloDriver::new(5).unwrap();
        assert!(driver.estimate(&config, &prices()).is_err());
    }

    #[test]
    fn test_deterministic_config_has_no_spread() {
        let config = SimulationConfig {
            door_probability: 0.0,
            ..SimulationConfig::default()
        };
        let estimate = MonteCarloDriver::new(8)
            .unwrap()
            .estimate(&config, &prices())
            .unwrap();

        assert!(estimate.summary.std_dev < 1e-9);
        assert_eq!(estimate.summary.min, estimate.summary.max);
    }
}

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::costs::EnergyModel;
use super::room::RoomState;
use super::SimulationConfig;
use crate::controller::{CoolingPolicy, IntervalContext};
use crate::domain::PriceSeries;
use crate::error::SimResult;

/// Running cost totals for a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostAccumulator {
    pub energy_cost: f64,
    pub food_loss_cost: f64,
}

impl CostAccumulator {
    pub fn add(&mut self, energy_cost: f64, food_loss_cost: f64) {
        self.energy_cost += energy_cost;
        self.food_loss_cost += food_loss_cost;
    }

    pub fn total(&self) -> f64 {
        self.energy_cost + self.food_loss_cost
    }
}

/// One simulated interval, as recorded by [`SimulationRun::run_traced`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub index: usize,
    pub price: f64,
    pub door_open: bool,
    pub compressor_on: bool,
    /// Room temperature after the update (°C)
    pub temperature_c: f64,
    pub energy_cost: f64,
    pub food_loss_cost: f64,
}

impl IntervalRecord {
    pub fn total_cost(&self) -> f64 {
        self.energy_cost + self.food_loss_cost
    }
}

/// Result of a complete pass over the price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub costs: CostAccumulator,
    pub compressor_intervals: usize,
    pub door_open_intervals: usize,
    /// Room state at the end of the run, including the temperature history
    pub room: RoomState,
}

impl RunOutcome {
    pub fn total_cost(&self) -> f64 {
        self.costs.total()
    }

    pub fn temperature_history(&self) -> &[f64] {
        self.room.history()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracedRun {
    pub outcome: RunOutcome,
    pub intervals: Vec<IntervalRecord>,
}

impl TracedRun {
    pub fn energy_costs(&self) -> Vec<f64> {
        self.intervals.iter().map(|r| r.energy_cost).collect()
    }

    pub fn food_loss_costs(&self) -> Vec<f64> {
        self.intervals.iter().map(|r| r.food_loss_cost).collect()
    }

    pub fn total_costs(&self) -> Vec<f64> {
        self.intervals.iter().map(IntervalRecord::total_cost).collect()
    }
}

/// Drives one room through every interval of a price series.
///
/// Each call to [`run_once`](Self::run_once) starts from a freshly built
/// [`RoomState`], so runs never share state.
pub struct SimulationRun<'a> {
    config: &'a SimulationConfig,
    prices: &'a PriceSeries,
    energy: EnergyModel,
}

impl<'a> SimulationRun<'a> {
    pub fn new(config: &'a SimulationConfig, prices: &'a PriceSeries) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            prices,
            energy: EnergyModel::new(config.power_per_interval_kwh),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        self.config
    }

    pub fn prices(&self) -> &PriceSeries {
        self.prices
    }

    /// Simulate the full horizon and return the accumulated cost
    pub fn run_once<R: Rng + ?Sized>(&self, policy: &dyn CoolingPolicy, rng: &mut R) -> RunOutcome {
        self.simulate(policy, rng, |_| {})
    }

    /// Like [`run_once`](Self::run_once) but keeps every interval's cost terms
    pub fn run_traced<R: Rng + ?Sized>(&self, policy: &dyn CoolingPolicy, rng: &mut R) -> TracedRun {
        let mut intervals = Vec::with_capacity(self.prices.len());
        let outcome = self.simulate(policy, rng, |record| intervals.push(record));
        TracedRun { outcome, intervals }
    }

    fn simulate<R, F>(&self, policy: &dyn CoolingPolicy, rng: &mut R, mut observe: F) -> RunOutcome
    where
        R: Rng + ?Sized,
        F: FnMut(IntervalRecord),
    {
        let config = self.config;
        let average_price = self.prices.average();

        let mut room = RoomState::from_config(config);
        let mut costs = CostAccumulator::default();
        let mut compressor_intervals = 0;
        let mut door_open_intervals = 0;

        for (index, &price) in self.prices.iter().enumerate() {
            room.toggle_door(rng);
            let c1 = config.conduction(room.door_open());

            let ctx = IntervalContext {
                temperature_c: room.temperature_c(),
                price,
                average_price,
            };
            let c2 = if policy.should_cool(&ctx) {
                config.c2_cooling
            } else {
                0.0
            };

            room.update_temperature(c1, c2, config.ambient_temp_c, config.compressor_temp_c);

            let compressor_on = c2 > 0.0;
            let energy_cost = self.energy.cost(price, compressor_on);
            let food_loss_cost = room.food_loss_cost();
            costs.add(energy_cost, food_loss_cost);

            if compressor_on {
                compressor_intervals += 1;
            }
            if room.door_open() {
                door_open_intervals += 1;
            }

            trace!(
                index,
                price,
                door_open = room.door_open(),
                compressor_on,
                temperature_c = room.temperature_c(),
                "interval simulated"
            );

            observe(IntervalRecord {
                index,
                price,
                door_open: room.door_open(),
                compressor_on,
                temperature_c: room.temperature_c(),
                energy_cost,
                food_loss_cost,
            });
        }

        debug!(
            policy = policy.name(),
            total_cost = costs.total(),
            compressor_intervals,
            door_open_intervals,
            final_temp_c = room.temperature_c(),
            "run complete"
        );

        RunOutcome {
            costs,
            compressor_intervals,
            door_open_intervals,
            room,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ControllerKind, PriceAwareThermostat, SimpleThermostat};
    use crate::simulation::costs::spoilage_cost;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn closed_door_config() -> SimulationConfig {
        SimulationConfig {
            door_probability: 0.0,
            ..SimulationConfig::default()
        }
    }

    /// Cheap and expensive intervals alternating around an average of 5.5
    fn alternating_prices(len: usize) -> PriceSeries {
        PriceSeries::new((0..len).map(|i| if i % 2 == 0 { 1.0 } else { 10.0 }).collect()).unwrap()
    }

    #[test]
    fn test_history_covers_every_interval() {
        let config = SimulationConfig::default();
        let prices = PriceSeries::new(vec![2.0; 288]).unwrap();
        let run = SimulationRun::new(&config, &prices).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let outcome = run.run_once(&SimpleThermostat::new(5.0), &mut rng);

        assert_eq!(outcome.temperature_history().len(), 289);
        assert_eq!(outcome.temperature_history()[0], config.start_temp_c);
        assert_eq!(outcome.room.steps_executed(), 288);
    }

    #[test]
    fn test_first_interval_matches_hand_calculation() {
        // Starting at the setpoint, the simple thermostat leaves the compressor
        // off; with the door closed the room gains 5e-7 * 15 * 300 degrees.
        let config = closed_door_config();
        let prices = PriceSeries::new(vec![3.0]).unwrap();
        let run = SimulationRun::new(&config, &prices).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let traced = run.run_traced(&SimpleThermostat::new(5.0), &mut rng);
        let record = traced.intervals[0];

        assert!(!record.door_open);
        assert!(!record.compressor_on);
        assert!((record.temperature_c - 5.00225).abs() < 1e-9);
        assert_eq!(record.energy_cost, 0.0);
        assert_eq!(record.food_loss_cost, 0.0);
        assert_eq!(traced.outcome.total_cost(), 0.0);
    }

    #[test]
    fn test_compressor_cost_charged_at_interval_price() {
        let config = SimulationConfig {
            start_temp_c: 6.0,
            ..closed_door_config()
        };
        let prices = PriceSeries::new(vec![2.5, 4.0]).unwrap();
        let run = SimulationRun::new(&config, &prices).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let traced = run.run_traced(&SimpleThermostat::new(5.0), &mut rng);

        assert!(traced.intervals.iter().all(|r| r.compressor_on));
        assert_eq!(traced.energy_costs(), vec![2.5, 4.0]);
        assert_eq!(traced.outcome.compressor_intervals, 2);
        assert!((traced.outcome.costs.energy_cost - 6.5).abs() < 1e-12);
    }

    #[test]
    fn test_traced_totals_match_outcome() {
        let config = SimulationConfig::default();
        let prices = alternating_prices(500);
        let run = SimulationRun::new(&config, &prices).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let traced = run.run_traced(&SimpleThermostat::new(5.0), &mut rng);
        let summed: f64 = traced.total_costs().iter().sum();

        assert_eq!(traced.intervals.len(), 500);
        assert!((summed - traced.outcome.total_cost()).abs() < 1e-9);
        for (record, temp) in traced.intervals.iter().zip(&traced.outcome.temperature_history()[1..]) {
            assert_eq!(record.temperature_c, *temp);
            assert_eq!(record.food_loss_cost, spoilage_cost(*temp));
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = SimulationConfig::default();
        let prices = alternating_prices(1_000);
        let run = SimulationRun::new(&config, &prices).unwrap();
        let policy = ControllerKind::PriceAware.build(&config);

        let a = run.run_once(policy.as_ref(), &mut StdRng::seed_from_u64(99));
        let b = run.run_once(policy.as_ref(), &mut StdRng::seed_from_u64(99));

        assert_eq!(a, b);
    }

    #[test]
    fn test_runs_do_not_share_room_state() {
        let config = SimulationConfig::default();
        let prices = alternating_prices(100);
        let run = SimulationRun::new(&config, &prices).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let policy = SimpleThermostat::new(5.0);

        let first = run.run_once(&policy, &mut rng);
        let second = run.run_once(&policy, &mut rng);

        assert_eq!(first.temperature_history().len(), 101);
        assert_eq!(second.temperature_history().len(), 101);
        assert_eq!(second.temperature_history()[0], config.start_temp_c);
    }

    #[test]
    fn test_price_aware_cheaper_on_alternating_prices() {
        let config = closed_door_config();
        let prices = alternating_prices(2_016);
        let run = SimulationRun::new(&config, &prices).unwrap();

        let simple = run.run_once(&SimpleThermostat::new(5.0), &mut StdRng::seed_from_u64(3));
        let smart = run.run_once(
            &PriceAwareThermostat::new(5.0, config.critical_temp_c),
            &mut StdRng::seed_from_u64(3),
        );

        // Both stay inside the safe band, so only energy differs
        assert_eq!(simple.costs.food_loss_cost, 0.0);
        assert_eq!(smart.costs.food_loss_cost, 0.0);
        assert!(smart.total_cost() < simple.total_cost());
    }

    #[test]
    fn test_invalid_config_rejected_before_running() {
        let config = SimulationConfig {
            door_probability: -0.1,
            ..SimulationConfig::default()
        };
        let prices = alternating_prices(10);
        assert!(SimulationRun::new(&config, &prices).is_err());
    }
}

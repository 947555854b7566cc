//! # Cold Room Simulation
//!
//! Discrete-time model of a refrigerated room and the cost of running it.
//!
//! ## Components
//!
//! - **Room**: temperature, door state and temperature history, advanced one interval at a time
//! - **Costs**: compressor electricity cost and temperature-dependent food-loss cost
//! - **Run**: one pass over a price series under a thermostat policy
//! - **Monte Carlo**: repeated independent runs and their cost statistics
//!
//! ## Usage
//!
//! ```rust
//! use cold_room_sim::controller::ControllerKind;
//! use cold_room_sim::domain::PriceSeries;
//! use cold_room_sim::simulation::{MonteCarloDriver, SimulationConfig};
//!
//! let prices = PriceSeries::new(vec![2.0, 3.5, 1.5, 4.0]).unwrap();
//! let config = SimulationConfig::default().with_controller(ControllerKind::PriceAware, 6.0);
//!
//! let mean = MonteCarloDriver::new(10)
//!     .unwrap()
//!     .with_seed(1)
//!     .estimate_mean_cost(&config, &prices)
//!     .unwrap();
//! assert!(mean >= 0.0);
//! ```

pub mod config;
pub mod costs;
pub mod monte_carlo;
pub mod room;
pub mod run;
pub mod stats;

pub use config::SimulationConfig;
pub use costs::{spoilage_cost, EnergyModel, FoodLossModel};
pub use monte_carlo::{estimate_mean_cost, repetition_rng, MonteCarloDriver, MonteCarloEstimate};
pub use room::RoomState;
pub use run::{CostAccumulator, IntervalRecord, RunOutcome, SimulationRun, TracedRun};
pub use stats::{Histogram, SampleSummary};

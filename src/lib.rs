//! Cold room cost simulator.
//!
//! Estimates the monthly cost of running a refrigerated room under a simple
//! threshold thermostat and a price-aware thermostat, using stochastic door
//! openings, a first-order thermal model, spot electricity prices and a
//! temperature-dependent food-loss penalty.

pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod prices;
pub mod report;
pub mod simulation;
pub mod telemetry;

pub use error::{SimError, SimResult};

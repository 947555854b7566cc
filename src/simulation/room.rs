use rand::Rng;
use serde::{Deserialize, Serialize};

use super::costs::spoilage_cost;
use super::SimulationConfig;

/// Physical state of the cold room for a single run.
///
/// Temperature evolves by an explicit-Euler step of a two-source heat
/// exchange: conduction from the ambient air (`c1`, high while the door is
/// open) and cooling from the compressor discharge (`c2`, zero while the
/// compressor is off).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomState {
    temperature_c: f64,
    door_open: bool,
    interval_seconds: f64,
    door_probability: f64,
    history: Vec<f64>,
}

impl Default for RoomState {
    fn default() -> Self {
        Self::new(5.0, 300.0, 0.1)
    }
}

impl RoomState {
    pub fn new(start_temp_c: f64, interval_seconds: f64, door_probability: f64) -> Self {
        Self {
            temperature_c: start_temp_c,
            door_open: false,
            interval_seconds,
            door_probability,
            history: vec![start_temp_c],
        }
    }

    /// Fresh room at the configured start temperature
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            config.start_temp_c,
            config.interval_seconds,
            config.door_probability,
        )
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn door_open(&self) -> bool {
        self.door_open
    }

    pub fn interval_seconds(&self) -> f64 {
        self.interval_seconds
    }

    /// Temperature after every update, starting with the initial temperature
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn steps_executed(&self) -> usize {
        self.history.len() - 1
    }

    pub fn into_history(self) -> Vec<f64> {
        self.history
    }

    /// Resample the door state from one uniform draw in [0, 1)
    pub fn toggle_door<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let sample: f64 = rng.gen();
        self.door_open = sample < self.door_probability;
    }

    /// Advance the temperature by one interval and record it
    pub fn update_temperature(&mut self, c1: f64, c2: f64, ambient_c: f64, compressor_c: f64) {
        let delta = (c1 * (ambient_c - self.temperature_c)
            + c2 * (compressor_c - self.temperature_c))
            * self.interval_seconds;

        self.temperature_c += delta;
        self.history.push(self.temperature_c);
    }

    /// Spoilage cost at the current temperature (unrounded)
    pub fn food_loss_cost(&self) -> f64 {
        spoilage_cost(self.temperature_c)
    }
}

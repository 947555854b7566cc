use serde::{Deserialize, Serialize};

use crate::controller::ControllerKind;
use crate::error::{SimError, SimResult};

/// Parameters of one simulated cold room, fixed for the lifetime of a run.
///
/// The thermal coefficients are illustrative rather than calibrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Temperature at the start of every run (°C)
    pub start_temp_c: f64,
    /// Thermostat setpoint (°C)
    pub target_temp_c: f64,
    /// Above this temperature the price-aware thermostat ignores prices (°C)
    pub critical_temp_c: f64,
    /// Probability that the door is open during an interval
    pub door_probability: f64,
    /// Wall-clock time represented by one step (s)
    pub interval_seconds: f64,
    /// Conduction coefficient with the door closed (1/s)
    pub c1_door_closed: f64,
    /// Conduction coefficient with the door open (1/s)
    pub c1_door_open: f64,
    /// Cooling coefficient while the compressor runs (1/s)
    pub c2_cooling: f64,
    /// Air temperature outside the room (°C)
    pub ambient_temp_c: f64,
    /// Compressor discharge temperature (°C)
    pub compressor_temp_c: f64,
    /// Energy drawn per interval while the compressor runs (kWh)
    pub power_per_interval_kwh: f64,
    pub controller: ControllerKind,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_temp_c: 5.0,
            target_temp_c: 5.0,
            critical_temp_c: 6.5,
            door_probability: 0.1,
            interval_seconds: 300.0,
            c1_door_closed: 5e-7,
            c1_door_open: 3e-5,
            c2_cooling: 8e-6,
            ambient_temp_c: 20.0,
            compressor_temp_c: -5.0,
            power_per_interval_kwh: 1.0,
            controller: ControllerKind::Simple,
        }
    }
}

impl SimulationConfig {
    pub fn with_controller(mut self, controller: ControllerKind, target_temp_c: f64) -> Self {
        self.controller = controller;
        self.target_temp_c = target_temp_c;
        self
    }

    /// Conduction coefficient for the current door state
    pub fn conduction(&self, door_open: bool) -> f64 {
        if door_open {
            self.c1_door_open
        } else {
            self.c1_door_closed
        }
    }

    /// Largest fraction of the temperature gap closed in one explicit step
    pub fn step_factor(&self) -> f64 {
        self.interval_seconds * (self.c1_door_open.max(self.c1_door_closed) + self.c2_cooling)
    }

    /// Reject parameters that would make a run meaningless or divergent
    pub fn validate(&self) -> SimResult<()> {
        let finite = [
            ("start_temp_c", self.start_temp_c),
            ("target_temp_c", self.target_temp_c),
            ("critical_temp_c", self.critical_temp_c),
            ("ambient_temp_c", self.ambient_temp_c),
            ("compressor_temp_c", self.compressor_temp_c),
            ("power_per_interval_kwh", self.power_per_interval_kwh),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimError::invalid(format!("{} must be finite, got {}", name, value)));
            }
        }

        if !(0.0..=1.0).contains(&self.door_probability) {
            return Err(SimError::invalid(format!(
                "door_probability must be between 0 and 1, got {}",
                self.door_probability
            )));
        }

        if !(self.interval_seconds.is_finite() && self.interval_seconds > 0.0) {
            return Err(SimError::invalid(format!(
                "interval_seconds must be positive, got {}",
                self.interval_seconds
            )));
        }

        let coefficients = [
            ("c1_door_closed", self.c1_door_closed),
            ("c1_door_open", self.c1_door_open),
            ("c2_cooling", self.c2_cooling),
        ];
        for (name, value) in coefficients {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::invalid(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        if self.power_per_interval_kwh < 0.0 {
            return Err(SimError::invalid("power_per_interval_kwh cannot be negative"));
        }

        let step_factor = self.step_factor();
        if step_factor >= 1.0 {
            return Err(SimError::NumericInstability { step_factor });
        }

        Ok(())
    }
}

//! Cost terms accumulated every interval: electricity for the compressor and
//! the modelled spoilage penalty for the current room temperature.

use serde::{Deserialize, Serialize};

/// Lower edge of the zero-cost storage band (°C)
pub const SAFE_BAND_LOW_C: f64 = 3.5;
/// Upper edge of the zero-cost storage band (°C, exclusive)
pub const SAFE_BAND_HIGH_C: f64 = 6.5;

/// Spoilage cost for an instantaneous room temperature.
///
/// Below the safe band the cost models freeze damage and decays as the room
/// warms towards 3.5°C; above it the cost grows exponentially with
/// temperature. The branches do not meet the zero plateau at the band edges.
pub fn spoilage_cost(temp_c: f64) -> f64 {
    if temp_c < SAFE_BAND_LOW_C {
        4.39 * (-0.49 * temp_c).exp()
    } else if temp_c < SAFE_BAND_HIGH_C {
        0.0
    } else {
        0.11 * (0.31 * temp_c).exp()
    }
}

/// Compressor electricity cost per interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyModel {
    /// Energy drawn while the compressor runs for one interval (kWh)
    pub power_per_interval_kwh: f64,
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self {
            power_per_interval_kwh: 1.0,
        }
    }
}

impl EnergyModel {
    pub fn new(power_per_interval_kwh: f64) -> Self {
        Self {
            power_per_interval_kwh,
        }
    }

    pub fn cost(&self, unit_price: f64, compressor_on: bool) -> f64 {
        if compressor_on {
            unit_price * self.power_per_interval_kwh
        } else {
            0.0
        }
    }
}

/// Food-loss cost rounded to whole thousandths, for reporting
#[derive(Debug, Clone, Copy, Default)]
pub struct FoodLossModel;

impl FoodLossModel {
    pub fn cost(temp_c: f64) -> f64 {
        (spoilage_cost(temp_c) * 1000.0).round() / 1000.0
    }
}

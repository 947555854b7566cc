//! Thermostat policies deciding, once per interval, whether the compressor runs.

pub mod thermostat;

pub use thermostat::{
    ControllerKind, CoolingPolicy, IntervalContext, PriceAwareThermostat, SimpleThermostat,
};

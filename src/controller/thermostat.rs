use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::simulation::SimulationConfig;

/// What a thermostat sees at the start of an interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalContext {
    pub temperature_c: f64,
    /// Unit price for this interval
    pub price: f64,
    /// Mean unit price over the whole horizon
    pub average_price: f64,
}

/// Decides each interval whether the compressor runs.
///
/// Implementations are stateless with respect to the run so a single policy
/// can be shared by every Monte Carlo worker.
pub trait CoolingPolicy: Send + Sync {
    fn should_cool(&self, ctx: &IntervalContext) -> bool;
    fn name(&self) -> &str;
}

/// Bang-bang thermostat: cools whenever the room is above the setpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleThermostat {
    pub target_temp_c: f64,
}

impl SimpleThermostat {
    pub fn new(target_temp_c: f64) -> Self {
        Self { target_temp_c }
    }
}

impl CoolingPolicy for SimpleThermostat {
    fn should_cool(&self, ctx: &IntervalContext) -> bool {
        ctx.temperature_c > self.target_temp_c
    }

    fn name(&self) -> &str {
        "simple"
    }
}

/// Defers non-critical cooling to intervals priced at or below the horizon
/// average. Above `critical_temp_c` the price gate is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceAwareThermostat {
    pub target_temp_c: f64,
    pub critical_temp_c: f64,
}

impl PriceAwareThermostat {
    pub fn new(target_temp_c: f64, critical_temp_c: f64) -> Self {
        Self {
            target_temp_c,
            critical_temp_c,
        }
    }

    fn eligible(&self, ctx: &IntervalContext) -> bool {
        ctx.price <= ctx.average_price || ctx.temperature_c > self.critical_temp_c
    }
}

impl CoolingPolicy for PriceAwareThermostat {
    fn should_cool(&self, ctx: &IntervalContext) -> bool {
        self.eligible(ctx) && ctx.temperature_c > self.target_temp_c
    }

    fn name(&self) -> &str {
        "price-aware"
    }
}

/// Built-in controller variants selectable from configuration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ControllerKind {
    Simple,
    PriceAware,
}

impl ControllerKind {
    pub fn build(&self, config: &SimulationConfig) -> Box<dyn CoolingPolicy> {
        match self {
            ControllerKind::Simple => Box::new(SimpleThermostat::new(config.target_temp_c)),
            ControllerKind::PriceAware => Box::new(PriceAwareThermostat::new(
                config.target_temp_c,
                config.critical_temp_c,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn ctx(temperature_c: f64, price: f64) -> IntervalContext {
        IntervalContext {
            temperature_c,
            price,
            average_price: 2.0,
        }
    }

    #[test]
    fn test_simple_threshold_logic() {
        let thermostat = SimpleThermostat::new(5.0);

        assert!(thermostat.should_cool(&ctx(5.1, 10.0)));
        assert!(!thermostat.should_cool(&ctx(5.0, 0.1)));
        assert!(!thermostat.should_cool(&ctx(4.0, 0.1)));
    }

    #[test]
    fn test_price_aware_defers_expensive_cooling() {
        let thermostat = PriceAwareThermostat::new(5.0, 6.5);

        // Cheap or average price: behaves like the simple thermostat
        assert!(thermostat.should_cool(&ctx(5.5, 1.0)));
        assert!(thermostat.should_cool(&ctx(5.5, 2.0)));
        assert!(!thermostat.should_cool(&ctx(4.5, 1.0)));

        // Expensive price below the critical temperature: wait
        assert!(!thermostat.should_cool(&ctx(6.4, 3.0)));
        assert!(!thermostat.should_cool(&ctx(6.5, 3.0)));

        // Critical temperature overrides the price gate
        assert!(thermostat.should_cool(&ctx(6.6, 3.0)));
    }

    #[test]
    fn test_override_still_requires_setpoint() {
        // A setpoint above the critical temperature keeps the bang-bang rule
        let thermostat = PriceAwareThermostat::new(8.0, 6.5);
        assert!(!thermostat.should_cool(&ctx(7.0, 3.0)));
        assert!(thermostat.should_cool(&ctx(8.5, 3.0)));
    }

    #[test]
    fn test_controller_kind_round_trip() {
        assert_eq!(ControllerKind::from_str("price-aware").unwrap(), ControllerKind::PriceAware);
        assert_eq!(ControllerKind::Simple.to_string(), "simple");
        assert_eq!(ControllerKind::iter().count(), 2);

        let json = serde_json::to_string(&ControllerKind::PriceAware).unwrap();
        assert_eq!(json, "\"price-aware\"");
    }

    #[test]
    fn test_build_uses_config_setpoints() {
        let config = SimulationConfig {
            target_temp_c: 6.0,
            ..SimulationConfig::default()
        };

        for kind in ControllerKind::iter() {
            let policy = kind.build(&config);
            assert!(!policy.should_cool(&ctx(6.0, 0.5)));
            assert!(policy.should_cool(&ctx(6.1, 0.5)));
        }

        assert_eq!(ControllerKind::PriceAware.build(&config).name(), "price-aware");
    }
}

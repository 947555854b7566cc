use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::controller::ControllerKind;
use crate::error::{SimError, SimResult};
use crate::prices::{CsvPriceSource, PriceSource, SyntheticPriceSource};
use crate::simulation::SimulationConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "COLDROOM__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub room: RoomConfig,
    pub thermostat: ThermostatConfig,
    pub monte_carlo: MonteCarloConfig,
    pub prices: PricesConfig,
    pub report: ReportConfig,
}

/// Physical constants of the room, shared by every controller variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub start_temp_c: f64,
    pub door_probability: f64,
    pub interval_seconds: f64,
    pub c1_door_closed: f64,
    pub c1_door_open: f64,
    pub c2_cooling: f64,
    pub ambient_temp_c: f64,
    pub compressor_temp_c: f64,
    pub power_per_interval_kwh: f64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        let sim = SimulationConfig::default();
        Self {
            start_temp_c: sim.start_temp_c,
            door_probability: sim.door_probability,
            interval_seconds: sim.interval_seconds,
            c1_door_closed: sim.c1_door_closed,
            c1_door_open: sim.c1_door_open,
            c2_cooling: sim.c2_cooling,
            ambient_temp_c: sim.ambient_temp_c,
            compressor_temp_c: sim.compressor_temp_c,
            power_per_interval_kwh: sim.power_per_interval_kwh,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermostatConfig {
    pub simple_target_c: f64,
    pub price_aware_target_c: f64,
    pub critical_temp_c: f64,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            simple_target_c: 5.0,
            price_aware_target_c: 6.0,
            critical_temp_c: 6.5,
        }
    }
}

impl ThermostatConfig {
    pub fn target_for(&self, kind: ControllerKind) -> f64 {
        match kind {
            ControllerKind::Simple => self.simple_target_c,
            ControllerKind::PriceAware => self.price_aware_target_c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub repetitions: usize,
    /// Base seed; drawn from OS entropy when unset
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            repetitions: 100,
            seed: None,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricesConfig {
    pub path: PathBuf,
    /// Generate prices instead of reading `path`
    pub synthetic: bool,
    pub generator: SyntheticPriceSource,
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("elpriser.csv"),
            synthetic: false,
            generator: SyntheticPriceSource::default(),
        }
    }
}

impl PricesConfig {
    pub fn source(&self) -> Box<dyn PriceSource> {
        if self.synthetic {
            Box::new(self.generator.clone())
        } else {
            Box::new(CsvPriceSource::new(self.path.clone()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Write the JSON comparison report here when set
    pub output: Option<PathBuf>,
    /// Intervals kept in the time-series previews (2016 = one week)
    pub preview_intervals: usize,
    pub histogram_bins: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: None,
            preview_intervals: 2016,
            histogram_bins: 50,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Defaults, then the TOML file (if present), then `COLDROOM__` env vars
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        figment
            .extract()
            .with_context(|| format!("invalid configuration (file '{}')", path.display()))
    }

    /// Simulation parameters for one controller variant
    pub fn simulation_config(&self, kind: ControllerKind) -> SimulationConfig {
        let room = &self.room;
        SimulationConfig {
            start_temp_c: room.start_temp_c,
            target_temp_c: self.thermostat.target_for(kind),
            critical_temp_c: self.thermostat.critical_temp_c,
            door_probability: room.door_probability,
            interval_seconds: room.interval_seconds,
            c1_door_closed: room.c1_door_closed,
            c1_door_open: room.c1_door_open,
            c2_cooling: room.c2_cooling,
            ambient_temp_c: room.ambient_temp_c,
            compressor_temp_c: room.compressor_temp_c,
            power_per_interval_kwh: room.power_per_interval_kwh,
            controller: kind,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.monte_carlo.repetitions == 0 {
            return Err(SimError::invalid("monte_carlo.repetitions must be >= 1"));
        }
        if self.report.histogram_bins == 0 {
            return Err(SimError::invalid("report.histogram_bins must be >= 1"));
        }
        self.simulation_config(ControllerKind::Simple).validate()?;
        self.simulation_config(ControllerKind::PriceAware).validate()
    }
}

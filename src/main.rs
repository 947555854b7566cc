use anyhow::{anyhow, Result};
use cold_room_sim::{config::AppConfig, report::ComparisonReport, telemetry};
use std::path::PathBuf;
use tracing::{info, warn};

use cold_room_sim::controller::ControllerKind;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    num_simulations: Option<usize>,
    prices: Option<PathBuf>,
    synthetic: bool,
    seed: Option<u64>,
    simple_target: Option<f64>,
    smart_target: Option<f64>,
    sequential: bool,
    report: Option<PathBuf>,
}

impl Args {
    fn usage() -> &'static str {
        "\
cold-room-sim: monthly cost of a cold room under two thermostat strategies

USAGE:
  cold-room-sim [FLAGS]

FLAGS:
  --config PATH            Config file (default: config/default.toml)
  --num-simulations N      Monte Carlo repetitions per thermostat (default: 100)
  --prices PATH            Price CSV, second column is the price (default: elpriser.csv)
  --synthetic              Use generated prices instead of a CSV file
  --seed U64               Base seed; repetition i uses seed + i
  --simple-target C        Setpoint of the simple thermostat (default: 5.0)
  --smart-target C         Setpoint of the price-aware thermostat (default: 6.0)
  --sequential             Run repetitions on one thread
  --report PATH            Write a JSON report with plot data to PATH
  --help                   Show this help

Environment variables prefixed COLDROOM__ override the config file,
e.g. COLDROOM__MONTE_CARLO__REPETITIONS=500.
"
    }

    fn parse() -> Result<Self> {
        let mut out = Args::default();
        let mut it = std::env::args().skip(1);

        while let Some(arg) = it.next() {
            let mut value = |name: &str| {
                it.next()
                    .ok_or_else(|| anyhow!("missing value for {}", name))
            };

            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{}", Self::usage());
                    std::process::exit(0);
                }
                "--config" => out.config = Some(value("--config")?.into()),
                "--num-simulations" | "--num_simulations" => {
                    let v = value("--num-simulations")?;
                    out.num_simulations = Some(
                        v.parse()
                            .map_err(|_| anyhow!("invalid --num-simulations '{}' (expected integer)", v))?,
                    );
                }
                "--prices" => out.prices = Some(value("--prices")?.into()),
                "--synthetic" => out.synthetic = true,
                "--seed" => {
                    let v = value("--seed")?;
                    out.seed = Some(v.parse().map_err(|_| anyhow!("invalid --seed '{}' (expected u64)", v))?);
                }
                "--simple-target" => {
                    let v = value("--simple-target")?;
                    out.simple_target =
                        Some(v.parse().map_err(|_| anyhow!("invalid --simple-target '{}'", v))?);
                }
                "--smart-target" => {
                    let v = value("--smart-target")?;
                    out.smart_target =
                        Some(v.parse().map_err(|_| anyhow!("invalid --smart-target '{}'", v))?);
                }
                "--sequential" => out.sequential = true,
                "--report" => out.report = Some(value("--report")?.into()),
                other => return Err(anyhow!("unknown argument '{}'", other)),
            }
        }

        Ok(out)
    }

    fn apply(self, cfg: &mut AppConfig) {
        if let Some(n) = self.num_simulations {
            cfg.monte_carlo.repetitions = n;
        }
        if let Some(path) = self.prices {
            cfg.prices.path = path;
            cfg.prices.synthetic = false;
        }
        if self.synthetic {
            cfg.prices.synthetic = true;
        }
        if self.seed.is_some() {
            cfg.monte_carlo.seed = self.seed;
        }
        if let Some(t) = self.simple_target {
            cfg.thermostat.simple_target_c = t;
        }
        if let Some(t) = self.smart_target {
            cfg.thermostat.price_aware_target_c = t;
        }
        if self.sequential {
            cfg.monte_carlo.parallel = false;
        }
        if self.report.is_some() {
            cfg.report.output = self.report;
        }
    }
}

fn main() -> Result<()> {
    telemetry::init_tracing();

    let args = match Args::parse() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}\n\n{}", Args::usage());
            std::process::exit(2);
        }
    };

    let mut cfg = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    args.apply(&mut cfg);
    cfg.validate()?;

    let source = cfg.prices.source();
    let prices = source.load()?;
    info!(source = %source.describe(), %prices, "prices ready");

    if prices.is_flat() {
        warn!("all intervals share one price; the thermostats differ only by setpoint");
    }

    let report = ComparisonReport::generate(&cfg, &prices, &source.describe())?;

    for kind in [ControllerKind::Simple, ControllerKind::PriceAware] {
        if let Some(variant) = report.variant(kind) {
            println!(
                "Mean monthly cost ({} thermostat, target {:.1} C): {:.2} (+/- {:.2} std. error, {} runs)",
                kind,
                variant.target_temp_c,
                variant.estimate.mean,
                variant.estimate.summary.std_error,
                variant.estimate.repetitions
            );
        }
    }

    if let Some(saving) = report.price_aware_saving() {
        println!("Price-aware saving per month: {:.2}", saving);
    }

    if let Some(path) = &cfg.report.output {
        report.write_json(path)?;
    }

    Ok(())
}

use msmrd::{ScenarioConfig, run_ensemble, pooled_stationary_distribution};
use msmrd::{bench_ticks, bench_estimator};

use clap::Parser;
use anyhow::{Context, Result};
use log::info;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, resolved under `scenarios/`
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Time the integrator instead of running the ensemble
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;

    if args.bench {
        bench_ticks(&scenario_cfg)?;
        bench_estimator(&scenario_cfg)?;
        return Ok(());
    }

    info!(
        "running {} trajectories of {} ticks",
        scenario_cfg.engine.trajectories, scenario_cfg.engine.steps
    );
    let records = run_ensemble(&scenario_cfg)?;

    let entries: usize = records.iter().map(|r| r.entries).sum();
    let exits: usize = records.iter().map(|r| r.exits).sum();
    info!("ensemble finished: {} entries, {} exits", entries, exits);

    let pi = pooled_stationary_distribution(&scenario_cfg, &records)?;

    println!("state,probability");
    for (state, p) in pi.iter().enumerate() {
        println!("{},{:.6}", state, p);
    }

    Ok(())
}

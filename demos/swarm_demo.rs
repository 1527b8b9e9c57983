// Demonstration: play one game and evaluate the scenario over several seeds.
//
// Run from the repo root:
//   RUST_LOG=walle=info cargo run --example swarm_demo -- --agents 4 --waste 30 --runs 20

use std::env;

use tracing_subscriber::EnvFilter;
use walle::{EngineConfig, Position, RunMetrics, ScenarioParams, Simulation};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let agents: i64 = parsed(&args, "--agents").unwrap_or(2);
    let waste: i64 = parsed(&args, "--waste").unwrap_or(10);
    let seed: u64 = parsed(&args, "--seed").unwrap_or(42);
    let runs: u64 = parsed(&args, "--runs").unwrap_or(10);
    let max_turns: u32 = parsed(&args, "--max-turns").unwrap_or(50_000);

    let config = EngineConfig::default();
    let params = ScenarioParams::new(agents, waste, Position::new(2, 2));

    let mut sim = match Simulation::start(&params, config.clone(), seed) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Cannot start game: {}", e);
            std::process::exit(2);
        }
    };

    if sim.is_active() {
        if let Err(e) = sim.run_to_completion(max_turns) {
            eprintln!("Game failed: {}", e);
            std::process::exit(1);
        }
    }

    let status = sim.status();
    let totals = sim.totals();
    println!(
        "Seed {}: collected {}/{} in {} turns ({} detours, {} blocked)",
        seed, status.waste_collected, status.total_waste, status.turn, totals.detours, totals.blocked
    );

    match RunMetrics::evaluate(&params, &config, seed..seed + runs, max_turns) {
        Ok(metrics) => println!("{}", metrics),
        Err(e) => eprintln!("Evaluation failed: {}", e),
    }
}

fn parsed<T: std::str::FromStr>(args: &[String], key: &str) -> Option<T> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

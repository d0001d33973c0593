//! # BURROW Headless Runner
//!
//! Runs a simulation at a fixed timestep, as fast as the machine allows, and
//! logs a summary.
//!
//! ```bash
//! burrow_sim --config config/burrow.toml --ticks 6000
//! burrow_sim --seed 7 --agents 4 --mode ores
//! RUST_LOG=burrow_agents=debug burrow_sim --ticks 300
//! ```
//!
//! Options:
//!   --config <PATH>   TOML config (default: built-in defaults)
//!   --ticks <N>       Ticks to run (default: 3000)
//!   --seed <SEED>     Override the config seed
//!   --agents <N>      Replace the spawn list with N agents
//!   --mode <MODE>     balanced | materials | ores, for `--agents`
//!                     (default: balanced)

use std::process::ExitCode;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use burrow::agents::DigMode;
use burrow::core::MaterialKind;
use burrow::{AgentSpawn, Simulation, SimulationConfig};

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(error) => {
                tracing::error!(%path, %error, "cannot load config");
                return ExitCode::FAILURE;
            }
        },
        None => SimulationConfig::default(),
    };
    if let Some(seed) = parse_u64_arg(&args, "--seed") {
        config.seed = seed;
    }
    let mode = match parse_str_arg(&args, "--mode") {
        Some(name) => match DigMode::from_name(&name) {
            Some(mode) => mode,
            None => {
                tracing::error!(%name, "unknown mode, expected balanced, materials or ores");
                return ExitCode::FAILURE;
            }
        },
        None => DigMode::Balanced,
    };
    if let Some(count) = parse_usize_arg(&args, "--agents") {
        config.agents = vec![AgentSpawn { mode, cell: None }; count];
    }
    let ticks = parse_u64_arg(&args, "--ticks").unwrap_or(3000);

    let mut sim = match Simulation::from_config(&config) {
        Ok(sim) => sim,
        Err(error) => {
            tracing::error!(%error, "cannot build simulation");
            return ExitCode::FAILURE;
        }
    };

    let dt = config.dt();
    let started = Instant::now();
    sim.run(ticks, dt);
    let wall = started.elapsed();

    let stats = sim.stats();
    tracing::info!(
        ticks = stats.ticks,
        simulated_s = stats.elapsed,
        wall_ms = wall.as_millis() as u64,
        tiers = stats.tiers,
        broken = stats.total_broken,
        frontier = stats.world.frontier_cells,
        "simulation finished"
    );
    for (id, agent) in &stats.agents {
        tracing::info!(
            agent = id,
            broken = agent.tiles_broken,
            hits = agent.hits_landed,
            material_yield = agent.material_yield,
            gem_value = agent.gem_value,
            plans = agent.plans_started,
            discarded = agent.plans_discarded,
            "agent summary"
        );
    }
    for kind in MaterialKind::ALL {
        tracing::info!(kind = kind.name(), remaining = stats.world.kind_counts[kind as usize], "material left");
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

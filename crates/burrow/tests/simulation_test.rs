//! # Simulation Tests
//!
//! Whole runs: determinism, streaming, decoration hand-off and agents
//! sharing a target.

use std::cell::RefCell;
use std::rc::Rc;

use burrow::agents::DigMode;
use burrow::core::{AsciiTerrain, CellCoord, RecordedDecorations, World};
use burrow::{AgentSpawn, Simulation, SimulationConfig};

const DT: f32 = 1.0 / 30.0;

/// Test: Same config, same run, down to every counter.
#[test]
fn test_runs_are_deterministic() {
    let config = SimulationConfig {
        seed: 99,
        ..SimulationConfig::default()
    };
    let mut a = Simulation::builder().seed(99).agents(3, DigMode::Balanced).build().expect("builds");
    let mut b = Simulation::from_config(&SimulationConfig {
        agents: vec![AgentSpawn::default(); 3],
        ..config
    })
    .expect("builds");

    a.run(600, DT);
    b.run(600, DT);
    assert_eq!(a.stats(), b.stats());
    for (x, y) in a.agents().iter().zip(b.agents()) {
        assert_eq!(x.position(), y.position());
    }
}

/// Test: Agents in the starter burrow start digging right away.
#[test]
fn test_agents_dig_from_the_burrow() {
    let mut sim = Simulation::builder()
        .agents(2, DigMode::Materials)
        .build()
        .expect("builds");
    sim.run(600, DT);
    let stats = sim.stats();
    assert!(stats.total_broken > 0, "nothing dug in 20 simulated seconds");
    let per_agent: u64 = stats.agents.iter().map(|(_, s)| u64::from(s.tiles_broken)).sum();
    assert_eq!(per_agent, stats.total_broken);
}

/// Test: An agent near the bottom of the world pulls in the next tier.
#[test]
fn test_streaming_follows_the_deepest_agent() {
    let mut sim = Simulation::builder()
        .initial_tiers(1)
        .stream_margin(16)
        .agents(1, DigMode::Balanced)
        .build()
        .expect("builds");
    assert_eq!(sim.world().tiers_generated(), 1);

    let bottom = sim.world().bounds().max_y;
    sim.agents_mut()[0].teleport([0.0, (bottom - 4) as f32]);
    sim.tick(DT);
    assert_eq!(sim.world().tiers_generated(), 2);
    assert!(sim.world().bounds().max_y > bottom - 4 + 16);
}

/// Test: Carved and dug cells reach the decoration sink.
#[test]
fn test_decorations_reach_the_sink() {
    let sink = Rc::new(RefCell::new(RecordedDecorations::default()));
    let mut sim = Simulation::builder()
        .decoration_sink(Rc::clone(&sink))
        .agents(1, DigMode::Balanced)
        .build()
        .expect("builds");
    assert!(!sink.borrow().carved.is_empty(), "starter burrow is carved");

    sim.run(600, DT);
    assert_eq!(sink.borrow().dug.len() as u64, sim.stats().total_broken);
}

/// Test: Two agents on one cell both hit it; one breaks it, the other
/// replans.
#[test]
fn test_shared_target_is_tolerated() {
    let world = World::builder()
        .terrain_source(AsciiTerrain::parse(".#.").expect("valid map"))
        .build()
        .expect("world builds");
    let mut sim = Simulation::builder()
        .world(world)
        .stream_margin(0)
        .agents(0, DigMode::Balanced)
        .spawn(AgentSpawn {
            mode: DigMode::Balanced,
            cell: Some(CellCoord::new(0, 0)),
        })
        .spawn(AgentSpawn {
            mode: DigMode::Balanced,
            cell: Some(CellCoord::new(2, 0)),
        })
        .build()
        .expect("builds");

    sim.run(120, DT);
    let stats = sim.stats();
    assert_eq!(stats.total_broken, 1);
    let hits: u32 = stats.agents.iter().map(|(_, s)| s.hits_landed).sum();
    assert_eq!(hits, 4, "stone takes four hits, shared or not");
    let discarded: u32 = stats.agents.iter().map(|(_, s)| s.plans_discarded).sum();
    assert_eq!(discarded, 1, "the agent that lost the race drops its plan");
}

/// Test: The sample config file parses and runs.
#[test]
fn test_sample_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/burrow.toml");
    let config = SimulationConfig::load(path).expect("sample config loads");
    assert!(config.validate().is_ok());
    let mut sim = Simulation::from_config(&config).expect("builds");
    sim.run(30, config.dt());
    assert_eq!(sim.agents().len(), config.agents.len());
}

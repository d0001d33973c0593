//! # Simulation
//!
//! ```text
//! tick(dt):
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. AGENTS       every agent ticks once, in spawn order       │
//! │                 (at most one planning decision each)         │
//! │ 2. STREAMING    deepest agent + margin below the world?      │
//! │                 └─ generate tiers synchronously              │
//! │ 3. COUNTERS     tick count, simulated time, breaks           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two agents may target the same cell. Whoever lands the breaking hit
//! wins; the other sees the target vanish and replans.

use burrow_agents::{Agent, AgentConfig, AgentStats, DigMode, TickEvents};
use burrow_core::{CellCoord, DecorationSink, MaterialCatalog, World, WorldStats};
use burrow_procedural::{GenerationConfig, TerrainGenerator, WorldSeed};

use crate::config::{AgentSpawn, SimulationConfig};
use crate::error::SimulationResult;

/// Counters for a whole run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationStats {
    /// Ticks advanced.
    pub ticks: u64,
    /// Simulated seconds.
    pub elapsed: f64,
    /// Tiers generated so far.
    pub tiers: u32,
    /// Per-agent totals, in spawn order.
    pub agents: Vec<(u32, AgentStats)>,
    /// Cells broken by all agents.
    pub total_broken: u64,
    /// World counters.
    pub world: WorldStats,
}

/// World, agents and chunk streaming.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    agents: Vec<Agent>,
    stream_margin: u32,
    ticks: u64,
    elapsed: f64,
    total_broken: u64,
}

impl Simulation {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::default()
    }

    /// Builds a simulation straight from a config.
    ///
    /// # Errors
    ///
    /// Any validation or world assembly failure.
    pub fn from_config(config: &SimulationConfig) -> SimulationResult<Self> {
        SimulationBuilder::from_config(config).build()
    }

    /// The world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world, for outside edits between ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Agents in spawn order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable agents.
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Ticks advanced so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances every agent by `dt`, then streams chunks.
    pub fn tick(&mut self, dt: f32) -> Vec<TickEvents> {
        let mut events = Vec::with_capacity(self.agents.len());
        for agent in &mut self.agents {
            let tick = agent.tick(dt, &mut self.world);
            if tick.broken.is_some() {
                self.total_broken += 1;
            }
            events.push(tick);
        }
        self.stream_chunks();
        self.ticks += 1;
        self.elapsed += f64::from(dt);
        events
    }

    /// Runs `ticks` fixed steps.
    pub fn run(&mut self, ticks: u64, dt: f32) {
        for _ in 0..ticks {
            self.tick(dt);
        }
    }

    /// Generates tiers until the deepest agent has `stream_margin` rows of
    /// world below it.
    fn stream_chunks(&mut self) {
        let Some(deepest) = self.agents.iter().map(|a| a.cell().y).max() else {
            return;
        };
        let needed = deepest.saturating_add(self.stream_margin as i32);
        if needed < self.world.bounds().max_y {
            return;
        }
        let reports = self.world.ensure_depth(needed);
        if !reports.is_empty() {
            tracing::debug!(
                deepest,
                tiers = self.world.tiers_generated(),
                "streamed chunks below the deepest agent"
            );
        }
    }

    /// Counters for the whole run.
    #[must_use]
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            ticks: self.ticks,
            elapsed: self.elapsed,
            tiers: self.world.tiers_generated(),
            agents: self.agents.iter().map(|a| (a.id(), *a.stats())).collect(),
            total_broken: self.total_broken,
            world: self.world.stats(),
        }
    }
}

/// Assembles a [`Simulation`].
#[derive(Default)]
pub struct SimulationBuilder {
    config: SimulationConfig,
    world: Option<World>,
    sink: Option<Box<dyn DecorationSink>>,
}

impl SimulationBuilder {
    /// Builder seeded with every value of `config`.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            config: config.clone(),
            ..Self::default()
        }
    }

    /// World seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Tiers generated before the first tick.
    #[must_use]
    pub fn initial_tiers(mut self, tiers: u32) -> Self {
        self.config.initial_tiers = tiers;
        self
    }

    /// Terrain tuning.
    #[must_use]
    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.config.generation = generation;
        self
    }

    /// Material table.
    #[must_use]
    pub fn catalog(mut self, catalog: MaterialCatalog) -> Self {
        self.config.catalog = catalog;
        self
    }

    /// Shared agent tuning.
    #[must_use]
    pub fn agent_config(mut self, agent: AgentConfig) -> Self {
        self.config.agent = agent;
        self
    }

    /// Replaces the spawn list with `count` agents of `mode`.
    #[must_use]
    pub fn agents(mut self, count: usize, mode: DigMode) -> Self {
        self.config.agents = vec![AgentSpawn { mode, cell: None }; count];
        self
    }

    /// Adds one agent.
    #[must_use]
    pub fn spawn(mut self, spawn: AgentSpawn) -> Self {
        self.config.agents.push(spawn);
        self
    }

    /// Rows kept generated below the deepest agent.
    #[must_use]
    pub fn stream_margin(mut self, margin: u32) -> Self {
        self.config.stream_margin = margin;
        self
    }

    /// Visual collaborator handed to the generated world.
    #[must_use]
    pub fn decoration_sink(mut self, sink: impl DecorationSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Uses a prebuilt world instead of generating one. Spawns without a
    /// cell start on the world's first walkable cell.
    #[must_use]
    pub fn world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    /// Validates the config, builds the world and places the agents.
    ///
    /// # Errors
    ///
    /// Config validation failures and world assembly failures.
    pub fn build(self) -> SimulationResult<Simulation> {
        let config = self.config;
        config.validate()?;

        let (world, home) = match self.world {
            Some(world) => {
                let home = world.bounds().iter().find(|cell| world.is_walkable(*cell));
                (world, home)
            }
            None => {
                let generator = TerrainGenerator::new(WorldSeed::new(config.seed), config.generation.clone())?;
                let home = Some(generator.starter_burrow_center());
                let mut builder = World::builder()
                    .catalog(config.catalog.clone())
                    .terrain_source(generator)
                    .initial_tiers(config.initial_tiers);
                if let Some(sink) = self.sink {
                    builder = builder.decoration_sink(sink);
                }
                (builder.build()?, home)
            }
        };

        let agents = config
            .agents
            .iter()
            .enumerate()
            .map(|(i, spawn)| {
                let cell = spawn
                    .cell
                    .or_else(|| home.map(|h| spawn_cell(&world, h, i)))
                    .unwrap_or_default();
                let agent_config = AgentConfig {
                    mode: spawn.mode,
                    ..config.agent.clone()
                };
                Agent::try_new(i as u32, cell, agent_config)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            seed = config.seed,
            agents = agents.len(),
            tiers = world.tiers_generated(),
            "simulation ready"
        );
        Ok(Simulation {
            world,
            agents,
            stream_margin: config.stream_margin,
            ticks: 0,
            elapsed: 0.0,
            total_broken: 0,
        })
    }
}

/// Agents fan out left and right of `home` along its row.
fn spawn_cell(world: &World, home: CellCoord, index: usize) -> CellCoord {
    let step = (index as i32 + 1) / 2;
    let dx = if index % 2 == 1 { -step } else { step };
    let cell = home.offset(dx, 0);
    if world.is_walkable(cell) {
        cell
    } else {
        world.nearest_walkable(home, 8).unwrap_or(home)
    }
}

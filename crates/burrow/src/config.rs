//! # Simulation Config
//!
//! One TOML file configures a whole run. Every table is optional; missing
//! keys take their documented defaults.
//!
//! ```toml
//! seed = 42
//! initial_tiers = 2
//!
//! [[agents]]
//! mode = "ores"
//!
//! [generation.ratios.per_tier_delta]
//! mud = -0.05
//! stone = 0.03
//! ore = 0.02
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use burrow_agents::{AgentConfig, DigMode};
use burrow_core::{BurrowError, CellCoord, MaterialCatalog};
use burrow_procedural::GenerationConfig;

use crate::error::SimulationResult;

/// Where and how one agent starts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSpawn {
    /// Dig mode of this agent.
    pub mode: DigMode,
    /// Start cell; defaults to a cell inside the starter burrow.
    pub cell: Option<CellCoord>,
}

/// Everything a run needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// World seed.
    pub seed: u64,
    /// Tiers generated before the first tick.
    pub initial_tiers: u32,
    /// Rows below the deepest agent that must already exist.
    pub stream_margin: u32,
    /// Fixed ticks per simulated second.
    pub tick_rate: u32,
    /// Agents to spawn.
    pub agents: Vec<AgentSpawn>,
    /// Terrain tuning.
    pub generation: GenerationConfig,
    /// Material table.
    pub catalog: MaterialCatalog,
    /// Tuning shared by every agent; each spawn overrides the mode.
    pub agent: AgentConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_tiers: 2,
            stream_margin: 16,
            tick_rate: 30,
            agents: vec![AgentSpawn::default()],
            generation: GenerationConfig::default(),
            catalog: MaterialCatalog::default(),
            agent: AgentConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// `SimulationError::Parse` on malformed TOML or wrong value types.
    pub fn from_toml_str(text: &str) -> SimulationResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// `SimulationError::Io` when the file cannot be read, `Parse` when it is
    /// not a valid config.
    pub fn load(path: impl AsRef<Path>) -> SimulationResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Fixed timestep derived from `tick_rate`.
    #[must_use]
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Checks every nested config.
    ///
    /// # Errors
    ///
    /// The first validation failure, wrapped as `SimulationError::World`.
    pub fn validate(&self) -> SimulationResult<()> {
        if self.initial_tiers == 0 {
            return Err(BurrowError::InvalidConfig("initial_tiers must be at least 1".into()).into());
        }
        if self.tick_rate == 0 {
            return Err(BurrowError::InvalidConfig("tick_rate must be at least 1".into()).into());
        }
        self.generation.validate()?;
        self.catalog.validate()?;
        self.agent.validate()?;
        Ok(())
    }
}

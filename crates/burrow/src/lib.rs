//! # BURROW
//!
//! A procedurally generated, minable 2D grid with autonomous diggers.
//!
//! ## Design Principles
//!
//! 1. **Headless** - simulation only; visuals hang off `DecorationSink`
//! 2. **Fixed ticks** - time advances only through `Simulation::tick(dt)`
//! 3. **Streaming** - new tiers are generated between ticks as agents dig
//!    deeper, never mid-agent
//! 4. **One config file** - `SimulationConfig` covers world, materials and
//!    agents
//!
//! ## Example
//!
//! ```rust
//! use burrow::{Simulation, SimulationConfig};
//!
//! let mut sim = Simulation::from_config(&SimulationConfig::default()).unwrap();
//! sim.run(300, 1.0 / 30.0);
//! assert_eq!(sim.stats().ticks, 300);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod simulation;

pub use config::{AgentSpawn, SimulationConfig};
pub use error::{SimulationError, SimulationResult};
pub use simulation::{Simulation, SimulationBuilder, SimulationStats};

pub use burrow_agents as agents;
pub use burrow_core as core;
pub use burrow_procedural as procedural;

//! # BURROW Agents
//!
//! Autonomous diggers that pick a frontier cell, walk to it and hit it until
//! it breaks.
//!
//! ## Design Principles
//!
//! 1. **One pipeline** - every dig mode is an ordered list of selection
//!    steps run by the same `Selector`
//! 2. **Explicit ticks** - an agent only changes inside `Agent::tick(dt)`
//! 3. **Cheap first** - bounded candidates, then sensed goals, then the
//!    full-map scan
//! 4. **Hysteresis** - a fresh plan survives transient invalidation for the
//!    plan-lock duration
//!
//! ## Example
//!
//! ```rust
//! use burrow_agents::{Agent, AgentConfig};
//! use burrow_core::{AsciiTerrain, CellCoord, World};
//!
//! let terrain = AsciiTerrain::parse("..m").unwrap();
//! let mut world = World::builder().terrain_source(terrain).build().unwrap();
//! let mut agent = Agent::new(0, CellCoord::new(0, 0), AgentConfig::default());
//! for _ in 0..40 {
//!     agent.tick(0.05, &mut world);
//! }
//! assert!(!world.is_solid(CellCoord::new(2, 0)));
//! assert_eq!(agent.stats().tiles_broken, 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod agent;
pub mod config;
pub mod plan;
pub mod selection;
pub mod sensing;

pub use agent::{Agent, AgentState, AgentStats, TickEvents};
pub use config::{AgentConfig, DigMode, ModeWeights, OreGoalPreference};
pub use plan::{DiscardReason, GoalSource, Plan, PlanOrigin};
pub use selection::{Preference, Selection, Selector};
pub use sensing::SensedResources;

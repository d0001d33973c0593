//! # BURROW Procedural Generation
//!
//! Deterministic, tier-scaled terrain for the minable grid.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same seed + tier always produces the same chunk
//! 2. **Independent streams**: every pass of every tier owns its RNG
//! 3. **Exact ratios**: the stone/mud split is an order statistic, not a
//!    fixed noise cutoff
//! 4. **Bounded**: worms and veins stop on safety caps, never spin
//!
//! ## Example
//!
//! ```rust
//! use burrow_core::World;
//! use burrow_procedural::{GenerationConfig, TerrainGenerator, WorldSeed};
//!
//! let generator = TerrainGenerator::new(WorldSeed::new(7), GenerationConfig::default()).unwrap();
//! let spawn = generator.starter_burrow_center();
//! let world = World::builder().terrain_source(generator).build().unwrap();
//! assert!(world.is_walkable(spawn));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod burrow;
pub mod caves;
pub mod chunk;
pub mod config;
pub mod generator;
pub mod noise;
pub mod threshold;
pub mod tiers;
pub mod veins;
pub mod worms;

pub use burrow_core::ChunkReport;
pub use chunk::{CellCounts, ChunkBuffer};
pub use config::{
    BurrowConfig, CaveConfig, GenerationConfig, NoiseConfig, OreTable, OreWeightConfig,
    RatioConfig, RatioTriple, VeinConfig, WormConfig,
};
pub use generator::TerrainGenerator;
pub use noise::{GenPhase, SimplexNoise, WorldSeed};
pub use tiers::{OreWeights, TierParams, TierRatios};
pub use veins::VeinOutcome;
pub use worms::WormOutcome;

//! # BURROW Core
//!
//! The minable grid: what is in each cell, where an agent can stand, how to
//! get there and what happens when a cell is struck.
//!
//! ## Design Principles
//!
//! 1. **One source of truth** - `GridIndex` owns cell content; walkability,
//!    durability and the frontier are derived and updated in lockstep
//! 2. **Bounded queries** - every search carries an expansion or radius cap
//! 3. **Not-found is not an error** - unreachable targets and empty
//!    frontiers are `Option`/`bool` results
//! 4. **Injected collaborators** - terrain arrives through `TerrainSource`,
//!    cosmetics leave through `DecorationSink`
//!
//! ## Example
//!
//! ```rust
//! use burrow_core::{AsciiTerrain, CellCoord, World};
//!
//! let terrain = AsciiTerrain::parse("..#\n..#").unwrap();
//! let mut world = World::builder().terrain_source(terrain).build().unwrap();
//! assert!(world.frontier().contains(&CellCoord::new(2, 0)));
//! while !world.apply_hit(CellCoord::new(2, 0), 1).broke() {}
//! assert!(world.is_walkable(CellCoord::new(2, 0)));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ascii;
pub mod cell;
pub mod dig;
pub mod error;
pub mod grid;
pub mod material;
pub mod pathfinding;
pub mod visuals;
pub mod walkability;
pub mod world;

pub use ascii::AsciiTerrain;
pub use cell::{CellCoord, Direction, GridBounds};
pub use dig::{DamageStage, DigService, Durability, HitOutcome};
pub use error::{BurrowError, BurrowResult};
pub use grid::GridIndex;
pub use material::{MaterialCatalog, MaterialClass, MaterialKind, MaterialProps};
pub use pathfinding::PathTree;
pub use visuals::{DecorationSink, NoDecorations, RecordedDecorations};
pub use walkability::WalkabilityMap;
pub use world::{ChunkReport, TerrainSource, World, WorldBuilder, WorldStats};

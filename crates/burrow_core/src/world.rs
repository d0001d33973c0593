//! # World
//!
//! Facade over the grid, walkability map and dig service. This is the query
//! contract agents plan against, and the only place that sequences chunk
//! generation with the derived-state rebuilds that must follow it.
//!
//! ## Chunk lifecycle
//!
//! ```text
//! generate_next_tier()
//!   ├─ TerrainSource::generate_chunk(tier)   writes GridIndex
//!   ├─ WalkabilityMap::rebuild               bounds grew
//!   └─ tier 0: DigService::build_from_terrain
//!      later:  DigService::absorb_region     damage elsewhere survives
//! ```

use std::collections::HashSet;

use crate::cell::{CellCoord, GridBounds};
use crate::dig::{DamageStage, DigService, Durability, HitOutcome};
use crate::error::{BurrowError, BurrowResult};
use crate::grid::GridIndex;
use crate::material::{MaterialCatalog, MaterialClass, MaterialKind};
use crate::pathfinding::PathTree;
use crate::visuals::{DecorationSink, NoDecorations};
use crate::walkability::WalkabilityMap;

/// Summary of one generated chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChunkReport {
    /// Tier index of the chunk.
    pub tier: u32,
    /// Region the chunk covers.
    pub bounds: GridBounds,
    /// Noise value at the stone/mud order statistic.
    pub threshold: f32,
    /// Stone cells after generation.
    pub stone_cells: usize,
    /// Ore cells after generation.
    pub ore_cells: usize,
    /// Mud cells after generation.
    pub mud_cells: usize,
    /// Empty (carved) cells after generation.
    pub empty_cells: usize,
    /// Veins seeded.
    pub veins_placed: usize,
    /// Ore cells the vein pass aimed for.
    pub ore_target: usize,
    /// The vein pass stopped on its safety cap.
    pub vein_cap_hit: bool,
    /// A worm stopped on its safety cap.
    pub worm_cap_hit: bool,
}

/// Producer of chunk content.
pub trait TerrainSource {
    /// Region covered by `tier`. Tiers stack downward without overlap.
    fn chunk_bounds(&self, tier: u32) -> GridBounds;

    /// Writes the content of `tier` into `grid`, extending its bounds.
    ///
    /// Carved cells are announced through `sink`.
    fn generate_chunk(
        &self,
        tier: u32,
        grid: &mut GridIndex,
        sink: &mut dyn DecorationSink,
    ) -> ChunkReport;
}

/// Snapshot counters for the whole world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Tiers generated so far.
    pub tiers_generated: u32,
    /// Generated bounds.
    pub bounds: GridBounds,
    /// Solid cells.
    pub solid_cells: usize,
    /// Walkable cells.
    pub walkable_cells: usize,
    /// Frontier size.
    pub frontier_cells: usize,
    /// Solid cells per kind, indexed by the kind's tag.
    pub kind_counts: [usize; MaterialKind::COUNT],
}

/// Grid, walkability and dig state behind one query surface.
pub struct World {
    grid: GridIndex,
    walkability: WalkabilityMap,
    dig: DigService,
    terrain: Box<dyn TerrainSource>,
    sink: Box<dyn DecorationSink>,
    reports: Vec<ChunkReport>,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("bounds", &self.grid.bounds())
            .field("tiers_generated", &self.tiers_generated())
            .field("solid_cells", &self.grid.solid_count())
            .finish_non_exhaustive()
    }
}

impl World {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> WorldBuilder {
        WorldBuilder::default()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// True if an agent may occupy the cell.
    #[inline]
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.walkability.is_walkable(cell)
    }

    /// True if the cell holds material.
    #[inline]
    #[must_use]
    pub fn is_solid(&self, cell: CellCoord) -> bool {
        self.grid.is_solid(cell)
    }

    /// Material of a solid cell.
    #[inline]
    #[must_use]
    pub fn classify(&self, cell: CellCoord) -> Option<MaterialKind> {
        self.grid.kind(cell)
    }

    /// Coarse class of a solid cell.
    #[must_use]
    pub fn class_of(&self, cell: CellCoord) -> Option<MaterialClass> {
        self.grid.kind(cell).map(MaterialKind::class)
    }

    /// Gem value of a cell; 0 for empty cells and base materials.
    #[must_use]
    pub fn value(&self, cell: CellCoord) -> u32 {
        self.grid
            .kind(cell)
            .map_or(0, |kind| self.dig.gem_value(kind))
    }

    /// Material yield of a cell; 0 for empty cells.
    #[must_use]
    pub fn material_yield(&self, cell: CellCoord) -> u32 {
        self.grid
            .kind(cell)
            .map_or(0, |kind| self.dig.material_yield(kind))
    }

    /// Durability of a solid cell.
    #[must_use]
    pub fn durability(&self, cell: CellCoord) -> Option<Durability> {
        self.dig.durability(cell)
    }

    /// Damage stage of a cell.
    #[must_use]
    pub fn damage_stage(&self, cell: CellCoord) -> DamageStage {
        self.dig.damage_stage(cell)
    }

    /// Diggable cells bordering walkable space.
    #[must_use]
    pub fn frontier(&self) -> &HashSet<CellCoord> {
        self.dig.frontier()
    }

    /// Nearest frontier cells around `origin`. See
    /// [`DigService::frontier_candidates`].
    #[must_use]
    pub fn frontier_candidates(&self, origin: CellCoord, radius: u32, max_count: usize) -> Vec<CellCoord> {
        self.dig
            .frontier_candidates(&self.walkability, origin, radius, max_count)
    }

    /// Bounded A* between two walkable cells.
    #[must_use]
    pub fn find_path(&self, start: CellCoord, goal: CellCoord, max_expansions: usize) -> Option<Vec<CellCoord>> {
        self.walkability.find_path(start, goal, max_expansions)
    }

    /// Bounded shortest-path tree from `start`.
    #[must_use]
    pub fn reachable_from(&self, start: CellCoord, max_expansions: usize) -> PathTree {
        self.walkability.reachable_from(start, max_expansions)
    }

    /// Nearest walkable cell within Manhattan `radius`.
    #[must_use]
    pub fn nearest_walkable(&self, origin: CellCoord, radius: u32) -> Option<CellCoord> {
        self.walkability.nearest_walkable(origin, radius)
    }

    /// Iterates every solid cell in the world.
    pub fn solids(&self) -> impl Iterator<Item = (CellCoord, MaterialKind)> + '_ {
        self.grid.solids()
    }

    /// Generated bounds.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.grid.bounds()
    }

    /// Number of tiers generated so far.
    #[inline]
    #[must_use]
    pub fn tiers_generated(&self) -> u32 {
        self.reports.len() as u32
    }

    /// Reports of every generated chunk, in tier order.
    #[must_use]
    pub fn reports(&self) -> &[ChunkReport] {
        &self.reports
    }

    /// Material catalog in use.
    #[must_use]
    pub const fn catalog(&self) -> &MaterialCatalog {
        self.dig.catalog()
    }

    /// Counters for the whole world.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            tiers_generated: self.tiers_generated(),
            bounds: self.bounds(),
            solid_cells: self.grid.solid_count(),
            walkable_cells: self.walkability.walkable_count(),
            frontier_cells: self.dig.frontier().len(),
            kind_counts: self.grid.kind_histogram(),
        }
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Applies one hit to `cell`. No-op on cells that are not solid.
    pub fn apply_hit(&mut self, cell: CellCoord, damage: u32) -> HitOutcome {
        self.dig.apply_hit(
            &mut self.grid,
            &mut self.walkability,
            self.sink.as_mut(),
            cell,
            damage,
        )
    }

    /// Fills an empty in-bounds cell with fresh material.
    ///
    /// Returns false when the cell is outside the bounds or already solid.
    pub fn fill_cell(&mut self, cell: CellCoord, kind: MaterialKind) -> bool {
        if !self.grid.is_empty_in_bounds(cell) {
            return false;
        }
        self.grid.set_solid(cell, kind);
        self.walkability.set_solid(cell);
        self.dig.absorb_region(
            &self.grid,
            &self.walkability,
            GridBounds::from_origin(cell, 1, 1),
        );
        true
    }

    /// Full rescan of derived state. Resets all damage.
    pub fn rebuild_from_terrain(&mut self) {
        self.walkability.rebuild(&self.grid);
        self.dig
            .build_from_terrain(&self.grid, &self.walkability, self.sink.as_mut());
    }

    /// Generates the next tier below the current world.
    pub fn generate_next_tier(&mut self) -> ChunkReport {
        let tier = self.tiers_generated();
        let region = self.terrain.chunk_bounds(tier);
        let report = self
            .terrain
            .generate_chunk(tier, &mut self.grid, self.sink.as_mut());
        self.grid.extend_bounds(region);

        if tier == 0 {
            self.rebuild_from_terrain();
        } else {
            self.walkability.rebuild(&self.grid);
            self.dig.absorb_region(&self.grid, &self.walkability, region);
        }

        tracing::info!(
            tier,
            min_y = region.min_y,
            max_y = region.max_y,
            stone = report.stone_cells,
            ore = report.ore_cells,
            veins = report.veins_placed,
            "chunk generated"
        );
        self.reports.push(report);
        report
    }

    /// Generates exactly `tier`, which must be the next one.
    ///
    /// # Errors
    ///
    /// `TierOutOfOrder` when `tier` is not the next tier.
    pub fn generate_tier(&mut self, tier: u32) -> BurrowResult<ChunkReport> {
        let expected = self.tiers_generated();
        if tier != expected {
            return Err(BurrowError::TierOutOfOrder { expected, got: tier });
        }
        Ok(self.generate_next_tier())
    }

    /// Generates tiers until row `y` lies inside the world.
    pub fn ensure_depth(&mut self, y: i32) -> Vec<ChunkReport> {
        let mut generated = Vec::new();
        while self.grid.bounds().max_y <= y || self.grid.bounds().is_empty() {
            let next = self.terrain.chunk_bounds(self.tiers_generated());
            if next.is_empty() {
                tracing::warn!(tier = self.tiers_generated(), "terrain source returned an empty chunk");
                break;
            }
            generated.push(self.generate_next_tier());
        }
        generated
    }
}

/// Assembles a [`World`]. A terrain source is required.
#[derive(Default)]
pub struct WorldBuilder {
    catalog: MaterialCatalog,
    terrain: Option<Box<dyn TerrainSource>>,
    sink: Option<Box<dyn DecorationSink>>,
    initial_tiers: Option<u32>,
}

impl WorldBuilder {
    /// Material catalog (defaults to `MaterialCatalog::default()`).
    #[must_use]
    pub fn catalog(mut self, catalog: MaterialCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Terrain source. Required.
    #[must_use]
    pub fn terrain_source(mut self, terrain: impl TerrainSource + 'static) -> Self {
        self.terrain = Some(Box::new(terrain));
        self
    }

    /// Visual collaborator (defaults to `NoDecorations`).
    #[must_use]
    pub fn decoration_sink(mut self, sink: impl DecorationSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Tiers generated during `build` (default 1).
    #[must_use]
    pub fn initial_tiers(mut self, tiers: u32) -> Self {
        self.initial_tiers = Some(tiers);
        self
    }

    /// Validates the collaborators and generates the initial tiers.
    ///
    /// # Errors
    ///
    /// `MissingCollaborator` without a terrain source, `InvalidCatalog` when
    /// the catalog fails validation.
    pub fn build(self) -> BurrowResult<World> {
        let terrain = self
            .terrain
            .ok_or(BurrowError::MissingCollaborator("terrain source"))?;
        self.catalog.validate()?;

        let mut world = World {
            grid: GridIndex::new(),
            walkability: WalkabilityMap::new(),
            dig: DigService::new(self.catalog),
            terrain,
            sink: self.sink.unwrap_or_else(|| Box::new(NoDecorations)),
            reports: Vec::new(),
        };
        for _ in 0..self.initial_tiers.unwrap_or(1) {
            world.generate_next_tier();
        }
        tracing::info!(
            tiers = world.tiers_generated(),
            solid = world.grid.solid_count(),
            frontier = world.dig.frontier().len(),
            "world built"
        );
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::AsciiTerrain;

    const MAP: &str = "
        ....
        .#..
        ..g.
        mmmm
    ";

    #[test]
    fn test_missing_terrain_source() {
        let err = World::builder().build().expect_err("no terrain source");
        assert_eq!(err, BurrowError::MissingCollaborator("terrain source"));
    }

    #[test]
    fn test_queries_after_build() {
        let world = World::builder()
            .terrain_source(AsciiTerrain::parse(MAP).expect("valid map"))
            .build()
            .expect("world builds");
        assert_eq!(world.tiers_generated(), 1);
        assert_eq!(world.classify(CellCoord::new(1, 1)), Some(MaterialKind::Stone));
        assert_eq!(world.value(CellCoord::new(2, 2)), 40);
        assert_eq!(world.value(CellCoord::new(1, 1)), 0);
        assert_eq!(world.material_yield(CellCoord::new(1, 1)), 2);
        assert!(world.is_walkable(CellCoord::new(0, 0)));
        assert!(!world.is_walkable(CellCoord::new(0, 3)));
        assert_eq!(world.stats().solid_cells, 6);
        // (2, 3) is buried under the gold
        assert_eq!(world.stats().frontier_cells, 5);
    }

    #[test]
    fn test_tiers_in_order_only() {
        let mut world = World::builder()
            .terrain_source(AsciiTerrain::parse(MAP).expect("valid map"))
            .build()
            .expect("world builds");
        assert_eq!(
            world.generate_tier(3),
            Err(BurrowError::TierOutOfOrder { expected: 1, got: 3 })
        );
        assert!(world.generate_tier(1).is_ok());
        assert_eq!(world.bounds().max_y, 8);
    }

    #[test]
    fn test_new_tier_keeps_damage() {
        let mut world = World::builder()
            .terrain_source(AsciiTerrain::parse(MAP).expect("valid map"))
            .build()
            .expect("world builds");
        let stone = CellCoord::new(1, 1);
        world.apply_hit(stone, 1);
        let before = world.durability(stone);
        world.ensure_depth(10);
        assert_eq!(world.tiers_generated(), 3);
        assert_eq!(world.durability(stone), before, "absorbing a tier must not reset damage");
    }

    #[test]
    fn test_fill_cell_updates_frontier() {
        let mut world = World::builder()
            .terrain_source(AsciiTerrain::parse(MAP).expect("valid map"))
            .build()
            .expect("world builds");
        let cell = CellCoord::new(3, 0);
        assert!(world.fill_cell(cell, MaterialKind::Mud));
        assert!(!world.is_walkable(cell));
        assert!(world.frontier().contains(&cell));
        assert!(!world.fill_cell(cell, MaterialKind::Mud), "already solid");
    }
}

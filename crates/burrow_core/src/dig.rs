//! # Dig Service
//!
//! Owns per-cell durability, the frontier and the damage stages, and performs
//! the solid -> empty transition.
//!
//! ## The break transition
//!
//! ```text
//! apply_hit(cell) ──> durability <= 0 ?
//!                        │ yes
//!                        ├─ GridIndex::set_empty
//!                        ├─ WalkabilityMap::set_empty
//!                        ├─ DecorationSink::place_decoration
//!                        ├─ drop durability + stage
//!                        └─ refresh frontier for cell + 4 neighbors
//! ```
//!
//! ## Frontier invariant
//!
//! `c ∈ frontier ⟺ grid.is_solid(c) ∧ ∃ n ∈ neighbors4(c): walkable(n)`,
//! after `build_from_terrain`, `absorb_region` and every `apply_hit`.

use std::collections::{HashMap, HashSet};

use crate::cell::{CellCoord, GridBounds};
use crate::grid::GridIndex;
use crate::material::{MaterialCatalog, MaterialKind};
use crate::visuals::DecorationSink;
use crate::walkability::WalkabilityMap;

/// Hit points of a solid cell. `0 < current <= max` while tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Durability {
    /// Remaining hit points.
    pub current: u32,
    /// Hit points when generated.
    pub max: u32,
}

impl Durability {
    /// Fresh, undamaged durability.
    #[must_use]
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Remaining fraction in `(0, 1]`.
    #[must_use]
    pub fn fraction(self) -> f32 {
        self.current as f32 / self.max.max(1) as f32
    }
}

/// Coarse damage visual, bucketed by quartiles of remaining durability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DamageStage {
    /// More than 75% left.
    #[default]
    Undamaged,
    /// More than 50% left.
    Scratched,
    /// More than 25% left.
    Cracked,
    /// 25% or less left.
    Crumbling,
}

impl DamageStage {
    /// Stage for a durability value.
    #[must_use]
    pub fn from_durability(durability: Durability) -> Self {
        let fraction = durability.fraction();
        if fraction > 0.75 {
            Self::Undamaged
        } else if fraction > 0.5 {
            Self::Scratched
        } else if fraction > 0.25 {
            Self::Cracked
        } else {
            Self::Crumbling
        }
    }

    /// Opacity of the crack overlay for this stage.
    #[must_use]
    pub const fn overlay_opacity(self) -> f32 {
        match self {
            Self::Undamaged => 0.0,
            Self::Scratched => 0.25,
            Self::Cracked => 0.5,
            Self::Crumbling => 0.75,
        }
    }
}

/// What a single hit did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// The cell was not solid; nothing happened.
    Ignored,
    /// The cell lost durability but is still solid.
    Damaged {
        /// Durability after the hit.
        remaining: Durability,
        /// Stage after the hit.
        stage: DamageStage,
    },
    /// The cell broke and is now empty.
    Broken {
        /// Material the cell held.
        kind: MaterialKind,
    },
}

impl HitOutcome {
    /// True iff this hit broke the cell.
    #[inline]
    #[must_use]
    pub const fn broke(self) -> bool {
        matches!(self, Self::Broken { .. })
    }
}

/// Durability, frontier and damage-stage bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct DigService {
    catalog: MaterialCatalog,
    durability: HashMap<CellCoord, Durability>,
    /// Non-undamaged stages only.
    stages: HashMap<CellCoord, DamageStage>,
    frontier: HashSet<CellCoord>,
}

impl DigService {
    /// Creates an empty service using `catalog` for durability.
    #[must_use]
    pub fn new(catalog: MaterialCatalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Material catalog in use.
    #[must_use]
    pub const fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    /// Full rescan: fresh durability for every solid cell, all damage visuals
    /// reset, frontier recomputed.
    pub fn build_from_terrain(
        &mut self,
        grid: &GridIndex,
        walkability: &WalkabilityMap,
        sink: &mut dyn DecorationSink,
    ) {
        for (cell, _) in self.stages.drain() {
            sink.damage_stage_changed(cell, DamageStage::Undamaged);
        }
        self.durability.clear();
        self.frontier.clear();

        for (cell, kind) in grid.solids() {
            self.durability
                .insert(cell, Durability::full(self.catalog.max_durability(kind)));
            if Self::borders_walkable(walkability, cell) {
                self.frontier.insert(cell);
            }
        }
        tracing::debug!(
            tracked = self.durability.len(),
            frontier = self.frontier.len(),
            "dig service rebuilt from terrain"
        );
    }

    /// Integrates a freshly generated region without touching damage
    /// elsewhere. Frontier membership is refreshed one cell beyond the region
    /// so seams with neighboring chunks stay correct.
    pub fn absorb_region(&mut self, grid: &GridIndex, walkability: &WalkabilityMap, region: GridBounds) {
        for cell in region.iter() {
            match grid.kind(cell) {
                Some(kind) => {
                    self.durability
                        .entry(cell)
                        .or_insert_with(|| Durability::full(self.catalog.max_durability(kind)));
                }
                None => {
                    self.durability.remove(&cell);
                    self.stages.remove(&cell);
                }
            }
        }
        for cell in region.expanded(1).iter() {
            self.refresh_frontier_cell(grid, walkability, cell);
        }
    }

    /// Durability of a tracked cell.
    #[inline]
    #[must_use]
    pub fn durability(&self, cell: CellCoord) -> Option<Durability> {
        self.durability.get(&cell).copied()
    }

    /// True if the service tracks the cell as solid.
    #[inline]
    #[must_use]
    pub fn is_tracked(&self, cell: CellCoord) -> bool {
        self.durability.contains_key(&cell)
    }

    /// Current damage stage of a cell.
    #[must_use]
    pub fn damage_stage(&self, cell: CellCoord) -> DamageStage {
        self.stages.get(&cell).copied().unwrap_or_default()
    }

    /// Gem value of a kind.
    #[inline]
    #[must_use]
    pub const fn gem_value(&self, kind: MaterialKind) -> u32 {
        self.catalog.props(kind).gem_value
    }

    /// Material yield of a kind.
    #[inline]
    #[must_use]
    pub const fn material_yield(&self, kind: MaterialKind) -> u32 {
        self.catalog.props(kind).material_yield
    }

    /// Diggable cells that border walkable space.
    #[must_use]
    pub const fn frontier(&self) -> &HashSet<CellCoord> {
        &self.frontier
    }

    /// Frontier cells within Manhattan `radius` of `origin` that still have a
    /// walkable orthogonal neighbor, nearest first, at most `max_count`.
    ///
    /// Scans whichever is smaller: the radius diamond or the frontier set.
    #[must_use]
    pub fn frontier_candidates(
        &self,
        walkability: &WalkabilityMap,
        origin: CellCoord,
        radius: u32,
        max_count: usize,
    ) -> Vec<CellCoord> {
        let r = radius as usize;
        let diamond_area = 2 * r * r + 2 * r + 1;

        let mut candidates: Vec<CellCoord> = if diamond_area < self.frontier.len() {
            let ri = radius as i32;
            (-ri..=ri)
                .flat_map(|dy| {
                    let span = ri - dy.abs();
                    (-span..=span).map(move |dx| origin.offset(dx, dy))
                })
                .filter(|cell| self.frontier.contains(cell))
                .collect()
        } else {
            self.frontier
                .iter()
                .copied()
                .filter(|cell| cell.manhattan(origin) <= radius)
                .collect()
        };

        candidates.retain(|cell| Self::borders_walkable(walkability, *cell));
        candidates.sort_unstable_by_key(|cell| (cell.manhattan(origin), cell.y, cell.x));
        candidates.truncate(max_count);
        candidates
    }

    /// Applies one hit of `damage` (at least 1) to `cell`.
    ///
    /// Hitting a cell that is not solid is a no-op returning
    /// `HitOutcome::Ignored`.
    pub fn apply_hit(
        &mut self,
        grid: &mut GridIndex,
        walkability: &mut WalkabilityMap,
        sink: &mut dyn DecorationSink,
        cell: CellCoord,
        damage: u32,
    ) -> HitOutcome {
        let Some(kind) = grid.kind(cell) else {
            return HitOutcome::Ignored;
        };
        let max = self.catalog.max_durability(kind);
        let durability = self
            .durability
            .entry(cell)
            .or_insert_with(|| Durability::full(max));

        durability.current = durability.current.saturating_sub(damage.max(1));
        if durability.current > 0 {
            let remaining = *durability;
            let stage = DamageStage::from_durability(remaining);
            if stage != self.damage_stage(cell) {
                self.stages.insert(cell, stage);
                sink.damage_stage_changed(cell, stage);
            }
            tracing::trace!(%cell, remaining = remaining.current, "cell damaged");
            return HitOutcome::Damaged { remaining, stage };
        }

        grid.set_empty(cell);
        walkability.set_empty(cell);
        sink.place_decoration(cell);
        self.durability.remove(&cell);
        self.stages.remove(&cell);
        self.refresh_frontier_cell(grid, walkability, cell);
        for neighbor in cell.neighbors4() {
            self.refresh_frontier_cell(grid, walkability, neighbor);
        }
        tracing::trace!(%cell, kind = kind.name(), "cell broken");
        HitOutcome::Broken { kind }
    }

    /// Re-derives frontier membership of one cell.
    pub fn refresh_frontier_cell(&mut self, grid: &GridIndex, walkability: &WalkabilityMap, cell: CellCoord) {
        if grid.is_solid(cell) && Self::borders_walkable(walkability, cell) {
            self.frontier.insert(cell);
        } else {
            self.frontier.remove(&cell);
        }
    }

    fn borders_walkable(walkability: &WalkabilityMap, cell: CellCoord) -> bool {
        cell.neighbors4().iter().any(|n| walkability.is_walkable(*n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visuals::{NoDecorations, RecordedDecorations};

    /// 10x10 region, all empty except the given solids.
    fn setup(solids: &[(CellCoord, MaterialKind)]) -> (GridIndex, WalkabilityMap, DigService) {
        let mut grid = GridIndex::new();
        grid.extend_bounds(GridBounds::from_origin(CellCoord::new(0, 0), 10, 10));
        for (cell, kind) in solids {
            grid.set_solid(*cell, *kind);
        }
        let walk = WalkabilityMap::from_grid(&grid);
        let mut dig = DigService::new(MaterialCatalog::default());
        dig.build_from_terrain(&grid, &walk, &mut NoDecorations);
        (grid, walk, dig)
    }

    #[test]
    fn test_single_solid_frontier() {
        let target = CellCoord::new(5, 5);
        let (_, walk, dig) = setup(&[(target, MaterialKind::Stone)]);
        assert_eq!(dig.frontier().len(), 1);
        assert!(dig.frontier().contains(&target));
        assert_eq!(
            dig.frontier_candidates(&walk, CellCoord::new(0, 0), 20, 5),
            vec![target]
        );
    }

    #[test]
    fn test_four_hits_break_stone() {
        let target = CellCoord::new(5, 5);
        let (mut grid, mut walk, mut dig) = setup(&[(target, MaterialKind::Stone)]);
        let mut sink = RecordedDecorations::default();

        let results: Vec<bool> = (0..4)
            .map(|_| dig.apply_hit(&mut grid, &mut walk, &mut sink, target, 1).broke())
            .collect();
        assert_eq!(results, vec![false, false, false, true]);
        assert!(!grid.is_solid(target));
        assert!(walk.is_walkable(target));
        assert!(dig.frontier().is_empty());
        assert_eq!(sink.dug, vec![target]);
        assert_eq!(
            sink.stages,
            vec![
                (target, DamageStage::Scratched),
                (target, DamageStage::Cracked),
                (target, DamageStage::Crumbling),
            ]
        );

        let again = dig.apply_hit(&mut grid, &mut walk, &mut sink, target, 1);
        assert_eq!(again, HitOutcome::Ignored, "further hits are no-ops");
    }

    #[test]
    fn test_zero_damage_counts_as_one() {
        let target = CellCoord::new(2, 2);
        let (mut grid, mut walk, mut dig) = setup(&[(target, MaterialKind::Mud)]);
        let outcome = dig.apply_hit(&mut grid, &mut walk, &mut NoDecorations, target, 0);
        assert!(matches!(outcome, HitOutcome::Damaged { remaining, .. } if remaining.current == 1));
    }

    #[test]
    fn test_break_exposes_buried_neighbor() {
        let outer = CellCoord::new(5, 5);
        let inner = CellCoord::new(6, 5);
        let mut solids = vec![(outer, MaterialKind::Mud), (inner, MaterialKind::Gold)];
        // bury `inner` on its other three sides
        solids.extend([
            (CellCoord::new(7, 5), MaterialKind::Stone),
            (CellCoord::new(6, 4), MaterialKind::Stone),
            (CellCoord::new(6, 6), MaterialKind::Stone),
        ]);
        let (mut grid, mut walk, mut dig) = setup(&solids);
        assert!(!dig.frontier().contains(&inner));

        dig.apply_hit(&mut grid, &mut walk, &mut NoDecorations, outer, 10);
        assert!(dig.frontier().contains(&inner), "breaking outer exposes inner");
    }

    #[test]
    fn test_build_resets_damage_visuals() {
        let target = CellCoord::new(1, 1);
        let (mut grid, mut walk, mut dig) = setup(&[(target, MaterialKind::Stone)]);
        dig.apply_hit(&mut grid, &mut walk, &mut NoDecorations, target, 2);
        assert_eq!(dig.damage_stage(target), DamageStage::Cracked);

        let mut sink = RecordedDecorations::default();
        dig.build_from_terrain(&grid, &walk, &mut sink);
        assert_eq!(dig.damage_stage(target), DamageStage::Undamaged);
        assert_eq!(dig.durability(target), Some(Durability::full(4)));
        assert_eq!(sink.stages, vec![(target, DamageStage::Undamaged)]);
    }

    #[test]
    fn test_candidates_sorted_and_truncated() {
        let solids: Vec<_> = (0..10)
            .map(|x| (CellCoord::new(x, 9), MaterialKind::Mud))
            .collect();
        let (_, walk, dig) = setup(&solids);
        let origin = CellCoord::new(4, 0);
        let picked = dig.frontier_candidates(&walk, origin, 11, 3);
        assert_eq!(
            picked,
            vec![CellCoord::new(4, 9), CellCoord::new(3, 9), CellCoord::new(5, 9)]
        );
        assert!(dig.frontier_candidates(&walk, origin, 8, 10).is_empty(), "all beyond radius");
    }
}

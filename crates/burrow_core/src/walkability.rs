//! # Walkability Map
//!
//! Dense bitmap derived from the `GridIndex`: a cell is walkable when it is
//! inside the generated bounds and holds no material.
//!
//! Single-cell changes go through `set_empty` / `set_solid` in O(1); a full
//! `rebuild` is only needed when the bounds grow (new chunk).

use crate::cell::{CellCoord, GridBounds};
use crate::grid::GridIndex;
use crate::pathfinding::{self, PathTree};

/// Walkable/solid bitmap over the generated bounds.
#[derive(Clone, Debug, Default)]
pub struct WalkabilityMap {
    /// Bounds the bitmap covers.
    bounds: GridBounds,
    /// Row-major walkable flags.
    walkable: Vec<bool>,
}

impl WalkabilityMap {
    /// Creates an empty map covering no cells.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from the current grid contents.
    #[must_use]
    pub fn from_grid(grid: &GridIndex) -> Self {
        let mut map = Self::new();
        map.rebuild(grid);
        map
    }

    /// Recomputes every cell from the grid, adopting the grid's bounds.
    pub fn rebuild(&mut self, grid: &GridIndex) {
        self.bounds = grid.bounds();
        self.walkable.clear();
        self.walkable
            .extend(self.bounds.iter().map(|cell| !grid.is_solid(cell)));
        tracing::debug!(
            cells = self.walkable.len(),
            walkable = self.walkable_count(),
            "walkability rebuilt"
        );
    }

    /// Bounds covered by the map.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// True if an agent may occupy the cell.
    #[inline]
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.bounds
            .index_of(cell)
            .is_some_and(|index| self.walkable[index])
    }

    /// Marks a cell walkable. Ignored outside the bounds.
    #[inline]
    pub fn set_empty(&mut self, cell: CellCoord) {
        if let Some(index) = self.bounds.index_of(cell) {
            self.walkable[index] = true;
        }
    }

    /// Marks a cell blocked. Ignored outside the bounds.
    #[inline]
    pub fn set_solid(&mut self, cell: CellCoord) {
        if let Some(index) = self.bounds.index_of(cell) {
            self.walkable[index] = false;
        }
    }

    /// Number of walkable cells.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|w| **w).count()
    }

    /// Shortest 4-connected path from `start` to `goal`, both included.
    ///
    /// `None` when either end is blocked, the goal is unreachable, or the
    /// search expands more than `max_expansions` nodes.
    #[must_use]
    pub fn find_path(
        &self,
        start: CellCoord,
        goal: CellCoord,
        max_expansions: usize,
    ) -> Option<Vec<CellCoord>> {
        pathfinding::find_path(self, start, goal, max_expansions)
    }

    /// Breadth-first shortest-path tree rooted at `start`.
    #[must_use]
    pub fn reachable_from(&self, start: CellCoord, max_expansions: usize) -> PathTree {
        pathfinding::reachable_from(self, start, max_expansions)
    }

    /// Nearest walkable cell by Manhattan ring scan, `origin` included.
    #[must_use]
    pub fn nearest_walkable(&self, origin: CellCoord, radius: u32) -> Option<CellCoord> {
        let radius = radius as i32;
        for ring in 0..=radius {
            for dx in -ring..=ring {
                let dy = ring - dx.abs();
                let upper = origin.offset(dx, -dy);
                if self.is_walkable(upper) {
                    return Some(upper);
                }
                if dy != 0 {
                    let lower = origin.offset(dx, dy);
                    if self.is_walkable(lower) {
                        return Some(lower);
                    }
                }
            }
        }
        None
    }
}

//! # Grid Index
//!
//! Sparse map from cell coordinates to material. The single source of truth
//! for "what is at this cell".
//!
//! Only solid cells are stored. A cell inside the tracked bounds with no
//! entry is empty; a cell outside the bounds has never been generated.

use std::collections::HashMap;

use crate::cell::{CellCoord, GridBounds};
use crate::material::MaterialKind;

/// Sparse cell classification.
#[derive(Clone, Debug, Default)]
pub struct GridIndex {
    /// Solid cells and their material.
    solids: HashMap<CellCoord, MaterialKind>,
    /// Union of every generated region.
    bounds: GridBounds,
}

impl GridIndex {
    /// Creates an empty index with no tracked bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds of all generated regions.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Grows the tracked bounds to cover `region`.
    pub fn extend_bounds(&mut self, region: GridBounds) {
        self.bounds = self.bounds.union(&region);
    }

    /// True if the cell lies inside a generated region.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, cell: CellCoord) -> bool {
        self.bounds.contains(cell)
    }

    /// Material of a solid cell; `None` for empty or unknown cells.
    #[inline]
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<MaterialKind> {
        self.solids.get(&cell).copied()
    }

    /// True if the cell holds material.
    #[inline]
    #[must_use]
    pub fn is_solid(&self, cell: CellCoord) -> bool {
        self.solids.contains_key(&cell)
    }

    /// True if the cell is inside the bounds and holds no material.
    #[inline]
    #[must_use]
    pub fn is_empty_in_bounds(&self, cell: CellCoord) -> bool {
        self.in_bounds(cell) && !self.solids.contains_key(&cell)
    }

    /// Stores material at a cell, returning the previous material.
    pub fn set_solid(&mut self, cell: CellCoord, kind: MaterialKind) -> Option<MaterialKind> {
        self.solids.insert(cell, kind)
    }

    /// Clears a cell, returning the material it held.
    pub fn set_empty(&mut self, cell: CellCoord) -> Option<MaterialKind> {
        self.solids.remove(&cell)
    }

    /// Number of solid cells.
    #[inline]
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    /// Iterates solid cells in unspecified order.
    pub fn solids(&self) -> impl Iterator<Item = (CellCoord, MaterialKind)> + '_ {
        self.solids.iter().map(|(cell, kind)| (*cell, *kind))
    }

    /// Counts solid cells per kind, indexed by the kind's tag.
    #[must_use]
    pub fn kind_histogram(&self) -> [usize; MaterialKind::COUNT] {
        let mut counts = [0usize; MaterialKind::COUNT];
        for kind in self.solids.values() {
            counts[*kind as usize] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_vs_unknown() {
        let mut grid = GridIndex::new();
        grid.extend_bounds(GridBounds::from_origin(CellCoord::new(0, 0), 4, 4));
        grid.set_solid(CellCoord::new(1, 1), MaterialKind::Stone);

        assert!(grid.is_solid(CellCoord::new(1, 1)));
        assert!(grid.is_empty_in_bounds(CellCoord::new(2, 2)));
        assert!(!grid.is_empty_in_bounds(CellCoord::new(9, 9)), "outside bounds is not empty");
    }

    #[test]
    fn test_set_empty_returns_previous() {
        let mut grid = GridIndex::new();
        let cell = CellCoord::new(3, 7);
        assert_eq!(grid.set_solid(cell, MaterialKind::Gold), None);
        assert_eq!(grid.set_empty(cell), Some(MaterialKind::Gold));
        assert_eq!(grid.set_empty(cell), None);
        assert_eq!(grid.solid_count(), 0);
    }

    #[test]
    fn test_histogram() {
        let mut grid = GridIndex::new();
        grid.set_solid(CellCoord::new(0, 0), MaterialKind::Mud);
        grid.set_solid(CellCoord::new(1, 0), MaterialKind::Mud);
        grid.set_solid(CellCoord::new(2, 0), MaterialKind::Diamond);
        let counts = grid.kind_histogram();
        assert_eq!(counts[MaterialKind::Mud as usize], 2);
        assert_eq!(counts[MaterialKind::Diamond as usize], 1);
        assert_eq!(counts[MaterialKind::Stone as usize], 0);
    }
}

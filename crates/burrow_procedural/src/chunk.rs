//! # Chunk Buffer
//!
//! Dense scratch space for one chunk while the passes run. Cells are
//! addressed by row-major index; the buffer is only written into the shared
//! `GridIndex` once every pass has finished.

use burrow_core::{CellCoord, GridBounds, GridIndex, MaterialKind};

/// Per-kind tallies of a buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellCounts {
    /// Mud cells.
    pub mud: usize,
    /// Stone cells.
    pub stone: usize,
    /// Ore cells.
    pub ore: usize,
    /// Empty cells.
    pub empty: usize,
}

/// Local cell content plus the carved mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkBuffer {
    bounds: GridBounds,
    cells: Vec<Option<MaterialKind>>,
    carved: Vec<bool>,
}

impl ChunkBuffer {
    /// A buffer over `bounds`, filled with mud.
    #[must_use]
    pub fn new(bounds: GridBounds) -> Self {
        let len = bounds.area();
        Self {
            bounds,
            cells: vec![Some(MaterialKind::Mud); len],
            carved: vec![false; len],
        }
    }

    /// Region covered.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.bounds.width() as usize
    }

    /// Height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.bounds.height() as usize
    }

    /// Number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the buffer covers nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index of a world cell, if inside.
    #[inline]
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        self.bounds.index_of(cell)
    }

    /// World cell at an index.
    #[inline]
    #[must_use]
    pub fn cell_at(&self, index: usize) -> CellCoord {
        self.bounds.cell_at(index)
    }

    /// Local `(column, row)` of an index.
    #[inline]
    #[must_use]
    pub const fn local(&self, index: usize) -> (usize, usize) {
        (index % self.width(), index / self.width())
    }

    /// Index of a local position, if inside.
    #[inline]
    #[must_use]
    pub fn local_index(&self, column: i64, row: i64) -> Option<usize> {
        let (w, h) = (self.width() as i64, self.height() as i64);
        if (0..w).contains(&column) && (0..h).contains(&row) {
            Some((row * w + column) as usize)
        } else {
            None
        }
    }

    /// Content at an index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<MaterialKind> {
        self.cells[index]
    }

    /// Overwrites the content at an index.
    #[inline]
    pub fn set(&mut self, index: usize, content: Option<MaterialKind>) {
        self.cells[index] = content;
    }

    /// True if the cell holds stone and was never carved.
    #[inline]
    #[must_use]
    pub fn is_plain_stone(&self, index: usize) -> bool {
        self.cells[index] == Some(MaterialKind::Stone) && !self.carved[index]
    }

    /// Clears a cell to empty and marks it carved.
    pub fn carve(&mut self, index: usize) {
        self.cells[index] = None;
        self.carved[index] = true;
    }

    /// True if the cell was carved.
    #[inline]
    #[must_use]
    pub fn is_carved(&self, index: usize) -> bool {
        self.carved[index]
    }

    /// Carved cells in row-major order.
    pub fn carved_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.carved
            .iter()
            .enumerate()
            .filter(|(_, carved)| **carved)
            .map(|(index, _)| self.cell_at(index))
    }

    /// Indices of stone cells in row-major order.
    #[must_use]
    pub fn stone_indices(&self) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|index| self.cells[*index] == Some(MaterialKind::Stone))
            .collect()
    }

    /// Tallies every cell.
    #[must_use]
    pub fn counts(&self) -> CellCounts {
        let mut counts = CellCounts::default();
        for cell in &self.cells {
            match cell {
                None => counts.empty += 1,
                Some(MaterialKind::Mud) => counts.mud += 1,
                Some(MaterialKind::Stone) => counts.stone += 1,
                Some(_) => counts.ore += 1,
            }
        }
        counts
    }

    /// Writes the content into `grid` and extends its bounds.
    pub fn write_into(&self, grid: &mut GridIndex) {
        grid.extend_bounds(self.bounds);
        for (index, content) in self.cells.iter().enumerate() {
            let cell = self.cell_at(index);
            match content {
                Some(kind) => {
                    grid.set_solid(cell, *kind);
                }
                None => {
                    grid.set_empty(cell);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> ChunkBuffer {
        ChunkBuffer::new(GridBounds::from_origin(CellCoord::new(-2, 10), 4, 3))
    }

    #[test]
    fn test_addressing() {
        let buf = buffer();
        assert_eq!(buf.len(), 12);
        assert_eq!(buf.cell_at(5), CellCoord::new(-1, 11));
        assert_eq!(buf.local(5), (1, 1));
        assert_eq!(buf.local_index(1, 1), Some(5));
        assert_eq!(buf.local_index(4, 0), None);
        assert_eq!(buf.index_of(CellCoord::new(-1, 11)), Some(5));
    }

    #[test]
    fn test_carve_excludes_from_stone() {
        let mut buf = buffer();
        buf.set(3, Some(MaterialKind::Stone));
        assert!(buf.is_plain_stone(3));
        buf.carve(3);
        assert!(!buf.is_plain_stone(3));
        assert_eq!(buf.carved_cells().collect::<Vec<_>>(), vec![CellCoord::new(1, 10)]);
        assert_eq!(buf.counts(), CellCounts { mud: 11, stone: 0, ore: 0, empty: 1 });
    }

    #[test]
    fn test_write_into_grid() {
        let mut buf = buffer();
        buf.set(0, Some(MaterialKind::Gold));
        buf.carve(1);
        let mut grid = GridIndex::new();
        buf.write_into(&mut grid);
        assert_eq!(grid.bounds(), buf.bounds());
        assert_eq!(grid.kind(CellCoord::new(-2, 10)), Some(MaterialKind::Gold));
        assert!(grid.is_empty_in_bounds(CellCoord::new(-1, 10)));
        assert_eq!(grid.solid_count(), 11);
    }
}

//! # Cell Coordinates
//!
//! Integer grid addressing shared by every subsystem.
//!
//! `y` grows downward: a larger `y` is deeper underground. Tier 0 starts at
//! row 0 and each later tier is stacked strictly below the previous one.

use serde::{Deserialize, Serialize};

/// A cell address on the 2D grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    /// Column.
    pub x: i32,
    /// Row (grows downward).
    pub y: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the cell offset by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the neighbor in the given direction.
    #[inline]
    #[must_use]
    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    /// Manhattan distance to another cell.
    #[inline]
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Orthogonal (4-connected) neighbors in `Direction::ALL` order.
    #[inline]
    #[must_use]
    pub fn neighbors4(self) -> [Self; 4] {
        Direction::ALL.map(|dir| self.step(dir))
    }

    /// All 8 surrounding cells.
    #[must_use]
    pub fn neighbors8(self) -> [Self; 8] {
        [
            self.offset(-1, -1),
            self.offset(0, -1),
            self.offset(1, -1),
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(-1, 1),
            self.offset(0, 1),
            self.offset(1, 1),
        ]
    }

    /// True if `other` shares an edge with this cell.
    #[inline]
    #[must_use]
    pub const fn is_adjacent4(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four orthogonal directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the surface (`y - 1`).
    Up,
    /// Deeper (`y + 1`).
    Down,
    /// `x - 1`.
    Left,
    /// `x + 1`.
    Right,
}

impl Direction {
    /// Every direction, in neighbor iteration order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit offset of this direction.
    #[inline]
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Direction from `from` to an orthogonally adjacent `to`.
    ///
    /// Returns `None` when the cells are not 4-neighbors.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        match (to.x - from.x, to.y - from.y) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }
}

/// Half-open rectangle of cells: `[min_x, max_x) x [min_y, max_y)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    /// Inclusive left edge.
    pub min_x: i32,
    /// Inclusive top edge.
    pub min_y: i32,
    /// Exclusive right edge.
    pub max_x: i32,
    /// Exclusive bottom edge.
    pub max_y: i32,
}

impl GridBounds {
    /// Creates bounds from an origin and a size.
    #[must_use]
    pub const fn from_origin(origin: CellCoord, width: u32, height: u32) -> Self {
        Self {
            min_x: origin.x,
            min_y: origin.y,
            max_x: origin.x + width as i32,
            max_y: origin.y + height as i32,
        }
    }

    /// Width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        if self.max_x > self.min_x {
            (self.max_x - self.min_x) as u32
        } else {
            0
        }
    }

    /// Height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        if self.max_y > self.min_y {
            (self.max_y - self.min_y) as u32
        } else {
            0
        }
    }

    /// Number of cells covered.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// True when no cell is covered.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// True if the cell lies inside the bounds.
    #[inline]
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.x >= self.min_x && cell.x < self.max_x && cell.y >= self.min_y && cell.y < self.max_y
    }

    /// Smallest bounds covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Bounds grown by `margin` cells on every side.
    #[must_use]
    pub const fn expanded(&self, margin: i32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Row-major index of a contained cell.
    #[inline]
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let col = (cell.x - self.min_x) as usize;
        let row = (cell.y - self.min_y) as usize;
        Some(row * self.width() as usize + col)
    }

    /// Cell at a row-major index.
    #[inline]
    #[must_use]
    pub fn cell_at(&self, index: usize) -> CellCoord {
        let width = self.width() as usize;
        CellCoord::new(
            self.min_x + (index % width) as i32,
            self.min_y + (index / width) as i32,
        )
    }

    /// Iterates every contained cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> {
        let bounds = *self;
        (bounds.min_y..bounds.max_y)
            .flat_map(move |y| (bounds.min_x..bounds.max_x).map(move |x| CellCoord::new(x, y)))
    }
}

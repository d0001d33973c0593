//! # Text Terrain
//!
//! A `TerrainSource` that reads tier 0 from a character map. Later tiers are
//! solid stone of the same size. Handy for hand-built scenarios.
//!
//! | Char | Cell    |
//! |------|---------|
//! | `.`  | empty   |
//! | `m`  | mud     |
//! | `#`  | stone   |
//! | `c`  | copper  |
//! | `i`  | iron    |
//! | `s`  | silver  |
//! | `g`  | gold    |
//! | `d`  | diamond |
//!
//! Leading and trailing blank lines are ignored and each row is trimmed.

use crate::cell::{CellCoord, GridBounds};
use crate::error::{BurrowError, BurrowResult};
use crate::grid::GridIndex;
use crate::material::MaterialKind;
use crate::visuals::DecorationSink;
use crate::world::{ChunkReport, TerrainSource};

/// Tier 0 from text, stone below.
#[derive(Clone, Debug)]
pub struct AsciiTerrain {
    width: u32,
    height: u32,
    cells: Vec<Option<MaterialKind>>,
}

impl AsciiTerrain {
    /// Parses a character map.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on an empty map, ragged rows or unknown characters.
    pub fn parse(map: &str) -> BurrowResult<Self> {
        let rows: Vec<&str> = map
            .lines()
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            return Err(BurrowError::InvalidConfig("empty terrain map".into()));
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(BurrowError::InvalidConfig(format!(
                    "terrain map row {y} has {} columns, expected {width}",
                    row.chars().count()
                )));
            }
            for ch in row.chars() {
                cells.push(Self::decode(ch)?);
            }
        }

        Ok(Self {
            width: width as u32,
            height: rows.len() as u32,
            cells,
        })
    }

    fn decode(ch: char) -> BurrowResult<Option<MaterialKind>> {
        Ok(match ch {
            '.' => None,
            'm' => Some(MaterialKind::Mud),
            '#' => Some(MaterialKind::Stone),
            'c' => Some(MaterialKind::Copper),
            'i' => Some(MaterialKind::Iron),
            's' => Some(MaterialKind::Silver),
            'g' => Some(MaterialKind::Gold),
            'd' => Some(MaterialKind::Diamond),
            other => {
                return Err(BurrowError::InvalidConfig(format!(
                    "unknown terrain character {other:?}"
                )))
            }
        })
    }

    /// Map width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Map height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

impl TerrainSource for AsciiTerrain {
    fn chunk_bounds(&self, tier: u32) -> GridBounds {
        let top = (tier * self.height) as i32;
        GridBounds::from_origin(CellCoord::new(0, top), self.width, self.height)
    }

    fn generate_chunk(
        &self,
        tier: u32,
        grid: &mut GridIndex,
        _sink: &mut dyn DecorationSink,
    ) -> ChunkReport {
        let bounds = self.chunk_bounds(tier);
        grid.extend_bounds(bounds);

        let mut report = ChunkReport {
            tier,
            bounds,
            ..ChunkReport::default()
        };
        for (index, cell) in bounds.iter().enumerate() {
            let content = if tier == 0 {
                self.cells[index]
            } else {
                Some(MaterialKind::Stone)
            };
            match content {
                None => report.empty_cells += 1,
                Some(kind) => {
                    match kind {
                        MaterialKind::Mud => report.mud_cells += 1,
                        MaterialKind::Stone => report.stone_cells += 1,
                        _ => report.ore_cells += 1,
                    }
                    grid.set_solid(cell, kind);
                }
            }
        }
        report
    }
}

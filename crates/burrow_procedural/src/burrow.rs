//! # Starter Burrow
//!
//! Tier 0 only: a round opening near the top of the chunk and a random-walk
//! tunnel leading down from it. Everything carved here is empty, walkable
//! and excluded from vein placement.

use rand::Rng;

use burrow_core::CellCoord;

use crate::chunk::ChunkBuffer;
use crate::config::BurrowConfig;

/// Center of the opening for a chunk.
#[must_use]
pub fn burrow_center(buffer: &ChunkBuffer, config: &BurrowConfig) -> CellCoord {
    let bounds = buffer.bounds();
    CellCoord::new(
        bounds.min_x + (bounds.width() / 2) as i32,
        bounds.min_y + config.center_depth as i32,
    )
}

/// Carves the opening and the tunnel. Returns the number of cells carved.
pub fn carve_starter_burrow<R: Rng + ?Sized>(
    buffer: &mut ChunkBuffer,
    rng: &mut R,
    config: &BurrowConfig,
) -> usize {
    let center = burrow_center(buffer, config);
    let mut carved = 0;
    let mut carve = |buffer: &mut ChunkBuffer, cell: CellCoord| {
        if let Some(index) = buffer.index_of(cell) {
            if !buffer.is_carved(index) {
                buffer.carve(index);
                carved += 1;
            }
        }
    };

    let r = config.radius as i32;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                carve(buffer, center.offset(dx, dy));
            }
        }
    }

    // tunnel: mostly down, sometimes sideways, never into the chunk rim
    let bounds = buffer.bounds();
    let (left, right) = (bounds.min_x + 1, bounds.max_x - 2);
    let bottom = bounds.max_y - 2;
    let mut cursor = center.offset(0, r);
    for _ in 0..config.tunnel_length {
        let next = if rng.gen_bool(config.lateral_chance) {
            let dx = if rng.gen_bool(0.5) { -1 } else { 1 };
            cursor.offset(dx, 0)
        } else {
            cursor.offset(0, 1)
        };
        if next.x < left || next.x > right || next.y > bottom {
            continue;
        }
        cursor = next;
        carve(buffer, cursor);
    }
    carved
}

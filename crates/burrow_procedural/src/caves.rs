//! # Pocket Automaton
//!
//! Carves mud pockets into stone with a cellular automaton on a private
//! rock/pocket mask:
//!
//! - the mask starts random (`initial_rock_chance` per cell)
//! - rows in the surface band are rock and stay rock
//! - neighbors outside the chunk count as rock
//! - rock survives with `>= death_limit` rock neighbors (of 8)
//! - a pocket fills in with `> birth_limit` rock neighbors
//!
//! Pocket cells that hold stone at the end become mud. Ore and empty cells
//! are never touched.

use rand::Rng;

use burrow_core::MaterialKind;

use crate::chunk::ChunkBuffer;
use crate::config::CaveConfig;

/// Runs the automaton and softens the resulting pockets. Returns the number
/// of cells turned to mud.
pub fn soften_pockets<R: Rng + ?Sized>(
    buffer: &mut ChunkBuffer,
    rng: &mut R,
    config: &CaveConfig,
    initial_rock_chance: f64,
) -> usize {
    let band = config.surface_band as usize;
    let width = buffer.width().max(1);
    let in_band = |index: usize| index / width < band;

    let mut rock: Vec<bool> = (0..buffer.len())
        .map(|index| in_band(index) || rng.gen_bool(initial_rock_chance.clamp(0.0, 1.0)))
        .collect();

    let mut next = rock.clone();
    for _ in 0..config.generations {
        for index in 0..buffer.len() {
            if in_band(index) {
                next[index] = true;
                continue;
            }
            let neighbors = rock_neighbors(buffer, &rock, index);
            next[index] = if rock[index] {
                neighbors >= config.death_limit
            } else {
                neighbors > config.birth_limit
            };
        }
        std::mem::swap(&mut rock, &mut next);
    }

    let mut softened = 0;
    for (index, is_rock) in rock.iter().enumerate() {
        if !is_rock && buffer.get(index) == Some(MaterialKind::Stone) {
            buffer.set(index, Some(MaterialKind::Mud));
            softened += 1;
        }
    }
    softened
}

fn rock_neighbors(buffer: &ChunkBuffer, rock: &[bool], index: usize) -> u32 {
    let (column, row) = buffer.local(index);
    let (column, row) = (column as i64, row as i64);
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let solid = buffer
                .local_index(column + dx, row + dy)
                .map_or(true, |n| rock[n]);
            count += u32::from(solid);
        }
    }
    count
}

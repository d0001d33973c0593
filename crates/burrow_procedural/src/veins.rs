//! # Vein Pass
//!
//! Grows ore veins inside the stone region.
//!
//! ```text
//! target = round(stone_cells * ore / (stone + ore))
//! while placed < target:
//!     seed  = random stone cell (plain stone, never carved)
//!     size  = random in tier vein range
//!     kind  = depth-weighted ore pick
//!     grow: frontier = [seed]
//!           pop random member -> ore if still plain stone
//!           each plain-stone neighbor joins with p = clumpiness
//!           frontier longer than max_frontier -> drop oldest
//! ```
//!
//! Only plain stone ever becomes ore. Seeding attempts are capped, so a
//! target that cannot be met still terminates.

use std::collections::{HashSet, VecDeque};

use rand::Rng;

use crate::chunk::ChunkBuffer;
use crate::config::VeinConfig;
use crate::tiers::TierParams;

/// Result of the vein pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VeinOutcome {
    /// Veins that converted at least one cell.
    pub veins_placed: usize,
    /// Cells converted to ore.
    pub ore_cells: usize,
    /// Ore cells aimed for.
    pub target: usize,
    /// Seeding stopped on the attempt cap.
    pub cap_hit: bool,
}

/// Ore cells to aim for given the stone available.
#[must_use]
pub fn ore_target(stone_cells: usize, params: &TierParams) -> usize {
    (stone_cells as f64 * params.ratios.ore_share()).round() as usize
}

/// Places veins seeded from `stone_cells` (buffer indices).
pub fn place_veins<R: Rng + ?Sized>(
    buffer: &mut ChunkBuffer,
    rng: &mut R,
    params: &TierParams,
    config: &VeinConfig,
    stone_cells: &[usize],
) -> VeinOutcome {
    let mut outcome = VeinOutcome {
        target: ore_target(stone_cells.len(), params),
        ..VeinOutcome::default()
    };
    if outcome.target == 0 || stone_cells.is_empty() {
        return outcome;
    }

    let mut attempts = 0u32;
    while outcome.ore_cells < outcome.target {
        attempts += 1;
        if attempts > config.max_seed_attempts {
            outcome.cap_hit = true;
            tracing::warn!(
                tier = params.tier,
                placed = outcome.ore_cells,
                target = outcome.target,
                "vein pass hit its seeding cap"
            );
            break;
        }

        let seed = stone_cells[rng.gen_range(0..stone_cells.len())];
        if !buffer.is_plain_stone(seed) {
            continue;
        }
        let size = rng.gen_range(params.vein_size.clone()) as usize;
        let kind = params.ore_weights.pick(rng);
        let budget = size.min(outcome.target - outcome.ore_cells);

        let grown = grow_vein(buffer, rng, config, seed, kind, budget);
        if grown > 0 {
            outcome.veins_placed += 1;
            outcome.ore_cells += grown;
        }
    }
    outcome
}

fn grow_vein<R: Rng + ?Sized>(
    buffer: &mut ChunkBuffer,
    rng: &mut R,
    config: &VeinConfig,
    seed: usize,
    kind: burrow_core::MaterialKind,
    budget: usize,
) -> usize {
    let mut frontier = VecDeque::from([seed]);
    let mut queued = HashSet::from([seed]);
    let mut grown = 0;

    while grown < budget {
        let Some(index) = frontier.swap_remove_back(rng.gen_range(0..frontier.len().max(1))) else {
            break;
        };
        if !buffer.is_plain_stone(index) {
            continue;
        }
        buffer.set(index, Some(kind));
        grown += 1;

        let (column, row) = buffer.local(index);
        let (column, row) = (column as i64, row as i64);
        for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
            let Some(next) = buffer.local_index(column + dx, row + dy) else {
                continue;
            };
            if buffer.is_plain_stone(next) && !queued.contains(&next) && rng.gen_bool(config.clumpiness) {
                queued.insert(next);
                frontier.push_back(next);
            }
        }
        while frontier.len() > config.max_frontier {
            frontier.pop_front();
        }
    }
    grown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use burrow_core::{CellCoord, GridBounds, MaterialKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn half_stone() -> ChunkBuffer {
        let mut buffer = ChunkBuffer::new(GridBounds::from_origin(CellCoord::new(0, 0), 40, 40));
        for index in 0..buffer.len() {
            if buffer.local(index).0 < 20 {
                buffer.set(index, Some(MaterialKind::Stone));
            }
        }
        buffer
    }

    #[test]
    fn test_veins_stay_inside_stone() {
        let mut buffer = half_stone();
        for index in (0..buffer.len()).step_by(5) {
            if buffer.local(index).0 < 20 {
                buffer.carve(index);
            }
        }
        let stone = buffer.stone_indices();
        let params = TierParams::for_tier(&GenerationConfig::default(), 0);
        let outcome = place_veins(&mut buffer, &mut ChaCha8Rng::seed_from_u64(6), &params, &VeinConfig::default(), &stone);

        assert!(outcome.veins_placed > 0);
        assert_eq!(outcome.ore_cells, outcome.target, "enough stone to meet the target");
        for index in 0..buffer.len() {
            let is_ore = buffer.get(index).is_some_and(MaterialKind::is_ore);
            if is_ore {
                assert!(buffer.local(index).0 < 20, "ore outside the stone half");
                assert!(!buffer.is_carved(index), "ore in a carved cell");
            }
        }
        assert_eq!(buffer.counts().ore, outcome.ore_cells);
    }

    #[test]
    fn test_no_stone_no_veins() {
        let mut buffer = ChunkBuffer::new(GridBounds::from_origin(CellCoord::new(0, 0), 10, 10));
        let params = TierParams::for_tier(&GenerationConfig::default(), 0);
        let outcome = place_veins(&mut buffer, &mut ChaCha8Rng::seed_from_u64(1), &params, &VeinConfig::default(), &[]);
        assert_eq!(outcome, VeinOutcome::default());
    }

    #[test]
    fn test_unreachable_target_hits_cap() {
        // every listed seed is mud, so no vein can ever start
        let mut buffer = ChunkBuffer::new(GridBounds::from_origin(CellCoord::new(0, 0), 10, 10));
        let seeds: Vec<usize> = (0..100).collect();
        let params = TierParams::for_tier(&GenerationConfig::default(), 0);
        let config = VeinConfig {
            max_seed_attempts: 64,
            ..VeinConfig::default()
        };
        let outcome = place_veins(&mut buffer, &mut ChaCha8Rng::seed_from_u64(1), &params, &config, &seeds);
        assert!(outcome.cap_hit);
        assert_eq!(outcome.ore_cells, 0);
    }
}

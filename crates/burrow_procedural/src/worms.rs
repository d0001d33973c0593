//! # Worm Pass
//!
//! Self-avoiding random walks that soften discs of stone into mud. Worms add
//! texture to the stone mass; they never carve walkable space.
//!
//! Each worm keeps a float heading that drifts downward, occasionally picks
//! a fresh heading, and may spawn one branch. A worm stops when its length
//! runs out, it leaves the chunk, it boxes itself in, or it hits the step
//! cap.

use std::collections::HashSet;
use std::f64::consts::TAU;

use rand::Rng;

use burrow_core::MaterialKind;

use crate::chunk::ChunkBuffer;
use crate::config::WormConfig;

/// Result of the worm pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WormOutcome {
    /// Worms walked, branches included.
    pub worms: usize,
    /// Stone cells turned to mud.
    pub cells_softened: usize,
    /// Some worm stopped on the step cap.
    pub cap_hit: bool,
}

struct Worm {
    column: f64,
    row: f64,
    heading: (f64, f64),
    length: u32,
    radius: u32,
    may_branch: bool,
}

/// Runs `count` worms through the buffer.
pub fn run_worms<R: Rng + ?Sized>(
    buffer: &mut ChunkBuffer,
    rng: &mut R,
    config: &WormConfig,
    count: u32,
) -> WormOutcome {
    let mut outcome = WormOutcome::default();
    if buffer.is_empty() {
        return outcome;
    }

    let mut pending: Vec<Worm> = (0..count)
        .map(|_| Worm {
            column: rng.gen_range(0..buffer.width()) as f64,
            row: rng.gen_range(0..buffer.height()) as f64,
            heading: random_heading(rng, config.downward_bias),
            length: rng.gen_range(config.min_length..=config.max_length),
            radius: rng.gen_range(config.min_radius..=config.max_radius),
            may_branch: true,
        })
        .collect();

    while let Some(worm) = pending.pop() {
        outcome.worms += 1;
        let branch = walk(buffer, rng, config, worm, &mut outcome);
        pending.extend(branch);
    }

    if outcome.cap_hit {
        tracing::warn!(worms = outcome.worms, "worm pass hit its step cap");
    }
    outcome
}

/// Walks one worm; returns its branch, if it spawned one.
fn walk<R: Rng + ?Sized>(
    buffer: &mut ChunkBuffer,
    rng: &mut R,
    config: &WormConfig,
    mut worm: Worm,
    outcome: &mut WormOutcome,
) -> Option<Worm> {
    let mut visited: HashSet<usize> = HashSet::new();
    let mut branch = None;
    let mut steps = 0u32;
    let mut attempts = 0u32;

    let Some(start) = buffer.local_index(worm.column as i64, worm.row as i64) else {
        return None;
    };
    visited.insert(start);
    outcome.cells_softened += soften_disc(buffer, start, worm.radius);

    while steps < worm.length {
        attempts += 1;
        if attempts > config.step_cap {
            outcome.cap_hit = true;
            break;
        }

        if rng.gen_bool(config.turn_chance) {
            worm.heading = random_heading(rng, config.downward_bias);
        }
        let (dx, dy) = normalize(worm.heading.0, worm.heading.1 + config.downward_bias * 0.1);
        worm.heading = (dx, dy);

        let column = worm.column + dx;
        let row = worm.row + dy;
        let Some(index) = buffer.local_index(column.round() as i64, row.round() as i64) else {
            break;
        };
        let here = buffer.local_index(worm.column.round() as i64, worm.row.round() as i64);
        if Some(index) != here && visited.contains(&index) {
            // boxed in by its own trail: try a new heading
            worm.heading = random_heading(rng, config.downward_bias);
            continue;
        }

        worm.column = column;
        worm.row = row;
        steps += 1;
        if visited.insert(index) {
            outcome.cells_softened += soften_disc(buffer, index, worm.radius);
        }

        if worm.may_branch && branch.is_none() && rng.gen_bool(config.branch_chance) {
            branch = Some(Worm {
                column: worm.column,
                row: worm.row,
                heading: random_heading(rng, config.downward_bias),
                length: (worm.length - steps) / 2,
                radius: worm.radius.saturating_sub(1).max(config.min_radius),
                may_branch: false,
            });
        }
    }
    branch
}

fn random_heading<R: Rng + ?Sized>(rng: &mut R, downward_bias: f64) -> (f64, f64) {
    let angle = rng.gen_range(0.0..TAU);
    normalize(angle.cos(), angle.sin() + downward_bias)
}

fn normalize(x: f64, y: f64) -> (f64, f64) {
    let len = (x * x + y * y).sqrt();
    if len < 1e-9 {
        (0.0, 1.0)
    } else {
        (x / len, y / len)
    }
}

/// Turns stone within `radius` of the cell into mud.
fn soften_disc(buffer: &mut ChunkBuffer, center: usize, radius: u32) -> usize {
    let (column, row) = buffer.local(center);
    let (column, row) = (column as i64, row as i64);
    let r = i64::from(radius);
    let mut softened = 0;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            if let Some(index) = buffer.local_index(column + dx, row + dy) {
                if buffer.get(index) == Some(MaterialKind::Stone) {
                    buffer.set(index, Some(MaterialKind::Mud));
                    softened += 1;
                }
            }
        }
    }
    softened
}

//! # Sensing
//!
//! A periodic disc scan around the agent that remembers where ore and stone
//! are. Each scan replaces the previous memory wholesale; nothing is merged
//! and nothing decays.

use burrow_core::{CellCoord, MaterialClass, World};

use crate::config::OreGoalPreference;

/// Resource cells seen by the last scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SensedResources {
    /// Ore cells, row-major scan order.
    pub ores: Vec<CellCoord>,
    /// Stone cells, row-major scan order.
    pub stones: Vec<CellCoord>,
}

impl SensedResources {
    /// Scans the disc of `radius` around `center`.
    #[must_use]
    pub fn scan(world: &World, center: CellCoord, radius: u32) -> Self {
        let r = radius as i32;
        let mut sensed = Self::default();
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let cell = center.offset(dx, dy);
                match world.class_of(cell) {
                    Some(MaterialClass::Ore) => sensed.ores.push(cell),
                    Some(MaterialClass::Hard) => sensed.stones.push(cell),
                    Some(MaterialClass::Soft) | None => {}
                }
            }
        }
        sensed
    }

    /// True when nothing was sensed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ores.is_empty() && self.stones.is_empty()
    }

    /// Best remembered ore that is still ore.
    #[must_use]
    pub fn ore_goal(&self, world: &World, from: CellCoord, preference: OreGoalPreference) -> Option<CellCoord> {
        let mut best: Option<(CellCoord, u32, u32)> = None;
        for cell in &self.ores {
            if world.class_of(*cell) != Some(MaterialClass::Ore) {
                continue;
            }
            let value = world.value(*cell);
            let distance = cell.manhattan(from);
            let better = match best {
                None => true,
                Some((_, best_value, best_distance)) => match preference {
                    OreGoalPreference::MostValuable => {
                        value > best_value || (value == best_value && distance < best_distance)
                    }
                    OreGoalPreference::Nearest => {
                        distance < best_distance || (distance == best_distance && value > best_value)
                    }
                },
            };
            if better {
                best = Some((*cell, value, distance));
            }
        }
        best.map(|(cell, _, _)| cell)
    }

    /// Nearest remembered stone that is still stone.
    #[must_use]
    pub fn stone_goal(&self, world: &World, from: CellCoord) -> Option<CellCoord> {
        let mut best: Option<(CellCoord, u32)> = None;
        for cell in &self.stones {
            if world.class_of(*cell) != Some(MaterialClass::Hard) {
                continue;
            }
            let distance = cell.manhattan(from);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((*cell, distance));
            }
        }
        best.map(|(cell, _)| cell)
    }
}

//! # Tier Parameters
//!
//! Everything that scales with depth, derived from the config and the tier
//! index alone.

use std::ops::RangeInclusive;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use burrow_core::MaterialKind;

use crate::config::{GenerationConfig, OreWeightConfig, RatioConfig};

/// Normalized mud/stone/ore split of one tier. Sums to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierRatios {
    /// Mud fraction.
    pub mud: f64,
    /// Stone fraction.
    pub stone: f64,
    /// Ore fraction.
    pub ore: f64,
}

impl TierRatios {
    /// Split used when the configured one collapses to zero.
    pub const FALLBACK: Self = Self {
        mud: 0.45,
        stone: 0.45,
        ore: 0.10,
    };

    /// Base ratios shifted by `tier * delta`, clamped, then normalized.
    #[must_use]
    pub fn for_tier(config: &RatioConfig, tier: u32) -> Self {
        let t = f64::from(tier);
        let shift = |base: f64, delta: f64, floor: f64, ceiling: f64| {
            (base + t * delta).clamp(floor, ceiling.max(floor))
        };
        let mud = shift(config.base.mud, config.per_tier_delta.mud, config.floor.mud, config.ceiling.mud);
        let stone = shift(
            config.base.stone,
            config.per_tier_delta.stone,
            config.floor.stone,
            config.ceiling.stone,
        );
        let ore = shift(config.base.ore, config.per_tier_delta.ore, config.floor.ore, config.ceiling.ore);

        let sum = mud + stone + ore;
        if !sum.is_finite() || sum < 1e-6 {
            tracing::debug!(tier, "degenerate tier ratios, using fallback split");
            return Self::FALLBACK;
        }
        Self {
            mud: mud / sum,
            stone: stone / sum,
            ore: ore / sum,
        }
    }

    /// Stone + ore: the share of cells that start as stone.
    #[inline]
    #[must_use]
    pub fn solid_fraction(&self) -> f64 {
        self.stone + self.ore
    }

    /// Share of the hard region that becomes ore. 0 when there is none.
    #[must_use]
    pub fn ore_share(&self) -> f64 {
        let hard = self.solid_fraction();
        if hard <= 0.0 {
            0.0
        } else {
            self.ore / hard
        }
    }
}

/// Depth-weighted ore choice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OreWeights([f64; 5]);

impl OreWeights {
    /// Weights interpolated between the shallow and deep tables.
    #[must_use]
    pub fn at_tier(config: &OreWeightConfig, tier: u32) -> Self {
        let depth = if config.full_depth_tier == 0 {
            1.0
        } else {
            (f64::from(tier) / f64::from(config.full_depth_tier)).min(1.0)
        };
        let shallow = config.shallow.values();
        let deep = config.deep.values();
        let mut weights = [0.0; 5];
        for (i, weight) in weights.iter_mut().enumerate() {
            *weight = shallow[i] + (deep[i] - shallow[i]) * depth;
        }
        Self(weights)
    }

    /// Weight of each ore in `MaterialKind::ORES` order.
    #[must_use]
    pub const fn weights(&self) -> [f64; 5] {
        self.0
    }

    /// Draws an ore kind. All-zero weights yield copper.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> MaterialKind {
        match WeightedIndex::new(self.0) {
            Ok(dist) => MaterialKind::ORES[dist.sample(rng)],
            Err(_) => MaterialKind::Copper,
        }
    }
}

/// Everything a chunk generator needs to know about its tier.
#[derive(Clone, Debug, PartialEq)]
pub struct TierParams {
    /// Tier index.
    pub tier: u32,
    /// Material split.
    pub ratios: TierRatios,
    /// Vein size range.
    pub vein_size: RangeInclusive<u32>,
    /// Chance a cell starts as rock in the pocket automaton.
    pub initial_rock_chance: f64,
    /// Worms per chunk.
    pub worm_count: u32,
    /// Ore kind weights.
    pub ore_weights: OreWeights,
}

impl TierParams {
    /// Derives the parameters of `tier`.
    #[must_use]
    pub fn for_tier(config: &GenerationConfig, tier: u32) -> Self {
        let t = f64::from(tier);

        let veins = &config.veins;
        let cap = veins.size_cap.max(veins.min_size);
        let grow = veins.size_per_tier.saturating_mul(tier);
        let min = veins.min_size.saturating_add(grow).min(cap);
        let max = veins.max_size.saturating_add(grow).min(cap).max(min);

        let caves = &config.caves;
        let initial_rock_chance = (caves.initial_rock_chance + t * caves.rock_chance_per_tier)
            .max(caves.min_rock_chance)
            .clamp(0.0, 1.0);

        let worms = &config.worms;
        let worm_count =
            (f64::from(worms.base_count) + t * worms.count_per_tier).floor().max(0.0) as u32;

        Self {
            tier,
            ratios: TierRatios::for_tier(&config.ratios, tier),
            vein_size: min..=max,
            initial_rock_chance,
            worm_count: worm_count.min(worms.max_count),
            ore_weights: OreWeights::at_tier(&config.ore_weights, tier),
        }
    }
}

//! # Generation Config
//!
//! Seed-independent tuning for every pass. Every struct is
//! `#[serde(default)]`, so a TOML file only needs the keys it changes.

use serde::{Deserialize, Serialize};

use burrow_core::{BurrowError, BurrowResult};

/// Top-level generation tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Chunk width in cells.
    pub chunk_width: u32,
    /// Chunk height in cells; tier `t` covers rows `[t*h, (t+1)*h)`.
    pub chunk_height: u32,
    /// Leftmost column of every chunk.
    pub origin_x: i32,
    /// Material ratios per tier.
    pub ratios: RatioConfig,
    /// Noise field for the stone/mud split.
    pub noise: NoiseConfig,
    /// Pocket automaton.
    pub caves: CaveConfig,
    /// Worm tunnels.
    pub worms: WormConfig,
    /// Tier-0 starter burrow.
    pub burrow: BurrowConfig,
    /// Ore veins.
    pub veins: VeinConfig,
    /// Depth-weighted ore choice.
    pub ore_weights: OreWeightConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            chunk_width: 64,
            chunk_height: 64,
            origin_x: -32,
            ratios: RatioConfig::default(),
            noise: NoiseConfig::default(),
            caves: CaveConfig::default(),
            worms: WormConfig::default(),
            burrow: BurrowConfig::default(),
            veins: VeinConfig::default(),
            ore_weights: OreWeightConfig::default(),
        }
    }
}

/// Mud/stone/ore fractions. Not necessarily normalized.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioTriple {
    /// Mud share.
    pub mud: f64,
    /// Stone share.
    pub stone: f64,
    /// Ore share.
    pub ore: f64,
}

impl RatioTriple {
    /// Creates a triple.
    #[must_use]
    pub const fn new(mud: f64, stone: f64, ore: f64) -> Self {
        Self { mud, stone, ore }
    }

    /// Sum of the three shares.
    #[must_use]
    pub fn sum(self) -> f64 {
        self.mud + self.stone + self.ore
    }

    fn values(self) -> [f64; 3] {
        [self.mud, self.stone, self.ore]
    }
}

impl Default for RatioTriple {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// How the material split changes with depth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioConfig {
    /// Shares at tier 0.
    pub base: RatioTriple,
    /// Added once per tier.
    pub per_tier_delta: RatioTriple,
    /// Lower clamp applied before normalization.
    pub floor: RatioTriple,
    /// Upper clamp applied before normalization.
    pub ceiling: RatioTriple,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self {
            base: RatioTriple::new(0.45, 0.45, 0.10),
            per_tier_delta: RatioTriple::new(-0.03, 0.015, 0.015),
            floor: RatioTriple::new(0.10, 0.20, 0.05),
            ceiling: RatioTriple::new(0.80, 0.70, 0.30),
        }
    }
}

/// Noise field sampled by the threshold pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Cell-to-noise coordinate scale.
    pub scale: f64,
    /// Fractal layers.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale: 0.08,
            octaves: 3,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Cellular automaton that turns stone pockets into mud.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Chance a cell starts as rock at tier 0.
    pub initial_rock_chance: f64,
    /// Added per tier (negative means more pockets deeper).
    pub rock_chance_per_tier: f64,
    /// Lower bound for the per-tier chance.
    pub min_rock_chance: f64,
    /// Automaton generations.
    pub generations: u32,
    /// A pocket turns to rock with more than this many rock neighbors.
    pub birth_limit: u32,
    /// Rock stays rock with at least this many rock neighbors.
    pub death_limit: u32,
    /// Rows at the top of each chunk that always stay rock.
    pub surface_band: u32,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            initial_rock_chance: 0.60,
            rock_chance_per_tier: -0.01,
            min_rock_chance: 0.45,
            generations: 4,
            birth_limit: 4,
            death_limit: 3,
            surface_band: 6,
        }
    }
}

/// Self-avoiding random walks that soften stone to mud.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WormConfig {
    /// Worms at tier 0.
    pub base_count: u32,
    /// Extra worms per tier (fractional, floored).
    pub count_per_tier: f64,
    /// Upper bound on worms per chunk.
    pub max_count: u32,
    /// Shortest worm, in steps.
    pub min_length: u32,
    /// Longest worm, in steps.
    pub max_length: u32,
    /// Smallest softening radius.
    pub min_radius: u32,
    /// Largest softening radius.
    pub max_radius: u32,
    /// Chance per step to pick a new heading.
    pub turn_chance: f64,
    /// Downward pull added to the heading each step.
    pub downward_bias: f64,
    /// Chance per step to spawn the worm's single branch.
    pub branch_chance: f64,
    /// Hard cap on steps attempted by one worm, retries included.
    pub step_cap: u32,
}

impl Default for WormConfig {
    fn default() -> Self {
        Self {
            base_count: 2,
            count_per_tier: 0.5,
            max_count: 6,
            min_length: 16,
            max_length: 48,
            min_radius: 1,
            max_radius: 2,
            turn_chance: 0.25,
            downward_bias: 0.4,
            branch_chance: 0.05,
            step_cap: 512,
        }
    }
}

/// Empty opening carved into tier 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurrowConfig {
    /// Opening radius.
    pub radius: u32,
    /// Rows from the chunk top to the opening center.
    pub center_depth: u32,
    /// Tunnel steps below the opening.
    pub tunnel_length: u32,
    /// Chance per tunnel step to move sideways instead of down.
    pub lateral_chance: f64,
}

impl Default for BurrowConfig {
    fn default() -> Self {
        Self {
            radius: 4,
            center_depth: 8,
            tunnel_length: 20,
            lateral_chance: 0.35,
        }
    }
}

/// Ore vein growth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VeinConfig {
    /// Smallest vein at tier 0.
    pub min_size: u32,
    /// Largest vein at tier 0.
    pub max_size: u32,
    /// Added to both bounds per tier.
    pub size_per_tier: u32,
    /// Upper bound on vein size at any depth.
    pub size_cap: u32,
    /// Chance a stone neighbor joins the growth frontier.
    pub clumpiness: f64,
    /// Growth frontier length; oldest entries are trimmed past it.
    pub max_frontier: usize,
    /// Vein seeding attempts per chunk before giving up.
    pub max_seed_attempts: u32,
}

impl Default for VeinConfig {
    fn default() -> Self {
        Self {
            min_size: 4,
            max_size: 9,
            size_per_tier: 1,
            size_cap: 24,
            clumpiness: 0.65,
            max_frontier: 24,
            max_seed_attempts: 4096,
        }
    }
}

/// Per-ore weights, ascending rarity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OreTable {
    /// Copper weight.
    pub copper: f64,
    /// Iron weight.
    pub iron: f64,
    /// Silver weight.
    pub silver: f64,
    /// Gold weight.
    pub gold: f64,
    /// Diamond weight.
    pub diamond: f64,
}

impl OreTable {
    /// Creates a table.
    #[must_use]
    pub const fn new(copper: f64, iron: f64, silver: f64, gold: f64, diamond: f64) -> Self {
        Self {
            copper,
            iron,
            silver,
            gold,
            diamond,
        }
    }

    /// Weights in `MaterialKind::ORES` order.
    #[must_use]
    pub const fn values(&self) -> [f64; 5] {
        [self.copper, self.iron, self.silver, self.gold, self.diamond]
    }
}

impl Default for OreTable {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0, 1.0)
    }
}

/// Ore weights interpolated between a shallow and a deep table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OreWeightConfig {
    /// Weights at tier 0.
    pub shallow: OreTable,
    /// Weights at `full_depth_tier` and below.
    pub deep: OreTable,
    /// Tier where the deep table is reached.
    pub full_depth_tier: u32,
}

impl Default for OreWeightConfig {
    fn default() -> Self {
        Self {
            shallow: OreTable::new(60.0, 25.0, 10.0, 4.0, 1.0),
            deep: OreTable::new(15.0, 20.0, 25.0, 22.0, 18.0),
            full_depth_tier: 12,
        }
    }
}

fn invalid(message: impl Into<String>) -> BurrowError {
    BurrowError::InvalidConfig(message.into())
}

fn check_probability(name: &str, value: f64) -> BurrowResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be within [0, 1], got {value}")))
    }
}

impl GenerationConfig {
    /// Checks value ranges.
    ///
    /// Ratio triples that sum to zero are accepted; they fall back to the
    /// default split when a tier is computed.
    ///
    /// # Errors
    ///
    /// `BurrowError::InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> BurrowResult<()> {
        let burrow_span = 2 * self.burrow.radius + 3;
        if self.chunk_width < burrow_span.max(8) || self.chunk_height < 8 {
            return Err(invalid(format!(
                "chunk must be at least {}x8 cells, got {}x{}",
                burrow_span.max(8),
                self.chunk_width,
                self.chunk_height
            )));
        }
        if self.burrow.center_depth + self.burrow.radius + 2 > self.chunk_height {
            return Err(invalid("starter burrow does not fit in the first chunk"));
        }

        let r = &self.ratios;
        for (name, triple) in [
            ("ratios.base", r.base),
            ("ratios.floor", r.floor),
            ("ratios.ceiling", r.ceiling),
        ] {
            if triple.values().iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(invalid(format!("{name} must be finite and non-negative")));
            }
        }
        if r.per_tier_delta.values().iter().any(|v| !v.is_finite()) {
            return Err(invalid("ratios.per_tier_delta must be finite"));
        }
        for (floor, ceiling) in r.floor.values().into_iter().zip(r.ceiling.values()) {
            if floor > ceiling {
                return Err(invalid("ratios.floor must not exceed ratios.ceiling"));
            }
        }

        let n = &self.noise;
        if !(n.scale.is_finite() && n.scale > 0.0) || n.octaves == 0 {
            return Err(invalid("noise.scale must be positive and noise.octaves at least 1"));
        }

        let c = &self.caves;
        check_probability("caves.initial_rock_chance", c.initial_rock_chance)?;
        check_probability("caves.min_rock_chance", c.min_rock_chance)?;
        if c.birth_limit > 8 || c.death_limit > 8 {
            return Err(invalid("cave neighbor limits must be at most 8"));
        }

        let w = &self.worms;
        check_probability("worms.turn_chance", w.turn_chance)?;
        check_probability("worms.branch_chance", w.branch_chance)?;
        if w.min_length > w.max_length || w.min_radius > w.max_radius {
            return Err(invalid("worm length/radius ranges are inverted"));
        }

        check_probability("burrow.lateral_chance", self.burrow.lateral_chance)?;

        let v = &self.veins;
        check_probability("veins.clumpiness", v.clumpiness)?;
        if v.min_size == 0 || v.min_size > v.max_size || v.max_frontier == 0 {
            return Err(invalid("vein sizes must satisfy 1 <= min_size <= max_size"));
        }

        let o = &self.ore_weights;
        for table in [o.shallow, o.deep] {
            if table.values().iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(invalid("ore weights must be finite and non-negative"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(GenerationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_ratios_are_accepted() {
        let mut config = GenerationConfig::default();
        config.ratios.base = RatioTriple::new(0.0, 0.0, 0.0);
        config.ratios.floor = RatioTriple::default();
        assert!(config.validate().is_ok(), "degenerate ratios fall back later");
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = GenerationConfig::default();
        config.veins.clumpiness = 1.5;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.chunk_width = 4;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::default();
        config.ratios.floor.ore = 0.9;
        assert!(config.validate().is_err(), "floor above ceiling");

        let mut config = GenerationConfig::default();
        config.noise.scale = 0.0;
        assert!(config.validate().is_err());
    }
}

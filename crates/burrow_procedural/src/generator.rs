//! # Terrain Generator
//!
//! Runs the passes for one tier and hands the result to the world.
//!
//! ```text
//! TierParams::for_tier
//!   -> threshold::split_by_noise     (Noise stream via SimplexNoise seed)
//!   -> caves::soften_pockets         (Caves stream)
//!   -> worms::run_worms              (Worms stream)
//!   -> collect stone seeds
//!   -> burrow::carve_starter_burrow  (Burrow stream, tier 0 only)
//!   -> veins::place_veins            (Veins stream)
//! ```

use burrow_core::{
    BurrowResult, CellCoord, ChunkReport, DecorationSink, GridBounds, GridIndex, TerrainSource,
};

use crate::burrow::{burrow_center, carve_starter_burrow};
use crate::caves::soften_pockets;
use crate::chunk::ChunkBuffer;
use crate::config::GenerationConfig;
use crate::noise::{GenPhase, SimplexNoise, WorldSeed};
use crate::threshold::split_by_noise;
use crate::tiers::TierParams;
use crate::veins::place_veins;
use crate::worms::run_worms;

/// Deterministic chunk producer.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    seed: WorldSeed,
    config: GenerationConfig,
}

impl TerrainGenerator {
    /// Creates a generator after validating the config.
    ///
    /// # Errors
    ///
    /// `BurrowError::InvalidConfig` when the config fails validation.
    pub fn new(seed: WorldSeed, config: GenerationConfig) -> BurrowResult<Self> {
        config.validate()?;
        Ok(Self { seed, config })
    }

    /// World seed.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Generation config.
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Region of a tier.
    #[must_use]
    pub fn bounds_of(&self, tier: u32) -> GridBounds {
        let height = self.config.chunk_height;
        GridBounds::from_origin(
            CellCoord::new(self.config.origin_x, (tier * height) as i32),
            self.config.chunk_width,
            height,
        )
    }

    /// Center of the tier-0 starter burrow.
    #[must_use]
    pub fn starter_burrow_center(&self) -> CellCoord {
        burrow_center(&ChunkBuffer::new(self.bounds_of(0)), &self.config.burrow)
    }

    /// Pure chunk content for `tier`, without touching any world.
    #[must_use]
    pub fn generate_buffer(&self, tier: u32) -> (ChunkBuffer, ChunkReport) {
        let params = TierParams::for_tier(&self.config, tier);
        let bounds = self.bounds_of(tier);
        let mut buffer = ChunkBuffer::new(bounds);

        let noise = SimplexNoise::new(self.seed.phase(GenPhase::Noise, tier));
        let threshold = split_by_noise(
            &mut buffer,
            &noise,
            &self.config.noise,
            params.ratios.solid_fraction(),
        );

        soften_pockets(
            &mut buffer,
            &mut self.seed.phase_rng(GenPhase::Caves, tier),
            &self.config.caves,
            params.initial_rock_chance,
        );

        let worms = run_worms(
            &mut buffer,
            &mut self.seed.phase_rng(GenPhase::Worms, tier),
            &self.config.worms,
            params.worm_count,
        );

        let stone_cells = buffer.stone_indices();

        if tier == 0 {
            carve_starter_burrow(
                &mut buffer,
                &mut self.seed.phase_rng(GenPhase::Burrow, tier),
                &self.config.burrow,
            );
        }

        let veins = place_veins(
            &mut buffer,
            &mut self.seed.phase_rng(GenPhase::Veins, tier),
            &params,
            &self.config.veins,
            &stone_cells,
        );

        let counts = buffer.counts();
        let report = ChunkReport {
            tier,
            bounds,
            threshold,
            stone_cells: counts.stone,
            ore_cells: counts.ore,
            mud_cells: counts.mud,
            empty_cells: counts.empty,
            veins_placed: veins.veins_placed,
            ore_target: veins.target,
            vein_cap_hit: veins.cap_hit,
            worm_cap_hit: worms.cap_hit,
        };
        tracing::debug!(
            tier,
            threshold,
            worms = worms.worms,
            softened = worms.cells_softened,
            ore_target = veins.target,
            "chunk passes finished"
        );
        (buffer, report)
    }
}

impl TerrainSource for TerrainGenerator {
    fn chunk_bounds(&self, tier: u32) -> GridBounds {
        self.bounds_of(tier)
    }

    fn generate_chunk(
        &self,
        tier: u32,
        grid: &mut GridIndex,
        sink: &mut dyn DecorationSink,
    ) -> ChunkReport {
        let (buffer, report) = self.generate_buffer(tier);
        buffer.write_into(grid);
        for cell in buffer.carved_cells() {
            sink.place_decoration_immediate(cell);
        }
        report
    }
}

//! # Threshold Pass
//!
//! Splits the chunk into stone and mud by an order statistic of a noise
//! field. The `k` highest samples become stone, where
//! `k = round(cells * (stone + ore))`, so the realized hard fraction matches
//! the target to within one cell whatever the noise distribution looks like.
//!
//! Ties are broken by cell index, which keeps `k` exact even when several
//! samples share the threshold value.

use crate::chunk::ChunkBuffer;
use crate::config::NoiseConfig;
use crate::noise::SimplexNoise;
use burrow_core::MaterialKind;

/// Fills the buffer with stone and mud. Returns the threshold sample, or
/// `f32::INFINITY` when no cell became stone.
pub fn split_by_noise(
    buffer: &mut ChunkBuffer,
    noise: &SimplexNoise,
    config: &NoiseConfig,
    solid_fraction: f64,
) -> f32 {
    let samples: Vec<f64> = (0..buffer.len())
        .map(|index| {
            let cell = buffer.cell_at(index);
            noise.octaved(
                f64::from(cell.x) * config.scale,
                f64::from(cell.y) * config.scale,
                config.octaves,
                config.persistence,
                config.lacunarity,
            )
        })
        .collect();

    let n = samples.len();
    let k = ((n as f64 * solid_fraction.clamp(0.0, 1.0)).round() as usize).min(n);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_unstable_by(|a, b| samples[*a].total_cmp(&samples[*b]).then(a.cmp(b)));

    let (soft, hard) = order.split_at(n - k);
    for index in soft {
        buffer.set(*index, Some(MaterialKind::Mud));
    }
    for index in hard {
        buffer.set(*index, Some(MaterialKind::Stone));
    }

    hard.first()
        .map_or(f32::INFINITY, |index| samples[*index] as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::WorldSeed;
    use burrow_core::{CellCoord, GridBounds};

    fn run(fraction: f64) -> (ChunkBuffer, f32) {
        let mut buffer = ChunkBuffer::new(GridBounds::from_origin(CellCoord::new(0, 0), 50, 40));
        let noise = SimplexNoise::new(WorldSeed::new(9));
        let threshold = split_by_noise(&mut buffer, &noise, &NoiseConfig::default(), fraction);
        (buffer, threshold)
    }

    #[test]
    fn test_exact_fraction() {
        for fraction in [0.0, 0.13, 0.5, 0.555, 1.0] {
            let (buffer, _) = run(fraction);
            let expected = (2000.0 * fraction).round() as usize;
            assert_eq!(buffer.counts().stone, expected, "fraction {fraction}");
            assert_eq!(buffer.counts().mud, 2000 - expected);
        }
    }

    #[test]
    fn test_no_stone_threshold() {
        let (_, threshold) = run(0.0);
        assert!(threshold.is_infinite());
    }
}

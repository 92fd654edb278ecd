//! Heightmap generation using fractal noise.

use crate::config::{ConfigError, TerrainConfig};
use crate::noise::FractalNoiseConfig;

use super::grid::HeightGrid;

/// Height of one cell before scaling, in `[0, 1]` for a validated config.
///
/// The base fBm layer is remapped from `[-1, 1]` to `[0, 1]` and blended
/// with a ridged layer `1 - |fbm|` sampled at a higher frequency and a
/// shifted seed, which sharpens crests into ridgelines.
fn normalized_height(noise: &FractalNoiseConfig, seed: u32, size: usize, x: usize, z: usize) -> f32 {
    // Sample pixel centers so the lattice corners, where noise is zero,
    // don't line up with grid cells.
    let u = (x as f32 + 0.5) / size as f32 * noise.base_cycles;
    let v = (z as f32 + 0.5) / size as f32 * noise.base_cycles;

    let base = (noise.sample(u, v, seed) + 1.0) * 0.5;
    let ridge = 1.0
        - noise
            .sample(
                u * noise.ridge_frequency,
                v * noise.ridge_frequency,
                seed.wrapping_add(noise.ridge_seed_offset),
            )
            .abs();

    base * (1.0 - noise.ridge_weight) + ridge * noise.ridge_weight
}

/// Overwrites every cell of `grid` with noise terrain.
///
/// # Arguments
/// * `grid` - Grid to fill; its own size is used, not `config.size`
/// * `config` - Source of the seed, noise shape and height scale
/// * `every_rows` - Rows between progress calls (0 is treated as 1)
/// * `on_rows` - Receives `(rows_done, total_rows)`, also after the last row
pub fn fill_heightmap<F>(
    grid: &mut HeightGrid,
    config: &TerrainConfig,
    every_rows: usize,
    mut on_rows: F,
) where
    F: FnMut(usize, usize),
{
    let size = grid.size();
    let seed = config.noise_seed();
    let every_rows = every_rows.max(1);
    let heights = grid.heights_mut();

    for z in 0..size {
        let row = &mut heights[z * size..(z + 1) * size];
        for (x, height) in row.iter_mut().enumerate() {
            *height = normalized_height(&config.noise, seed, size, x, z) * config.height_scale;
        }

        let done = z + 1;
        if done % every_rows == 0 || done == size {
            on_rows(done, size);
        }
    }
}

/// Generates a fresh heightmap for `config`.
///
/// # Errors
/// Any `ConfigError` from validating `config`.
pub fn generate_heightmap(config: &TerrainConfig) -> Result<HeightGrid, ConfigError> {
    generate_heightmap_with_progress(config, usize::MAX, |_, _| {})
}

/// Generates a fresh heightmap, reporting progress every `every_rows` rows.
pub fn generate_heightmap_with_progress<F>(
    config: &TerrainConfig,
    every_rows: usize,
    on_rows: F,
) -> Result<HeightGrid, ConfigError>
where
    F: FnMut(usize, usize),
{
    config.validate()?;
    let mut grid = HeightGrid::new(config.size)?;
    fill_heightmap(&mut grid, config, every_rows, on_rows);
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_heightmap() {
        let config = TerrainConfig::new(42, 64);
        let grid = generate_heightmap(&config).unwrap();

        assert_eq!(grid.size(), 64);
        let (min, max) = grid.height_range();
        assert!(min < max, "Heightmap should have variation");
        assert!(
            min >= 0.0 && max <= config.height_scale,
            "Heights [{}, {}] should stay within [0, height_scale]",
            min,
            max
        );
    }

    #[test]
    fn test_heightmap_reproducibility() {
        let config = TerrainConfig::new(999, 32);
        let a = generate_heightmap(&config).unwrap();
        let b = generate_heightmap(&config).unwrap();
        assert_eq!(a, b, "Same configuration should produce identical heights");
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_heightmap(&TerrainConfig::new(1, 32)).unwrap();
        let b = generate_heightmap(&TerrainConfig::new(2, 32)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_height_scale_applies_linearly() {
        let mut config = TerrainConfig::new(5, 16);
        config.height_scale = 1.0;
        let unit = generate_heightmap(&config).unwrap();
        config.height_scale = 10.0;
        let scaled = generate_heightmap(&config).unwrap();

        for (a, b) in unit.heights().iter().zip(scaled.heights()) {
            assert!((a * 10.0 - b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = TerrainConfig::new(5, 16);
        config.noise.octaves = 0;
        assert_eq!(generate_heightmap(&config), Err(ConfigError::InvalidOctaves(0)));
    }

    #[test]
    fn test_progress_every_k_rows() {
        let config = TerrainConfig::new(5, 20);
        let mut calls = Vec::new();
        generate_heightmap_with_progress(&config, 8, |done, total| calls.push((done, total)))
            .unwrap();
        assert_eq!(calls, vec![(8, 20), (16, 20), (20, 20)]);
    }
}

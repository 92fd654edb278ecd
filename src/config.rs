//! Top-level generation configuration and its validation errors.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::erosion::ErosionConfig;
use crate::noise::FractalNoiseConfig;

/// Smallest grid that still has an erosion interior (`[1, size - 2]`).
pub const MIN_GRID_SIZE: usize = 4;
/// Largest supported grid edge length.
pub const MAX_GRID_SIZE: usize = 8192;

/// Errors raised while validating configuration, always before any work runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid grid size {0}: must be between {min} and {max}", min = MIN_GRID_SIZE, max = MAX_GRID_SIZE)]
    InvalidGridSize(usize),
    #[error("Invalid octave count {0}: at least one octave is required")]
    InvalidOctaves(u8),
    #[error("Erosion radius must be non-negative, got {0}")]
    NegativeRadius(f32),
    #[error("Parameter '{field}' must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("Parameter '{field}' = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("Droplet step budget must be at least 1")]
    InvalidStepBudget,
    #[error("Export chunk size must be at least 1")]
    InvalidChunkSize,
}

/// Rejects NaN and infinities.
pub(crate) fn ensure_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

/// Rejects non-finite values and values outside `[min, max]`.
pub(crate) fn ensure_in_range(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    ensure_finite(field, value)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn default_size() -> usize {
    256
}

fn default_height_scale() -> f32 {
    64.0
}

fn default_water_level() -> f32 {
    16.0
}

/// Everything needed to reproduce one terrain: seed, grid shape, vertical
/// scale, noise shaping and erosion tuning.
///
/// The seed has no default; deserializing a config without one fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Master seed for noise and droplet spawning.
    pub seed: u64,
    /// Grid edge length in cells.
    #[serde(default = "default_size")]
    pub size: usize,
    /// Multiplier applied to the normalised [0, 1] noise height.
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
    /// Elevation of the water surface, used for material classification.
    #[serde(default = "default_water_level")]
    pub water_level: f32,
    #[serde(default)]
    pub noise: FractalNoiseConfig,
    #[serde(default)]
    pub erosion: ErosionConfig,
}

impl TerrainConfig {
    /// Creates a configuration with default tuning for the given seed and size.
    pub fn new(seed: u64, size: usize) -> Self {
        Self {
            seed,
            size,
            height_scale: default_height_scale(),
            water_level: default_water_level(),
            noise: FractalNoiseConfig::default(),
            erosion: ErosionConfig::default(),
        }
    }

    /// Default-sized grid for the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, default_size())
    }

    /// Low relief, few octaves, light erosion.
    pub fn rolling_hills(seed: u64, size: usize) -> Self {
        Self {
            height_scale: 32.0,
            water_level: 6.0,
            noise: FractalNoiseConfig {
                octaves: 4,
                persistence: 0.45,
                ridge_weight: 0.15,
                ..Default::default()
            },
            erosion: ErosionConfig {
                iterations: 20_000,
                ..Default::default()
            },
            ..Self::new(seed, size)
        }
    }

    /// Tall, ridged relief with heavy erosion.
    pub fn mountainous(seed: u64, size: usize) -> Self {
        Self {
            height_scale: 128.0,
            water_level: 24.0,
            noise: FractalNoiseConfig {
                octaves: 7,
                persistence: 0.55,
                lacunarity: 2.1,
                ridge_weight: 0.4,
                ..Default::default()
            },
            erosion: ErosionConfig {
                iterations: 120_000,
                radius: 2.0,
                ..Default::default()
            },
            ..Self::new(seed, size)
        }
    }

    /// Checks every field; the first violation is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.size) {
            return Err(ConfigError::InvalidGridSize(self.size));
        }
        ensure_finite("height_scale", self.height_scale)?;
        ensure_finite("water_level", self.water_level)?;
        self.noise.validate()?;
        self.erosion.validate()?;
        Ok(())
    }

    /// 32-bit seed handed to the noise field.
    pub fn noise_seed(&self) -> u32 {
        (self.seed ^ (self.seed >> 32)) as u32
    }
}

/// Seed derived from the wall clock.
///
/// Only meant for outermost callers that have no seed of their own; nothing
/// inside the crate calls it.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

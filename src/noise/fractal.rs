//! Multi-octave fractal Brownian motion (fBm) noise generation.

use serde::{Deserialize, Serialize};

use super::gradient::sample;
use crate::config::{ensure_finite, ensure_in_range, ConfigError};

/// Configuration for multi-octave fractal noise and the ridge blend applied
/// by the heightmap pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves (4-8 typical).
    pub octaves: u8,
    /// Amplitude decay per octave (0.4-0.6 typical).
    pub persistence: f32,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
    /// Noise cycles across the whole grid along each axis.
    pub base_cycles: f32,
    /// Frequency multiplier of the ridge layer relative to the base layer.
    pub ridge_frequency: f32,
    /// Seed offset of the ridge layer.
    pub ridge_seed_offset: u32,
    /// Share of the ridge layer in the final height (0.3 = 70/30 blend).
    pub ridge_weight: f32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            base_cycles: 4.0,
            ridge_frequency: 2.0,
            ridge_seed_offset: 1013,
            ridge_weight: 0.3,
        }
    }
}

impl FractalNoiseConfig {
    /// Checks octave count and shaping parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octaves == 0 {
            return Err(ConfigError::InvalidOctaves(self.octaves));
        }
        ensure_in_range("persistence", self.persistence, 0.0, 1.0)?;
        ensure_in_range("lacunarity", self.lacunarity, 1.0, 8.0)?;
        ensure_finite("base_cycles", self.base_cycles)?;
        ensure_finite("ridge_frequency", self.ridge_frequency)?;
        ensure_in_range("ridge_weight", self.ridge_weight, 0.0, 1.0)?;
        Ok(())
    }

    /// Samples fractal noise with this configuration's octave parameters.
    ///
    /// Assumes the configuration has been validated.
    pub fn sample(&self, x: f32, y: f32, seed: u32) -> f32 {
        fbm(x, y, self.octaves, self.persistence, self.lacunarity, seed)
    }
}

/// Samples fractal noise at `(x, y)`.
///
/// Octave `i` uses seed `seed + i` so octaves stay uncorrelated. The sum is
/// normalised by the total amplitude, which keeps the result in `[-1, 1]`.
///
/// # Arguments
/// * `x`, `y` - Sample position in noise space (one lattice cell per unit)
/// * `octaves` - Number of layers summed
/// * `persistence` - Amplitude multiplier per octave
/// * `lacunarity` - Frequency multiplier per octave
/// * `seed` - Base seed for the first octave
///
/// # Returns
/// The normalised noise value in `[-1, 1]`
///
/// # Errors
/// `ConfigError::InvalidOctaves` when `octaves` is zero.
pub fn sample_fractal(
    x: f32,
    y: f32,
    octaves: u8,
    persistence: f32,
    lacunarity: f32,
    seed: u32,
) -> Result<f32, ConfigError> {
    if octaves == 0 {
        return Err(ConfigError::InvalidOctaves(octaves));
    }
    Ok(fbm(x, y, octaves, persistence, lacunarity, seed))
}

fn fbm(x: f32, y: f32, octaves: u8, persistence: f32, lacunarity: f32, seed: u32) -> f32 {
    let mut total = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = 1.0f32;
    let mut max_amplitude = 0.0f32;

    for octave in 0..octaves {
        let octave_seed = seed.wrapping_add(octave as u32);
        total += sample(x * frequency, y * frequency, octave_seed) * amplitude;
        max_amplitude += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total / max_amplitude
}

//! Height-based surface material classification.

use serde::{Deserialize, Serialize};

use crate::config::TerrainConfig;
use crate::terrain::HeightGrid;

/// Fraction of the relief above the water level where bare rock begins.
const ROCK_FRACTION: f32 = 0.6;
/// Height above the water level still classified as ground (shore band).
const SHORE_HEIGHT: f32 = 2.0;

/// Surface material handed to the terrain writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Rock,
    Ground,
    Grass,
}

impl Material {
    /// Returns the lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            Material::Rock => "rock",
            Material::Ground => "ground",
            Material::Grass => "grass",
        }
    }
}

/// Thresholds mapping a height to a [`Material`].
///
/// Submerged cells and the shore band are ground, high cells are rock and
/// everything between is grass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialRule {
    pub water_level: f32,
    /// Cells at or below this height are ground.
    pub shore_level: f32,
    /// Cells at or above this height are rock.
    pub rock_level: f32,
}

impl MaterialRule {
    /// Derives thresholds from the configured water level and height scale.
    pub fn from_config(config: &TerrainConfig) -> Self {
        let water_level = config.water_level;
        Self {
            water_level,
            shore_level: water_level + SHORE_HEIGHT,
            rock_level: water_level + (config.height_scale - water_level) * ROCK_FRACTION,
        }
    }

    /// Classifies a single height.
    ///
    /// # Arguments
    /// * `height` - Terrain height in the same units as `water_level`
    ///
    /// # Returns
    /// `Rock` at or above `rock_level`, `Ground` at or below `shore_level`,
    /// `Grass` in between. Rock wins when the two bands overlap.
    pub fn classify(&self, height: f32) -> Material {
        if height >= self.rock_level {
            Material::Rock
        } else if height <= self.shore_level {
            Material::Ground
        } else {
            Material::Grass
        }
    }

    /// Classifies every cell in row-major order.
    pub fn classify_grid(&self, grid: &HeightGrid) -> Vec<Material> {
        grid.heights().iter().map(|&h| self.classify(h)).collect()
    }
}

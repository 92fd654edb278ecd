//! Procedural heightfield generation.
//!
//! A square grid of heights is filled from seeded fractal gradient noise and
//! then weathered by simulated water droplets that carry sediment downhill.
//! The result can be classified into surface materials and streamed to any
//! [`TerrainWriter`] in chunks.
//!
//! Everything is deterministic for a given [`TerrainConfig`].

pub mod config;
pub mod erosion;
pub mod export;
pub mod noise;
pub mod pipeline;
pub mod terrain;

pub use config::{clock_seed, ConfigError, TerrainConfig, MAX_GRID_SIZE, MIN_GRID_SIZE};
pub use erosion::{Droplet, ErosionConfig, ErosionSimulator, ErosionStats, TerminationReason};
pub use export::{export_grid, ExportError, Material, MaterialRule, TerrainRegion, TerrainWriter};
pub use noise::FractalNoiseConfig;
pub use pipeline::{generate_terrain, GenerationStage, Pipeline, PipelineError, StageId};
pub use terrain::{generate_heightmap, HeightGrid};

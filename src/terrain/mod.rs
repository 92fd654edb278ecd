//! Terrain generation module.
//!
//! Provides the [`HeightGrid`] elevation surface and the noise pass that
//! seeds it before erosion.

mod grid;
mod heightmap;

pub use grid::HeightGrid;
pub use heightmap::{fill_heightmap, generate_heightmap, generate_heightmap_with_progress};

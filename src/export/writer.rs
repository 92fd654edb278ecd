//! Hand-off of a finished grid to an external terrain writer.

use thiserror::Error;
use tracing::info;

use super::material::{Material, MaterialRule};
use crate::config::ConfigError;
use crate::terrain::HeightGrid;

/// Errors that can occur while exporting a grid.
#[derive(Error, Debug)]
pub enum ExportError<E: std::error::Error + 'static> {
    #[error("Invalid export configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Writer failed on region at ({origin_x}, {origin_z}): {source}")]
    Writer {
        origin_x: usize,
        origin_z: usize,
        #[source]
        source: E,
    },
}

/// Height and material of one exported cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainCell {
    pub height: f32,
    pub material: Material,
}

/// A rectangular block of cells in grid coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainRegion {
    pub origin_x: usize,
    pub origin_z: usize,
    pub width: usize,
    pub depth: usize,
    /// Water surface elevation, for writers that fill water.
    pub water_level: f32,
    /// Row-major cells, `width * depth` long.
    pub cells: Vec<TerrainCell>,
}

impl TerrainRegion {
    /// Cell at region-local coordinates.
    pub fn cell(&self, local_x: usize, local_z: usize) -> Option<&TerrainCell> {
        if local_x >= self.width || local_z >= self.depth {
            return None;
        }
        self.cells.get(local_z * self.width + local_x)
    }
}

/// Consumer of exported terrain regions (voxel writers, engine bridges).
///
/// Implementations decide voxel resolution, coordinate scaling and storage.
pub trait TerrainWriter {
    type Error: std::error::Error + 'static;

    fn write_region(&mut self, region: &TerrainRegion) -> Result<(), Self::Error>;
}

/// Splits `grid` into `chunk_size`-square regions and forwards each to `writer`.
///
/// The grid is only read, so a failing writer leaves it intact.
///
/// # Arguments
/// * `grid` - Finished heightfield
/// * `rule` - Material thresholds applied to every cell
/// * `writer` - Destination for the regions, in row-major chunk order
/// * `chunk_size` - Edge length of each region; edge regions are clipped, and
///   a chunk larger than the grid yields a single region
///
/// # Returns
/// The number of regions written
///
/// # Errors
/// `ExportError::Config` for a zero chunk size, `ExportError::Writer` for the
/// first region the writer rejects.
pub fn export_grid<W: TerrainWriter>(
    grid: &HeightGrid,
    rule: &MaterialRule,
    writer: &mut W,
    chunk_size: usize,
) -> Result<usize, ExportError<W::Error>> {
    if chunk_size == 0 {
        return Err(ConfigError::InvalidChunkSize.into());
    }

    let size = grid.size();
    let span = chunk_size.min(size);
    let mut region = TerrainRegion {
        origin_x: 0,
        origin_z: 0,
        width: 0,
        depth: 0,
        water_level: rule.water_level,
        cells: Vec::with_capacity(span * span),
    };
    let mut written = 0;

    for origin_z in (0..size).step_by(chunk_size) {
        for origin_x in (0..size).step_by(chunk_size) {
            region.origin_x = origin_x;
            region.origin_z = origin_z;
            region.width = chunk_size.min(size - origin_x);
            region.depth = chunk_size.min(size - origin_z);
            region.cells.clear();

            for z in origin_z..origin_z + region.depth {
                let row = &grid.heights()[z * size + origin_x..z * size + origin_x + region.width];
                region.cells.extend(row.iter().map(|&height| TerrainCell {
                    height,
                    material: rule.classify(height),
                }));
            }

            writer
                .write_region(&region)
                .map_err(|source| ExportError::Writer {
                    origin_x,
                    origin_z,
                    source,
                })?;
            written += 1;
        }
    }

    info!(regions = written, size, chunk_size, "terrain exported");
    Ok(written)
}

//! Export interface for finished terrain.
//!
//! The crate does not write any file format itself. A finished
//! [`HeightGrid`](crate::terrain::HeightGrid) is classified into surface
//! materials and streamed, region by region, to a caller-supplied
//! [`TerrainWriter`].

mod material;
mod writer;

pub use material::{Material, MaterialRule};
pub use writer::{export_grid, ExportError, TerrainCell, TerrainRegion, TerrainWriter};

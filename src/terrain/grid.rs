//! Dense square elevation grid.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// A `size × size` elevation surface stored in row-major order (`z * size + x`).
///
/// The size is fixed at construction. Reads outside the grid return `0.0`
/// and writes outside the grid are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightGrid {
    size: usize,
    heights: Vec<f32>,
}

impl HeightGrid {
    /// Creates a grid with every height set to 0.0.
    ///
    /// # Errors
    /// `ConfigError::InvalidGridSize` for a zero size.
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        Self::filled(size, 0.0)
    }

    /// Creates a grid with every height set to `height`.
    pub fn filled(size: usize, height: f32) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::InvalidGridSize(size));
        }
        Ok(Self {
            size,
            heights: vec![height; size * size],
        })
    }

    /// Creates a grid from a function of the cell coordinate.
    pub fn from_fn<F>(size: usize, mut f: F) -> Result<Self, ConfigError>
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut grid = Self::new(size)?;
        for z in 0..size {
            for x in 0..size {
                grid.heights[z * size + x] = f(x, z);
            }
        }
        Ok(grid)
    }

    /// Edge length in cells.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Raw heights in row-major order.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    #[inline]
    fn index(&self, x: i32, z: i32) -> Option<usize> {
        let size = self.size as i64;
        let (x, z) = (x as i64, z as i64);
        if x < 0 || z < 0 || x >= size || z >= size {
            return None;
        }
        Some((z * size + x) as usize)
    }

    /// Height of cell `(x, z)`, or 0.0 outside the grid.
    #[inline]
    pub fn get(&self, x: i32, z: i32) -> f32 {
        self.index(x, z).map_or(0.0, |i| self.heights[i])
    }

    /// Sets the height of cell `(x, z)`; ignored outside the grid.
    #[inline]
    pub fn set(&mut self, x: i32, z: i32, height: f32) {
        if let Some(i) = self.index(x, z) {
            self.heights[i] = height;
        }
    }

    /// Adds `delta` to cell `(x, z)`; ignored outside the grid.
    #[inline]
    pub fn add(&mut self, x: i32, z: i32, delta: f32) {
        if let Some(i) = self.index(x, z) {
            self.heights[i] += delta;
        }
    }

    /// Bilinearly interpolated height at a continuous coordinate.
    ///
    /// Cells outside the grid contribute 0.0.
    pub fn get_smooth(&self, x: f32, z: f32) -> f32 {
        let x0 = x.floor();
        let z0 = z.floor();
        let fx = x - x0;
        let fz = z - z0;
        let (ix, iz) = (x0 as i32, z0 as i32);

        let h00 = self.get(ix, iz);
        let (jx, jz) = (ix.saturating_add(1), iz.saturating_add(1));

        let h10 = self.get(jx, iz);
        let h01 = self.get(ix, jz);
        let h11 = self.get(jx, jz);

        let near = h00 + (h10 - h00) * fx;
        let far = h01 + (h11 - h01) * fx;
        near + (far - near) * fz
    }

    /// Uphill slope at a continuous coordinate.
    ///
    /// Half-cell differences of [`get_smooth`](Self::get_smooth) along each
    /// axis, scaled by 2 to a per-cell slope. Negate for the downhill direction.
    pub fn gradient(&self, x: f32, z: f32) -> Vec2 {
        let here = self.get_smooth(x, z);
        let dx = (self.get_smooth(x + 0.5, z) - here) * 2.0;
        let dz = (self.get_smooth(x, z + 0.5) - here) * 2.0;
        Vec2::new(dx, dz)
    }

    /// Returns (min, max) height.
    pub fn height_range(&self) -> (f32, f32) {
        self.heights
            .iter()
            .fold((f32::MAX, f32::MIN), |(min, max), &h| (min.min(h), max.max(h)))
    }

    /// Sum of all heights, accumulated in f64.
    pub fn total_height(&self) -> f64 {
        self.heights.iter().map(|&h| h as f64).sum()
    }

    /// Iterates `(x, z, height)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let size = self.size;
        self.heights
            .iter()
            .enumerate()
            .map(move |(i, &h)| (i % size, i / size, h))
    }

    pub(crate) fn heights_mut(&mut self) -> &mut [f32] {
        &mut self.heights
    }
}

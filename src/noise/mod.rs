//! Noise generation module for terrain synthesis.
//!
//! A seeded 2D gradient noise and its fractal (fBm) summation. Both are pure
//! functions of their inputs, so a seed fully determines the terrain.

mod fractal;
mod gradient;

pub use fractal::{sample_fractal, FractalNoiseConfig};
pub use gradient::sample;

//! Single-octave 2D gradient noise.

/// Corner gradients, selected by the low two bits of the lattice hash.
const GRADIENTS: [(f32, f32); 4] = [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)];

/// Integer avalanche hash of a lattice corner.
#[inline]
fn hash(ix: i32, iy: i32, seed: u32) -> u32 {
    let mut h = seed.wrapping_mul(0x9E37_79B9)
        ^ (ix as u32).wrapping_mul(0x85EB_CA6B)
        ^ (iy as u32).wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7FEB_352D);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846C_A68B);
    h ^= h >> 16;
    h
}

/// Smootherstep fade: `t³(t(6t − 15) + 10)`.
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Dot product of the corner gradient with the offset from that corner.
#[inline]
fn corner(ix: i32, iy: i32, dx: f32, dy: f32, seed: u32) -> f32 {
    let (gx, gy) = GRADIENTS[(hash(ix, iy, seed) & 3) as usize];
    gx * dx + gy * dy
}

/// Samples gradient noise at `(x, y)`.
///
/// Deterministic in all three arguments. The result is in `[-1, 1]` and is
/// exactly zero on integer lattice points.
///
/// # Arguments
/// * `x`, `y` - Position in lattice units
/// * `seed` - Selects the gradient field
///
/// # Returns
/// A noise value in `[-1, 1]`
pub fn sample(x: f32, y: f32, seed: u32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let ix = x0 as i32;
    let iy = y0 as i32;

    let n00 = corner(ix, iy, fx, fy, seed);
    let n10 = corner(ix.wrapping_add(1), iy, fx - 1.0, fy, seed);
    let n01 = corner(ix, iy.wrapping_add(1), fx, fy - 1.0, seed);
    let n11 = corner(ix.wrapping_add(1), iy.wrapping_add(1), fx - 1.0, fy - 1.0, seed);

    let u = fade(fx);
    let v = fade(fy);
    let bottom = lerp(n00, n10, u);
    let top = lerp(n01, n11, u);

    lerp(bottom, top, v).clamp(-1.0, 1.0)
}

//! Noise sources for landscapes and vertex color modulation.
//!
//! Thin wrappers over the `noise` crate. Generators are seeded with a fixed
//! value and built once, so every scene sees the same terrain and color
//! pattern.

use std::sync::OnceLock;

use glam::{Vec2, Vec3};
use noise::{Fbm, MultiFractal, NoiseFn, Simplex};

/// Landscape fBm octave count.
pub const FBM_OCTAVES: usize = 5;
pub const FBM_LACUNARITY: f64 = 2.0;
pub const FBM_GAIN: f64 = 0.5;

pub const NOISE_SEED: u32 = 0;

fn landscape_fbm() -> &'static Fbm<Simplex> {
  static FBM: OnceLock<Fbm<Simplex>> = OnceLock::new();
  FBM.get_or_init(|| {
    Fbm::<Simplex>::new(NOISE_SEED)
      .set_octaves(FBM_OCTAVES)
      .set_frequency(1.0)
      .set_lacunarity(FBM_LACUNARITY)
      .set_persistence(FBM_GAIN)
  })
}

fn color_simplex() -> &'static Simplex {
  static SIMPLEX: OnceLock<Simplex> = OnceLock::new();
  SIMPLEX.get_or_init(|| Simplex::new(NOISE_SEED))
}

/// 3D simplex noise in `[-1, 1]`.
#[inline]
pub fn simplex3(p: Vec3) -> f32 {
  let v = color_simplex().get(p.as_dvec3().to_array());
  (v as f32).clamp(-1.0, 1.0)
}

/// Fractal sum of 2D simplex octaves, normalized to `[-1, 1]`.
#[inline]
pub fn fbm2(p: Vec2) -> f32 {
  let v = landscape_fbm().get(p.as_dvec2().to_array());
  (v as f32).clamp(-1.0, 1.0)
}

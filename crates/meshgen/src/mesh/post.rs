//! Vertex finishing passes: color noise and position jitter.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::implicit::noise::simplex3;
use crate::types::{ColorNoise, Mesh};

/// Modulate RGB by `1 + intensity * simplex3(position / stretch)`.
///
/// Alpha is left alone; channels saturate at 0 and 255.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mesh::color_noise"))]
pub fn apply_color_noise(mesh: &mut Mesh, noise: &ColorNoise) {
  if noise.intensity == 0.0 || noise.stretch <= 0.0 {
    return;
  }

  for v in &mut mesh.vertices {
    let factor = 1.0 + noise.intensity * simplex3(v.pos() / noise.stretch);
    for c in &mut v.color[..3] {
      *c = (*c as f32 * factor).round().clamp(0.0, 255.0) as u8;
    }
  }
}

/// Jitter every vertex by a uniform offset in `[-factor, factor]^3`
/// cells. The same seed always produces the same offsets.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mesh::randomize"))]
pub fn randomize_vertices(mesh: &mut Mesh, factor: f32, cell_size: f32, seed: u64) {
  if factor <= 0.0 {
    return;
  }

  let amplitude = factor * cell_size;
  let mut rng = StdRng::seed_from_u64(seed);

  for v in &mut mesh.vertices {
    let offset = Vec3::new(
      rng.random_range(-1.0..=1.0),
      rng.random_range(-1.0..=1.0),
      rng.random_range(-1.0..=1.0),
    ) * amplitude;
    v.position = (v.pos() + offset).to_array();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::MeshVertex;

  fn scattered(n: usize) -> Mesh {
    let mut mesh = Mesh::new();
    for i in 0..n {
      let f = i as f32;
      mesh.vertices.push(MeshVertex::new(
        Vec3::new(f * 0.37, f * -0.21, f * 0.13),
        [128, 128, 128, 77],
      ));
    }
    mesh
  }

  #[test]
  fn test_color_noise_varies_rgb_only() {
    let mut mesh = scattered(64);
    apply_color_noise(&mut mesh, &ColorNoise { intensity: 0.5, stretch: 0.5 });

    assert!(mesh.vertices.iter().all(|v| v.color[3] == 77));
    assert!(mesh.vertices.iter().any(|v| v.color[0] != 128));
    for v in &mesh.vertices {
      let c = v.color[0] as f32;
      assert!((c - 128.0).abs() <= 128.0 * 0.5 * 1.1 + 1.0);
    }
  }

  #[test]
  fn test_color_noise_zero_intensity_is_noop() {
    let mut mesh = scattered(8);
    apply_color_noise(&mut mesh, &ColorNoise { intensity: 0.0, stretch: 1.0 });
    assert!(mesh.vertices.iter().all(|v| v.color == [128, 128, 128, 77]));
  }

  #[test]
  fn test_randomize_bounded_and_deterministic() {
    let original = scattered(100);

    let mut a = original.clone();
    let mut b = original.clone();
    randomize_vertices(&mut a, 0.25, 0.1, 7);
    randomize_vertices(&mut b, 0.25, 0.1, 7);
    assert_eq!(a.vertices, b.vertices);

    let mut moved = 0;
    for (before, after) in original.vertices.iter().zip(&a.vertices) {
      let d = (after.pos() - before.pos()).abs();
      assert!(d.max_element() <= 0.025 + 1e-6);
      if d != Vec3::ZERO {
        moved += 1;
      }
    }
    assert!(moved > 90);
  }

  #[test]
  fn test_randomize_seed_changes_offsets() {
    let mut a = scattered(10);
    let mut b = scattered(10);
    randomize_vertices(&mut a, 1.0, 1.0, 1);
    randomize_vertices(&mut b, 1.0, 1.0, 2);
    assert_ne!(a.vertices, b.vertices);
  }
}

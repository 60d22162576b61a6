//! Core data types shared by the fill, polygonize and post-process stages.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::error::{MeshGenError, Result};

/// Quantized RGBA color.
pub type Color = [u8; 4];

/// Conversion between float RGBA and quantized [`Color`].
pub mod color_conversion {
  use glam::Vec4;

  use super::Color;

  /// Quantize a `[0, 1]` RGBA color; out-of-range channels clamp.
  #[inline(always)]
  pub fn to_color(rgba: Vec4) -> Color {
    let c = (rgba.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, c.w as u8]
  }

  /// Expand a quantized color back to `[0, 1]` floats.
  #[inline(always)]
  pub fn to_vec4(color: Color) -> Vec4 {
    Vec4::new(
      color[0] as f32,
      color[1] as f32,
      color[2] as f32,
      color[3] as f32,
    ) / 255.0
  }
}

/// One distance grid sample.
///
/// Negative `dist` = inside the solid. Cells nothing has touched stay at
/// `+∞` with transparent black color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistVert {
  pub dist: f32,
  pub color: Color,
}

impl Default for DistVert {
  fn default() -> Self {
    Self {
      dist: f32::INFINITY,
      color: [0, 0, 0, 0],
    }
  }
}

/// Output vertex in PNC layout (position, normal, color).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
  /// World-space position.
  pub position: [f32; 3],

  /// Area-weighted normal, left unnormalized.
  pub normal: [f32; 3],

  pub color: Color,
}

impl MeshVertex {
  pub fn new(position: Vec3, color: Color) -> Self {
    Self {
      position: position.to_array(),
      normal: [0.0; 3],
      color,
    }
  }

  #[inline(always)]
  pub fn pos(&self) -> Vec3 {
    Vec3::from_array(self.position)
  }
}

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Box centered on `center` with half extents `half`.
  pub fn from_center_half(center: Vec3, half: Vec3) -> Self {
    Self {
      min: (center - half).to_array(),
      max: (center + half).to_array(),
    }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Expand AABB to include another box.
  pub fn union(&mut self, other: &MinMaxAABB) {
    if other.is_valid() {
      self.encapsulate(other.min);
      self.encapsulate(other.max);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }

  pub fn size(&self) -> Vec3 {
    Vec3::from_array(self.max) - Vec3::from_array(self.min)
  }

  pub fn center(&self) -> Vec3 {
    (Vec3::from_array(self.max) + Vec3::from_array(self.min)) * 0.5
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
  pub vertices: Vec<MeshVertex>,

  /// Triangle indices (3 indices per triangle).
  pub indices: Vec<u32>,

  /// Bounding box encompassing all vertices.
  pub bounds: MinMaxAABB,
}

impl Mesh {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear all buffers, preserving capacity.
  pub fn clear(&mut self) {
    self.vertices.clear();
    self.indices.clear();
    self.bounds = MinMaxAABB::empty();
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Corner indices of triangle `t`.
  #[inline(always)]
  pub fn triangle(&self, t: usize) -> [usize; 3] {
    [
      self.indices[t * 3] as usize,
      self.indices[t * 3 + 1] as usize,
      self.indices[t * 3 + 2] as usize,
    ]
  }

  pub fn recompute_bounds(&mut self) {
    let mut bounds = MinMaxAABB::empty();
    for v in &self.vertices {
      bounds.encapsulate(v.position);
    }
    self.bounds = bounds;
  }

  /// Enclosed volume (divergence theorem); positive for outward winding.
  pub fn signed_volume(&self) -> f32 {
    (0..self.triangle_count())
      .map(|t| {
        let [a, b, c] = self.triangle(t).map(|i| self.vertices[i].pos());
        a.dot(b.cross(c)) / 6.0
      })
      .sum()
  }

  /// Remove triangles that reference the same vertex twice.
  pub fn drop_degenerate_triangles(&mut self) -> usize {
    let before = self.indices.len();
    let mut kept = Vec::with_capacity(before);
    for tri in self.indices.chunks_exact(3) {
      if tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2] {
        kept.extend_from_slice(tri);
      }
    }
    self.indices = kept;
    (before - self.indices.len()) / 3
  }

  /// Remove vertices no triangle references and renumber the indices.
  pub fn compact(&mut self) {
    let mut remap = vec![u32::MAX; self.vertices.len()];
    let mut vertices = Vec::with_capacity(self.vertices.len());

    for index in self.indices.iter_mut() {
      let old = *index as usize;
      if remap[old] == u32::MAX {
        remap[old] = vertices.len() as u32;
        vertices.push(self.vertices[old]);
      }
      *index = remap[old];
    }

    self.vertices = vertices;
  }
}

/// Surface extraction algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PolygonizerKind {
  /// Full 3D marching cubes.
  #[default]
  MarchingCubes,

  /// Per-slice marching squares extruded along Z.
  ///
  /// Experimental: no bottom caps, no clipping against neighbouring slices
  /// and fixed saddle handling.
  MarchingSquares,
}

/// Per-vertex color modulation by 3D simplex noise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorNoise {
  pub intensity: f32,

  /// World units per noise period.
  pub stretch: f32,
}

/// Configuration for mesh generation.
#[derive(Clone, Debug)]
pub struct MeshConfig {
  /// Greedy reduction passes; 0 disables reduction.
  pub poly_reduction_passes: u32,

  /// Minimum face/vertex normal dot for a vertex to count as flat.
  pub flat_epsilon: f32,

  /// Collapses creating a corner with a larger cosine are rejected.
  pub max_tri_corner_dot: f32,

  pub color_noise: Option<ColorNoise>,

  /// Jitter amplitude in cell units; 0 disables.
  pub vert_randomize: f32,

  /// Merge the edge vertices of each grid corner into one shared vertex.
  pub mesh_displacement: bool,

  pub polygonizer: PolygonizerKind,

  /// Fill threads; `None` uses one per hardware thread.
  pub threads: Option<usize>,

  /// Seed for vertex randomization.
  pub seed: u64,
}

impl Default for MeshConfig {
  fn default() -> Self {
    Self {
      poly_reduction_passes: 0,
      flat_epsilon: 0.98,
      max_tri_corner_dot: 0.95,
      color_noise: None,
      vert_randomize: 0.0,
      mesh_displacement: true,
      polygonizer: PolygonizerKind::default(),
      threads: None,
      seed: 0,
    }
  }
}

impl MeshConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_poly_reduction(mut self, passes: u32, epsilon: f32, max_tri_corner_dot: f32) -> Self {
    self.poly_reduction_passes = passes;
    self.flat_epsilon = epsilon;
    self.max_tri_corner_dot = max_tri_corner_dot;
    self
  }

  pub fn with_color_noise(mut self, intensity: f32, stretch: f32) -> Self {
    self.color_noise = Some(ColorNoise { intensity, stretch });
    self
  }

  pub fn with_vert_randomize(mut self, factor: f32) -> Self {
    self.vert_randomize = factor;
    self
  }

  pub fn with_mesh_displacement(mut self, enabled: bool) -> Self {
    self.mesh_displacement = enabled;
    self
  }

  pub fn with_polygonizer(mut self, kind: PolygonizerKind) -> Self {
    self.polygonizer = kind;
    self
  }

  pub fn with_threads(mut self, threads: usize) -> Self {
    self.threads = Some(threads);
    self
  }

  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = seed;
    self
  }

  /// Reject reduction thresholds outside `[0, 1]`.
  pub fn validate(&self) -> Result<()> {
    let in_unit = |v: f32| (0.0..=1.0).contains(&v);
    if !in_unit(self.flat_epsilon) {
      return Err(MeshGenError::InvalidReduction(format!(
        "flat epsilon {} outside [0, 1]",
        self.flat_epsilon
      )));
    }
    if !in_unit(self.max_tri_corner_dot) {
      return Err(MeshGenError::InvalidReduction(format!(
        "max triangle corner dot {} outside [0, 1]",
        self.max_tri_corner_dot
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

//! SceneBuilder - stateful scene construction and meshing entry point.
//!
//! The builder keeps a current [`State`] (transform, color, smoothing) that
//! every shape call snapshots into a new primitive. States can be saved and
//! restored with `push`/`pop` or scoped with `with_state`; `group` nests a
//! child [`Group`].
//!
//! ```ignore
//! let mut b = SceneBuilder::new();
//! b.color(Vec4::new(0.8, 0.2, 0.2, 1.0)).sphere(1.0);
//! b.with_state(|b| {
//!     b.translate(Vec3::X).scale(0.5).color(Vec4::new(1.0, 1.0, 1.0, 0.0));
//!     b.sphere(1.0); // carves
//! });
//! let mesh = b.polygonize(64)?;
//! ```

use glam::{Mat3, Vec3, Vec4};

use crate::constants::DEFAULT_SMOOTH_K;
use crate::cubegen::{self, Voxels};
use crate::error::{MeshGenError, Result};
use crate::implicit::{
  Cube, Cylinder, Group, Landscape, Material, Primitive, ShapeKind, Sphere, SuperQuadric,
  SuperQuadricNonUniform, SuperToroid, TaperedCylinder, Transform,
};
use crate::polygonize::{self, PolygonizeStats};
use crate::threading::FillPool;
use crate::types::{ColorNoise, Mesh, MeshConfig, PolygonizerKind};

// =============================================================================
// State
// =============================================================================

/// Attributes applied to every shape created while the state is current.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct State {
  pub transform: Transform,

  /// RGBA in `[0, 1]`; alpha below 0.5 carves.
  pub color: Vec4,

  /// Blend radius in world units.
  pub smooth_k: f32,
}

impl Default for State {
  fn default() -> Self {
    Self {
      transform: Transform::default(),
      color: Vec4::ONE,
      smooth_k: DEFAULT_SMOOTH_K,
    }
  }
}

// =============================================================================
// SceneBuilder
// =============================================================================

/// Scene under construction plus mesh settings.
#[derive(Debug, Default)]
pub struct SceneBuilder {
  root: Group,

  /// Groups opened by `group` and not yet closed, innermost last.
  open_groups: Vec<Group>,

  state: State,
  saved_states: Vec<State>,

  config: MeshConfig,

  /// Created on first use, rebuilt when the thread count changes.
  pool: Option<FillPool>,
}

impl SceneBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_config(config: MeshConfig) -> Self {
    Self {
      config,
      ..Self::default()
    }
  }

  pub fn scene(&self) -> &Group {
    &self.root
  }

  pub fn state(&self) -> &State {
    &self.state
  }

  pub fn config(&self) -> &MeshConfig {
    &self.config
  }

  fn current_group(&mut self) -> &mut Group {
    self.open_groups.last_mut().unwrap_or(&mut self.root)
  }

  fn add(&mut self, shape: ShapeKind) -> &mut Self {
    let primitive = Primitive::new(shape)
      .with_transform(self.state.transform)
      .with_material(Material {
        color: self.state.color,
      })
      .with_smooth_k(self.state.smooth_k);
    self.current_group().push(primitive);
    self
  }

  // ---------------------------------------------------------------------------
  // Shapes
  // ---------------------------------------------------------------------------

  pub fn sphere(&mut self, radius: f32) -> &mut Self {
    self.add(ShapeKind::Sphere(Sphere { radius }))
  }

  /// Box with half extents `extents`.
  pub fn cube(&mut self, extents: Vec3) -> &mut Self {
    self.add(ShapeKind::Cube(Cube { extents }))
  }

  pub fn cylinder(&mut self, radius: f32, height: f32) -> &mut Self {
    self.add(ShapeKind::Cylinder(Cylinder { radius, height }))
  }

  pub fn tapered_cylinder(&mut self, bottom: f32, top: f32, height: f32) -> &mut Self {
    self.add(ShapeKind::TaperedCylinder(TaperedCylinder {
      bottom,
      top,
      height,
    }))
  }

  pub fn superquadric(&mut self, exponents: Vec3, scale: Vec3) -> &mut Self {
    self.add(ShapeKind::SuperQuadric(SuperQuadric { exponents, scale }))
  }

  pub fn superquadric_non_uniform(
    &mut self,
    pos_exponents: Vec3,
    neg_exponents: Vec3,
    pos_scale: Vec3,
    neg_scale: Vec3,
  ) -> &mut Self {
    self.add(ShapeKind::SuperQuadricNonUniform(SuperQuadricNonUniform {
      pos_exponents,
      neg_exponents,
      pos_scale,
      neg_scale,
    }))
  }

  pub fn supertoroid(&mut self, ring_radius: f32, exponents: Vec3) -> &mut Self {
    self.add(ShapeKind::SuperToroid(SuperToroid {
      ring_radius,
      exponents,
    }))
  }

  pub fn landscape(&mut self, zscale: f32, xyscale: f32) -> &mut Self {
    self.add(ShapeKind::Landscape(Landscape { zscale, xyscale }))
  }

  // ---------------------------------------------------------------------------
  // State
  // ---------------------------------------------------------------------------

  /// Move the origin by `v` in the current local frame.
  pub fn translate(&mut self, v: Vec3) -> &mut Self {
    let t = &mut self.state.transform;
    t.origin += t.rot * (v * t.scale);
    self
  }

  pub fn scale(&mut self, factor: f32) -> &mut Self {
    self.state.transform.scale *= factor;
    self
  }

  pub fn scale_vec(&mut self, factor: Vec3) -> &mut Self {
    self.state.transform.scale *= factor;
    self
  }

  /// Rotate the local frame by `degrees` around `axis` (local space).
  pub fn rotate(&mut self, axis: Vec3, degrees: f32) -> &mut Self {
    let axis = axis.normalize_or_zero();
    if axis != Vec3::ZERO {
      let t = &mut self.state.transform;
      t.rot *= Mat3::from_axis_angle(axis, degrees.to_radians());
    }
    self
  }

  pub fn color(&mut self, rgba: Vec4) -> &mut Self {
    self.state.color = rgba;
    self
  }

  pub fn smooth(&mut self, k: f32) -> &mut Self {
    self.state.smooth_k = k.max(0.0);
    self
  }

  /// Save the current state.
  pub fn push(&mut self) -> &mut Self {
    self.saved_states.push(self.state);
    self
  }

  /// Restore the last saved state.
  pub fn pop(&mut self) -> Result<&mut Self> {
    self.state = self
      .saved_states
      .pop()
      .ok_or(MeshGenError::StateStackUnderflow)?;
    Ok(self)
  }

  /// Run `f` and restore the state afterwards.
  pub fn with_state<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
    let saved = self.state;
    let result = f(self);
    self.state = saved;
    result
  }

  /// Build a child group with `f`. State changes inside do not leak out.
  pub fn group<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
    self.open_groups.push(Group::new());
    let result = self.with_state(f);
    if let Some(group) = self.open_groups.pop() {
      self.current_group().push_group(group);
    }
    result
  }

  // ---------------------------------------------------------------------------
  // Settings
  // ---------------------------------------------------------------------------

  pub fn set_poly_reduction(
    &mut self,
    passes: u32,
    epsilon: f32,
    max_tri_corner_dot: f32,
  ) -> &mut Self {
    self.config.poly_reduction_passes = passes;
    self.config.flat_epsilon = epsilon;
    self.config.max_tri_corner_dot = max_tri_corner_dot;
    self
  }

  /// Zero intensity turns color noise off.
  pub fn set_color_noise(&mut self, intensity: f32, stretch: f32) -> &mut Self {
    self.config.color_noise = (intensity != 0.0).then_some(ColorNoise { intensity, stretch });
    self
  }

  pub fn set_vert_randomize(&mut self, factor: f32) -> &mut Self {
    self.config.vert_randomize = factor.max(0.0);
    self
  }

  pub fn set_mesh_displacement(&mut self, enabled: bool) -> &mut Self {
    self.config.mesh_displacement = enabled;
    self
  }

  pub fn set_polygonizer(&mut self, kind: PolygonizerKind) -> &mut Self {
    self.config.polygonizer = kind;
    self
  }

  pub fn set_seed(&mut self, seed: u64) -> &mut Self {
    self.config.seed = seed;
    self
  }

  /// Fill thread count; 0 uses one per hardware thread.
  pub fn set_threads(&mut self, threads: usize) -> &mut Self {
    let threads = (threads > 0).then_some(threads);
    if threads != self.config.threads {
      self.config.threads = threads;
      self.pool = None;
    }
    self
  }

  // ---------------------------------------------------------------------------
  // Output
  // ---------------------------------------------------------------------------

  /// Largest smoothing radius of any primitive in the scene.
  pub fn max_smooth_k(&self) -> f32 {
    self.root.max_smooth_k()
  }

  pub fn polygonize(&mut self, subdiv: i32) -> Result<Mesh> {
    self.polygonize_timed(subdiv).map(|(mesh, _)| mesh)
  }

  pub fn polygonize_timed(&mut self, subdiv: i32) -> Result<(Mesh, PolygonizeStats)> {
    let pool = pool_for(&mut self.pool, self.config.threads)?;
    polygonize::polygonize_timed(&self.root, subdiv, &self.config, pool)
  }

  pub fn convert_to_cubes(&mut self, subdiv: i32) -> Result<Voxels> {
    let pool = pool_for(&mut self.pool, self.config.threads)?;
    cubegen::convert_to_cubes(&self.root, subdiv, pool)
  }

  /// Drop the scene and reset the state for the next one. Settings and the
  /// thread pool are kept.
  pub fn clear(&mut self) {
    self.root = Group::new();
    self.open_groups.clear();
    self.state = State::default();
    self.saved_states.clear();
  }
}

fn pool_for(slot: &mut Option<FillPool>, threads: Option<usize>) -> Result<&FillPool> {
  let pool = match slot.take() {
    Some(pool) => pool,
    None => FillPool::new(threads.unwrap_or(0))?,
  };
  Ok(&*slot.insert(pool))
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;

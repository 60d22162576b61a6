//! Implicit primitives and the scene tree.
//!
//! # Scene Model
//!
//! ```text
//! Group
//! ├── Primitive (shape + transform + material + smooth_k)
//! ├── Primitive
//! └── Group
//!     └── Primitive
//! ```
//!
//! Children are blended into the distance grid in tree order. A primitive
//! whose material alpha is below 0.5 carves instead of adding.

mod group;
pub mod noise;
pub mod shapes;

use glam::{Mat3, Vec3, Vec4};

pub use group::{Group, Node};
pub use shapes::{
  Cube, Cylinder, Landscape, Sphere, SuperQuadric, SuperQuadricNonUniform, SuperToroid,
  TaperedCylinder,
};

use crate::constants::{CARVE_ALPHA_THRESHOLD, DEFAULT_SMOOTH_K};
use crate::types::MinMaxAABB;

/// A local-frame signed distance function.
pub trait Shape {
  /// Signed distance (or a bound on it) at local point `p`.
  fn eval(&self, p: Vec3) -> f32;

  /// Local half extents of the surface.
  fn size(&self) -> Vec3;
}

/// Closed set of primitive shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeKind {
  Sphere(Sphere),
  Cube(Cube),
  Cylinder(Cylinder),
  TaperedCylinder(TaperedCylinder),
  SuperQuadric(SuperQuadric),
  SuperQuadricNonUniform(SuperQuadricNonUniform),
  SuperToroid(SuperToroid),
  Landscape(Landscape),
}

impl Shape for ShapeKind {
  fn eval(&self, p: Vec3) -> f32 {
    match self {
      ShapeKind::Sphere(s) => s.eval(p),
      ShapeKind::Cube(s) => s.eval(p),
      ShapeKind::Cylinder(s) => s.eval(p),
      ShapeKind::TaperedCylinder(s) => s.eval(p),
      ShapeKind::SuperQuadric(s) => s.eval(p),
      ShapeKind::SuperQuadricNonUniform(s) => s.eval(p),
      ShapeKind::SuperToroid(s) => s.eval(p),
      ShapeKind::Landscape(s) => s.eval(p),
    }
  }

  fn size(&self) -> Vec3 {
    match self {
      ShapeKind::Sphere(s) => s.size(),
      ShapeKind::Cube(s) => s.size(),
      ShapeKind::Cylinder(s) => s.size(),
      ShapeKind::TaperedCylinder(s) => s.size(),
      ShapeKind::SuperQuadric(s) => s.size(),
      ShapeKind::SuperQuadricNonUniform(s) => s.size(),
      ShapeKind::SuperToroid(s) => s.size(),
      ShapeKind::Landscape(s) => s.size(),
    }
  }
}

/// Placement of a primitive: `world = origin + rot * (local * scale)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
  pub origin: Vec3,
  pub scale: Vec3,
  pub rot: Mat3,
}

impl Default for Transform {
  fn default() -> Self {
    Self {
      origin: Vec3::ZERO,
      scale: Vec3::ONE,
      rot: Mat3::IDENTITY,
    }
  }
}

impl Transform {
  /// Map a world point into the primitive's local frame.
  #[inline(always)]
  pub fn to_local(&self, world: Vec3) -> Vec3 {
    // Rotations are orthonormal, so the transpose inverts them.
    self.rot.transpose() * (world - self.origin) / self.scale
  }

  #[inline(always)]
  pub fn to_world(&self, local: Vec3) -> Vec3 {
    self.origin + self.rot * (local * self.scale)
  }

  /// Average axis scale, used to bring local distances back to world units.
  #[inline(always)]
  pub fn avg_scale(&self) -> f32 {
    (self.scale.x + self.scale.y + self.scale.z) / 3.0
  }

  /// World half extents of a local box with half extents `half`.
  pub fn world_half_extent(&self, half: Vec3) -> Vec3 {
    let abs_rot = Mat3::from_cols(
      self.rot.x_axis.abs(),
      self.rot.y_axis.abs(),
      self.rot.z_axis.abs(),
    );
    abs_rot * (half * self.scale).abs()
  }
}

/// Surface material; alpha selects union (>= 0.5) or carve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
  pub color: Vec4,
}

impl Default for Material {
  fn default() -> Self {
    Self { color: Vec4::ONE }
  }
}

impl Material {
  #[inline(always)]
  pub fn is_carve(&self) -> bool {
    self.color.w < CARVE_ALPHA_THRESHOLD
  }
}

/// A leaf of the scene tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
  pub shape: ShapeKind,
  pub transform: Transform,
  pub material: Material,

  /// Blend radius against what is already in the grid (world units).
  pub smooth_k: f32,
}

impl Primitive {
  pub fn new(shape: ShapeKind) -> Self {
    Self {
      shape,
      transform: Transform::default(),
      material: Material::default(),
      smooth_k: DEFAULT_SMOOTH_K,
    }
  }

  pub fn with_transform(mut self, transform: Transform) -> Self {
    self.transform = transform;
    self
  }

  pub fn with_material(mut self, material: Material) -> Self {
    self.material = material;
    self
  }

  pub fn with_smooth_k(mut self, smooth_k: f32) -> Self {
    self.smooth_k = smooth_k;
    self
  }

  /// Signed distance at a world point, in world units.
  pub fn eval_world(&self, world: Vec3) -> f32 {
    self.shape.eval(self.transform.to_local(world)) * self.transform.avg_scale()
  }

  /// World half extents of the surface, widened by `margin` on every axis.
  pub fn world_half_extent(&self, margin: f32) -> Vec3 {
    self.transform.world_half_extent(self.shape.size()) + Vec3::splat(margin)
  }

  pub fn world_bounds(&self, margin: f32) -> MinMaxAABB {
    MinMaxAABB::from_center_half(self.transform.origin, self.world_half_extent(margin))
  }
}

#[cfg(test)]
#[path = "implicit_test.rs"]
mod implicit_test;

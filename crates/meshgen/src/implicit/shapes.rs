//! Local-frame signed distance functions.
//!
//! Every shape is centered on its local origin. `eval` is negative inside;
//! several shapes only approximate a true Euclidean distance, which is fine
//! for polygonization because only the zero crossing has to be accurate.
//! `size` returns the half extents that bound the shape's surface.

use glam::{Vec2, Vec3, Vec3Swizzles};

use super::noise::fbm2;
use super::Shape;

/// Sphere of `radius` around the origin.
///
/// SDF: `|p| - r`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
  pub radius: f32,
}

impl Shape for Sphere {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    p.length() - self.radius
  }

  fn size(&self) -> Vec3 {
    Vec3::splat(self.radius)
  }
}

/// Box with half extents `extents`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cube {
  pub extents: Vec3,
}

impl Shape for Cube {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    let q = p.abs() - self.extents;
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
  }

  fn size(&self) -> Vec3 {
    self.extents
  }
}

/// Z-aligned cylinder of `radius`, spanning `-height..height`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cylinder {
  pub radius: f32,
  pub height: f32,
}

impl Shape for Cylinder {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    (p.xy().length() - self.radius).max(p.z.abs() - self.height)
  }

  fn size(&self) -> Vec3 {
    Vec3::new(self.radius, self.radius, self.height)
  }
}

/// Cylinder whose radius goes linearly from `bottom` at `-height` to `top`
/// at `+height`.
///
/// The radial term compares squared lengths, so values are only a bound
/// near the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaperedCylinder {
  pub bottom: f32,
  pub top: f32,
  pub height: f32,
}

impl Shape for TaperedCylinder {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    let t = (p.z / self.height + 1.0) * 0.5;
    let r = self.bottom + (self.top - self.bottom) * t;
    (p.z.abs() - self.height).max(p.xy().length_squared() - r * r)
  }

  fn size(&self) -> Vec3 {
    let r = self.bottom.max(self.top);
    Vec3::new(r, r, self.height)
  }
}

#[inline(always)]
fn avg3(v: Vec3) -> f32 {
  (v.x + v.y + v.z) / 3.0
}

/// Superellipsoid with per-axis `exponents` and half extents `scale`.
///
/// `((Σ |p_i / s_i|^e_i)^(1 / avg(e)) - 1) * min(s)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuperQuadric {
  pub exponents: Vec3,
  pub scale: Vec3,
}

impl Shape for SuperQuadric {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    let q = (p / self.scale).abs();
    let sum = q.x.powf(self.exponents.x) + q.y.powf(self.exponents.y) + q.z.powf(self.exponents.z);
    (sum.powf(1.0 / avg3(self.exponents)) - 1.0) * self.scale.min_element()
  }

  fn size(&self) -> Vec3 {
    self.scale
  }
}

/// Superellipsoid whose exponent and extent per axis depend on the sign of
/// the coordinate, giving different shapes for each octant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuperQuadricNonUniform {
  pub pos_exponents: Vec3,
  pub neg_exponents: Vec3,
  pub pos_scale: Vec3,
  pub neg_scale: Vec3,
}

impl Shape for SuperQuadricNonUniform {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    let positive = p.cmpge(Vec3::ZERO);
    let exponents = Vec3::select(positive, self.pos_exponents, self.neg_exponents);
    let scale = Vec3::select(positive, self.pos_scale, self.neg_scale);

    SuperQuadric { exponents, scale }.eval(p)
  }

  fn size(&self) -> Vec3 {
    self.pos_scale.max(self.neg_scale)
  }
}

/// Ring of radius `ring_radius` around Z with a superelliptic cross
/// section of unit size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SuperToroid {
  pub ring_radius: f32,
  pub exponents: Vec3,
}

impl Shape for SuperToroid {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    let e = self.exponents;
    let a = p.abs();
    let ring = (a.x.powf(e.x) + a.y.powf(e.y)).powf(2.0 / (e.x + e.y));
    let q = (self.ring_radius - ring).abs();
    (q.powf(e.z) + a.z.powf(e.z)).powf(1.0 / e.z) - 1.0
  }

  fn size(&self) -> Vec3 {
    Vec3::new(self.ring_radius + 1.0, self.ring_radius + 1.0, 1.0)
  }
}

/// Noise height field over the unit square, `zscale` deep.
///
/// Heights are `zscale * 0.5 * fbm(xy * xyscale)`. Distances are only a
/// bound on steep slopes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landscape {
  pub zscale: f32,
  pub xyscale: f32,
}

impl Landscape {
  pub fn height(&self, xy: Vec2) -> f32 {
    self.zscale * 0.5 * fbm2(xy * self.xyscale)
  }
}

impl Shape for Landscape {
  #[inline]
  fn eval(&self, p: Vec3) -> f32 {
    let h = self.height(p.xy());
    (p.z - h)
      .max(-self.zscale - p.z)
      .max(p.x.abs() - 1.0)
      .max(p.y.abs() - 1.0)
  }

  fn size(&self) -> Vec3 {
    Vec3::new(1.0, 1.0, self.zscale)
  }
}

//! Distance field construction.
//!
//! # Coordinate Frames
//!
//! ```text
//! grid  = (world + trans) * scale
//! world = grid / scale - trans
//!
//! scale: cells per world unit (subdiv / largest scene extent)
//! trans: puts the scene's low corner GRID_BORDER cells into the grid
//! ```
//!
//! Distances stored in the grid are in cell units, so smoothing radii are
//! scaled by `scale` as well.
//!
//! # Parallelism
//!
//! Each primitive touches a box of cells. The box's X range is split into
//! one task per X slice on the [`FillPool`]; slices are disjoint so tasks
//! never share a cell. Primitives are processed one after another, in
//! scene order, because blending is order dependent.

use glam::{IVec3, Vec3};
use rayon::prelude::*;

use crate::constants::{GRID_BORDER, MIN_FILL_EXTENT};
use crate::grid::Grid;
use crate::implicit::{Group, Node, Primitive, Shape, ShapeKind};
use crate::threading::FillPool;
use crate::types::{color_conversion, Color, DistVert, MinMaxAABB};

/// Mapping between world space and grid cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridFrame {
  /// Cells per world unit.
  pub scale: f32,
  pub trans: Vec3,
  pub dim: IVec3,

  /// Largest primitive smoothing radius in the scene (world units).
  pub max_smooth_k: f32,
}

impl GridFrame {
  /// Frame whose largest axis spans `subdiv` cells of `bounds`.
  ///
  /// Returns `None` when the bounds are empty or flat.
  pub fn for_bounds(bounds: &MinMaxAABB, subdiv: i32, max_smooth_k: f32) -> Option<Self> {
    if !bounds.is_valid() {
      return None;
    }

    let extent = bounds.size();
    let max_extent = extent.max_element();
    if !max_extent.is_finite() || max_extent <= 0.0 {
      return None;
    }

    let scale = subdiv as f32 / max_extent;
    let trans = Vec3::splat(GRID_BORDER as f32 / scale) - Vec3::from_array(bounds.min);
    let dim = (extent * scale).ceil().as_ivec3() + IVec3::splat(2 * GRID_BORDER + 1);

    Some(Self {
      scale,
      trans,
      dim,
      max_smooth_k,
    })
  }

  #[inline(always)]
  pub fn world_to_grid(&self, world: Vec3) -> Vec3 {
    (world + self.trans) * self.scale
  }

  #[inline(always)]
  pub fn grid_to_world(&self, grid: Vec3) -> Vec3 {
    grid / self.scale - self.trans
  }

  /// World size of one cell.
  #[inline(always)]
  pub fn cell_size(&self) -> f32 {
    1.0 / self.scale
  }
}

/// A filled grid and the frame it was filled in.
#[derive(Clone, Debug)]
pub struct DistanceField {
  pub grid: Grid<DistVert>,
  pub frame: GridFrame,
}

impl DistanceField {
  /// Size the grid around `scene` and blend every primitive into it.
  ///
  /// Returns `None` when nothing in the scene adds material.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "fill::build"))]
  pub fn build(scene: &Group, subdiv: i32, pool: &FillPool) -> Option<Self> {
    // Scene is immutable from here on; the smoothing margin is fixed once.
    let max_smooth_k = scene.max_smooth_k();
    let bounds = scene.world_bounds(max_smooth_k);
    let frame = GridFrame::for_bounds(&bounds, subdiv, max_smooth_k)?;

    let mut grid = Grid::new(frame.dim, DistVert::default());
    fill_group(scene, &mut grid, &frame, pool);

    #[cfg(feature = "tracing")]
    tracing::debug!(dim = %frame.dim, scale = frame.scale, "distance field filled");

    Some(Self { grid, frame })
  }

  /// Sample at a grid position.
  #[inline(always)]
  pub fn get(&self, pos: IVec3) -> &DistVert {
    self.grid.get(pos)
  }
}

/// Blend every primitive below `group` into `grid`, in tree order.
pub fn fill_group(group: &Group, grid: &mut Grid<DistVert>, frame: &GridFrame, pool: &FillPool) {
  for child in &group.children {
    match child {
      Node::Primitive(primitive) if is_too_small(primitive, frame) => {}
      Node::Primitive(primitive) => fill_primitive(primitive, grid, frame, pool),
      // Groups have no extent of their own; the size check applies per primitive.
      Node::Group(inner) => fill_group(inner, grid, frame, pool),
    }
  }
}

/// Near-zero shapes would not produce a single cell crossing.
fn is_too_small(primitive: &Primitive, frame: &GridFrame) -> bool {
  let shape_half = primitive.world_half_extent(0.0);
  shape_half.dot(Vec3::splat(frame.scale)) <= MIN_FILL_EXTENT
}

/// Blend one primitive into the cells its bounds cover.
pub fn fill_primitive(
  primitive: &Primitive,
  grid: &mut Grid<DistVert>,
  frame: &GridFrame,
  pool: &FillPool,
) {
  let half = primitive.world_half_extent(frame.max_smooth_k);
  let origin = primitive.transform.origin;
  let lo = frame.world_to_grid(origin - half).floor().as_ivec3();
  let hi = frame.world_to_grid(origin + half).ceil().as_ivec3() + IVec3::ONE;

  let dim = grid.dim();
  let start = lo.clamp(IVec3::ZERO, dim);
  let end = hi.clamp(start, dim);
  if start.cmpge(end).any() {
    return;
  }

  // Monomorphize the per-cell loop for each shape.
  match &primitive.shape {
    ShapeKind::Sphere(s) => fill_shape(s, primitive, grid, frame, start, end, pool),
    ShapeKind::Cube(s) => fill_shape(s, primitive, grid, frame, start, end, pool),
    ShapeKind::Cylinder(s) => fill_shape(s, primitive, grid, frame, start, end, pool),
    ShapeKind::TaperedCylinder(s) => fill_shape(s, primitive, grid, frame, start, end, pool),
    ShapeKind::SuperQuadric(s) => fill_shape(s, primitive, grid, frame, start, end, pool),
    ShapeKind::SuperQuadricNonUniform(s) => {
      fill_shape(s, primitive, grid, frame, start, end, pool)
    }
    ShapeKind::SuperToroid(s) => fill_shape(s, primitive, grid, frame, start, end, pool),
    ShapeKind::Landscape(s) => fill_shape(s, primitive, grid, frame, start, end, pool),
  }
}

fn fill_shape<S: Shape + Sync>(
  shape: &S,
  primitive: &Primitive,
  grid: &mut Grid<DistVert>,
  frame: &GridFrame,
  start: IVec3,
  end: IVec3,
  pool: &FillPool,
) {
  let k = primitive.smooth_k * frame.scale;
  let dist_scale = primitive.transform.avg_scale() * frame.scale;
  let transform = primitive.transform;
  let material = primitive.material;
  let carve = material.is_carve();
  let color = color_conversion::to_color(material.color);

  pool.install(|| {
    grid.par_slices_mut(start.x..end.x).for_each(|mut slice| {
      let x = slice.x as f32;
      for y in start.y..end.y {
        for z in start.z..end.z {
          let world = frame.grid_to_world(Vec3::new(x, y as f32, z as f32));
          let d = shape.eval(transform.to_local(world)) * dist_scale;
          let dv = slice.get_mut(y, z);

          if carve {
            dv.dist = smooth_max(-d, dv.dist, k);
          } else {
            blend_union(dv, d, k, material.color, color);
          }
        }
      }
    });
  });
}

#[inline(always)]
fn blend_union(dv: &mut DistVert, d: f32, k: f32, material: glam::Vec4, quantized: Color) {
  let h = smooth_min_h(dv.dist, d, k);
  dv.dist = smooth_min(dv.dist, d, k);

  dv.color = if dv.color[3] > 0 {
    let existing = color_conversion::to_vec4(dv.color);
    color_conversion::to_color(material.lerp(existing, h))
  } else {
    quantized
  };
}

/// Blend weight of `a` in [`smooth_min`]: 1 keeps `a`, 0 keeps `b`.
#[inline(always)]
pub fn smooth_min_h(a: f32, b: f32, k: f32) -> f32 {
  if k <= 0.0 {
    return if a < b { 1.0 } else { 0.0 };
  }
  (0.5 + 0.5 * (b - a) / k).clamp(0.0, 1.0)
}

/// Polynomial smooth minimum with radius `k`.
///
/// Returns an operand unchanged when the blend weight saturates, so an
/// untouched `+∞` cell is replaced exactly.
#[inline(always)]
pub fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
  let h = smooth_min_h(a, b, k);
  if h <= 0.0 {
    b
  } else if h >= 1.0 {
    a
  } else {
    b + (a - b) * h - k * h * (1.0 - h)
  }
}

/// Polynomial smooth maximum with radius `k`.
#[inline(always)]
pub fn smooth_max(a: f32, b: f32, k: f32) -> f32 {
  -smooth_min(-a, -b, k)
}

#[cfg(test)]
#[path = "fill_test.rs"]
mod fill_test;

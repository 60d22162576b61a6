//! Marching cubes over a filled distance grid.
//!
//! ```text
//! for each cube (x, y, z) in [0, dim - 1)^3:
//!   mask = bit i set when corner i is inside (dist < 0)
//!   mask 0 / 255 → no surface
//!   TRI_TABLE[mask] → edge triplets
//!   each edge → EdgeGrid slot (x, y, z, axis) → shared vertex
//! ```
//!
//! Vertices stay in grid space; the pipeline maps them to world space once
//! the mesh is final.

use glam::{IVec3, Vec3};

use super::Surface;
use crate::constants::{CORNER_OFFSETS, EDGE_SNAP_EPSILON};
use crate::edge_table::{triangles, EDGE_AXIS, EDGE_BASE, EDGE_CORNERS};
use crate::grid::Grid;
use crate::types::{Color, DistVert};

/// A surface crossing on a grid edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
  /// Linear index of the endpoint nearer the crossing.
  pub closest: usize,

  /// Crossing position in grid space.
  pub pos: Vec3,

  /// Color of the inside endpoint.
  pub color: Color,
}

/// Interpolate the zero crossing between two neighbouring samples.
///
/// A `+∞` endpoint was never reached by any primitive; the crossing then
/// sits on the other endpoint.
pub fn verts_to_edge(grid: &Grid<DistVert>, p1: IVec3, p2: IVec3) -> Edge {
  let v1 = grid.get(p1);
  let v2 = grid.get(p2);

  let mu = if !v1.dist.is_finite() {
    1.0
  } else if !v2.dist.is_finite() {
    0.0
  } else {
    let mu = -v1.dist / (v2.dist - v1.dist);
    if mu < EDGE_SNAP_EPSILON {
      0.0
    } else if mu > 1.0 - EDGE_SNAP_EPSILON {
      1.0
    } else {
      mu
    }
  };

  let a = p1.as_vec3();
  let b = p2.as_vec3();
  let color = if v1.dist < v2.dist { v1.color } else { v2.color };
  let closest = if mu < 0.5 { p1 } else { p2 };

  Edge {
    closest: grid.linear_index(closest),
    pos: a + (b - a) * mu,
    color,
  }
}

/// One vertex slot per grid corner per axis; `-1` = no vertex yet.
pub struct EdgeGrid {
  slots: Grid<[i32; 3]>,
}

impl EdgeGrid {
  pub fn new(dim: IVec3) -> Self {
    Self {
      slots: Grid::new(dim, [-1; 3]),
    }
  }

  /// Vertex index for the edge starting at `base` along `axis`, creating
  /// it with `make` on first use.
  #[inline]
  pub fn get_or_insert(&mut self, base: IVec3, axis: usize, make: impl FnOnce() -> u32) -> u32 {
    let slot = &mut self.slots.get_mut(base)[axis];
    if *slot < 0 {
      *slot = make() as i32;
    }
    *slot as u32
  }
}

#[inline(always)]
fn corner_mask(grid: &Grid<DistVert>, cell: IVec3) -> u8 {
  let mut mask = 0u8;
  for (i, offset) in CORNER_OFFSETS.iter().enumerate() {
    if grid.get(cell + IVec3::from_array(*offset)).dist < 0.0 {
      mask |= 1 << i;
    }
  }
  mask
}

/// Extract the zero isosurface of `grid`.
///
/// Triangles are wound counter-clockwise seen from outside the solid.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "polygonize::marching_cubes"))]
pub fn extract(grid: &Grid<DistVert>) -> Surface {
  let dim = grid.dim();
  let mut surface = Surface::default();
  if dim.cmplt(IVec3::splat(2)).any() {
    return surface;
  }

  let mut edge_grid = EdgeGrid::new(dim);

  for x in 0..dim.x - 1 {
    for y in 0..dim.y - 1 {
      for z in 0..dim.z - 1 {
        let cell = IVec3::new(x, y, z);
        let mask = corner_mask(grid, cell);
        if mask == 0 || mask == 255 {
          continue;
        }

        for tri in triangles(mask) {
          let [a, b, c] = tri.map(|edge| {
            let base = cell + IVec3::from_array(EDGE_BASE[edge]);
            edge_grid.get_or_insert(base, EDGE_AXIS[edge], || {
              let [c0, c1] = EDGE_CORNERS[edge];
              let p1 = cell + IVec3::from_array(CORNER_OFFSETS[c0 as usize]);
              let p2 = cell + IVec3::from_array(CORNER_OFFSETS[c1 as usize]);
              surface.edges.push(verts_to_edge(grid, p1, p2));
              (surface.edges.len() - 1) as u32
            })
          });

          // Table order faces inward.
          surface.indices.extend_from_slice(&[a, c, b]);
        }
      }
    }
  }

  #[cfg(feature = "tracing")]
  tracing::debug!(
    edges = surface.edges.len(),
    triangles = surface.indices.len() / 3,
    "marching cubes"
  );

  surface
}

#[cfg(test)]
#[path = "marching_cubes_test.rs"]
mod marching_cubes_test;

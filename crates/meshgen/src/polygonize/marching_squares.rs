//! Experimental slice polygonizer.
//!
//! Each Z slice is contoured with marching squares and the contour is
//! extruded as a wall up to the next slice. Cells whose slice above is
//! completely outside get a flat cap at the top of the wall.
//!
//! ```text
//!   3 ──(2)── 2        square corners = cube corners 0..3
//!   │         │        square edges   = cube edges 0..3
//!  (3)       (1)
//!   │         │        fill points: 0..3 corners, 4..7 edges 0..3
//!   0 ──(0)── 1
//! ```
//!
//! Known gaps: slices are not clipped against each other, bottoms are never
//! capped, and the saddle cases 5 and 10 always separate the two inside
//! corners.

use std::collections::HashMap;

use glam::IVec3;

use super::marching_cubes::{verts_to_edge, Edge};
use super::Surface;
use crate::constants::CORNER_OFFSETS;
use crate::grid::Grid;
use crate::types::DistVert;

/// Contour segments per square case, as pairs of square edges. Walking from
/// the first to the second edge keeps the inside on the right, so the
/// extruded wall faces out.
const SQUARE_SEGMENTS: [&[[u8; 2]]; 16] = [
  &[],
  &[[3, 0]],
  &[[0, 1]],
  &[[3, 1]],
  &[[1, 2]],
  &[[3, 0], [1, 2]],
  &[[0, 2]],
  &[[3, 2]],
  &[[2, 3]],
  &[[2, 0]],
  &[[0, 1], [2, 3]],
  &[[2, 1]],
  &[[1, 3]],
  &[[1, 0]],
  &[[0, 3]],
  &[],
];

/// Triangulation of the inside region per square case, counter-clockwise
/// seen from +Z.
const SQUARE_FILL: [&[[u8; 3]]; 16] = [
  &[],
  &[[0, 4, 7]],
  &[[4, 1, 5]],
  &[[0, 1, 5], [0, 5, 7]],
  &[[5, 2, 6]],
  &[[0, 4, 7], [5, 2, 6]],
  &[[4, 1, 2], [4, 2, 6]],
  &[[0, 1, 2], [0, 2, 6], [0, 6, 7]],
  &[[6, 3, 7]],
  &[[0, 4, 6], [0, 6, 3]],
  &[[4, 1, 5], [6, 3, 7]],
  &[[0, 1, 5], [0, 5, 6], [0, 6, 3]],
  &[[5, 2, 3], [5, 3, 7]],
  &[[0, 4, 5], [0, 5, 2], [0, 2, 3]],
  &[[4, 1, 2], [4, 2, 3], [4, 3, 7]],
  &[[0, 1, 2], [0, 2, 3]],
];

/// Vertex identity: cell corner, point kind and whether it was lifted to
/// the slice above.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct PointKey {
  cell: IVec3,
  point: u8,
  lifted: bool,
}

struct SliceBuilder<'a> {
  grid: &'a Grid<DistVert>,
  lookup: HashMap<PointKey, u32>,
  surface: Surface,
}

impl<'a> SliceBuilder<'a> {
  fn new(grid: &'a Grid<DistVert>) -> Self {
    Self {
      grid,
      lookup: HashMap::new(),
      surface: Surface::default(),
    }
  }

  /// Vertex for fill point `point` of the square at `cell`.
  fn point(&mut self, cell: IVec3, point: u8, lifted: bool) -> u32 {
    // Normalize edge points to the lower corner so neighbours share them.
    let (cell, point) = match point {
      0..=3 => (cell + IVec3::from_array(CORNER_OFFSETS[point as usize]), 0),
      4 | 6 => (cell + IVec3::new(0, (point == 6) as i32, 0), 4),
      _ => (cell + IVec3::new((point == 5) as i32, 0, 0), 5),
    };
    let key = PointKey { cell, point, lifted };

    if let Some(&index) = self.lookup.get(&key) {
      return index;
    }

    let mut edge = match point {
      0 => Edge {
        closest: self.grid.linear_index(cell),
        pos: cell.as_vec3(),
        color: self.grid.get(cell).color,
      },
      4 => verts_to_edge(self.grid, cell, cell + IVec3::X),
      _ => verts_to_edge(self.grid, cell, cell + IVec3::Y),
    };

    if lifted {
      edge.pos.z += 1.0;
      let above = self.grid.position_of(edge.closest) + IVec3::Z;
      edge.closest = self.grid.linear_index(above);
    }

    let index = self.surface.edges.len() as u32;
    self.surface.edges.push(edge);
    self.lookup.insert(key, index);
    index
  }
}

fn square_case(grid: &Grid<DistVert>, cell: IVec3) -> usize {
  let mut case = 0;
  for (i, offset) in CORNER_OFFSETS[..4].iter().enumerate() {
    if grid.get(cell + IVec3::from_array(*offset)).dist < 0.0 {
      case |= 1 << i;
    }
  }
  case
}

/// Extract slice-extruded walls and top caps from `grid`.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "polygonize::marching_squares"))]
pub fn extract(grid: &Grid<DistVert>) -> Surface {
  let dim = grid.dim();
  if dim.cmplt(IVec3::splat(2)).any() {
    return Surface::default();
  }

  let mut builder = SliceBuilder::new(grid);

  for z in 0..dim.z - 1 {
    for y in 0..dim.y - 1 {
      for x in 0..dim.x - 1 {
        let cell = IVec3::new(x, y, z);
        let case = square_case(grid, cell);
        if case == 0 {
          continue;
        }

        for &[e0, e1] in SQUARE_SEGMENTS[case] {
          // Square edge e is fill point 4 + e.
          let p0 = builder.point(cell, 4 + e0, false);
          let p1 = builder.point(cell, 4 + e1, false);
          let p0_up = builder.point(cell, 4 + e0, true);
          let p1_up = builder.point(cell, 4 + e1, true);

          builder
            .surface
            .indices
            .extend_from_slice(&[p0, p0_up, p1_up, p0, p1_up, p1]);
        }

        if square_case(grid, cell + IVec3::Z) == 0 {
          for &tri in SQUARE_FILL[case] {
            let [a, b, c] = tri.map(|p| builder.point(cell, p, true));
            builder.surface.indices.extend_from_slice(&[a, b, c]);
          }
        }
      }
    }
  }

  builder.surface
}

#[cfg(test)]
#[path = "marching_squares_test.rs"]
mod marching_squares_test;

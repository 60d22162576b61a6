//! Mesh displacement: merge every edge vertex into its nearest grid corner.
//!
//! All crossings whose closest corner is the same collapse into one vertex
//! at their average position and color. This removes the thin triangles
//! marching cubes produces near corners and roughly halves the vertex
//! count. Triangles that end up with a repeated vertex are dropped.

use glam::Vec3;

use super::Surface;
use crate::grid::Grid;
use crate::types::{Color, DistVert, Mesh, MeshVertex};

const EMPTY: u32 = u32::MAX;

/// Per-corner vertex state.
///
/// Accumulates crossings until a triangle first references the corner,
/// then becomes a fixed output vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CornerVertex {
  Accumulating {
    pos_sum: Vec3,
    color_sum: [u32; 4],
    count: u32,
  },
  Finalized {
    index: u32,
  },
}

impl CornerVertex {
  fn add(&mut self, pos: Vec3, color: Color) {
    if let CornerVertex::Accumulating {
      pos_sum,
      color_sum,
      count,
    } = self
    {
      *pos_sum += pos;
      for (sum, c) in color_sum.iter_mut().zip(color) {
        *sum += c as u32;
      }
      *count += 1;
    }
  }

  /// Output vertex index, emitting the averaged vertex on first call.
  fn finalize(&mut self, vertices: &mut Vec<MeshVertex>) -> u32 {
    match *self {
      CornerVertex::Finalized { index } => index,
      CornerVertex::Accumulating {
        pos_sum,
        color_sum,
        count,
      } => {
        let n = count.max(1);
        let color = color_sum.map(|c| ((c + n / 2) / n) as u8);
        let index = vertices.len() as u32;
        vertices.push(MeshVertex::new(pos_sum / n as f32, color));
        *self = CornerVertex::Finalized { index };
        index
      }
    }
  }
}

/// Build a mesh from `surface`, one vertex per referenced grid corner.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "polygonize::displace"))]
pub fn displace(surface: &Surface, grid: &Grid<DistVert>) -> Mesh {
  let mut corner_map: Grid<u32> = Grid::new(grid.dim(), EMPTY);
  let mut corners: Vec<CornerVertex> = Vec::new();

  // Edge index → corner slot.
  let mut edge_corner = Vec::with_capacity(surface.edges.len());

  for edge in &surface.edges {
    let slot = corner_map.get_mut(grid.position_of(edge.closest));
    if *slot == EMPTY {
      *slot = corners.len() as u32;
      corners.push(CornerVertex::Accumulating {
        pos_sum: Vec3::ZERO,
        color_sum: [0; 4],
        count: 0,
      });
    }
    corners[*slot as usize].add(edge.pos, edge.color);
    edge_corner.push(*slot);
  }

  let mut mesh = Mesh::new();
  mesh.indices.reserve(surface.indices.len());

  for tri in surface.indices.chunks_exact(3) {
    let [a, b, c] = [tri[0], tri[1], tri[2]]
      .map(|e| corners[edge_corner[e as usize] as usize].finalize(&mut mesh.vertices));

    if a != b && b != c && a != c {
      mesh.indices.extend_from_slice(&[a, b, c]);
    }
  }

  #[cfg(feature = "tracing")]
  tracing::debug!(
    vertices = mesh.vertices.len(),
    dropped = (surface.indices.len() - mesh.indices.len()) / 3,
    "mesh displacement"
  );

  mesh
}

#[cfg(test)]
#[path = "displacement_test.rs"]
mod displacement_test;

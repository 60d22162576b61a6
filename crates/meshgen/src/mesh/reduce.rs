//! Greedy polygon reduction on flat regions.
//!
//! # Pass Structure
//!
//! ```text
//! 1. flat vertices: every incident face normal within `epsilon` of the
//!    vertex normal
//! 2. walk triangle edges; for an edge (a, b) with both ends flat and Free:
//!      try collapsing both onto their midpoint
//!      reject if a surviving neighbour triangle
//!        - turns its normal below `epsilon`, or
//!        - gains a corner sharper than `max_tri_corner_dot`
//!      accept → a, b Paired; every vertex of their triangles Locked
//! 3. apply pairs, drop collapsed triangles, compact
//! ```
//!
//! Locking keeps collapses within one pass independent: no triangle is
//! touched by two collapses, so each validation stays correct after all
//! pairs are applied together.

use glam::Vec3;

use super::normals::{self, face_normal};
use super::vertex_triangles;
use crate::constants::REDUCE_MIN_PROGRESS;
use crate::types::{Mesh, MeshConfig};

/// Reduction thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReduceParams {
  pub passes: u32,

  /// Minimum unit normal dot product counted as flat.
  pub epsilon: f32,

  /// Largest allowed corner cosine for triangles touched by a collapse.
  pub max_tri_corner_dot: f32,
}

impl From<&MeshConfig> for ReduceParams {
  fn from(config: &MeshConfig) -> Self {
    Self {
      passes: config.poly_reduction_passes,
      epsilon: config.flat_epsilon,
      max_tri_corner_dot: config.max_tri_corner_dot,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PairState {
  Free,
  Locked,
  Paired(u32),
}

/// Run up to `params.passes` reduction passes.
///
/// Stops early once a pass removes fewer than [`REDUCE_MIN_PROGRESS`]
/// triangles. Returns the total number of removed triangles; normals are
/// recomputed afterwards.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mesh::reduce"))]
pub fn reduce(mesh: &mut Mesh, params: &ReduceParams) -> usize {
  let start = mesh.triangle_count();

  for _pass in 0..params.passes {
    let removed = reduce_pass(mesh, params);

    #[cfg(feature = "tracing")]
    tracing::debug!(pass = _pass, removed, "reduction pass");

    if removed < REDUCE_MIN_PROGRESS {
      break;
    }
  }

  normals::recompute(mesh);
  start - mesh.triangle_count()
}

/// Largest corner cosine of a triangle (sharpest corner).
fn max_corner_cos(p: [Vec3; 3]) -> f32 {
  (0..3)
    .map(|k| {
      let e1 = (p[(k + 1) % 3] - p[k]).normalize_or_zero();
      let e2 = (p[(k + 2) % 3] - p[k]).normalize_or_zero();
      e1.dot(e2)
    })
    .fold(f32::NEG_INFINITY, f32::max)
}

struct PassContext<'a> {
  mesh: &'a Mesh,
  faces: Vec<Vec3>,
  incident: Vec<super::Incident>,
  params: &'a ReduceParams,
}

impl PassContext<'_> {
  fn positions(&self, t: usize) -> [Vec3; 3] {
    self.mesh.triangle(t).map(|i| self.mesh.vertices[i].pos())
  }

  fn is_flat(&self, v: usize, normal: Vec3) -> bool {
    !self.incident[v].is_empty()
      && self.incident[v]
        .iter()
        .all(|&t| self.faces[t as usize].normalize_or_zero().dot(normal) >= self.params.epsilon)
  }

  /// Check every triangle around `a` and `b` after moving both to `mid`.
  fn collapse_is_valid(&self, a: usize, b: usize, mid: Vec3) -> bool {
    for &t in self.incident[a].iter().chain(self.incident[b].iter()) {
      let t = t as usize;
      let tri = self.mesh.triangle(t);
      if tri.contains(&a) && tri.contains(&b) {
        continue;
      }

      let old = self.positions(t);
      let mut new = old;
      for (k, &i) in tri.iter().enumerate() {
        if i == a || i == b {
          new[k] = mid;
        }
      }

      let old_n = self.faces[t].normalize_or_zero();
      let new_n = (new[1] - new[0]).cross(new[2] - new[0]).normalize_or_zero();
      if new_n == Vec3::ZERO || new_n.dot(old_n) < self.params.epsilon {
        return false;
      }

      let cos = max_corner_cos(new);
      if cos > self.params.max_tri_corner_dot && cos > max_corner_cos(old) {
        return false;
      }
    }
    true
  }
}

fn reduce_pass(mesh: &mut Mesh, params: &ReduceParams) -> usize {
  let before = mesh.triangle_count();
  let vertex_count = mesh.vertices.len();

  let state = {
    let ctx = PassContext {
      mesh,
      faces: (0..before).map(|t| face_normal(mesh, t)).collect(),
      incident: vertex_triangles(mesh),
      params,
    };

    let flat: Vec<bool> = (0..vertex_count)
      .map(|v| {
        let normal = ctx.incident[v]
          .iter()
          .map(|&t| ctx.faces[t as usize])
          .sum::<Vec3>()
          .normalize_or_zero();
        ctx.is_flat(v, normal)
      })
      .collect();

    let mut state = vec![PairState::Free; vertex_count];

    for t in 0..before {
      let tri = mesh.triangle(t);
      for k in 0..3 {
        let (a, b) = (tri[k], tri[(k + 1) % 3]);
        if !(flat[a] && flat[b]) || state[a] != PairState::Free || state[b] != PairState::Free {
          continue;
        }

        let mid = (mesh.vertices[a].pos() + mesh.vertices[b].pos()) * 0.5;
        if !ctx.collapse_is_valid(a, b, mid) {
          continue;
        }

        state[a] = PairState::Paired(b as u32);
        state[b] = PairState::Paired(a as u32);
        for &t2 in ctx.incident[a].iter().chain(ctx.incident[b].iter()) {
          for v in mesh.triangle(t2 as usize) {
            if state[v] == PairState::Free {
              state[v] = PairState::Locked;
            }
          }
        }
      }
    }

    state
  };

  let mut remap: Vec<u32> = (0..vertex_count as u32).collect();
  for a in 0..vertex_count {
    let PairState::Paired(b) = state[a] else {
      continue;
    };
    let b = b as usize;
    if a > b {
      continue;
    }

    let (va, vb) = (mesh.vertices[a], mesh.vertices[b]);
    let merged = &mut mesh.vertices[a];
    merged.position = ((va.pos() + vb.pos()) * 0.5).to_array();
    for c in 0..4 {
      merged.color[c] = ((va.color[c] as u16 + vb.color[c] as u16 + 1) / 2) as u8;
    }
    remap[b] = a as u32;
  }

  for index in &mut mesh.indices {
    *index = remap[*index as usize];
  }
  mesh.drop_degenerate_triangles();
  mesh.compact();

  before - mesh.triangle_count()
}

#[cfg(test)]
#[path = "reduce_test.rs"]
mod reduce_test;

//! Mesh clean-up and finishing passes.
//!
//! All passes work on a world-space [`Mesh`](crate::types::Mesh) in place
//! and run single-threaded after the fill has joined.

pub mod cull;
pub mod normals;
pub mod post;
pub mod reduce;

use smallvec::SmallVec;

use crate::types::Mesh;

/// Triangles incident to one vertex. Marching cubes vertices rarely touch
/// more than eight.
pub(crate) type Incident = SmallVec<[u32; 8]>;

/// Vertex → incident triangle lists.
pub(crate) fn vertex_triangles(mesh: &Mesh) -> Vec<Incident> {
  let mut incident = vec![Incident::new(); mesh.vertices.len()];
  for (t, tri) in mesh.indices.chunks_exact(3).enumerate() {
    for &i in tri {
      incident[i as usize].push(t as u32);
    }
  }
  incident
}

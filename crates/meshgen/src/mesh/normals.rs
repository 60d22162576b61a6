//! Vertex normals from triangle geometry.
//!
//! Each vertex gets the plain sum of the unnormalized face normals
//! (`cross(p1 - p0, p2 - p0)`) of its triangles, so larger faces weigh
//! more. Normals are left unnormalized; consumers normalize on upload.

use glam::Vec3;

use crate::types::Mesh;

/// Unnormalized normal of triangle `t`.
#[inline(always)]
pub fn face_normal(mesh: &Mesh, t: usize) -> Vec3 {
  let [a, b, c] = mesh.triangle(t).map(|i| mesh.vertices[i].pos());
  (b - a).cross(c - a)
}

/// Recompute every vertex normal from positions and topology.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mesh::normals"))]
pub fn recompute(mesh: &mut Mesh) {
  let mut sums = vec![Vec3::ZERO; mesh.vertices.len()];

  for t in 0..mesh.triangle_count() {
    let n = face_normal(mesh, t);
    for i in mesh.triangle(t) {
      sums[i] += n;
    }
  }

  for (vertex, n) in mesh.vertices.iter_mut().zip(sums) {
    vertex.normal = n.to_array();
  }
}

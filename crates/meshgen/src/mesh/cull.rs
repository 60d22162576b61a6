//! Degenerate triangle culling.
//!
//! Marching cubes near saddle points and mesh displacement can fold a
//! triangle back over its neighbours. Such a triangle faces almost exactly
//! against the averaged normal of its corners. A vertex touching a face
//! like that is a problem vertex; triangles made only of problem vertices
//! are removed.

use glam::Vec3;

use super::normals::face_normal;
use crate::constants::CULL_FLIP_DOT;
use crate::types::Mesh;

/// Remove flipped sliver triangles and compact the vertex buffer.
///
/// Returns the number of removed triangles.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mesh::cull"))]
pub fn cull_degenerate(mesh: &mut Mesh) -> usize {
  let faces: Vec<Vec3> = (0..mesh.triangle_count())
    .map(|t| face_normal(mesh, t))
    .collect();

  let mut vertex_normals = vec![Vec3::ZERO; mesh.vertices.len()];
  for (t, n) in faces.iter().enumerate() {
    for i in mesh.triangle(t) {
      vertex_normals[i] += *n;
    }
  }

  let mut problem = vec![false; mesh.vertices.len()];
  for (t, n) in faces.iter().enumerate() {
    let face = n.normalize_or_zero();
    for i in mesh.triangle(t) {
      if face.dot(vertex_normals[i].normalize_or_zero()) < CULL_FLIP_DOT {
        problem[i] = true;
      }
    }
  }

  let before = mesh.triangle_count();
  let mut kept = Vec::with_capacity(mesh.indices.len());
  for tri in mesh.indices.chunks_exact(3) {
    if !tri.iter().all(|&i| problem[i as usize]) {
      kept.extend_from_slice(tri);
    }
  }
  mesh.indices = kept;
  mesh.compact();

  let removed = before - mesh.triangle_count();

  #[cfg(feature = "tracing")]
  tracing::debug!(removed, "culled degenerate triangles");

  removed
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::MeshVertex;

  fn mesh_from(points: &[Vec3], indices: &[u32]) -> Mesh {
    let mut mesh = Mesh::new();
    for &p in points {
      mesh.vertices.push(MeshVertex::new(p, [255; 4]));
    }
    mesh.indices = indices.to_vec();
    mesh
  }

  fn tetrahedron() -> Mesh {
    mesh_from(
      &[Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
      &[0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
    )
  }

  #[test]
  fn test_closed_mesh_untouched() {
    let mut mesh = tetrahedron();
    assert_eq!(cull_degenerate(&mut mesh), 0);
    assert_eq!(mesh.triangle_count(), 4);
    assert_eq!(mesh.vertices.len(), 4);
  }

  #[test]
  fn test_flipped_sliver_removed() {
    // A large upward quad and a small downward triangle sharing its three
    // corners' neighbourhood: the small face is flipped against every
    // corner it touches.
    let mut mesh = mesh_from(
      &[
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(4.0, 4.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(2.0, 1.0, 0.0),
        Vec3::new(1.0, 2.0, 0.0),
      ],
      &[
        // Upward fan around the inner triangle.
        0, 1, 5, 0, 5, 4, 1, 2, 5, 2, 6, 5, 2, 3, 6, 3, 4, 6, 3, 0, 4,
        // Inner triangle wound downward.
        4, 6, 5,
      ],
    );

    let removed = cull_degenerate(&mut mesh);
    assert_eq!(removed, 1);
    assert_eq!(mesh.triangle_count(), 7);
    assert_eq!(mesh.vertices.len(), 7);
  }

  #[test]
  fn test_unreferenced_vertices_compacted() {
    let mut mesh = tetrahedron();
    mesh.vertices.push(MeshVertex::new(Vec3::splat(9.0), [0; 4]));
    cull_degenerate(&mut mesh);
    assert_eq!(mesh.vertices.len(), 4);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
  }
}

use approx::assert_relative_eq;
use color_conversion::*;
use glam::Vec4;

use super::*;

// Color conversion tests
#[test]
fn test_color_roundtrip() {
  let color = [12, 200, 99, 255];
  assert_eq!(to_color(to_vec4(color)), color);
}

#[test]
fn test_color_clamping() {
  assert_eq!(to_color(Vec4::new(2.0, -1.0, 0.5, 1.0)), [255, 0, 128, 255]);
}

#[test]
fn test_dist_vert_default_is_empty() {
  let dv = DistVert::default();
  assert!(dv.dist.is_infinite() && dv.dist > 0.0);
  assert_eq!(dv.color, [0, 0, 0, 0]);
}

#[test]
fn test_mesh_vertex_is_tightly_packed() {
  assert_eq!(std::mem::size_of::<MeshVertex>(), 28);
  let v = MeshVertex::new(Vec3::new(1.0, 2.0, 3.0), [1, 2, 3, 4]);
  let bytes: &[u8] = bytemuck::bytes_of(&v);
  assert_eq!(&bytes[24..], &[1, 2, 3, 4]);
}

// General types tests
#[test]
fn test_aabb_encapsulate() {
  let mut aabb = MinMaxAABB::empty();
  assert!(!aabb.is_valid());
  aabb.encapsulate([1.0, 2.0, 3.0]);
  aabb.encapsulate([-1.0, -2.0, -3.0]);

  assert_eq!(aabb.min, [-1.0, -2.0, -3.0]);
  assert_eq!(aabb.max, [1.0, 2.0, 3.0]);
  assert!(aabb.is_valid());
  assert_eq!(aabb.size(), Vec3::new(2.0, 4.0, 6.0));
  assert_eq!(aabb.center(), Vec3::ZERO);
}

#[test]
fn test_aabb_union_ignores_empty() {
  let mut aabb = MinMaxAABB::from_center_half(Vec3::ONE, Vec3::splat(0.5));
  aabb.union(&MinMaxAABB::empty());
  assert_eq!(aabb.min, [0.5; 3]);
  assert_eq!(aabb.max, [1.5; 3]);
}

fn quad() -> Mesh {
  let mut mesh = Mesh::new();
  for p in [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(5.0, 5.0, 5.0),
  ] {
    mesh.vertices.push(MeshVertex::new(p, [255; 4]));
  }
  mesh.indices = vec![0, 1, 2, 0, 2, 3];
  mesh
}

#[test]
fn test_mesh_compact_drops_unreferenced() {
  let mut mesh = quad();
  mesh.compact();
  assert_eq!(mesh.vertices.len(), 4);
  assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
}

#[test]
fn test_mesh_drop_degenerate() {
  let mut mesh = quad();
  mesh.indices.extend_from_slice(&[1, 1, 2]);
  assert_eq!(mesh.drop_degenerate_triangles(), 1);
  assert_eq!(mesh.triangle_count(), 2);
}

#[test]
fn test_mesh_bounds_and_clear() {
  let mut mesh = quad();
  mesh.compact();
  mesh.recompute_bounds();
  assert_eq!(mesh.bounds.max, [1.0, 1.0, 0.0]);

  mesh.clear();
  assert!(mesh.is_empty());
  assert!(!mesh.bounds.is_valid());
}

#[test]
fn test_signed_volume_of_tetrahedron() {
  let mut mesh = Mesh::new();
  for p in [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z] {
    mesh.vertices.push(MeshVertex::new(p, [0; 4]));
  }
  // Outward winding.
  mesh.indices = vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];
  assert_relative_eq!(mesh.signed_volume(), 1.0 / 6.0, epsilon = 1e-6);
}

#[test]
fn test_config_builder() {
  let config = MeshConfig::new()
    .with_poly_reduction(3, 0.9, 0.8)
    .with_color_noise(0.2, 4.0)
    .with_mesh_displacement(false)
    .with_polygonizer(PolygonizerKind::MarchingSquares)
    .with_threads(2);

  assert_eq!(config.poly_reduction_passes, 3);
  assert_eq!(config.color_noise, Some(ColorNoise { intensity: 0.2, stretch: 4.0 }));
  assert!(!config.mesh_displacement);
  assert_eq!(config.polygonizer, PolygonizerKind::MarchingSquares);
  assert_eq!(config.threads, Some(2));
  assert!(config.validate().is_ok());
}

#[test]
fn test_config_defaults() {
  let config = MeshConfig::default();
  assert_eq!(config.poly_reduction_passes, 0);
  assert_eq!(config.flat_epsilon, 0.98);
  assert_eq!(config.max_tri_corner_dot, 0.95);
  assert!(config.mesh_displacement);
}

#[test]
fn test_config_validate_rejects_out_of_range() {
  let config = MeshConfig::new().with_poly_reduction(1, 1.5, 0.9);
  assert!(matches!(config.validate(), Err(MeshGenError::InvalidReduction(_))));

  let config = MeshConfig::new().with_poly_reduction(1, 0.9, -0.1);
  assert!(matches!(config.validate(), Err(MeshGenError::InvalidReduction(_))));
}

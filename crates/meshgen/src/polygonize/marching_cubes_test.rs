use std::collections::HashMap;

use approx::assert_relative_eq;

use super::*;

const CENTER: f32 = 5.5;
const RADIUS: f32 = 3.5;

/// Exact sphere distances in cell units.
fn sphere_grid(dim: i32) -> Grid<DistVert> {
  let mut grid = Grid::new(IVec3::splat(dim), DistVert::default());
  for x in 0..dim {
    for y in 0..dim {
      for z in 0..dim {
        let pos = IVec3::new(x, y, z);
        *grid.get_mut(pos) = DistVert {
          dist: (pos.as_vec3() - Vec3::splat(CENTER)).length() - RADIUS,
          color: [10, 20, 30, 255],
        };
      }
    }
  }
  grid
}

fn two_cells(d1: f32, d2: f32) -> Grid<DistVert> {
  let mut grid = Grid::new(IVec3::new(2, 1, 1), DistVert::default());
  *grid.get_mut(IVec3::ZERO) = DistVert { dist: d1, color: [1, 1, 1, 1] };
  *grid.get_mut(IVec3::X) = DistVert { dist: d2, color: [2, 2, 2, 2] };
  grid
}

#[test]
fn test_verts_to_edge_interpolates() {
  let grid = two_cells(-1.0, 3.0);
  let edge = verts_to_edge(&grid, IVec3::ZERO, IVec3::X);
  assert_relative_eq!(edge.pos.x, 0.25);
  assert_eq!(edge.color, [1, 1, 1, 1]);
  assert_eq!(edge.closest, grid.linear_index(IVec3::ZERO));
}

#[test]
fn test_verts_to_edge_closest_and_color_follow_sides() {
  let grid = two_cells(3.0, -1.0);
  let edge = verts_to_edge(&grid, IVec3::ZERO, IVec3::X);
  assert_relative_eq!(edge.pos.x, 0.75);
  assert_eq!(edge.color, [2, 2, 2, 2]);
  assert_eq!(edge.closest, grid.linear_index(IVec3::X));
}

#[test]
fn test_verts_to_edge_untouched_endpoint() {
  let grid = two_cells(f32::INFINITY, -2.0);
  let edge = verts_to_edge(&grid, IVec3::ZERO, IVec3::X);
  assert_eq!(edge.pos, Vec3::X);
  assert_eq!(edge.closest, grid.linear_index(IVec3::X));

  let edge = verts_to_edge(&grid, IVec3::X, IVec3::ZERO);
  assert_eq!(edge.pos, Vec3::X);
}

#[test]
fn test_verts_to_edge_snaps_near_endpoints() {
  let grid = two_cells(-1e-7, 1.0);
  assert_eq!(verts_to_edge(&grid, IVec3::ZERO, IVec3::X).pos, Vec3::ZERO);

  let grid = two_cells(-1.0, 1e-7);
  assert_eq!(verts_to_edge(&grid, IVec3::ZERO, IVec3::X).pos, Vec3::X);
}

#[test]
fn test_homogeneous_grid_is_empty() {
  let grid = Grid::new(IVec3::splat(4), DistVert { dist: -1.0, color: [0; 4] });
  let surface = extract(&grid);
  assert!(surface.edges.is_empty());
  assert!(surface.indices.is_empty());

  let untouched = Grid::new(IVec3::splat(4), DistVert::default());
  assert_eq!(extract(&untouched).triangle_count(), 0);
}

#[test]
fn test_sphere_surface_is_closed() {
  let surface = extract(&sphere_grid(12));
  assert!(surface.triangle_count() > 100);

  let mut edge_use: HashMap<(u32, u32), u32> = HashMap::new();
  for tri in surface.indices.chunks_exact(3) {
    for k in 0..3 {
      let (a, b) = (tri[k], tri[(k + 1) % 3]);
      *edge_use.entry((a.min(b), a.max(b))).or_default() += 1;
    }
  }
  assert!(edge_use.values().all(|&n| n == 2), "surface has open or non-manifold edges");
}

#[test]
fn test_sphere_surface_winds_outward() {
  let surface = extract(&sphere_grid(12));
  let mesh = surface.to_mesh();

  let expected = 4.0 / 3.0 * std::f32::consts::PI * RADIUS.powi(3);
  let volume = mesh.signed_volume();
  assert!(volume > 0.0, "inward winding");
  assert!((volume - expected).abs() / expected < 0.1, "volume {volume} vs {expected}");
}

#[test]
fn test_vertices_lie_on_surface() {
  let surface = extract(&sphere_grid(12));
  for edge in &surface.edges {
    let d = (edge.pos - Vec3::splat(CENTER)).length() - RADIUS;
    assert!(d.abs() < 0.2, "vertex {} is {d} cells off", edge.pos);
    assert_eq!(edge.color, [10, 20, 30, 255]);
  }
}

#[test]
fn test_edges_are_shared_between_cells() {
  let surface = extract(&sphere_grid(12));
  let mut seen = std::collections::HashSet::new();
  for edge in &surface.edges {
    let key = edge.pos.to_array().map(f32::to_bits);
    assert!(seen.insert(key), "duplicate vertex at {}", edge.pos);
  }
}

#[test]
fn test_edge_grid_slots_are_per_axis() {
  let mut edges = EdgeGrid::new(IVec3::splat(2));
  let mut next = 0;
  let mut make = || {
    next += 1;
    next
  };
  let a = edges.get_or_insert(IVec3::ZERO, 0, &mut make);
  let b = edges.get_or_insert(IVec3::ZERO, 1, &mut make);
  let again = edges.get_or_insert(IVec3::ZERO, 0, &mut make);
  assert_ne!(a, b);
  assert_eq!(a, again);
}

use glam::{IVec3, Vec3, Vec4};

use super::*;
use crate::error::MeshGenError;
use crate::implicit::{Cube, Material, Primitive, ShapeKind, Sphere, Transform};

fn pool() -> FillPool {
  FillPool::new(2).unwrap()
}

fn colored_sphere(radius: f32, origin: Vec3, color: Vec4) -> Primitive {
  Primitive::new(ShapeKind::Sphere(Sphere { radius }))
    .with_transform(Transform { origin, ..Default::default() })
    .with_material(Material { color })
    .with_smooth_k(0.0)
}

#[test]
fn test_palette_first_seen_order() {
  let mut palette = Palette::new();
  assert_eq!(palette.index_of([10, 0, 0, 255]), 1);
  assert_eq!(palette.index_of([0, 10, 0, 255]), 2);
  assert_eq!(palette.index_of([10, 0, 0, 255]), 1);
  assert_eq!(palette.len(), 2);
  assert_eq!(palette.into_colors(), vec![[10, 0, 0, 255], [0, 10, 0, 255]]);
}

#[test]
fn test_full_palette_maps_to_nearest() {
  let mut palette = Palette::new();
  for i in 0..MAX_PALETTE {
    palette.index_of([i as u8, 0, 0, 255]);
  }
  assert_eq!(palette.len(), MAX_PALETTE);

  // 255 red does not fit and lands on 254 red, entry 255.
  assert_eq!(palette.index_of([255, 0, 0, 255]), 255);
  assert_eq!(palette.index_of([3, 1, 0, 250]), 4);
  assert_eq!(palette.len(), MAX_PALETTE);
}

#[test]
fn test_voxel_color_lookup() {
  let voxels = Voxels {
    grid: Grid::new(IVec3::ONE, 1),
    palette: vec![[1, 2, 3, 4]],
  };
  assert_eq!(voxels.color(1), Some([1, 2, 3, 4]));
  assert_eq!(voxels.color(EMPTY_CELL), None);
  assert_eq!(voxels.color(2), None);
}

#[test]
fn test_sphere_voxels() {
  let mut scene = Group::new();
  scene.push(colored_sphere(1.0, Vec3::ZERO, Vec4::new(1.0, 0.0, 0.0, 1.0)));

  let voxels = convert_to_cubes(&scene, 16, &pool()).unwrap();
  assert_eq!(voxels.palette, vec![[255, 0, 0, 255]]);

  // Solid volume in cells^3 tracks the sphere volume.
  let scale = 16.0 / 2.0;
  let expected = 4.0 / 3.0 * std::f32::consts::PI * scale * scale * scale;
  let solid = voxels.solid_count() as f32;
  assert!((solid - expected).abs() / expected < 0.15, "{solid} vs {expected}");

  let dim = voxels.grid.dim();
  assert_eq!(*voxels.grid.get(IVec3::ZERO), EMPTY_CELL);
  assert_eq!(*voxels.grid.get(dim / 2), 1);
}

#[test]
fn test_two_colors_two_entries() {
  let mut scene = Group::new();
  scene.push(colored_sphere(1.0, Vec3::new(-2.0, 0.0, 0.0), Vec4::new(1.0, 0.0, 0.0, 1.0)));
  scene.push(colored_sphere(1.0, Vec3::new(2.0, 0.0, 0.0), Vec4::new(0.0, 0.0, 1.0, 1.0)));

  let voxels = convert_to_cubes(&scene, 24, &pool()).unwrap();
  assert_eq!(voxels.palette.len(), 2);
  assert!(voxels.palette.contains(&[255, 0, 0, 255]));
  assert!(voxels.palette.contains(&[0, 0, 255, 255]));
}

#[test]
fn test_continuous_grid_layout() {
  let mut scene = Group::new();
  scene.push(Primitive::new(ShapeKind::Cube(Cube { extents: Vec3::ONE })));

  let voxels = convert_to_cubes(&scene, 8, &pool()).unwrap();
  let dim = voxels.grid.dim();
  let flat = voxels.to_continuous_grid();
  assert_eq!(flat.len(), voxels.grid.len());

  let pos = IVec3::new(dim.x / 2, dim.y / 2 - 1, dim.z / 2 + 1);
  let i = (pos.z * dim.y * dim.x + pos.y * dim.x + pos.x) as usize;
  assert_eq!(flat[i], *voxels.grid.get(pos));
  assert_ne!(flat[i], EMPTY_CELL);
}

#[test]
fn test_subdivision_range() {
  let mut scene = Group::new();
  scene.push(colored_sphere(1.0, Vec3::ZERO, Vec4::ONE));
  let pool = pool();

  assert!(convert_to_cubes(&scene, MIN_SUBDIV, &pool).is_ok());
  for subdiv in [0, 1, MAX_CUBE_SUBDIV + 1] {
    assert!(matches!(
      convert_to_cubes(&scene, subdiv, &pool),
      Err(MeshGenError::InvalidSubdivision { .. })
    ));
  }
}

#[test]
fn test_empty_scene() {
  let voxels = convert_to_cubes(&Group::new(), 16, &pool()).unwrap();
  assert!(voxels.grid.is_empty());
  assert!(voxels.palette.is_empty());
}

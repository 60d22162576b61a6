use approx::assert_relative_eq;
use glam::{Mat3, Vec3, Vec4};

use super::*;

fn all_shapes() -> Vec<ShapeKind> {
  vec![
    ShapeKind::Sphere(Sphere { radius: 1.0 }),
    ShapeKind::Cube(Cube { extents: Vec3::new(1.0, 2.0, 0.5) }),
    ShapeKind::Cylinder(Cylinder { radius: 1.0, height: 2.0 }),
    ShapeKind::TaperedCylinder(TaperedCylinder { bottom: 1.0, top: 0.5, height: 1.0 }),
    ShapeKind::SuperQuadric(SuperQuadric {
      exponents: Vec3::new(4.0, 4.0, 2.0),
      scale: Vec3::new(1.0, 1.5, 1.0),
    }),
    ShapeKind::SuperQuadricNonUniform(SuperQuadricNonUniform {
      pos_exponents: Vec3::splat(2.0),
      neg_exponents: Vec3::splat(6.0),
      pos_scale: Vec3::ONE,
      neg_scale: Vec3::splat(0.5),
    }),
  ]
}

#[test]
fn test_origin_is_inside_solid_shapes() {
  for shape in all_shapes() {
    assert!(shape.eval(Vec3::ZERO) < 0.0, "{:?} should contain its origin", shape);
  }
}

#[test]
fn test_far_point_is_outside() {
  for shape in all_shapes() {
    let far = shape.size() * 3.0 + Vec3::ONE;
    assert!(shape.eval(far) > 0.0, "{:?} should not reach {}", shape, far);
  }
}

#[test]
fn test_surface_lies_within_size() {
  // Walking outwards along each axis the sign flips no later than size().
  for shape in all_shapes() {
    let size = shape.size();
    for axis in [Vec3::X, Vec3::Y, Vec3::Z, -Vec3::X, -Vec3::Y, -Vec3::Z] {
      let just_outside = axis * (size * 1.01 + Vec3::splat(1e-3));
      assert!(
        shape.eval(just_outside) > 0.0,
        "{:?} leaks past size along {}",
        shape,
        axis
      );
    }
  }
}

#[test]
fn test_sphere_is_exact() {
  let sphere = Sphere { radius: 2.0 };
  assert_relative_eq!(sphere.eval(Vec3::new(3.0, 0.0, 0.0)), 1.0);
  assert_relative_eq!(sphere.eval(Vec3::ZERO), -2.0);
}

#[test]
fn test_cube_distance() {
  let cube = Cube { extents: Vec3::ONE };
  assert_relative_eq!(cube.eval(Vec3::new(2.0, 0.0, 0.0)), 1.0);
  assert_relative_eq!(cube.eval(Vec3::new(2.0, 2.0, 1.0)), 2f32.sqrt());
  assert_relative_eq!(cube.eval(Vec3::new(0.5, 0.0, 0.0)), -0.5);
}

#[test]
fn test_superquadric_with_exponent_two_is_ellipsoid_surface() {
  let sq = SuperQuadric { exponents: Vec3::splat(2.0), scale: Vec3::ONE };
  assert_relative_eq!(sq.eval(Vec3::new(1.0, 0.0, 0.0)), 0.0, epsilon = 1e-6);
  assert_relative_eq!(sq.eval(Vec3::new(0.0, 0.0, 2.0)), 1.0, epsilon = 1e-6);
}

#[test]
fn test_superquadric_non_uniform_picks_side() {
  let sq = SuperQuadricNonUniform {
    pos_exponents: Vec3::splat(2.0),
    neg_exponents: Vec3::splat(2.0),
    pos_scale: Vec3::splat(2.0),
    neg_scale: Vec3::splat(1.0),
  };
  // +X reaches 2, -X only 1.
  assert!(sq.eval(Vec3::new(1.5, 0.0, 0.0)) < 0.0);
  assert!(sq.eval(Vec3::new(-1.5, 0.0, 0.0)) > 0.0);
  assert_eq!(sq.size(), Vec3::splat(2.0));
}

#[test]
fn test_supertoroid_hole_and_ring() {
  let torus = SuperToroid { ring_radius: 3.0, exponents: Vec3::splat(2.0) };
  assert!(torus.eval(Vec3::ZERO) > 0.0, "hole should be empty");
  assert_relative_eq!(torus.eval(Vec3::new(3.0, 0.0, 0.0)), -1.0, epsilon = 1e-5);
  assert_relative_eq!(torus.eval(Vec3::new(0.0, 4.0, 0.0)), 0.0, epsilon = 1e-5);
  assert_eq!(torus.size(), Vec3::new(4.0, 4.0, 1.0));
}

#[test]
fn test_landscape_slab() {
  let land = Landscape { zscale: 0.5, xyscale: 3.0 };
  assert!(land.eval(Vec3::new(0.2, -0.3, -0.4)) < 0.0, "below terrain should be solid");
  assert!(land.eval(Vec3::new(0.2, -0.3, 0.3)) > 0.0, "above peaks should be empty");
  assert!(land.eval(Vec3::new(1.5, 0.0, -0.4)) > 0.0, "outside the tile should be empty");
  assert!(land.eval(Vec3::new(0.0, 0.0, -0.6)) > 0.0, "below the base should be empty");
  assert!(land.height(glam::Vec2::new(0.3, 0.7)).abs() <= 0.5 * 0.5 * 1.1);
}

#[test]
fn test_transform_roundtrip() {
  let t = Transform {
    origin: Vec3::new(1.0, -2.0, 3.0),
    scale: Vec3::new(2.0, 1.0, 0.5),
    rot: Mat3::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 0.7),
  };
  let local = Vec3::new(0.3, -0.8, 1.2);
  let back = t.to_local(t.to_world(local));
  assert!((back - local).length() < 1e-5);
}

#[test]
fn test_world_half_extent_rotated() {
  let t = Transform {
    rot: Mat3::from_rotation_z(std::f32::consts::FRAC_PI_2),
    ..Default::default()
  };
  let half = t.world_half_extent(Vec3::new(2.0, 1.0, 0.5));
  assert!((half - Vec3::new(1.0, 2.0, 0.5)).length() < 1e-5);
}

#[test]
fn test_primitive_world_distance_scales() {
  let p = Primitive::new(ShapeKind::Sphere(Sphere { radius: 1.0 })).with_transform(Transform {
    origin: Vec3::new(5.0, 0.0, 0.0),
    scale: Vec3::splat(2.0),
    ..Default::default()
  });
  assert_relative_eq!(p.eval_world(Vec3::new(9.0, 0.0, 0.0)), 2.0, epsilon = 1e-5);

  let bounds = p.world_bounds(0.5);
  assert_eq!(bounds.min, [2.5, -2.5, -2.5]);
  assert_eq!(bounds.max, [7.5, 2.5, 2.5]);
}

#[test]
fn test_material_carve_threshold() {
  assert!(!Material::default().is_carve());
  assert!(Material { color: Vec4::new(1.0, 0.0, 0.0, 0.49) }.is_carve());
  assert!(!Material { color: Vec4::new(1.0, 0.0, 0.0, 0.5) }.is_carve());
}

#[test]
fn test_group_walk_and_bounds() {
  let mut inner = Group::new();
  inner.push(
    Primitive::new(ShapeKind::Sphere(Sphere { radius: 1.0 }))
      .with_smooth_k(0.4)
      .with_transform(Transform { origin: Vec3::new(4.0, 0.0, 0.0), ..Default::default() }),
  );

  let mut root = Group::new();
  root.push(Primitive::new(ShapeKind::Cube(Cube { extents: Vec3::ONE })));
  root.push(
    Primitive::new(ShapeKind::Sphere(Sphere { radius: 10.0 }))
      .with_material(Material { color: Vec4::ZERO }),
  );
  root.push_group(inner);

  assert_eq!(root.primitive_count(), 3);
  assert!(!root.is_empty());
  assert_relative_eq!(root.max_smooth_k(), 0.4);

  let mut order = Vec::new();
  root.for_each_primitive(&mut |p| order.push(p.shape.size().x));
  assert_eq!(order, vec![1.0, 10.0, 1.0]);

  // The carving sphere does not widen the bounds.
  let bounds = root.world_bounds(0.0);
  assert_eq!(bounds.min, [-1.0, -1.0, -1.0]);
  assert_eq!(bounds.max, [5.0, 1.0, 1.0]);
}

#[test]
fn test_empty_group() {
  let mut root = Group::new();
  root.push_group(Group::new());
  assert!(root.is_empty());
  assert_eq!(root.max_smooth_k(), 0.0);
  assert!(!root.world_bounds(1.0).is_valid());
}

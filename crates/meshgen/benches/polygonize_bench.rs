//! Meshing benchmarks.
//!
//! - **fill**: distance grid construction only
//! - **polygonize**: full pipeline at several subdivisions
//! - **reduce**: polygon reduction on a box (mostly flat geometry)
//! - **cubegen**: voxel export

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec3, Vec4};
use meshgen::{convert_to_cubes, polygonize, DistanceField, FillPool, Group, MeshConfig, SceneBuilder};

// =============================================================================
// Scenes
// =============================================================================

/// Blended spheres with a carved cavity.
fn blob_scene() -> Group {
  let mut b = SceneBuilder::new();
  b.smooth(0.2).color(Vec4::new(0.8, 0.5, 0.3, 1.0));
  for i in 0..6 {
    b.with_state(|b| {
      b.rotate(Vec3::Z, i as f32 * 60.0).translate(Vec3::new(0.8, 0.0, 0.0)).sphere(0.6);
    });
  }
  b.color(Vec4::new(1.0, 1.0, 1.0, 0.0)).sphere(0.5);
  b.scene().clone()
}

fn box_scene() -> Group {
  let mut b = SceneBuilder::new();
  b.cube(Vec3::new(1.0, 0.6, 0.4));
  b.scene().clone()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_fill(c: &mut Criterion) {
  let scene = blob_scene();
  let pool = FillPool::default_threads().unwrap();

  c.bench_function("fill (blob, subdiv 96)", |b| {
    b.iter(|| black_box(DistanceField::build(black_box(&scene), 96, &pool)))
  });
}

fn bench_polygonize(c: &mut Criterion) {
  let scene = blob_scene();
  let pool = FillPool::default_threads().unwrap();
  let config = MeshConfig::default();

  let mut group = c.benchmark_group("polygonize");
  for subdiv in [32, 64, 128] {
    group.bench_with_input(BenchmarkId::new("blob", subdiv), &subdiv, |b, &subdiv| {
      b.iter(|| polygonize(black_box(&scene), subdiv, &config, &pool).unwrap())
    });
  }
  group.finish();
}

fn bench_reduce(c: &mut Criterion) {
  let scene = box_scene();
  let pool = FillPool::default_threads().unwrap();
  let config = MeshConfig::default().with_poly_reduction(4, 0.98, 0.95);

  c.bench_function("polygonize + reduce (box, subdiv 64)", |b| {
    b.iter(|| polygonize(black_box(&scene), 64, &config, &pool).unwrap())
  });
}

fn bench_cubegen(c: &mut Criterion) {
  let scene = blob_scene();
  let pool = FillPool::default_threads().unwrap();

  c.bench_function("cubegen (blob, subdiv 64)", |b| {
    b.iter(|| convert_to_cubes(black_box(&scene), 64, &pool).unwrap())
  });
}

criterion_group!(benches, bench_fill, bench_polygonize, bench_reduce, bench_cubegen);
criterion_main!(benches);

//! Scene → mesh pipeline.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │ polygonize(scene, subdiv, config)                                 │
//! │                                                                   │
//! │  validate subdiv / config                                         │
//! │        │                                                          │
//! │        ▼                                                          │
//! │  DistanceField::build      bounds → grid → parallel fill          │
//! │        │                                                          │
//! │        ▼                                                          │
//! │  marching_cubes::extract   (or marching_squares::extract)         │
//! │        │   Surface { edges, indices } in grid space               │
//! │        ▼                                                          │
//! │  displacement::displace    (or one vertex per edge)               │
//! │        │                                                          │
//! │        ▼                                                          │
//! │  grid → world, cull, reduce, randomize, normals, color noise      │
//! │        │                                                          │
//! │        ▼                                                          │
//! │  Mesh { vertices, indices, bounds }                               │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything after the fill runs on the calling thread.

pub mod displacement;
pub mod marching_cubes;
pub mod marching_squares;

use web_time::Instant;

pub use marching_cubes::Edge;

use crate::constants::{MAX_SUBDIV, MIN_SUBDIV};
use crate::error::{check_subdivision, Result};
use crate::fill::{DistanceField, GridFrame};
use crate::implicit::Group;
use crate::mesh::{cull, normals, post, reduce};
use crate::threading::FillPool;
use crate::types::{Mesh, MeshConfig, MeshVertex, PolygonizerKind};

/// Polygonizer output before vertex merging: one entry per edge crossing.
#[derive(Clone, Debug, Default)]
pub struct Surface {
  pub edges: Vec<Edge>,

  /// Triangles as indices into `edges`.
  pub indices: Vec<u32>,
}

impl Surface {
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// One mesh vertex per crossing.
  pub fn to_mesh(&self) -> Mesh {
    Mesh {
      vertices: self
        .edges
        .iter()
        .map(|e| MeshVertex::new(e.pos, e.color))
        .collect(),
      indices: self.indices.clone(),
      ..Default::default()
    }
  }
}

/// Per-stage timing and counts from one `polygonize` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolygonizeStats {
  /// Grid dimensions, zero for an empty scene.
  pub grid_dim: [i32; 3],
  pub fill_us: u64,
  pub extract_us: u64,
  pub displace_us: u64,
  pub cull_us: u64,
  pub reduce_us: u64,
  pub post_us: u64,
  pub total_us: u64,
  pub culled_triangles: usize,
  pub reduced_triangles: usize,
  pub vertex_count: usize,
  pub triangle_count: usize,
}

/// Mesh `scene` with `subdiv` cells along its largest axis.
pub fn polygonize(
  scene: &Group,
  subdiv: i32,
  config: &MeshConfig,
  pool: &FillPool,
) -> Result<Mesh> {
  polygonize_timed(scene, subdiv, config, pool).map(|(mesh, _)| mesh)
}

/// Same as [`polygonize`] but also returns per-stage stats.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "polygonize", fields(subdiv = subdiv)))]
pub fn polygonize_timed(
  scene: &Group,
  subdiv: i32,
  config: &MeshConfig,
  pool: &FillPool,
) -> Result<(Mesh, PolygonizeStats)> {
  check_subdivision(subdiv, MIN_SUBDIV, MAX_SUBDIV)?;
  config.validate()?;

  let start = Instant::now();
  let mut stats = PolygonizeStats::default();

  let field = {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("fill").entered();
    DistanceField::build(scene, subdiv, pool)
  };
  stats.fill_us = start.elapsed().as_micros() as u64;

  let Some(field) = field else {
    stats.total_us = start.elapsed().as_micros() as u64;
    return Ok((Mesh::new(), stats));
  };
  stats.grid_dim = field.grid.dim().to_array();

  let mesh = mesh_field(&field, config, &mut stats);

  stats.total_us = start.elapsed().as_micros() as u64;
  stats.vertex_count = mesh.vertices.len();
  stats.triangle_count = mesh.triangle_count();

  #[cfg(feature = "tracing")]
  tracing::debug!(
    vertices = stats.vertex_count,
    triangles = stats.triangle_count,
    total_us = stats.total_us,
    "polygonize done"
  );

  Ok((mesh, stats))
}

/// Run every stage after the fill.
pub fn mesh_field(field: &DistanceField, config: &MeshConfig, stats: &mut PolygonizeStats) -> Mesh {
  let stage = Instant::now();
  let surface = match config.polygonizer {
    PolygonizerKind::MarchingCubes => marching_cubes::extract(&field.grid),
    PolygonizerKind::MarchingSquares => marching_squares::extract(&field.grid),
  };
  stats.extract_us = stage.elapsed().as_micros() as u64;

  let stage = Instant::now();
  let mut mesh = if config.mesh_displacement {
    displacement::displace(&surface, &field.grid)
  } else {
    surface.to_mesh()
  };
  to_world(&mut mesh, &field.frame);
  stats.displace_us = stage.elapsed().as_micros() as u64;

  let stage = Instant::now();
  stats.culled_triangles = cull::cull_degenerate(&mut mesh);
  stats.cull_us = stage.elapsed().as_micros() as u64;

  if config.poly_reduction_passes > 0 {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("reduce").entered();

    let stage = Instant::now();
    stats.reduced_triangles = reduce::reduce(&mut mesh, &reduce::ReduceParams::from(config));
    stats.reduce_us = stage.elapsed().as_micros() as u64;
  }

  let stage = Instant::now();
  if config.vert_randomize > 0.0 {
    post::randomize_vertices(&mut mesh, config.vert_randomize, field.frame.cell_size(), config.seed);
  }
  normals::recompute(&mut mesh);
  if let Some(noise) = &config.color_noise {
    post::apply_color_noise(&mut mesh, noise);
  }
  mesh.recompute_bounds();
  stats.post_us = stage.elapsed().as_micros() as u64;

  mesh
}

fn to_world(mesh: &mut Mesh, frame: &GridFrame) {
  for v in &mut mesh.vertices {
    v.position = frame.grid_to_world(v.pos()).to_array();
  }
}

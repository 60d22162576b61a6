//! meshgen - implicit-surface mesh generation
//!
//! Scenes are trees of implicit primitives (spheres, boxes, superquadrics,
//! noise landscapes, ...) combined with smooth unions and carves. A scene
//! is sampled into a dense signed distance grid and turned into a colored
//! triangle mesh or a palette-indexed voxel grid.
//!
//! # Features
//!
//! - **Parallel fill**: primitives are blended into the grid one X slice
//!   per rayon task
//! - **Marching cubes** with shared edge vertices, plus an experimental
//!   marching squares slice polygonizer
//! - **Mesh cleanup**: corner displacement, sliver culling and greedy
//!   reduction of flat regions
//! - **Voxel export** with an up to 255 color palette
//!
//! # Example
//!
//! ```ignore
//! use glam::{Vec3, Vec4};
//! use meshgen::SceneBuilder;
//!
//! let mut b = SceneBuilder::new();
//! b.color(Vec4::new(0.7, 0.7, 0.7, 1.0)).cube(Vec3::ONE);
//! b.color(Vec4::new(1.0, 1.0, 1.0, 0.0)).sphere(1.2); // carve
//!
//! let mesh = b.polygonize(64)?;
//! println!("{} vertices, {} triangles", mesh.vertices.len(), mesh.triangle_count());
//! ```

pub mod constants;
pub mod edge_table;
pub mod error;
pub mod grid;
pub mod types;

pub use error::{MeshGenError, Result};
pub use grid::Grid;
pub use types::{
  color_conversion, Color, ColorNoise, DistVert, Mesh, MeshConfig, MeshVertex, MinMaxAABB,
  PolygonizerKind,
};

// Scene description: shapes, transforms, groups
pub mod implicit;
pub use implicit::{Group, Material, Node, Primitive, Shape, ShapeKind, Transform};

// Distance grid construction
pub mod fill;
pub use fill::{DistanceField, GridFrame};

// Fill thread pool
pub mod threading;
pub use threading::FillPool;

// Grid → mesh
pub mod polygonize;
pub use polygonize::{polygonize, polygonize_timed, PolygonizeStats};

// Mesh cleanup passes
pub mod mesh;

// Voxel export
pub mod cubegen;
pub use cubegen::{convert_to_cubes, Palette, Voxels};

// Stateful scene construction
pub mod builder;
pub use builder::{SceneBuilder, State};

// Byte-level mesh output
pub mod presentation;
pub use presentation::{MeshData, MESH_FORMAT};

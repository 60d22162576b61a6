//! Grid layout and pipeline constants.
//!
//! # Grid Layout
//!
//! ```text
//! Distance grid memory layout (X-major, Z innermost):
//!
//! Logical address = x * dim.y * dim.z + y * dim.z + z
//!
//! Storage: one heap column per X slice
//!
//!   column[0]: [y0z0][y0z1]...[y0zN][y1z0]...[yMzN]
//!   column[1]: [y0z0][y0z1]...
//!   ...
//!
//! Parallel fill hands each X column to exactly one task.
//! ```
//!
//! # Cube Corner Numbering
//!
//! ```text
//!         7──────6         Corners:
//!        /│     /│           0=(0,0,0)  1=(1,0,0)  2=(1,1,0)  3=(0,1,0)
//!       4─┼────5 │           4=(0,0,1)  5=(1,0,1)  6=(1,1,1)  7=(0,1,1)
//!       │ 3────┼─2
//!       │/     │/          +Z
//!       0──────1            │  +Y
//!                           │ /
//!                           └───+X
//! ```
//!
//! This is the classic marching cubes numbering (corners wind around the
//! bottom face, then the top face), which the triangle table is written
//! against.

/// Cube corner offsets relative to the cell origin.
pub const CORNER_OFFSETS: [[i32; 3]; 8] = [
  [0, 0, 0], // 0
  [1, 0, 0], // 1
  [1, 1, 0], // 2
  [0, 1, 0], // 3
  [0, 0, 1], // 4
  [1, 0, 1], // 5
  [1, 1, 1], // 6
  [0, 1, 1], // 7
];

/// Grid cells of empty border kept around the scene bounding box.
pub const GRID_BORDER: i32 = 2;

/// Smallest polygonize subdivision (cells along the largest axis).
pub const MIN_SUBDIV: i32 = 2;

/// Largest polygonize subdivision.
pub const MAX_SUBDIV: i32 = 1024;

/// Largest voxel conversion subdivision.
pub const MAX_CUBE_SUBDIV: i32 = 256;

/// A child whose `dot(half_extent, gridscale)` is at or below this is not
/// rasterized.
pub const MIN_FILL_EXTENT: f32 = 3.0;

/// Edge interpolation parameters this close to 0 or 1 snap to the endpoint.
pub const EDGE_SNAP_EPSILON: f32 = 1e-5;

/// Face normals with a dot product below this against their vertex normal
/// mark the vertex as a sliver candidate (~168°).
pub const CULL_FLIP_DOT: f32 = -0.98;

/// Polygon reduction stops once a pass removes fewer triangles than this.
pub const REDUCE_MIN_PROGRESS: usize = 100;

/// Default smoothing radius for new primitives (world units).
pub const DEFAULT_SMOOTH_K: f32 = 0.1;

/// Material alpha at or above this unions, below this carves.
pub const CARVE_ALPHA_THRESHOLD: f32 = 0.5;

/// Linear index in a grid of dimensions `dim` (Z innermost).
#[inline(always)]
pub const fn linear_index(dim: [i32; 3], x: i32, y: i32, z: i32) -> usize {
  (x as usize * dim[1] as usize + y as usize) * dim[2] as usize + z as usize
}

/// Inverse of [`linear_index`].
#[inline(always)]
pub const fn linear_to_coord(dim: [i32; 3], index: usize) -> [i32; 3] {
  let plane = dim[1] as usize * dim[2] as usize;
  let x = index / plane;
  let rem = index % plane;
  [x as i32, (rem / dim[2] as usize) as i32, (rem % dim[2] as usize) as i32]
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;

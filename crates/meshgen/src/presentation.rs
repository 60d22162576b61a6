//! Byte-level mesh data for engine bridges.
//!
//! Vertices are packed in the `PNC` layout (position, normal, color) of
//! [`MeshVertex`]:
//!
//! ```text
//! offset  0: position  [f32; 3]
//! offset 12: normal    [f32; 3]   unnormalized
//! offset 24: color     [u8; 4]    RGBA
//! stride 28
//! ```
//!
//! Indices are `u32`, three per triangle.

use crate::types::{Mesh, MeshVertex, MinMaxAABB};

/// Vertex layout tag carried by every [`MeshData`].
pub const MESH_FORMAT: &str = "PNC";

/// Mesh packed into raw byte buffers, ready to upload or hand across FFI.
#[derive(Clone, Default, PartialEq)]
pub struct MeshData {
  /// Vertex layout; always [`MESH_FORMAT`].
  pub format: &'static str,

  /// Vertex data as raw bytes ([`MeshVertex`] layout).
  pub vertices: Vec<u8>,

  /// Index data as raw bytes (u32 layout).
  pub indices: Vec<u8>,

  pub vertex_count: u32,
  pub index_count: u32,
  pub bounds: MinMaxAABB,
}

impl MeshData {
  /// Size of one packed vertex in bytes.
  pub const VERTEX_STRIDE: usize = std::mem::size_of::<MeshVertex>();

  pub fn is_empty(&self) -> bool {
    self.index_count == 0
  }

  /// Read vertex `i` back out of the byte buffer.
  pub fn vertex(&self, i: usize) -> Option<MeshVertex> {
    let start = i.checked_mul(Self::VERTEX_STRIDE)?;
    let bytes = self.vertices.get(start..start + Self::VERTEX_STRIDE)?;
    Some(bytemuck::pod_read_unaligned(bytes))
  }

  /// Decode the index bytes.
  pub fn indices_to_vec(&self) -> Vec<u32> {
    self
      .indices
      .chunks_exact(4)
      .map(bytemuck::pod_read_unaligned::<u32>)
      .collect()
  }
}

impl From<&Mesh> for MeshData {
  fn from(mesh: &Mesh) -> Self {
    Self {
      format: MESH_FORMAT,
      vertices: bytemuck::cast_slice(&mesh.vertices).to_vec(),
      indices: bytemuck::cast_slice(&mesh.indices).to_vec(),
      vertex_count: mesh.vertices.len() as u32,
      index_count: mesh.indices.len() as u32,
      bounds: mesh.bounds,
    }
  }
}

impl std::fmt::Debug for MeshData {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MeshData")
      .field("format", &self.format)
      .field("vertex_count", &self.vertex_count)
      .field("index_count", &self.index_count)
      .field("bounds", &self.bounds)
      .finish()
  }
}

#[cfg(test)]
#[path = "presentation_test.rs"]
mod presentation_test;

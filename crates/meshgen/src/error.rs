//! Error type for scene building and meshing.

use thiserror::Error;

/// Errors reported before any grid work starts.
///
/// Geometry degeneracies (empty scenes, zero-size primitives, slivers) are
/// never errors; they produce empty or smaller meshes.
#[derive(Error, Debug)]
pub enum MeshGenError {
  /// Requested subdivision is outside the accepted range.
  #[error("subdivision {subdiv} outside {min}..={max}")]
  InvalidSubdivision {
    /// Requested cells along the largest axis.
    subdiv: i32,
    /// Smallest accepted value.
    min: i32,
    /// Largest accepted value.
    max: i32,
  },

  /// Polygon reduction parameters out of range.
  #[error("invalid polygon reduction settings: {0}")]
  InvalidReduction(String),

  /// `pop()` called with no saved state.
  #[error("state stack underflow")]
  StateStackUnderflow,

  /// Fill thread pool could not be created.
  #[error("thread pool: {0}")]
  ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, MeshGenError>;

/// Check `subdiv` against an inclusive range.
pub(crate) fn check_subdivision(subdiv: i32, min: i32, max: i32) -> Result<()> {
  if (min..=max).contains(&subdiv) {
    Ok(())
  } else {
    Err(MeshGenError::InvalidSubdivision { subdiv, min, max })
  }
}

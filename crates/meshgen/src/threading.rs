//! Dedicated rayon pool for distance field fills.
//!
//! Fills are fork/join: each primitive fans out one task per X slice and
//! the call returns only after every slice task has finished. The pool is
//! owned by the scene builder and reused across `polygonize` calls.
//!
//! # Usage
//!
//! ```ignore
//! let pool = FillPool::new(0)?; // one thread per hardware thread
//!
//! pool.install(|| {
//!     grid.par_slices_mut(0..dim.x).for_each(|slice| fill(slice));
//! });
//! ```

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Result;

/// Fixed-size fill thread pool.
pub struct FillPool {
  pool: ThreadPool,
}

impl FillPool {
  /// Create a pool with `num_threads` workers; `0` picks one per hardware
  /// thread.
  pub fn new(num_threads: usize) -> Result<Self> {
    let pool = ThreadPoolBuilder::new()
      .num_threads(num_threads)
      .thread_name(|i| format!("meshgen-fill-{i}"))
      .build()?;

    Ok(Self { pool })
  }

  /// Create a pool sized to the hardware.
  pub fn default_threads() -> Result<Self> {
    Self::new(0)
  }

  /// Run `work` inside the pool; parallel iterators it starts use the
  /// pool's workers. Blocks until `work` returns.
  pub fn install<F, R>(&self, work: F) -> R
  where
    F: FnOnce() -> R + Send,
    R: Send,
  {
    self.pool.install(work)
  }

  pub fn num_threads(&self) -> usize {
    self.pool.current_num_threads()
  }
}

impl std::fmt::Debug for FillPool {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FillPool")
      .field("num_threads", &self.num_threads())
      .finish()
  }
}

// =============================================================================
// Tests
// =============================================================================

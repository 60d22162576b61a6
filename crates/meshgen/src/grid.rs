//! Dense 3D grid stored as one heap column per X slice.
//!
//! Logical address is `x * dim.y * dim.z + y * dim.z + z` (see
//! [`crate::constants::linear_index`]). Splitting storage per X slice lets
//! the parallel fill hand each slice to exactly one task as a plain
//! `&mut [T]`.

use std::ops::Range;

use glam::IVec3;
use rayon::prelude::*;

use crate::constants::{linear_index, linear_to_coord};

#[derive(Clone, Debug)]
pub struct Grid<T> {
  dim: IVec3,
  columns: Vec<Vec<T>>,
}

/// Exclusive view of one X slice, handed to a fill task.
pub struct XSlice<'a, T> {
  pub x: i32,
  dim_z: i32,
  cells: &'a mut [T],
}

impl<T> XSlice<'_, T> {
  #[inline(always)]
  pub fn get_mut(&mut self, y: i32, z: i32) -> &mut T {
    debug_assert!(y >= 0 && z >= 0 && z < self.dim_z);
    &mut self.cells[(y * self.dim_z + z) as usize]
  }
}

impl<T: Clone> Grid<T> {
  /// Allocate a grid with every cell set to `fill`.
  pub fn new(dim: IVec3, fill: T) -> Self {
    let dim = dim.max(IVec3::ZERO);
    let column_len = (dim.y * dim.z) as usize;
    Self {
      dim,
      columns: (0..dim.x).map(|_| vec![fill.clone(); column_len]).collect(),
    }
  }

  /// Reset every cell to `value`.
  pub fn fill(&mut self, value: T) {
    for column in &mut self.columns {
      column.fill(value.clone());
    }
  }

  /// Flatten in Z-major order (`z * dim.y * dim.x + y * dim.x + x`, X
  /// fastest), the layout 3D textures and voxel exporters expect.
  pub fn to_continuous_grid(&self) -> Vec<T> {
    let mut out = Vec::with_capacity(self.len());
    for z in 0..self.dim.z {
      for y in 0..self.dim.y {
        for x in 0..self.dim.x {
          out.push(self.get(IVec3::new(x, y, z)).clone());
        }
      }
    }
    out
  }

  /// Shrink to `new_dim`, keeping the cells at the low corner.
  ///
  /// # Panics
  /// If any axis of `new_dim` exceeds the current dimensions.
  pub fn shrink(&mut self, new_dim: IVec3) {
    assert!(
      new_dim.cmple(self.dim).all() && new_dim.cmpge(IVec3::ZERO).all(),
      "shrink to {new_dim} from {}",
      self.dim
    );

    self.columns.truncate(new_dim.x as usize);
    for column in &mut self.columns {
      let mut shrunk = Vec::with_capacity((new_dim.y * new_dim.z) as usize);
      for y in 0..new_dim.y {
        let start = (y * self.dim.z) as usize;
        shrunk.extend_from_slice(&column[start..start + new_dim.z as usize]);
      }
      *column = shrunk;
    }
    self.dim = new_dim;
  }
}

impl<T> Grid<T> {
  #[inline(always)]
  pub fn dim(&self) -> IVec3 {
    self.dim
  }

  pub fn len(&self) -> usize {
    (self.dim.x * self.dim.y * self.dim.z) as usize
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  #[inline(always)]
  pub fn in_bounds(&self, pos: IVec3) -> bool {
    pos.cmpge(IVec3::ZERO).all() && pos.cmplt(self.dim).all()
  }

  #[inline(always)]
  pub fn get(&self, pos: IVec3) -> &T {
    debug_assert!(self.in_bounds(pos), "{pos} outside {}", self.dim);
    &self.columns[pos.x as usize][(pos.y * self.dim.z + pos.z) as usize]
  }

  #[inline(always)]
  pub fn get_mut(&mut self, pos: IVec3) -> &mut T {
    debug_assert!(self.in_bounds(pos), "{pos} outside {}", self.dim);
    &mut self.columns[pos.x as usize][(pos.y * self.dim.z + pos.z) as usize]
  }

  /// Linear (X-major) index of `pos`.
  #[inline(always)]
  pub fn linear_index(&self, pos: IVec3) -> usize {
    linear_index(self.dim.to_array(), pos.x, pos.y, pos.z)
  }

  /// Inverse of [`Grid::linear_index`].
  #[inline(always)]
  pub fn position_of(&self, index: usize) -> IVec3 {
    IVec3::from_array(linear_to_coord(self.dim.to_array(), index))
  }

  /// Disjoint mutable X slices in `xs`, as a parallel iterator.
  pub fn par_slices_mut(
    &mut self,
    xs: Range<i32>,
  ) -> impl IndexedParallelIterator<Item = XSlice<'_, T>>
  where
    T: Send,
  {
    let start = xs.start.clamp(0, self.dim.x);
    let end = xs.end.clamp(start, self.dim.x);
    let dim_z = self.dim.z;

    self.columns[start as usize..end as usize]
      .par_iter_mut()
      .enumerate()
      .map(move |(i, column)| XSlice {
        x: start + i as i32,
        dim_z,
        cells: column.as_mut_slice(),
      })
  }
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

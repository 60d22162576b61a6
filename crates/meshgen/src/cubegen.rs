//! Voxel export: classify the distance field into palette-indexed cubes.
//!
//! Uses the same bounds, grid sizing and fill as [`crate::polygonize`], then
//! maps every solid cell (`dist <= 0`) to a palette entry. Index 0 is
//! reserved for empty cells, so at most 255 colors fit.

use std::collections::HashMap;

use crate::constants::{MAX_CUBE_SUBDIV, MIN_SUBDIV};
use crate::error::{check_subdivision, Result};
use crate::fill::DistanceField;
use crate::grid::Grid;
use crate::implicit::Group;
use crate::threading::FillPool;
use crate::types::Color;

/// Palette index of empty cells.
pub const EMPTY_CELL: u8 = 0;

/// Largest number of palette entries.
pub const MAX_PALETTE: usize = u8::MAX as usize;

/// Palette builder.
///
/// Colors get indices in first-seen order. Once the palette is full, new
/// colors map to the nearest existing entry by squared RGBA distance.
#[derive(Clone, Debug, Default)]
pub struct Palette {
  colors: Vec<Color>,
  lookup: HashMap<Color, u8>,
}

impl Palette {
  pub fn new() -> Self {
    Self::default()
  }

  /// Palette index (1-based) for `color`.
  pub fn index_of(&mut self, color: Color) -> u8 {
    if let Some(&index) = self.lookup.get(&color) {
      return index;
    }

    let index = if self.colors.len() < MAX_PALETTE {
      self.colors.push(color);
      self.colors.len() as u8
    } else {
      self.nearest(color)
    };

    self.lookup.insert(color, index);
    index
  }

  fn nearest(&self, color: Color) -> u8 {
    let dist = |c: &Color| -> u32 {
      c.iter()
        .zip(color)
        .map(|(&a, b)| {
          let d = a as i32 - b as i32;
          (d * d) as u32
        })
        .sum()
    };

    self
      .colors
      .iter()
      .enumerate()
      .min_by_key(|(_, c)| dist(c))
      .map_or(EMPTY_CELL, |(i, _)| i as u8 + 1)
  }

  pub fn len(&self) -> usize {
    self.colors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.colors.is_empty()
  }

  pub fn into_colors(self) -> Vec<Color> {
    self.colors
  }
}

/// Palette-indexed voxel grid.
#[derive(Clone, Debug)]
pub struct Voxels {
  /// Palette index per cell; [`EMPTY_CELL`] for empty.
  pub grid: Grid<u8>,

  /// `palette[i - 1]` is the color of index `i`.
  pub palette: Vec<Color>,
}

impl Voxels {
  /// Empty voxel set.
  pub fn empty() -> Self {
    Self {
      grid: Grid::new(glam::IVec3::ZERO, EMPTY_CELL),
      palette: Vec::new(),
    }
  }

  /// Color of a palette index; `None` for empty or unknown indices.
  pub fn color(&self, index: u8) -> Option<Color> {
    let slot = (index as usize).checked_sub(1)?;
    self.palette.get(slot).copied()
  }

  /// Number of solid cells.
  pub fn solid_count(&self) -> usize {
    self
      .grid
      .to_continuous_grid()
      .iter()
      .filter(|&&i| i != EMPTY_CELL)
      .count()
  }

  /// Cells in Z-major order, X fastest.
  pub fn to_continuous_grid(&self) -> Vec<u8> {
    self.grid.to_continuous_grid()
  }
}

/// Voxelize `scene` with `subdiv` cells along its largest axis, in
/// `MIN_SUBDIV..=MAX_CUBE_SUBDIV`.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "cubegen", fields(subdiv = subdiv)))]
pub fn convert_to_cubes(scene: &Group, subdiv: i32, pool: &FillPool) -> Result<Voxels> {
  check_subdivision(subdiv, MIN_SUBDIV, MAX_CUBE_SUBDIV)?;

  let Some(field) = DistanceField::build(scene, subdiv, pool) else {
    return Ok(Voxels::empty());
  };

  let dim = field.grid.dim();
  let mut grid = Grid::new(dim, EMPTY_CELL);
  let mut palette = Palette::new();

  for x in 0..dim.x {
    for y in 0..dim.y {
      for z in 0..dim.z {
        let pos = glam::IVec3::new(x, y, z);
        let cell = field.get(pos);
        if cell.dist <= 0.0 {
          *grid.get_mut(pos) = palette.index_of(cell.color);
        }
      }
    }
  }

  #[cfg(feature = "tracing")]
  tracing::debug!(dim = %dim, colors = palette.len(), "voxelized");

  Ok(Voxels {
    grid,
    palette: palette.into_colors(),
  })
}

#[cfg(test)]
#[path = "cubegen_test.rs"]
mod cubegen_test;

//! Paint engine: tools and symmetry mirroring.

use lumen_common::Rgb;
use serde::{Deserialize, Serialize};

use crate::grid::{PixelGrid, GRID_SIZE};

/// The active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Paint cells with the current colour.
    #[default]
    Draw,
    /// Copy a cell's colour into the current colour.
    Pick,
}

impl Tool {
    /// Display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Draw => "Draw",
            Self::Pick => "Pick",
        }
    }
}

/// A mirror axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Mirror left/right: `(row, N-1-col)`.
    Horizontal,
    /// Mirror top/bottom: `(N-1-row, col)`.
    Vertical,
}

/// Symmetry flags applied to every paint operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Symmetry {
    /// Horizontal mirroring enabled.
    pub horizontal: bool,
    /// Vertical mirroring enabled.
    pub vertical: bool,
}

impl Symmetry {
    /// Both axes enabled.
    pub const BOTH: Self = Self {
        horizontal: true,
        vertical: true,
    };

    /// Whether `axis` is enabled.
    #[must_use]
    pub fn is_enabled(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Flips `axis` and returns its new state.
    pub fn toggle(&mut self, axis: Axis) -> bool {
        let flag = match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        };
        *flag = !*flag;
        *flag
    }

    /// Every cell written when painting `(row, col)`, the cell itself first.
    ///
    /// Cells on a mirror axis may appear twice; writing them again is a no-op.
    #[must_use]
    pub fn targets(self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let mirror_row = GRID_SIZE - 1 - row;
        let mirror_col = GRID_SIZE - 1 - col;

        let mut cells = vec![(row, col)];
        if self.horizontal {
            cells.push((row, mirror_col));
        }
        if self.vertical {
            cells.push((mirror_row, col));
        }
        if self.horizontal && self.vertical {
            cells.push((mirror_row, mirror_col));
        }
        cells
    }
}

/// Paints `(row, col)` and its mirrors with `color`.
///
/// Out-of-range coordinates are ignored; returns whether anything was written.
pub fn paint(grid: &mut PixelGrid, row: usize, col: usize, color: Rgb, symmetry: Symmetry) -> bool {
    if row >= GRID_SIZE || col >= GRID_SIZE {
        return false;
    }
    for (r, c) in symmetry.targets(row, col) {
        grid.set(r, c, color);
    }
    true
}

/// Reads the colour at `(row, col)`.
#[must_use]
pub fn pick(grid: &PixelGrid, row: usize, col: usize) -> Option<Rgb> {
    grid.get(row, col)
}

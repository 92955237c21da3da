//! The pixel grid: a fixed 8×8 matrix of colours.
//!
//! `PixelGrid` is a small `Copy` value. Snapshots for history and frame
//! switching are plain copies, so no grid is ever shared mutably.

use lumen_common::Rgb;
use serde::{Deserialize, Serialize};

/// Width and height of every grid.
pub const GRID_SIZE: usize = 8;

/// Number of cells in a grid.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Row-major cell storage.
pub type Cells = [[Rgb; GRID_SIZE]; GRID_SIZE];

/// An N×N matrix of colours. Every cell always holds a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelGrid {
    cells: Cells,
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelGrid {
    /// Creates an all-black grid.
    #[must_use]
    pub const fn new() -> Self {
        Self::filled(Rgb::BLACK)
    }

    /// Creates a grid with every cell set to `color`.
    #[must_use]
    pub const fn filled(color: Rgb) -> Self {
        Self {
            cells: [[color; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Creates a grid from row-major cells.
    #[must_use]
    pub const fn from_cells(cells: Cells) -> Self {
        Self { cells }
    }

    /// Gets the colour at `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Rgb> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Sets the colour at `(row, col)`. Out-of-range writes are ignored.
    ///
    /// Returns whether a cell was written.
    pub fn set(&mut self, row: usize, col: usize, color: Rgb) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = color;
                true
            },
            None => false,
        }
    }

    /// Sets every cell to `color`.
    pub fn fill(&mut self, color: Rgb) {
        *self = Self::filled(color);
    }

    /// Resets every cell to black.
    pub fn clear(&mut self) {
        self.fill(Rgb::BLACK);
    }

    /// Returns the rows.
    #[must_use]
    pub const fn rows(&self) -> &Cells {
        &self.cells
    }

    /// Iterates over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.cells.iter().flat_map(|row| row.iter().copied())
    }

    /// Whether every cell is black.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.iter().all(|c| c == Rgb::BLACK)
    }

    /// Builds a grid by evaluating `f(row, col)` for every cell.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> Rgb) -> Self {
        let mut grid = Self::new();
        for (row, cells) in grid.cells.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = f(row, col);
            }
        }
        grid
    }

    /// Returns the grid rotated clockwise.
    #[must_use]
    pub fn rotated(&self, rotation: Rotation) -> Self {
        const LAST: usize = GRID_SIZE - 1;
        let src = &self.cells;
        match rotation {
            Rotation::None => *self,
            Rotation::Cw90 => Self::from_fn(|row, col| src[LAST - col][row]),
            Rotation::Cw180 => Self::from_fn(|row, col| src[LAST - row][LAST - col]),
            Rotation::Cw270 => Self::from_fn(|row, col| src[col][LAST - row]),
        }
    }

    /// Returns the grid mirrored left to right.
    #[must_use]
    pub fn flipped_horizontal(&self) -> Self {
        Self::from_fn(|row, col| self.cells[row][GRID_SIZE - 1 - col])
    }

    /// Returns the grid mirrored top to bottom.
    #[must_use]
    pub fn flipped_vertical(&self) -> Self {
        Self::from_fn(|row, col| self.cells[GRID_SIZE - 1 - row][col])
    }
}

/// Clockwise rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// 90° clockwise.
    Cw90,
    /// 180°.
    Cw180,
    /// 270° clockwise.
    Cw270,
}

impl Rotation {
    /// Converts a degree value; only multiples of 90 below 360 are accepted.
    #[must_use]
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::None),
            90 => Some(Self::Cw90),
            180 => Some(Self::Cw180),
            270 => Some(Self::Cw270),
            _ => None,
        }
    }

    /// Returns the rotation in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::None => 0,
            Self::Cw90 => 90,
            Self::Cw180 => 180,
            Self::Cw270 => 270,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees).ok_or_else(|| format!("unsupported rotation: {degrees}"))
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// How a grid is oriented on the physical panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Orientation {
    /// Clockwise rotation, applied first.
    pub rotate: Rotation,
    /// Mirror left to right, applied after rotation.
    pub flip_h: bool,
    /// Mirror top to bottom, applied last.
    pub flip_v: bool,
}

impl Orientation {
    /// Applies rotation, then the horizontal flip, then the vertical flip.
    #[must_use]
    pub fn apply(&self, grid: &PixelGrid) -> PixelGrid {
        let mut out = grid.rotated(self.rotate);
        if self.flip_h {
            out = out.flipped_horizontal();
        }
        if self.flip_v {
            out = out.flipped_vertical();
        }
        out
    }

    /// Whether this orientation leaves grids unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

//! Projection of a grid onto the LED device's pixel buffer.
//!
//! The device protocol itself lives behind [`PixelSink`]; this module only
//! builds the payload: N² RGB triples in row-major order plus a brightness
//! scalar, with the brightness already applied to every channel.

use lumen_common::Rgb;

use crate::grid::{Orientation, PixelGrid, CELL_COUNT, GRID_SIZE};

/// Brightness used when none is configured.
pub const FULL_BRIGHTNESS: u8 = 255;

/// A pixel buffer ready to send to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFrame {
    pixels: Vec<[u8; 3]>,
    brightness: u8,
}

impl DeviceFrame {
    /// Orients `grid` for the panel and scales each channel by
    /// `brightness / 255`, rounded.
    #[must_use]
    pub fn from_grid(grid: &PixelGrid, brightness: u8, orientation: Orientation) -> Self {
        let oriented = orientation.apply(grid);
        let mut pixels = Vec::with_capacity(CELL_COUNT);
        pixels.extend(oriented.iter().map(|c| c.scaled(brightness).to_array()));
        Self { pixels, brightness }
    }

    /// Row-major RGB triples.
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Brightness the frame was built with.
    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Colour of the pixel at `(row, col)` of the oriented frame.
    #[must_use]
    #[cfg(test)]
    pub fn pixel(&self, row: usize, col: usize) -> Option<Rgb> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return None;
        }
        self.pixels.get(row * GRID_SIZE + col).copied().map(Rgb::from)
    }
}

/// An opaque "apply pixel buffer" sink.
pub trait PixelSink {
    /// Error raised by the sink.
    type Error;

    /// Sends one frame to the device.
    fn apply(&mut self, frame: &DeviceFrame) -> Result<(), Self::Error>;
}

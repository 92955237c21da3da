//! Terminal rendering, the preview surface and the device sink.

use std::convert::Infallible;
use std::fmt::Write as _;

use lumen_common::Rgb;
use lumen_editor::device::{DeviceFrame, PixelSink};
use lumen_editor::grid::PixelGrid;
use lumen_editor::player::PreviewSurface;
use tracing::{debug, info};

/// Renders a grid as rows of 24-bit coloured blocks.
#[must_use]
pub fn render_grid(grid: &PixelGrid) -> String {
    let mut out = String::new();
    for row in grid.rows() {
        for cell in row {
            push_cell(&mut out, *cell);
        }
        out.push_str("\x1b[0m\n");
    }
    out
}

fn push_cell(out: &mut String, color: Rgb) {
    let _ = write!(out, "\x1b[48;2;{};{};{}m  ", color.r, color.g, color.b);
}

/// Preview surface keeping the last presented frame.
#[derive(Debug, Default)]
pub struct PreviewBuffer {
    last: Option<(usize, PixelGrid)>,
    presented: u64,
}

impl PreviewBuffer {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last presented frame and its index.
    #[must_use]
    pub fn last(&self) -> Option<(usize, PixelGrid)> {
        self.last
    }

    /// Total number of frames presented.
    #[cfg(test)]
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl PreviewSurface for PreviewBuffer {
    fn present(&mut self, index: usize, grid: &PixelGrid) {
        self.last = Some((index, *grid));
        self.presented += 1;
        debug!(index, presented = self.presented, "Preview frame");
    }
}

/// Device sink that logs the payload instead of sending it.
#[derive(Debug, Default)]
pub struct LogSink {
    sent: u64,
}

impl LogSink {
    /// Creates a sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames applied.
    #[cfg(test)]
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl PixelSink for LogSink {
    type Error = Infallible;

    fn apply(&mut self, frame: &DeviceFrame) -> Result<(), Self::Error> {
        self.sent += 1;
        let lit = frame.pixels().iter().filter(|p| **p != [0, 0, 0]).count();
        info!(
            brightness = frame.brightness(),
            pixels = frame.pixels().len(),
            lit,
            sent = self.sent,
            "Applying pixel buffer"
        );
        Ok(())
    }
}

//! PNG export of a single grid.
//!
//! Export is a pure projection: the grid is rendered 1:1 (one image pixel per
//! cell) into a lossless PNG. [`scaled_image`] provides the nearest-neighbour
//! upscale used by preview surfaces.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::{ImageFormat, Rgb as ImageRgb, RgbImage};
use tracing::info;

use crate::error::ExportError;
use crate::grid::{PixelGrid, GRID_SIZE};

/// Renders the grid 1:1 into an RGB image.
#[must_use]
pub fn to_rgb_image(grid: &PixelGrid) -> RgbImage {
    scaled_image(grid, 1)
}

/// Renders the grid with every cell as a `factor`×`factor` block.
///
/// A factor of zero is treated as one.
#[must_use]
pub fn scaled_image(grid: &PixelGrid, factor: u32) -> RgbImage {
    let factor = factor.max(1);
    let side = GRID_SIZE as u32 * factor;
    let cells = grid.rows();
    RgbImage::from_fn(side, side, |x, y| {
        let color = cells[(y / factor) as usize][(x / factor) as usize];
        ImageRgb(color.to_array())
    })
}

/// Encodes the grid as PNG bytes.
pub fn encode_png(grid: &PixelGrid) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    to_rgb_image(grid).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// File name for an export made at `now`: `icon-YYYY-MM-DDTHH-MM-SS.png`.
#[must_use]
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("icon-{}.png", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Writes the grid as a timestamped PNG into `dir` and returns the path.
pub fn export_png(grid: &PixelGrid, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(now));
    std::fs::write(&path, encode_png(grid)?)?;
    info!("Exported icon to {:?}", path);
    Ok(path)
}

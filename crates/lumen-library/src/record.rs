//! Persisted icon records.
//!
//! Records are written in one shape and read leniently: older records store a
//! single `grid` instead of `frames`, and hand-edited or truncated records may
//! miss any field. Reading never fails for a JSON object; every gap is filled
//! with a default.

use chrono::{DateTime, NaiveDateTime, Utc};
use lumen_common::{IconId, Rgb};
use lumen_editor::grid::PixelGrid;
use lumen_editor::player::DEFAULT_FPS;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Name given to icons saved without one.
pub const DEFAULT_ICON_NAME: &str = "Untitled";

/// A named, uniquely identified animation in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawIconRecord")]
pub struct IconRecord {
    /// Immutable id.
    pub id: IconId,
    /// Display name.
    pub name: String,
    /// Frames in playback order (never empty).
    pub frames: Vec<PixelGrid>,
    /// Playback rate (never zero).
    pub fps: u32,
    /// Time of the first save.
    pub created: DateTime<Utc>,
    /// Time of the last save.
    pub modified: DateTime<Utc>,
}

impl IconRecord {
    /// Creates a record stamped with `now`.
    ///
    /// A blank name becomes [`DEFAULT_ICON_NAME`], empty frames become one
    /// black frame and a zero rate becomes the default.
    #[must_use]
    pub fn new(id: IconId, name: &str, frames: Vec<PixelGrid>, fps: u32, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: normalize_name(Some(name)),
            frames: if frames.is_empty() {
                vec![PixelGrid::new()]
            } else {
                frames
            },
            fps: if fps == 0 { DEFAULT_FPS } else { fps },
            created: now,
            modified: now,
        }
    }

    /// Sets the id to the store key the record was listed under.
    ///
    /// The key wins over whatever id the body carries.
    pub fn normalize_id(&mut self, key: &str) {
        if !self.id.is_empty() && self.id.as_str() != key {
            warn!(key, body_id = %self.id, "Icon record id differs from its key");
        }
        self.id = IconId::from_raw(key);
    }

    /// The first frame, used for thumbnails.
    #[must_use]
    pub fn first_frame(&self) -> PixelGrid {
        self.frames.first().copied().unwrap_or_default()
    }

    /// Number of frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Whether the record has more than one frame.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    /// Short form of the id, for compact listings.
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id.short()
    }
}

/// Wire shape accepted when reading.
#[derive(Deserialize)]
struct RawIconRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    frames: Option<Value>,
    #[serde(default)]
    grid: Option<Value>,
    #[serde(default)]
    fps: Option<Value>,
    #[serde(default)]
    created: Option<Value>,
    #[serde(default)]
    modified: Option<Value>,
}

impl From<RawIconRecord> for IconRecord {
    fn from(raw: RawIconRecord) -> Self {
        let mut frames = raw.frames.as_ref().map(frames_from_value).unwrap_or_default();
        if frames.is_empty() {
            if let Some(grid) = raw.grid.as_ref() {
                frames.push(grid_from_value(grid));
            }
        }
        if frames.is_empty() {
            frames.push(PixelGrid::new());
        }

        let created = raw
            .created
            .as_ref()
            .and_then(timestamp_from_value)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let modified = raw
            .modified
            .as_ref()
            .and_then(timestamp_from_value)
            .unwrap_or(created);

        Self {
            id: IconId::from_raw(raw.id.unwrap_or_default()),
            name: normalize_name(raw.name.as_deref()),
            frames,
            fps: raw.fps.as_ref().and_then(fps_from_value).unwrap_or(DEFAULT_FPS),
            created,
            modified,
        }
    }
}

fn normalize_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_ICON_NAME.to_string(),
    }
}

/// Reads a list of grids. Non-array input yields no frames.
pub(crate) fn frames_from_value(value: &Value) -> Vec<PixelGrid> {
    value
        .as_array()
        .map(|frames| frames.iter().map(grid_from_value).collect())
        .unwrap_or_default()
}

/// Reads one grid; missing or invalid cells are black, extra ones ignored.
fn grid_from_value(value: &Value) -> PixelGrid {
    PixelGrid::from_fn(|row, col| {
        value
            .get(row)
            .and_then(|cells| cells.get(col))
            .and_then(Value::as_str)
            .and_then(|hex| Rgb::parse_hex(hex).ok())
            .unwrap_or(Rgb::BLACK)
    })
}

fn fps_from_value(value: &Value) -> Option<u32> {
    let fps = value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite() && *f >= 1.0).map(|f| f as u64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))?;
    (fps > 0).then(|| u32::try_from(fps).unwrap_or(u32::MAX))
}

fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

//! Local draft of the animation being edited.
//!
//! The frame list is kept in a JSON file so a restart restores the work in
//! progress. Loading is lenient: a missing or corrupt draft is logged and
//! treated as no draft.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lumen_editor::grid::PixelGrid;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::record::frames_from_value;

/// Errors raised while writing a draft.
#[derive(Debug, Error)]
pub enum DraftError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Draft file at a fixed path.
#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    /// Creates a draft store for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the draft file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the frame list, creating parent directories.
    pub fn save(&self, frames: &[PixelGrid]) -> Result<(), DraftError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(frames)?;
        fs::write(&self.path, json)?;
        debug!(frames = frames.len(), "Draft saved to {:?}", self.path);
        Ok(())
    }

    /// Reads the frame list. Returns `None` when there is no usable draft.
    #[must_use]
    pub fn load(&self) -> Option<Vec<PixelGrid>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No draft at {:?}", self.path);
                return None;
            },
            Err(e) => {
                warn!("Failed to read draft {:?}: {}", self.path, e);
                return None;
            },
        };

        let value: Value = match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring corrupt draft {:?}: {}", self.path, e);
                return None;
            },
        };

        let frames = frames_from_value(&value);
        if frames.is_empty() {
            warn!("Ignoring empty draft {:?}", self.path);
            return None;
        }
        debug!(frames = frames.len(), "Draft loaded");
        Some(frames)
    }

    /// Removes the draft file if present.
    pub fn clear(&self) -> Result<(), DraftError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

//! Error types for the editor core.

use thiserror::Error;

/// A guard that rejected an editor operation.
///
/// Rejections are never fatal: the operation is aborted with no state change
/// and the message is shown to the user as a transient warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardRejection {
    /// Undo requested with an empty undo history.
    #[error("nothing to undo")]
    NothingToUndo,

    /// Redo requested at the tail of the history.
    #[error("nothing to redo")]
    NothingToRedo,

    /// Attempt to delete the only remaining frame.
    #[error("cannot delete the last frame")]
    LastFrame,

    /// Playback requested for a single-frame animation.
    #[error("add more frames to preview the animation")]
    NotEnoughFrames,

    /// Frame index outside the sequence.
    #[error("frame {index} does not exist (sequence has {len} frames)")]
    FrameOutOfRange {
        /// Requested index
        index: usize,
        /// Current sequence length
        len: usize,
    },

    /// Attempt to edit an icon that does not belong to the library.
    #[error("icon {0} is read-only (not a library icon)")]
    ForeignIcon(String),
}

/// Errors raised while exporting a grid to an image file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Image encoding failed.
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// Writing the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for guarded editor operations.
pub type EditorResult<T> = Result<T, GuardRejection>;

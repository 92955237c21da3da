//! # Lumen Editor
//!
//! Editing core for small animated pixel-art icons.
//!
//! This crate provides:
//! - The fixed 8×8 pixel grid and its orientation transforms
//! - The paint engine (draw and colour-pick tools, symmetry mirroring)
//! - Bounded undo/redo history of the live edit buffer
//! - The never-empty frame sequence with its active pointer
//! - The editor session tying all of the above to an input event stream
//! - The animation preview player
//! - PNG export and device pixel-buffer projection
//!
//! ## Live buffer
//!
//! Painting never writes into the frame sequence directly. The session edits a
//! live buffer and flushes it into the active frame slot before every
//! structural operation (frame switch, duplicate, delete, save). Snapshots are
//! cheap because [`PixelGrid`] is a `Copy` value.
//!
//! ## Rejections
//!
//! Operations that cannot proceed (undo at the start of history, deleting the
//! last frame, previewing a single frame) return a [`GuardRejection`] and leave
//! the state untouched. The session also queues a warning [`Notice`] for them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod device;
pub mod error;
pub mod export;
pub mod frames;
pub mod grid;
pub mod history;
pub mod input;
pub mod paint;
pub mod player;
pub mod session;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::device::*;
    pub use crate::error::*;
    pub use crate::export::*;
    pub use crate::frames::*;
    pub use crate::grid::*;
    pub use crate::history::*;
    pub use crate::input::*;
    pub use crate::paint::*;
    pub use crate::player::*;
    pub use crate::session::*;
}

pub use prelude::*;

//! Input events consumed by the editor session.
//!
//! Pointer and touch events are reduced to cell coordinates before they reach
//! the session; keyboard chords map onto undo/redo.

use crate::grid::GRID_SIZE;

/// Editing canvas size in pixels.
pub const EDITOR_SIZE: u32 = 320;

/// An input event for the editor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down or touch start) over a cell.
    PointerDown {
        /// Cell row (may be out of range)
        row: i32,
        /// Cell column (may be out of range)
        col: i32,
    },
    /// Pointer moved over a cell.
    PointerMove {
        /// Cell row (may be out of range)
        row: i32,
        /// Cell column (may be out of range)
        col: i32,
    },
    /// Pointer released (mouse up or touch end).
    PointerUp,
    /// Pointer left the canvas.
    PointerLeave,
    /// Keyboard chord.
    Key(KeyChord),
}

/// A key press with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyChord {
    /// The key character.
    pub key: char,
    /// Control held.
    pub ctrl: bool,
    /// Command / meta held.
    pub meta: bool,
    /// Shift held.
    pub shift: bool,
}

/// Commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Undo the last stroke.
    Undo,
    /// Redo the last undone stroke.
    Redo,
}

impl KeyChord {
    /// Creates a chord with Control held.
    #[must_use]
    pub const fn ctrl(key: char) -> Self {
        Self {
            key,
            ctrl: true,
            meta: false,
            shift: false,
        }
    }

    /// Adds Shift to the chord.
    #[must_use]
    pub const fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Maps the chord to a command: Ctrl/Cmd+Z undoes, Ctrl/Cmd+Y and
    /// Ctrl/Cmd+Shift+Z redo.
    #[must_use]
    pub fn command(&self) -> Option<KeyCommand> {
        if !(self.ctrl || self.meta) {
            return None;
        }
        match self.key.to_ascii_lowercase() {
            'z' if self.shift => Some(KeyCommand::Redo),
            'z' => Some(KeyCommand::Undo),
            'y' => Some(KeyCommand::Redo),
            _ => None,
        }
    }
}

/// Maps client coordinates on a rendered canvas to a `(row, col)` cell.
///
/// `canvas_size` is the canvas' intrinsic size and `rendered_size` the size it
/// is displayed at; a non-positive rendered size means no scaling.
#[must_use]
pub fn canvas_cell(x: f32, y: f32, canvas_size: f32, rendered_size: f32) -> (i32, i32) {
    let scale = if rendered_size > 0.0 {
        canvas_size / rendered_size
    } else {
        1.0
    };
    let cell_size = canvas_size / GRID_SIZE as f32;
    if cell_size <= 0.0 {
        return (-1, -1);
    }
    let row = (y * scale / cell_size).floor() as i32;
    let col = (x * scale / cell_size).floor() as i32;
    (row, col)
}

/// Converts an event coordinate to a cell index if it lies on the grid.
#[must_use]
pub fn cell_index(value: i32) -> Option<usize> {
    usize::try_from(value).ok().filter(|&v| v < GRID_SIZE)
}

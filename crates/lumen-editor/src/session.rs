//! Editor session: the single context object for one editing window.
//!
//! The session owns the current tool, colour, symmetry flags, playback rate,
//! the frame sequence with its active pointer, the live edit buffer and the
//! history of that buffer. All mutation goes through it.
//!
//! The live buffer is flushed into the active frame slot before every
//! structural operation. History is scoped to the buffer: whenever the buffer
//! is replaced by another frame the history starts over.

use lumen_common::Rgb;
use tracing::{debug, info, warn};

use crate::error::{EditorResult, GuardRejection};
use crate::frames::FrameSequence;
use crate::grid::PixelGrid;
use crate::history::HistoryStack;
use crate::input::{cell_index, InputEvent, KeyCommand};
use crate::paint::{self, Axis, Symmetry, Tool};
use crate::player::DEFAULT_FPS;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Confirmation of a successful action.
    Info,
    /// A rejected action.
    Warning,
}

/// A transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Creates an info notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Creates a warning notice.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// State of one editing session.
#[derive(Debug, Clone)]
pub struct EditorSession {
    frames: FrameSequence,
    buffer: PixelGrid,
    history: HistoryStack,
    tool: Tool,
    color: Rgb,
    symmetry: Symmetry,
    fps: u32,
    drawing: bool,
    revision: u64,
    notices: Vec<Notice>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Creates a session with one black frame.
    #[must_use]
    pub fn new() -> Self {
        Self::from_frames(Vec::new())
    }

    /// Creates a session editing the given frames (first frame active).
    #[must_use]
    pub fn from_frames(frames: Vec<PixelGrid>) -> Self {
        let frames = FrameSequence::from_frames(frames);
        Self {
            buffer: frames.active(),
            frames,
            history: HistoryStack::new(),
            tool: Tool::default(),
            color: Rgb::BLACK,
            symmetry: Symmetry::default(),
            fps: DEFAULT_FPS,
            drawing: false,
            revision: 0,
            notices: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The grid being edited.
    #[must_use]
    pub fn live_grid(&self) -> &PixelGrid {
        &self.buffer
    }

    /// The frame sequence. The active slot may lag behind the live grid
    /// until the next flush; use [`Self::frames_snapshot`] for a synced copy.
    #[must_use]
    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    /// Flushes the buffer and returns a copy of every frame.
    pub fn frames_snapshot(&mut self) -> Vec<PixelGrid> {
        self.flush();
        self.frames.frames().to_vec()
    }

    /// Index of the active frame.
    #[must_use]
    pub fn active_frame(&self) -> usize {
        self.frames.active_index()
    }

    /// Number of frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// History of the live buffer.
    #[must_use]
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Current tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Current colour.
    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Current symmetry flags.
    #[must_use]
    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Playback rate used for previews and saved icons.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Counter bumped by every change to the grid or frames.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Takes all pending notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ------------------------------------------------------------------
    // Tool state
    // ------------------------------------------------------------------

    /// Selects a tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.drawing = false;
    }

    /// Sets the current colour.
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Sets the playback rate; zero falls back to the default.
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = if fps == 0 { DEFAULT_FPS } else { fps };
    }

    /// Toggles mirroring on `axis` and returns the new state.
    pub fn toggle_symmetry(&mut self, axis: Axis) -> bool {
        let enabled = self.symmetry.toggle(axis);
        let name = match axis {
            Axis::Horizontal => "Horizontal",
            Axis::Vertical => "Vertical",
        };
        let state = if enabled { "enabled" } else { "disabled" };
        self.notices.push(Notice::info(format!("{name} symmetry {state}")));
        enabled
    }

    // ------------------------------------------------------------------
    // Paint engine
    // ------------------------------------------------------------------

    /// Feeds one input event to the session.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { row, col } => self.begin_stroke(row, col),
            InputEvent::PointerMove { row, col } => self.continue_stroke(row, col),
            InputEvent::PointerUp | InputEvent::PointerLeave => self.end_stroke(),
            InputEvent::Key(chord) => match chord.command() {
                Some(KeyCommand::Undo) => {
                    let _ = self.undo();
                },
                Some(KeyCommand::Redo) => {
                    let _ = self.redo();
                },
                None => {},
            },
        }
    }

    /// Starts a stroke at a cell: the pick tool copies the colour, the draw
    /// tool checkpoints once and paints.
    pub fn begin_stroke(&mut self, row: i32, col: i32) {
        let (Some(row), Some(col)) = (cell_index(row), cell_index(col)) else {
            return;
        };
        match self.tool {
            Tool::Pick => {
                self.pick(row, col);
            },
            Tool::Draw => {
                self.drawing = true;
                self.history.checkpoint(&self.buffer);
                debug!(row, col, "Stroke started");
                self.paint(row, col, self.color);
            },
        }
    }

    /// Paints a cell if a draw stroke is in progress.
    pub fn continue_stroke(&mut self, row: i32, col: i32) {
        if !self.drawing || self.tool != Tool::Draw {
            return;
        }
        if let (Some(row), Some(col)) = (cell_index(row), cell_index(col)) {
            self.paint(row, col, self.color);
        }
    }

    /// Ends the current stroke.
    pub fn end_stroke(&mut self) {
        self.drawing = false;
    }

    /// Paints a cell and its mirrors without touching history.
    ///
    /// Out-of-range coordinates are ignored.
    pub fn paint(&mut self, row: usize, col: usize, color: Rgb) {
        if paint::paint(&mut self.buffer, row, col, color, self.symmetry) {
            self.touch();
        }
    }

    /// Reads a cell and makes its colour current.
    pub fn pick(&mut self, row: usize, col: usize) -> Option<Rgb> {
        let color = paint::pick(&self.buffer, row, col)?;
        self.color = color;
        self.notices.push(Notice::info(format!("Colour picked: {color}")));
        Some(color)
    }

    /// Fills the live grid with `color` (undoable).
    pub fn fill(&mut self, color: Rgb) {
        self.history.checkpoint(&self.buffer);
        self.buffer.fill(color);
        self.touch();
    }

    /// Clears the live grid to black (undoable).
    pub fn clear(&mut self) {
        self.fill(Rgb::BLACK);
    }

    /// Undoes the last stroke.
    pub fn undo(&mut self) -> EditorResult<()> {
        self.drawing = false;
        match self.history.undo(&mut self.buffer) {
            Ok(()) => {
                self.touch();
                self.notices.push(Notice::info("Undone"));
                Ok(())
            },
            Err(rejection) => self.reject(rejection),
        }
    }

    /// Redoes the last undone stroke.
    pub fn redo(&mut self) -> EditorResult<()> {
        self.drawing = false;
        match self.history.redo(&mut self.buffer) {
            Ok(()) => {
                self.touch();
                self.notices.push(Notice::info("Redone"));
                Ok(())
            },
            Err(rejection) => self.reject(rejection),
        }
    }

    // ------------------------------------------------------------------
    // Frame management
    // ------------------------------------------------------------------

    /// Writes the live buffer into the active frame slot.
    pub fn flush(&mut self) {
        self.frames.store(&self.buffer);
    }

    /// Switches to frame `index`.
    pub fn select_frame(&mut self, index: usize) -> EditorResult<()> {
        self.flush();
        match self.frames.select(index) {
            Ok(grid) => {
                self.load_buffer(grid);
                Ok(())
            },
            Err(rejection) => self.reject(rejection),
        }
    }

    /// Appends a black frame and switches to it.
    pub fn add_frame(&mut self) {
        self.flush();
        let grid = self.frames.add();
        self.load_buffer(grid);
        self.notices.push(Notice::info("Frame added"));
    }

    /// Duplicates the active frame and switches to the copy.
    pub fn duplicate_frame(&mut self) {
        self.flush();
        let grid = self.frames.duplicate();
        self.load_buffer(grid);
        self.notices.push(Notice::info("Frame duplicated"));
    }

    /// Deletes the active frame; rejected for the last remaining frame.
    pub fn delete_frame(&mut self) -> EditorResult<()> {
        self.flush();
        match self.frames.delete() {
            Ok(grid) => {
                self.load_buffer(grid);
                self.notices.push(Notice::info("Frame deleted"));
                Ok(())
            },
            Err(rejection) => self.reject(rejection),
        }
    }

    /// Replaces the whole animation, e.g. when opening a saved icon.
    pub fn load_frames(&mut self, frames: Vec<PixelGrid>, fps: u32) {
        self.frames.replace_all(frames);
        self.set_fps(fps);
        let grid = self.frames.active();
        self.load_buffer(grid);
        info!(frames = self.frames.len(), fps = self.fps, "Loaded animation");
    }

    /// Records a rejection as a warning notice and returns it.
    pub fn reject<T>(&mut self, rejection: GuardRejection) -> EditorResult<T> {
        warn!("Rejected: {rejection}");
        self.notices.push(Notice::warning(rejection.to_string()));
        Err(rejection)
    }

    /// Swaps in a new live buffer and starts a fresh history.
    fn load_buffer(&mut self, grid: PixelGrid) {
        self.buffer = grid;
        self.history.clear();
        self.drawing = false;
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyChord;

    fn down(row: i32, col: i32) -> InputEvent {
        InputEvent::PointerDown { row, col }
    }

    fn drag(row: i32, col: i32) -> InputEvent {
        InputEvent::PointerMove { row, col }
    }

    #[test]
    fn test_stroke_paints_with_current_color() {
        let mut session = EditorSession::new();
        session.set_color(Rgb::RED);
        session.handle(down(1, 1));
        session.handle(drag(1, 2));
        session.handle(InputEvent::PointerUp);
        session.handle(drag(1, 3));

        let grid = session.live_grid();
        assert_eq!(grid.get(1, 1), Some(Rgb::RED));
        assert_eq!(grid.get(1, 2), Some(Rgb::RED));
        assert_eq!(grid.get(1, 3), Some(Rgb::BLACK));
    }

    #[test]
    fn test_stroke_undoes_atomically() {
        let mut session = EditorSession::new();
        session.set_color(Rgb::GREEN);
        session.handle(down(0, 0));
        for col in 1..8 {
            session.handle(drag(0, col));
        }
        session.handle(InputEvent::PointerUp);
        assert_eq!(session.history().len(), 1);

        session.undo().expect("undo");
        assert!(session.live_grid().is_blank());
    }

    #[test]
    fn test_pointer_down_outside_grid_does_nothing() {
        let mut session = EditorSession::new();
        session.handle(down(-1, 3));
        session.handle(down(3, 8));
        assert!(!session.is_drawing());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_pick_tool_sets_color_without_mutation() {
        let mut session = EditorSession::new();
        session.set_color(Rgb::BLUE);
        session.handle(down(4, 4));
        session.handle(InputEvent::PointerUp);

        session.set_tool(Tool::Pick);
        session.set_color(Rgb::WHITE);
        let revision = session.revision();
        session.handle(down(4, 4));

        assert_eq!(session.color(), Rgb::BLUE);
        assert_eq!(session.revision(), revision);
        assert_eq!(session.history().len(), 1);
        assert!(!session.is_drawing());
    }

    #[test]
    fn test_keyboard_undo_redo() {
        let mut session = EditorSession::new();
        session.set_color(Rgb::RED);
        session.handle(down(2, 2));
        session.handle(InputEvent::PointerUp);

        session.handle(InputEvent::Key(KeyChord::ctrl('z')));
        assert!(session.live_grid().is_blank());

        session.handle(InputEvent::Key(KeyChord::ctrl('y')));
        assert_eq!(session.live_grid().get(2, 2), Some(Rgb::RED));
    }

    #[test]
    fn test_undo_rejection_emits_warning() {
        let mut session = EditorSession::new();
        assert_eq!(session.undo(), Err(GuardRejection::NothingToUndo));
        let notices = session.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(session.drain_notices().is_empty());
    }

    #[test]
    fn test_fill_and_clear_are_undoable() {
        let mut session = EditorSession::new();
        session.fill(Rgb::BLUE);
        session.clear();
        assert!(session.live_grid().is_blank());
        session.undo().expect("undo clear");
        assert!(session.live_grid().iter().all(|c| c == Rgb::BLUE));
        session.undo().expect("undo fill");
        assert!(session.live_grid().is_blank());
    }

    #[test]
    fn test_switching_frames_keeps_edits() {
        let mut session = EditorSession::new();
        session.set_color(Rgb::RED);
        session.handle(down(0, 0));
        session.handle(InputEvent::PointerUp);

        session.add_frame();
        assert!(session.live_grid().is_blank());
        session.select_frame(0).expect("select");
        assert_eq!(session.live_grid().get(0, 0), Some(Rgb::RED));
    }

    #[test]
    fn test_history_resets_on_frame_switch() {
        let mut session = EditorSession::new();
        session.fill(Rgb::GREEN);
        session.add_frame();
        assert!(!session.history().can_undo());
        assert_eq!(session.undo(), Err(GuardRejection::NothingToUndo));
        assert!(session.live_grid().is_blank());
    }

    #[test]
    fn test_duplicate_copies_unflushed_edits() {
        let mut session = EditorSession::new();
        session.fill(Rgb::BLUE);
        session.duplicate_frame();
        assert_eq!(session.active_frame(), 1);
        assert_eq!(session.frame_count(), 2);
        assert!(session.live_grid().iter().all(|c| c == Rgb::BLUE));
    }

    #[test]
    fn test_delete_last_frame_rejected() {
        let mut session = EditorSession::new();
        session.fill(Rgb::RED);
        assert_eq!(session.delete_frame(), Err(GuardRejection::LastFrame));
        assert_eq!(session.frame_count(), 1);
        assert!(session.live_grid().iter().all(|c| c == Rgb::RED));
    }

    #[test]
    fn test_delete_loads_neighbour() {
        let mut session = EditorSession::new();
        session.fill(Rgb::RED);
        session.add_frame();
        session.fill(Rgb::GREEN);
        session.delete_frame().expect("delete");

        assert_eq!(session.frame_count(), 1);
        assert!(session.live_grid().iter().all(|c| c == Rgb::RED));
    }

    #[test]
    fn test_frames_snapshot_flushes() {
        let mut session = EditorSession::new();
        session.fill(Rgb::WHITE);
        let snapshot = session.frames_snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].iter().all(|c| c == Rgb::WHITE));
    }

    #[test]
    fn test_load_frames_resets_state() {
        let mut session = EditorSession::new();
        session.fill(Rgb::RED);
        session.add_frame();
        session.load_frames(vec![PixelGrid::filled(Rgb::BLUE), PixelGrid::new()], 0);

        assert_eq!(session.frame_count(), 2);
        assert_eq!(session.active_frame(), 0);
        assert_eq!(session.fps(), DEFAULT_FPS);
        assert!(!session.history().can_undo());
        assert!(session.live_grid().iter().all(|c| c == Rgb::BLUE));
    }

    #[test]
    fn test_symmetry_toggle_emits_notice() {
        let mut session = EditorSession::new();
        assert!(session.toggle_symmetry(Axis::Vertical));
        let notices = session.drain_notices();
        assert_eq!(notices, vec![Notice::info("Vertical symmetry enabled")]);
    }
}

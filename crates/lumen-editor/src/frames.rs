//! Ordered, never-empty list of animation frames.
//!
//! The sequence owns the active frame pointer. It does not know about the
//! live edit buffer: callers store the buffer with [`FrameSequence::store`]
//! before every structural operation and load the returned grid afterwards.

use tracing::debug;

use crate::error::{EditorResult, GuardRejection};
use crate::grid::PixelGrid;

/// Frames of one animation plus the active frame pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence {
    frames: Vec<PixelGrid>,
    active: usize,
}

impl Default for FrameSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSequence {
    /// Creates a sequence holding one black frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![PixelGrid::new()],
            active: 0,
        }
    }

    /// Creates a sequence from existing frames; an empty list becomes one
    /// black frame.
    #[must_use]
    pub fn from_frames(frames: Vec<PixelGrid>) -> Self {
        let mut sequence = Self::new();
        sequence.replace_all(frames);
        sequence
    }

    /// Number of frames (always at least 1).
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Index of the active frame.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The stored grid of the active frame.
    #[must_use]
    pub fn active(&self) -> PixelGrid {
        self.frames.get(self.active).copied().unwrap_or_default()
    }

    /// Gets a frame by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PixelGrid> {
        self.frames.get(index)
    }

    /// All frames in order.
    #[must_use]
    pub fn frames(&self) -> &[PixelGrid] {
        &self.frames
    }

    /// Writes `grid` into the active slot.
    pub fn store(&mut self, grid: &PixelGrid) {
        if let Some(slot) = self.frames.get_mut(self.active) {
            *slot = *grid;
        }
    }

    /// Makes `index` the active frame and returns its grid.
    pub fn select(&mut self, index: usize) -> EditorResult<PixelGrid> {
        let Some(grid) = self.frames.get(index).copied() else {
            return Err(GuardRejection::FrameOutOfRange {
                index,
                len: self.frames.len(),
            });
        };
        self.active = index;
        debug!(index, "Selected frame");
        Ok(grid)
    }

    /// Appends a black frame, activates it and returns it.
    pub fn add(&mut self) -> PixelGrid {
        let grid = PixelGrid::new();
        self.frames.push(grid);
        self.active = self.frames.len() - 1;
        debug!(index = self.active, len = self.frames.len(), "Added frame");
        grid
    }

    /// Inserts a copy of the active frame right after it, activates the copy
    /// and returns it.
    pub fn duplicate(&mut self) -> PixelGrid {
        let grid = self.active();
        self.active += 1;
        self.frames.insert(self.active, grid);
        debug!(index = self.active, len = self.frames.len(), "Duplicated frame");
        grid
    }

    /// Removes the active frame and returns the grid that becomes active.
    ///
    /// Rejected when only one frame remains.
    pub fn delete(&mut self) -> EditorResult<PixelGrid> {
        if self.frames.len() <= 1 {
            return Err(GuardRejection::LastFrame);
        }
        self.frames.remove(self.active);
        if self.active >= self.frames.len() {
            self.active = self.frames.len() - 1;
        }
        debug!(index = self.active, len = self.frames.len(), "Deleted frame");
        Ok(self.active())
    }

    /// Replaces every frame and activates the first one.
    pub fn replace_all(&mut self, frames: Vec<PixelGrid>) {
        self.frames = if frames.is_empty() {
            vec![PixelGrid::new()]
        } else {
            frames
        };
        self.active = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_common::Rgb;
    use proptest::prelude::*;

    fn marked(color: Rgb) -> PixelGrid {
        let mut grid = PixelGrid::new();
        grid.set(0, 0, color);
        grid
    }

    #[test]
    fn test_new_has_one_black_frame() {
        let frames = FrameSequence::new();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames.active_index(), 0);
        assert!(frames.active().is_blank());
    }

    #[test]
    fn test_from_empty_frames() {
        let frames = FrameSequence::from_frames(Vec::new());
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_add_activates_new_frame() {
        let mut frames = FrameSequence::from_frames(vec![marked(Rgb::RED)]);
        let added = frames.add();
        assert!(added.is_blank());
        assert_eq!(frames.len(), 2);
        assert_eq!(frames.active_index(), 1);
    }

    #[test]
    fn test_duplicate_inserts_after_active() {
        let mut frames = FrameSequence::from_frames(vec![
            marked(Rgb::RED),
            marked(Rgb::GREEN),
            marked(Rgb::BLUE),
        ]);
        frames.select(0).expect("select");
        let copy = frames.duplicate();

        assert_eq!(copy, marked(Rgb::RED));
        assert_eq!(frames.active_index(), 1);
        assert_eq!(frames.get(1), Some(&marked(Rgb::RED)));
        assert_eq!(frames.get(2), Some(&marked(Rgb::GREEN)));
        assert_eq!(frames.len(), 4);
    }

    #[test]
    fn test_delete_last_frame_rejected() {
        let mut frames = FrameSequence::new();
        assert_eq!(frames.delete(), Err(GuardRejection::LastFrame));
        assert_eq!(frames.delete(), Err(GuardRejection::LastFrame));
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_delete_clamps_pointer() {
        let mut frames = FrameSequence::from_frames(vec![
            marked(Rgb::RED),
            marked(Rgb::GREEN),
            marked(Rgb::BLUE),
        ]);
        frames.select(2).expect("select");
        let now_active = frames.delete().expect("delete");
        assert_eq!(frames.active_index(), 1);
        assert_eq!(now_active, marked(Rgb::GREEN));
    }

    #[test]
    fn test_delete_middle_keeps_index() {
        let mut frames = FrameSequence::from_frames(vec![
            marked(Rgb::RED),
            marked(Rgb::GREEN),
            marked(Rgb::BLUE),
        ]);
        frames.select(1).expect("select");
        let now_active = frames.delete().expect("delete");
        assert_eq!(frames.active_index(), 1);
        assert_eq!(now_active, marked(Rgb::BLUE));
    }

    #[test]
    fn test_select_out_of_range() {
        let mut frames = FrameSequence::new();
        assert_eq!(
            frames.select(3),
            Err(GuardRejection::FrameOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(frames.active_index(), 0);
    }

    #[test]
    fn test_store_writes_active_slot() {
        let mut frames = FrameSequence::new();
        frames.add();
        frames.store(&marked(Rgb::BLUE));
        assert_eq!(frames.get(1), Some(&marked(Rgb::BLUE)));
        assert!(frames.get(0).is_some_and(PixelGrid::is_blank));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add,
        Duplicate,
        Delete,
        Select(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Add),
            Just(Op::Duplicate),
            Just(Op::Delete),
            (0usize..8).prop_map(Op::Select),
        ]
    }

    proptest! {
        #[test]
        fn prop_length_never_below_one(ops in proptest::collection::vec(op(), 0..64)) {
            let mut frames = FrameSequence::new();
            for op in ops {
                match op {
                    Op::Add => { frames.add(); },
                    Op::Duplicate => { frames.duplicate(); },
                    Op::Delete => { let _ = frames.delete(); },
                    Op::Select(index) => { let _ = frames.select(index); },
                }
                prop_assert!(frames.len() >= 1);
                prop_assert!(frames.active_index() < frames.len());
            }
        }
    }
}

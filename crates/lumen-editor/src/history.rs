//! Bounded undo/redo history for the live editing buffer.
//!
//! The history is a ring of at most [`HISTORY_LIMIT`] snapshots with a cursor.
//! Entries before the cursor are undo states; entries at and after the cursor
//! are redo states. Undo and redo swap the live grid with the entry they step
//! over, so the displaced grid is always kept for the opposite direction.

use std::collections::VecDeque;

use tracing::trace;

use crate::error::{EditorResult, GuardRejection};
use crate::grid::PixelGrid;

/// Maximum number of retained snapshots.
pub const HISTORY_LIMIT: usize = 50;

/// Linear undo/redo log of grid snapshots.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<PixelGrid>,
    cursor: usize,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStack {
    /// Creates an empty history bounded by [`HISTORY_LIMIT`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_LIMIT)
    }

    /// Creates an empty history with a custom bound (at least 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            cursor: 0,
            capacity,
        }
    }

    /// Records `grid` as the state to return to on the next undo.
    ///
    /// Any redo states are discarded. Once the bound is exceeded the oldest
    /// snapshot is evicted and the cursor stays at the tail.
    pub fn checkpoint(&mut self, grid: &PixelGrid) {
        self.entries.truncate(self.cursor);
        self.entries.push_back(*grid);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        } else {
            self.cursor += 1;
        }
        trace!(cursor = self.cursor, len = self.entries.len(), "History checkpoint");
    }

    /// Steps back one snapshot, restoring it into `live`.
    pub fn undo(&mut self, live: &mut PixelGrid) -> EditorResult<()> {
        if self.cursor == 0 {
            return Err(GuardRejection::NothingToUndo);
        }
        self.cursor -= 1;
        if let Some(entry) = self.entries.get_mut(self.cursor) {
            std::mem::swap(entry, live);
        }
        Ok(())
    }

    /// Steps forward one snapshot, restoring it into `live`.
    pub fn redo(&mut self, live: &mut PixelGrid) -> EditorResult<()> {
        let Some(entry) = self.entries.get_mut(self.cursor) else {
            return Err(GuardRejection::NothingToRedo);
        };
        std::mem::swap(entry, live);
        self.cursor += 1;
        Ok(())
    }

    /// Whether an undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether a redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Number of retained snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no snapshots are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Maximum number of retained snapshots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_common::Rgb;
    use proptest::prelude::*;

    fn grid_with(value: u8) -> PixelGrid {
        PixelGrid::filled(Rgb::new(value, value, value))
    }

    /// Checkpoints then replaces the live grid, like a one-pixel stroke.
    fn edit(history: &mut HistoryStack, live: &mut PixelGrid, next: PixelGrid) {
        history.checkpoint(live);
        *live = next;
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut history = HistoryStack::new();
        let mut live = grid_with(1);
        assert_eq!(history.undo(&mut live), Err(GuardRejection::NothingToUndo));
        assert_eq!(history.redo(&mut live), Err(GuardRejection::NothingToRedo));
        assert_eq!(live, grid_with(1));
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut history = HistoryStack::new();
        let mut live = grid_with(0);
        edit(&mut history, &mut live, grid_with(1));
        edit(&mut history, &mut live, grid_with(2));

        history.undo(&mut live).expect("undo");
        assert_eq!(live, grid_with(1));
        history.undo(&mut live).expect("undo");
        assert_eq!(live, grid_with(0));
        assert!(!history.can_undo());

        history.redo(&mut live).expect("redo");
        assert_eq!(live, grid_with(1));
        history.redo(&mut live).expect("redo");
        assert_eq!(live, grid_with(2));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_edit_discards_redo_branch() {
        let mut history = HistoryStack::new();
        let mut live = grid_with(0);
        edit(&mut history, &mut live, grid_with(1));
        edit(&mut history, &mut live, grid_with(2));
        history.undo(&mut live).expect("undo");

        edit(&mut history, &mut live, grid_with(9));
        assert!(!history.can_redo());
        assert_eq!(history.redo(&mut live), Err(GuardRejection::NothingToRedo));

        history.undo(&mut live).expect("undo");
        assert_eq!(live, grid_with(1));
    }

    #[test]
    fn test_bound_evicts_oldest() {
        let mut history = HistoryStack::new();
        let mut live = grid_with(0);
        for value in 1..=60 {
            edit(&mut history, &mut live, grid_with(value));
        }
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.cursor(), HISTORY_LIMIT);

        for _ in 0..HISTORY_LIMIT {
            history.undo(&mut live).expect("undo");
        }
        // The window keeps the 50 most recent pre-edit states: 10..=59.
        assert_eq!(live, grid_with(10));
        assert_eq!(history.undo(&mut live), Err(GuardRejection::NothingToUndo));
    }

    #[test]
    fn test_clear() {
        let mut history = HistoryStack::with_capacity(3);
        let mut live = grid_with(0);
        edit(&mut history, &mut live, grid_with(1));
        history.clear();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert_eq!(history.capacity(), 3);
    }

    proptest! {
        #[test]
        fn prop_undo_k_returns_to_origin(k in 1usize..=HISTORY_LIMIT) {
            let mut history = HistoryStack::new();
            let origin = grid_with(0);
            let mut live = origin;
            for step in 1..=k {
                edit(&mut history, &mut live, grid_with(step as u8));
            }
            for _ in 0..k {
                prop_assert!(history.undo(&mut live).is_ok());
            }
            prop_assert_eq!(live, origin);
        }

        #[test]
        fn prop_redo_j_restores_pre_undo_state(k in 1usize..=HISTORY_LIMIT, j_seed: usize) {
            let j = j_seed % k + 1;
            let mut history = HistoryStack::new();
            let mut live = grid_with(0);
            for step in 1..=k {
                edit(&mut history, &mut live, grid_with(step as u8));
            }
            let before = live;
            for _ in 0..j {
                prop_assert!(history.undo(&mut live).is_ok());
            }
            for _ in 0..j {
                prop_assert!(history.redo(&mut live).is_ok());
            }
            prop_assert_eq!(live, before);
        }

        #[test]
        fn prop_history_never_exceeds_bound(k in 0usize..200) {
            let mut history = HistoryStack::new();
            let mut live = grid_with(0);
            for step in 0..k {
                edit(&mut history, &mut live, grid_with(step as u8));
            }
            prop_assert!(history.len() <= HISTORY_LIMIT);
            prop_assert!(history.cursor() <= history.len());
        }
    }
}

//! Animation preview player.
//!
//! The player cycles through the frames at a fixed rate and presents each one
//! on a [`PreviewSurface`]. It keeps its own frame index and never moves the
//! editing pointer, so a preview can run while the user keeps drawing.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use lumen_editor::grid::PixelGrid;
//! use lumen_editor::player::{AnimationPlayer, PreviewSurface};
//!
//! struct Count(usize);
//! impl PreviewSurface for Count {
//!     fn present(&mut self, _index: usize, _grid: &PixelGrid) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let frames = vec![PixelGrid::new(); 3];
//! let mut surface = Count(0);
//! let mut player = AnimationPlayer::new();
//! player.start(&frames, 10, &mut surface).unwrap();
//!
//! // 250ms at 10 fps = 2 ticks (one frame was presented on start).
//! player.update(Duration::from_millis(250), &frames, &mut surface);
//! assert_eq!(player.index(), 2);
//! assert_eq!(surface.0, 3);
//! ```

use std::time::Duration;

use tracing::{debug, trace};

use crate::error::{EditorResult, GuardRejection};
use crate::grid::PixelGrid;

/// Playback rate used when none (or zero) is given.
pub const DEFAULT_FPS: u32 = 8;

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not playing.
    #[default]
    Stopped,
    /// Cycling through frames.
    Playing,
}

/// A destination for preview frames.
pub trait PreviewSurface {
    /// Shows `grid`, which is frame `index` of the animation.
    fn present(&mut self, index: usize, grid: &PixelGrid);
}

/// Frame-cycling preview player.
#[derive(Debug, Clone, Default)]
pub struct AnimationPlayer {
    state: PlaybackState,
    fps: u32,
    index: usize,
    elapsed: Duration,
}

impl AnimationPlayer {
    /// Creates a stopped player.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fps: DEFAULT_FPS,
            ..Self::default()
        }
    }

    /// Starts playback from frame 0 and presents it immediately.
    ///
    /// Rejected with no state change when there is at most one frame. A rate
    /// of zero falls back to [`DEFAULT_FPS`]. Starting while already playing
    /// restarts from the beginning.
    pub fn start(
        &mut self,
        frames: &[PixelGrid],
        fps: u32,
        surface: &mut impl PreviewSurface,
    ) -> EditorResult<()> {
        if frames.len() <= 1 {
            return Err(GuardRejection::NotEnoughFrames);
        }
        self.fps = if fps == 0 { DEFAULT_FPS } else { fps };
        self.state = PlaybackState::Playing;
        self.index = 0;
        self.elapsed = Duration::ZERO;
        surface.present(0, &frames[0]);
        debug!(frames = frames.len(), fps = self.fps, "Playback started");
        Ok(())
    }

    /// Stops playback. Calling it while stopped does nothing.
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Playing {
            debug!(index = self.index, "Playback stopped");
        }
        self.state = PlaybackState::Stopped;
        self.elapsed = Duration::ZERO;
    }

    /// Whether playback is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current rate.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Index of the frame last presented.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Time between two frames.
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }

    /// Advances one frame and presents it.
    ///
    /// The frame list is read at tick time, so frames added or deleted during
    /// playback are picked up. Does nothing while stopped.
    pub fn tick(&mut self, frames: &[PixelGrid], surface: &mut impl PreviewSurface) {
        if !self.is_playing() || frames.is_empty() {
            return;
        }
        self.index = (self.index + 1) % frames.len();
        trace!(index = self.index, "Preview tick");
        surface.present(self.index, &frames[self.index]);
    }

    /// Accumulates `delta` and ticks once per elapsed period.
    ///
    /// Returns the number of ticks performed.
    pub fn update(
        &mut self,
        delta: Duration,
        frames: &[PixelGrid],
        surface: &mut impl PreviewSurface,
    ) -> usize {
        if !self.is_playing() {
            return 0;
        }
        let period = self.period();
        self.elapsed += delta;
        let mut ticks = 0;
        while self.elapsed >= period {
            self.elapsed -= period;
            self.tick(frames, surface);
            ticks += 1;
        }
        ticks
    }
}

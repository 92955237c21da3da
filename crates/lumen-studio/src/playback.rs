//! Background playback timer.
//!
//! Drives the [`AnimationPlayer`] from a tokio interval. Only one timer task
//! exists at a time: starting playback aborts the previous task before the
//! new one is spawned. Frame edits reach the running task through a watch
//! channel, so the preview follows the editor without stopping.

use std::sync::Arc;

use lumen_editor::error::EditorResult;
use lumen_editor::grid::PixelGrid;
use lumen_editor::player::AnimationPlayer;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::output::PreviewBuffer;

/// Owns the player, its surface and the timer task.
pub struct PlaybackTimer {
    player: Arc<Mutex<AnimationPlayer>>,
    surface: Arc<Mutex<PreviewBuffer>>,
    frames: watch::Sender<Vec<PixelGrid>>,
    task: Option<JoinHandle<()>>,
}

impl Default for PlaybackTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackTimer {
    /// Creates a stopped timer.
    #[must_use]
    pub fn new() -> Self {
        let (frames, _) = watch::channel(Vec::new());
        Self {
            player: Arc::new(Mutex::new(AnimationPlayer::new())),
            surface: Arc::new(Mutex::new(PreviewBuffer::new())),
            frames,
            task: None,
        }
    }

    /// Starts playback of `frames` at `fps`.
    ///
    /// Rejected with no state change when there are fewer than two frames.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, frames: Vec<PixelGrid>, fps: u32) -> EditorResult<()> {
        self.abort_task();
        let period = {
            let mut player = self.player.lock();
            let mut surface = self.surface.lock();
            player.start(&frames, fps, &mut *surface)?;
            player.period()
        };
        self.frames.send_replace(frames);

        let player = Arc::clone(&self.player);
        let surface = Arc::clone(&self.surface);
        let mut frames_rx = self.frames.subscribe();
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; frame 0 is already shown.
            interval.tick().await;
            loop {
                interval.tick().await;
                let frames = frames_rx.borrow_and_update().clone();
                let mut player = player.lock();
                if !player.is_playing() {
                    break;
                }
                player.tick(&frames, &mut *surface.lock());
            }
            debug!("Playback task finished");
        }));
        Ok(())
    }

    /// Replaces the frames the running preview cycles through.
    pub fn update_frames(&self, frames: Vec<PixelGrid>) {
        if self.is_playing() {
            self.frames.send_replace(frames);
        }
    }

    /// Stops playback. Safe to call at any time.
    pub fn stop(&mut self) {
        self.abort_task();
        self.player.lock().stop();
    }

    /// Whether playback is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.player.lock().is_playing()
    }

    /// Index of the frame currently previewed.
    #[must_use]
    pub fn index(&self) -> usize {
        self.player.lock().index()
    }

    /// Last frame shown on the preview surface.
    #[must_use]
    pub fn last_presented(&self) -> Option<(usize, PixelGrid)> {
        self.surface.lock().last()
    }

    /// Total frames shown on the preview surface.
    #[cfg(test)]
    pub fn presented(&self) -> u64 {
        self.surface.lock().presented()
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PlaybackTimer {
    fn drop(&mut self) {
        self.abort_task();
    }
}

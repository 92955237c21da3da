//! Studio application: dispatches console commands to the editor session,
//! the icon library, the playback timer and the device sink.

use chrono::Utc;
use lumen_common::IconId;
use lumen_editor::device::{DeviceFrame, PixelSink};
use lumen_editor::export::export_png;
use lumen_editor::input::{canvas_cell, InputEvent, EDITOR_SIZE};
use lumen_editor::session::{EditorSession, NoticeLevel};
use lumen_library::draft::DraftStore;
use lumen_library::library::{IconLibrary, Preview};
use lumen_library::store::IconStore;
use tracing::{debug, warn};

use crate::commands::{Command, FrameCommand, HELP};
use crate::config::StudioConfig;
use crate::output::{render_grid, LogSink};
use crate::playback::PlaybackTimer;

/// What the console loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print these lines and keep reading.
    Lines(Vec<String>),
    /// Exit.
    Quit,
}

/// The studio state.
pub struct App<S> {
    config: StudioConfig,
    session: EditorSession,
    library: IconLibrary<S>,
    drafts: DraftStore,
    playback: PlaybackTimer,
    sink: LogSink,
    current: Option<IconId>,
    synced_revision: u64,
}

impl<S: IconStore> App<S> {
    /// Creates the app, restoring the draft if there is one.
    pub fn new(config: StudioConfig, store: S) -> Self {
        let drafts = DraftStore::new(config.draft_path.clone());
        let mut session = EditorSession::new();
        session.set_fps(config.default_fps);
        if let Some(frames) = drafts.load() {
            session.load_frames(frames, config.default_fps);
        }
        let synced_revision = session.revision();
        Self {
            config,
            session,
            library: IconLibrary::new(store),
            drafts,
            playback: PlaybackTimer::new(),
            sink: LogSink::new(),
            current: None,
            synced_revision,
        }
    }

    /// Runs one command and returns the console reply.
    pub async fn execute(&mut self, command: Command) -> Reply {
        debug!(?command, "Executing");
        let mut lines = match command {
            Command::Quit => {
                self.playback.stop();
                self.sync_draft();
                return Reply::Quit;
            },
            Command::Help => vec![HELP.to_string()],
            Command::Save(name) => self.save(name).await,
            Command::List => self.list().await,
            Command::Delete(id) => self.delete(id).await,
            other => self.edit(other),
        };
        lines.extend(self.session.drain_notices().into_iter().map(|notice| match notice.level {
            NoticeLevel::Info => notice.message,
            NoticeLevel::Warning => format!("warning: {}", notice.message),
        }));
        self.sync_draft();
        Reply::Lines(lines)
    }

    /// Commands that never touch the store.
    fn edit(&mut self, command: Command) -> Vec<String> {
        let mut lines = Vec::new();
        match command {
            Command::Paint { row, col } => self.stroke(&[(row, col)]),
            Command::Click { x, y, rendered } => {
                let canvas = EDITOR_SIZE as f32;
                let rendered = rendered.map_or(canvas, |size| size as f32);
                let cell = canvas_cell(x as f32, y as f32, canvas, rendered);
                self.stroke(&[cell]);
            },
            Command::Stroke(cells) => self.stroke(&cells),
            Command::Pick { row, col } => {
                let inside = usize::try_from(row).ok().zip(usize::try_from(col).ok());
                if inside.and_then(|(r, c)| self.session.pick(r, c)).is_none() {
                    lines.push(format!("warning: cell ({row}, {col}) is outside the grid"));
                }
            },
            Command::Tool(tool) => {
                self.session.set_tool(tool);
                lines.push(format!("Tool: {}", tool.display_name()));
            },
            Command::Color(color) => {
                self.session.set_color(color);
                lines.push(format!("Colour: {color}"));
            },
            Command::Symmetry(axis) => {
                self.session.toggle_symmetry(axis);
            },
            Command::Fill(color) => {
                let color = color.unwrap_or(self.session.color());
                self.session.fill(color);
            },
            Command::Clear => self.session.clear(),
            Command::Undo => {
                if let Err(rejection) = self.session.undo() {
                    debug!(%rejection, "Undo refused");
                }
            },
            Command::Redo => {
                if let Err(rejection) = self.session.redo() {
                    debug!(%rejection, "Redo refused");
                }
            },
            Command::Frame(frame) => {
                let result = match frame {
                    FrameCommand::Add => {
                        self.session.add_frame();
                        Ok(())
                    },
                    FrameCommand::Duplicate => {
                        self.session.duplicate_frame();
                        Ok(())
                    },
                    FrameCommand::Delete => self.session.delete_frame(),
                    FrameCommand::Select(index) => self.session.select_frame(index),
                };
                // Refusals already queued a warning notice in the session.
                if let Err(rejection) = result {
                    debug!(%rejection, "Frame command refused");
                }
                lines.push(self.status());
            },
            Command::Fps(fps) => {
                self.session.set_fps(fps);
                lines.push(format!("Playback rate: {} fps", self.session.fps()));
            },
            Command::Play => {
                let frames = self.session.frames_snapshot();
                match self.playback.start(frames, self.session.fps()) {
                    Ok(()) => lines.push(format!("Playing at {} fps", self.session.fps())),
                    Err(rejection) => {
                        let _ = self.session.reject::<()>(rejection);
                    },
                }
            },
            Command::Stop => {
                self.playback.stop();
                lines.push("Stopped".to_string());
            },
            Command::Show => {
                lines.push(render_grid(self.session.live_grid()));
                if let Some((index, preview)) = self.playback.last_presented() {
                    if self.playback.is_playing() {
                        lines.push(format!("Preview frame {}:", index + 1));
                        lines.push(render_grid(&preview));
                    }
                }
                lines.push(self.status());
            },
            Command::Export(dir) => {
                let dir = dir.unwrap_or_else(|| self.config.export_dir.clone());
                match export_png(self.session.live_grid(), &dir, Utc::now()) {
                    Ok(path) => lines.push(format!("Exported {}", path.display())),
                    Err(e) => lines.push(format!("error: {e}")),
                }
            },
            Command::Send(brightness) => {
                let brightness = brightness.unwrap_or(self.config.brightness);
                let frame = DeviceFrame::from_grid(
                    self.session.live_grid(),
                    brightness,
                    self.config.orientation,
                );
                match self.sink.apply(&frame) {
                    Ok(()) => lines.push(format!("Sent frame at brightness {brightness}")),
                    Err(never) => match never {},
                }
            },
            Command::New => {
                self.playback.stop();
                self.session.load_frames(Vec::new(), self.config.default_fps);
                self.current = None;
                if let Err(e) = self.drafts.clear() {
                    warn!("Failed to discard draft: {e}");
                }
                self.synced_revision = self.session.revision();
                lines.push("New icon".to_string());
            },
            Command::Open(reference) => match self.library.open(&reference, &mut self.session) {
                Ok(record) => {
                    lines.push(format!("Opened {} ({} frames)", record.name, record.frame_count()));
                    self.current = Some(record.id.clone());
                    self.playback.stop();
                },
                Err(e) => lines.push(format!("error: {e}")),
            },
            Command::Preview(reference) => match self.library.preview(&reference) {
                Some(Preview::Grid(grid)) => lines.push(render_grid(&grid)),
                Some(Preview::Thumbnail(url)) => lines.push(url),
                None => lines.push(format!("error: unknown icon {reference}")),
            },
            Command::Save(_) | Command::List | Command::Delete(_) | Command::Help | Command::Quit => {},
        }
        lines
    }

    fn stroke(&mut self, cells: &[(i32, i32)]) {
        let Some(&(row, col)) = cells.first() else {
            return;
        };
        self.session.handle(InputEvent::PointerDown { row, col });
        for &(row, col) in &cells[1..] {
            self.session.handle(InputEvent::PointerMove { row, col });
        }
        self.session.handle(InputEvent::PointerUp);
    }

    async fn save(&mut self, name: Option<String>) -> Vec<String> {
        let id = self.current.clone().unwrap_or_else(|| self.library.generate_id());
        let name = name
            .or_else(|| self.library.get(&id).map(|r| r.name.clone()))
            .unwrap_or_default();
        match self.library.save_session(&mut self.session, id, &name).await {
            Ok(record) => {
                let line = format!("Saved {} ({})", record.name, record.short_id());
                self.current = Some(record.id);
                vec![line]
            },
            Err(e) => vec![format!("error: {e}")],
        }
    }

    async fn list(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Err(e) = self.library.refresh().await {
            lines.push(format!("error: {e}"));
        }
        let entries = self.library.entries();
        if entries.is_empty() {
            lines.push("No saved icons".to_string());
        }
        for entry in entries {
            let kind = if entry.animated { "animated" } else { "still" };
            lines.push(format!(
                "{}  {:<20} {:>2} frame(s)  {:<8} {}",
                entry.id,
                entry.name,
                entry.frame_count,
                kind,
                entry.modified.format("%Y-%m-%d %H:%M")
            ));
        }
        lines
    }

    async fn delete(&mut self, id: IconId) -> Vec<String> {
        match self.library.delete(&id).await {
            Ok(()) => {
                if self.current.as_ref() == Some(&id) {
                    self.current = None;
                }
                vec![format!("Deleted {id}")]
            },
            Err(e) => vec![format!("error: {e}")],
        }
    }

    fn status(&self) -> String {
        let symmetry = self.session.symmetry();
        format!(
            "frame {}/{} | tool {} | colour {} | symmetry h:{} v:{} | {} fps{}",
            self.session.active_frame() + 1,
            self.session.frame_count(),
            self.session.tool().display_name(),
            self.session.color(),
            on_off(symmetry.horizontal),
            on_off(symmetry.vertical),
            self.session.fps(),
            if self.playback.is_playing() {
                format!(" | playing frame {}", self.playback.index() + 1)
            } else {
                String::new()
            },
        )
    }

    /// Persists the draft and feeds the preview after any change.
    fn sync_draft(&mut self) {
        if self.session.revision() == self.synced_revision {
            return;
        }
        let frames = self.session.frames_snapshot();
        if let Err(e) = self.drafts.save(&frames) {
            warn!("Failed to save draft: {e}");
        }
        self.playback.update_frames(frames);
        self.synced_revision = self.session.revision();
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

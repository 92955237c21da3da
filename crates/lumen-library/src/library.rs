//! Icon library client.
//!
//! Maps editor sessions to and from persisted records and keeps a local cache
//! of the last successful listing. The cache is only changed by successful
//! store calls, so a failed save or delete leaves the listing as it was.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Utc};
use lumen_common::{IconId, IconRef};
use lumen_editor::error::GuardRejection;
use lumen_editor::grid::PixelGrid;
use lumen_editor::session::EditorSession;
use thiserror::Error;
use tracing::{info, warn};

use crate::record::IconRecord;
use crate::store::{IconStore, StoreError};

/// Errors from library operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The operation was refused.
    #[error(transparent)]
    Rejected(#[from] GuardRejection),

    /// The id is not in the cached listing.
    #[error("Unknown icon: {0}")]
    UnknownIcon(IconId),
}

/// Result type for library operations.
pub type LibraryResult<T> = Result<T, LibraryError>;

/// One row of the library listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    /// Full id.
    pub id: IconId,
    /// Display name.
    pub name: String,
    /// Last characters of the id.
    pub short_id: String,
    /// Number of frames.
    pub frame_count: usize,
    /// Whether the icon has more than one frame.
    pub animated: bool,
    /// First frame.
    pub thumbnail: PixelGrid,
    /// Time of the last save.
    pub modified: DateTime<Utc>,
}

impl From<&IconRecord> for LibraryEntry {
    fn from(record: &IconRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            short_id: record.short_id().to_string(),
            frame_count: record.frame_count(),
            animated: record.is_animated(),
            thumbnail: record.first_frame(),
            modified: record.modified,
        }
    }
}

/// What to show when previewing a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// First frame of a library icon.
    Grid(PixelGrid),
    /// Thumbnail URL of a foreign icon.
    Thumbnail(String),
}

/// Library client over an [`IconStore`].
#[derive(Debug)]
pub struct IconLibrary<S> {
    store: S,
    cache: HashMap<IconId, IconRecord>,
}

impl<S: IconStore> IconLibrary<S> {
    /// Creates a client with an empty cache.
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: HashMap::new(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reloads the cache from the store and returns the number of icons.
    pub async fn refresh(&mut self) -> LibraryResult<usize> {
        match self.store.list_all().await {
            Ok(records) => {
                self.cache = records;
                info!("Library refreshed from {} store: {} icons", self.store.name(), self.cache.len());
                Ok(self.cache.len())
            },
            Err(e) => {
                warn!("Failed to load icons: {e}");
                Err(e.into())
            },
        }
    }

    /// The cached records.
    pub fn cached(&self) -> &HashMap<IconId, IconRecord> {
        &self.cache
    }

    /// A cached record.
    pub fn get(&self, id: &IconId) -> Option<&IconRecord> {
        self.cache.get(id)
    }

    /// Cached records, most recently modified first.
    pub fn entries(&self) -> Vec<LibraryEntry> {
        let mut records: Vec<&IconRecord> = self.cache.values().collect();
        records.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.id.cmp(&b.id)));
        records.into_iter().map(LibraryEntry::from).collect()
    }

    /// Generates an id not present in the cache.
    pub fn generate_id(&self) -> IconId {
        loop {
            let id = IconId::generate();
            if !self.cache.contains_key(&id) {
                return id;
            }
        }
    }

    /// Builds the record for saving the session under `id`.
    ///
    /// The session buffer is flushed first. Re-saving a cached id keeps its
    /// creation time.
    pub fn snapshot(
        &self,
        session: &mut EditorSession,
        id: IconId,
        name: &str,
        now: DateTime<Utc>,
    ) -> IconRecord {
        let frames = session.frames_snapshot();
        let mut record = IconRecord::new(id, name, frames, session.fps(), now);
        if let Some(existing) = self.cache.get(&record.id) {
            record.created = existing.created;
        }
        record
    }

    /// Saves a record and caches the stored version.
    pub async fn save(&mut self, record: IconRecord) -> LibraryResult<IconRecord> {
        match self.store.save(&record).await {
            Ok(stored) => {
                info!(id = %stored.id, name = %stored.name, frames = stored.frame_count(), "Icon saved");
                self.cache.insert(stored.id.clone(), stored.clone());
                Ok(stored)
            },
            Err(e) => {
                warn!(id = %record.id, "Failed to save icon: {e}");
                Err(e.into())
            },
        }
    }

    /// Snapshots the session and saves it.
    ///
    /// The session is only borrowed for the snapshot, not while the store
    /// call is in flight.
    pub fn save_session(
        &mut self,
        session: &mut EditorSession,
        id: IconId,
        name: &str,
    ) -> impl Future<Output = LibraryResult<IconRecord>> + '_ {
        let record = self.snapshot(session, id, name, Utc::now());
        self.save(record)
    }

    /// Deletes a record and drops it from the cache.
    pub async fn delete(&mut self, id: &IconId) -> LibraryResult<()> {
        match self.store.delete(id).await {
            Ok(()) => {
                self.cache.remove(id);
                info!(id = %id, "Icon deleted");
                Ok(())
            },
            Err(e) => {
                warn!(id = %id, "Failed to delete icon: {e}");
                Err(e.into())
            },
        }
    }

    /// Loads a library icon into the session.
    ///
    /// Foreign references are rejected as read-only.
    pub fn open(&self, reference: &IconRef, session: &mut EditorSession) -> LibraryResult<&IconRecord> {
        let IconRef::Library(id) = reference else {
            let rejection = GuardRejection::ForeignIcon(reference.as_str().to_string());
            return session.reject(rejection).map_err(LibraryError::from);
        };
        let record = self.cache.get(id).ok_or_else(|| LibraryError::UnknownIcon(id.clone()))?;
        session.load_frames(record.frames.clone(), record.fps);
        info!(id = %id, name = %record.name, "Opened icon");
        Ok(record)
    }

    /// Preview for a reference: first frame of a cached library icon, or the
    /// catalogue thumbnail of a foreign one.
    pub fn preview(&self, reference: &IconRef) -> Option<Preview> {
        match reference {
            IconRef::Library(id) => self.cache.get(id).map(|r| Preview::Grid(r.first_frame())),
            IconRef::Foreign(_) => reference.thumbnail_url().map(Preview::Thumbnail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryIconStore, StoreResult};
    use chrono::TimeZone;
    use lumen_common::Rgb;

    /// Store whose every call fails with a server error.
    struct BrokenStore;

    impl IconStore for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }

        async fn list_all(&self) -> StoreResult<HashMap<IconId, IconRecord>> {
            Err(server_error())
        }

        async fn save(&self, _record: &IconRecord) -> StoreResult<IconRecord> {
            Err(server_error())
        }

        async fn delete(&self, _id: &IconId) -> StoreResult<()> {
            Err(server_error())
        }
    }

    fn server_error() -> StoreError {
        StoreError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 8, 0, 0).single().expect("time")
    }

    fn record(id: &str, name: &str, frames: usize, day: u32) -> IconRecord {
        IconRecord::new(IconId::from_raw(id), name, vec![PixelGrid::new(); frames], 8, at(day))
    }

    #[tokio::test]
    async fn test_save_then_refresh_lists_record() {
        let mut library = IconLibrary::new(InMemoryIconStore::new());
        let mut session = EditorSession::new();
        session.fill(Rgb::RED);

        let id = library.generate_id();
        let saved = library.save_session(&mut session, id.clone(), "Heart").await.expect("save");
        assert_eq!(saved.name, "Heart");
        assert_eq!(library.refresh().await.expect("refresh"), 1);
        assert_eq!(library.get(&id), Some(&saved));
    }

    #[tokio::test]
    async fn test_delete_then_refresh_omits_record() {
        let store = InMemoryIconStore::with_records([record("WI1", "a", 1, 1), record("WI2", "b", 1, 2)]);
        let mut library = IconLibrary::new(store);
        library.refresh().await.expect("refresh");

        let id = IconId::from_raw("WI1");
        library.delete(&id).await.expect("delete");
        assert!(library.get(&id).is_none());
        library.refresh().await.expect("refresh");
        assert!(library.get(&id).is_none());
        assert_eq!(library.cached().len(), 1);
    }

    #[tokio::test]
    async fn test_failures_leave_cache_unchanged() {
        let mut library = IconLibrary::new(BrokenStore);
        library.cache.insert(IconId::from_raw("WI1"), record("WI1", "kept", 1, 1));

        assert!(matches!(library.refresh().await, Err(LibraryError::Store(_))));
        assert!(library.delete(&IconId::from_raw("WI1")).await.is_err());
        assert!(library.save(record("WI2", "new", 1, 2)).await.is_err());

        assert_eq!(library.cached().len(), 1);
        assert_eq!(library.get(&IconId::from_raw("WI1")).map(|r| r.name.as_str()), Some("kept"));
    }

    #[test]
    fn test_snapshot_blank_name_and_fps() {
        let library = IconLibrary::new(InMemoryIconStore::new());
        let mut session = EditorSession::new();
        session.add_frame();
        session.fill(Rgb::BLUE);
        session.set_fps(12);

        let snapshot = library.snapshot(&mut session, IconId::from_raw("WI7"), "  ", at(3));
        assert_eq!(snapshot.name, "Untitled");
        assert_eq!(snapshot.fps, 12);
        assert_eq!(snapshot.frame_count(), 2);
        assert!(snapshot.frames[1].iter().all(|c| c == Rgb::BLUE));
        assert_eq!(snapshot.created, at(3));
        assert_eq!(snapshot.modified, at(3));
    }

    #[test]
    fn test_snapshot_resave_keeps_created() {
        let mut library = IconLibrary::new(InMemoryIconStore::new());
        library.cache.insert(IconId::from_raw("WI7"), record("WI7", "old", 1, 1));
        let mut session = EditorSession::new();

        let snapshot = library.snapshot(&mut session, IconId::from_raw("WI7"), "new", at(5));
        assert_eq!(snapshot.created, at(1));
        assert_eq!(snapshot.modified, at(5));
    }

    #[tokio::test]
    async fn test_entries_sorted_newest_first() {
        let store = InMemoryIconStore::with_records([
            record("WI100001", "old", 1, 1),
            record("WI100003", "new", 3, 3),
            record("WI100002", "mid", 1, 2),
        ]);
        let mut library = IconLibrary::new(store);
        library.refresh().await.expect("refresh");

        let entries = library.entries();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["new", "mid", "old"]);
        assert_eq!(entries[0].short_id, "100003");
        assert_eq!(entries[0].frame_count, 3);
        assert!(entries[0].animated);
        assert!(!entries[1].animated);
    }

    #[tokio::test]
    async fn test_open_loads_session() {
        let mut heart = record("WI42", "heart", 2, 1);
        heart.frames[1].fill(Rgb::RED);
        heart.fps = 5;
        let mut library = IconLibrary::new(InMemoryIconStore::with_records([heart]));
        library.refresh().await.expect("refresh");

        let mut session = EditorSession::new();
        session.fill(Rgb::GREEN);
        let opened = library.open(&IconRef::parse("WI42"), &mut session).expect("open");

        assert_eq!(opened.name, "heart");
        assert_eq!(session.frame_count(), 2);
        assert_eq!(session.active_frame(), 0);
        assert_eq!(session.fps(), 5);
        assert!(session.live_grid().is_blank());
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_open_foreign_rejected() {
        let library = IconLibrary::new(InMemoryIconStore::new());
        let mut session = EditorSession::new();
        session.fill(Rgb::GREEN);

        let err = library.open(&IconRef::parse("1486"), &mut session).expect_err("read-only");
        assert!(matches!(err, LibraryError::Rejected(GuardRejection::ForeignIcon(ref id)) if id == "1486"));
        assert!(session.live_grid().iter().all(|c| c == Rgb::GREEN));
        assert!(!session.drain_notices().is_empty());
    }

    #[test]
    fn test_open_unknown_id() {
        let library = IconLibrary::new(InMemoryIconStore::new());
        let mut session = EditorSession::new();
        let err = library.open(&IconRef::parse("WI999"), &mut session).expect_err("unknown");
        assert!(matches!(err, LibraryError::UnknownIcon(_)));
    }

    #[test]
    fn test_preview() {
        let mut library = IconLibrary::new(InMemoryIconStore::new());
        let mut dot = record("WI5", "dot", 1, 1);
        dot.frames[0].set(0, 0, Rgb::WHITE);
        library.cache.insert(dot.id.clone(), dot.clone());

        assert_eq!(library.preview(&IconRef::parse("WI5")), Some(Preview::Grid(dot.first_frame())));
        assert_eq!(library.preview(&IconRef::parse("WI6")), None);
        assert_eq!(
            library.preview(&IconRef::parse("1486")),
            Some(Preview::Thumbnail(
                "https://developer.lametric.com/content/apps/icon_thumbs/1486".to_string()
            ))
        );
    }
}

use super::backend::StorageBackend;
use super::records_from;
use crate::error::Result;
use crate::model::{HistoryEntry, JunctionRecord};
use crate::validity::{classify, FsProbe, RecordStatus};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::warn;

/// The append-only junction log for one session.
///
/// The in-memory list is the source of truth for the rest of the process run. Every
/// append rewrites the whole backend; when that write fails the record stays in memory
/// and the store is marked dirty until a later write succeeds or the log is reloaded.
///
/// Rewrites start from the elements exactly as they were loaded, so entries the typed
/// view cannot represent are carried along untouched.
pub struct HistoryStore<B: StorageBackend> {
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    stored: Vec<Value>,
    records: Vec<JunctionRecord>,
    dirty: bool,
}

impl<B: StorageBackend> HistoryStore<B> {
    /// Wraps `backend` without reading it. Call [`HistoryStore::load`] to populate.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            stored: Vec::new(),
            records: Vec::new(),
            dirty: false,
        }
    }

    /// Wraps `backend` and loads whatever it holds.
    pub fn open(backend: B) -> Self {
        let mut store = Self::with_backend(backend);
        store.load();
        store
    }

    /// Replace the in-memory log with the persisted one.
    ///
    /// Never fails: unreadable or corrupt data degrades to an empty history, with a
    /// warning on the log channel.
    pub fn load(&mut self) -> &[JunctionRecord] {
        self.stored = match self.backend.load_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "error loading history from {}: {}",
                    self.backend.location().display(),
                    e
                );
                Vec::new()
            }
        };
        self.records = records_from(&self.stored);
        self.dirty = false;
        &self.records
    }

    /// Records in insertion (creation) order.
    pub fn records(&self) -> &[JunctionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add `record` and persist the full log.
    ///
    /// On a write failure the record is still kept in memory, the store becomes dirty
    /// and the error is returned.
    pub fn append(&mut self, record: JunctionRecord) -> Result<()> {
        self.stored.push(serde_json::to_value(&record)?);
        self.records.push(record);
        match self.backend.save_entries(&self.stored) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                warn!(
                    "error saving history to {}: {}",
                    self.backend.location().display(),
                    e
                );
                self.dirty = true;
                Err(e)
            }
        }
    }

    /// Whether memory holds records the backend does not.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn location(&self) -> PathBuf {
        self.backend.location()
    }

    /// Every record with its current status, newest first.
    ///
    /// Malformed records are reported as [`RecordStatus::DataError`] without touching
    /// the filesystem; a failing check on one record does not affect the others.
    pub fn all_with_status<P: FsProbe + ?Sized>(&self, probe: &P) -> Vec<HistoryEntry> {
        self.newest_first()
            .into_iter()
            .enumerate()
            .map(|(i, record)| HistoryEntry {
                index: i + 1,
                status: status_of(probe, record),
                record: record.clone(),
            })
            .collect()
    }

    /// The record shown at 1-based display `index`.
    pub fn by_display_index(&self, index: usize) -> Option<&JunctionRecord> {
        index
            .checked_sub(1)
            .and_then(|i| self.newest_first().get(i).copied())
    }

    fn newest_first(&self) -> Vec<&JunctionRecord> {
        let mut sorted: Vec<&JunctionRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }
}

pub(crate) fn status_of<P: FsProbe + ?Sized>(probe: &P, record: &JunctionRecord) -> RecordStatus {
    if record.is_malformed() {
        return RecordStatus::DataError;
    }
    RecordStatus::Checked(classify(
        probe,
        Path::new(&record.link),
        Path::new(&record.source),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fs_backend::FsBackend;
    use crate::store::mem_backend::MemBackend;
    use crate::validity::tests::{FakeEntry, FakeProbe};
    use crate::validity::{OsProbe, Validity};
    use std::fs;
    use tempfile::TempDir;

    const ONE_RECORD: &str =
        r#"[{"source":"C:\\data","link":"C:\\links\\d1","timestamp":"2024-01-01 10:00:00"}]"#;

    fn rec(source: &str, link: &str, ts: &str) -> JunctionRecord {
        JunctionRecord::with_timestamp(source, link, ts)
    }

    #[test]
    fn absent_storage_loads_empty() {
        let mut store = HistoryStore::with_backend(MemBackend::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_storage_loads_empty() {
        for raw in ["", "{not json", r#"{"source": "a"}"#, "42", "null"] {
            let mut store = HistoryStore::with_backend(MemBackend::with_raw(raw));
            assert!(store.load().is_empty(), "expected empty history for {:?}", raw);
        }
    }

    #[test]
    fn load_is_idempotent() {
        let mut store = HistoryStore::with_backend(MemBackend::with_raw(ONE_RECORD));
        let first = store.load().to_vec();
        let second = store.load().to_vec();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn append_survives_a_fresh_load() {
        let tmp = TempDir::new().unwrap();
        let mut store = HistoryStore::open(FsBackend::new(tmp.path().to_path_buf()));
        for n in 0..3 {
            store
                .append(rec(&format!("/s{}", n), &format!("/l{}", n), "2024-01-01 10:00:00"))
                .unwrap();
        }
        let added = rec("C:\\data dir", "C:\\links\\d \"1\"", "2024-02-02 12:34:56");
        store.append(added.clone()).unwrap();

        let reopened = HistoryStore::open(FsBackend::new(tmp.path().to_path_buf()));
        assert_eq!(reopened.len(), 4);
        assert_eq!(reopened.records()[3], added);
    }

    #[test]
    fn append_rewrites_in_insertion_order() {
        let backend = MemBackend::new();
        let mut store = HistoryStore::open(backend);
        store.append(rec("/a", "/la", "2024-05-01 00:00:00")).unwrap();
        store.append(rec("/b", "/lb", "2023-01-01 00:00:00")).unwrap();

        let on_disk = records_from(&store.backend.load_entries().unwrap());
        assert_eq!(on_disk[0].source, "/a");
        assert_eq!(on_disk[1].source, "/b");
    }

    #[test]
    fn failed_write_keeps_record_and_marks_dirty() {
        let backend = MemBackend::with_raw(ONE_RECORD);
        let mut store = HistoryStore::open(backend);
        store.backend.set_simulate_write_error(true);

        let result = store.append(rec("/x", "/lx", "2024-03-03 00:00:00"));

        assert!(result.is_err());
        assert_eq!(store.len(), 2);
        assert!(store.is_dirty());
        assert_eq!(store.backend.raw().unwrap(), ONE_RECORD);

        store.backend.set_simulate_write_error(false);
        store.append(rec("/y", "/ly", "2024-03-04 00:00:00")).unwrap();
        assert!(!store.is_dirty());
        assert_eq!(store.backend.load_entries().unwrap().len(), 3);
    }

    #[test]
    fn append_keeps_entries_it_cannot_read() {
        let raw = r#"[
            {"source": 5, "link": "C:\\links\\odd", "timestamp": "2024-01-01 00:00:00"},
            {"source": "C:\\data", "link": "C:\\links\\d1", "timestamp": null, "note": "kept"},
            42
        ]"#;
        let before: Vec<Value> = serde_json::from_str(raw).unwrap();
        let mut store = HistoryStore::open(MemBackend::with_raw(raw));
        assert_eq!(store.len(), 2);
        assert!(store.records()[0].is_malformed());

        let added = rec("C:\\data", "C:\\links\\d2", "2024-02-01 00:00:00");
        store.append(added.clone()).unwrap();

        let after: Vec<Value> = serde_json::from_str(&store.backend.raw().unwrap()).unwrap();
        assert_eq!(after.len(), 4);
        assert_eq!(after[..3], before[..]);
        assert_eq!(after[0]["source"], 5);
        assert_eq!(after[1]["note"], "kept");
        assert!(after[1]["timestamp"].is_null());
        assert_eq!(after[3], serde_json::to_value(&added).unwrap());
    }

    #[test]
    fn reload_discards_unsaved_records() {
        let mut store = HistoryStore::open(MemBackend::new());
        store.backend.set_simulate_write_error(true);
        let _ = store.append(rec("/x", "/lx", "t"));

        store.load();
        assert!(store.is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn lists_newest_first_with_display_indexes() {
        let mut store = HistoryStore::open(MemBackend::new());
        store.append(rec("/old", "/l1", "2023-06-01 08:00:00")).unwrap();
        store.append(rec("/new", "/l2", "2024-06-01 08:00:00")).unwrap();
        store.append(rec("/mid", "/l3", "2024-01-01 08:00:00")).unwrap();

        let entries = store.all_with_status(&FakeProbe::default());
        let sources: Vec<_> = entries.iter().map(|e| e.record.source.as_str()).collect();
        assert_eq!(sources, vec!["/new", "/mid", "/old"]);
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[2].index, 3);

        assert_eq!(store.by_display_index(2).unwrap().source, "/mid");
        assert!(store.by_display_index(0).is_none());
        assert!(store.by_display_index(4).is_none());
    }

    #[test]
    fn malformed_records_skip_the_filesystem() {
        let raw = r#"[
            {"source": "", "link": "/l0", "timestamp": "2024-01-03 00:00:00"},
            {"link": "/l1", "timestamp": "2024-01-02 00:00:00"},
            {"source": "/data", "link": "/ok", "timestamp": "2024-01-01 00:00:00"}
        ]"#;
        let store = HistoryStore::open(MemBackend::with_raw(raw));
        let probe = FakeProbe::default()
            .with("/ok", FakeEntry::Link)
            .with("/data", FakeEntry::Dir);

        let entries = store.all_with_status(&probe);

        assert_eq!(entries[0].status, RecordStatus::DataError);
        assert_eq!(entries[1].status, RecordStatus::DataError);
        assert_eq!(entries[2].status, RecordStatus::Checked(Validity::Valid));
        // Only the well-formed record reached the probe (three predicates).
        assert_eq!(*probe.calls.borrow(), 3);
    }

    #[test]
    fn one_failing_check_does_not_hide_others() {
        let raw = r#"[
            {"source": "/data", "link": "/locked", "timestamp": "2024-01-02 00:00:00"},
            {"source": "/data", "link": "/gone", "timestamp": "2024-01-01 00:00:00"}
        ]"#;
        let store = HistoryStore::open(MemBackend::with_raw(raw));
        let probe = FakeProbe::default()
            .with("/locked", FakeEntry::Denied)
            .with("/data", FakeEntry::Dir);

        let entries = store.all_with_status(&probe);
        assert_eq!(
            entries[0].status,
            RecordStatus::Checked(Validity::ValidationError("PermissionDenied".into()))
        );
        assert_eq!(entries[1].status, RecordStatus::Checked(Validity::LinkMissing));
    }

    #[test]
    fn record_whose_link_is_gone_is_link_missing() {
        let probe = FakeProbe::default().with("C:\\data", FakeEntry::Dir);
        let store = HistoryStore::open(MemBackend::with_raw(ONE_RECORD));

        let entries = store.all_with_status(&probe);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, RecordStatus::Checked(Validity::LinkMissing));
    }

    #[test]
    fn plain_folder_at_link_is_exists_not_link() {
        let probe = FakeProbe::default()
            .with("C:\\data", FakeEntry::Dir)
            .with("C:\\links\\d1", FakeEntry::Dir);
        let store = HistoryStore::open(MemBackend::with_raw(ONE_RECORD));

        let entries = store.all_with_status(&probe);
        assert_eq!(entries[0].status, RecordStatus::Checked(Validity::ExistsNotLink));
    }

    #[test]
    fn real_filesystem_statuses() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("data");
        let plain = tmp.path().join("plain");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&plain).unwrap();

        let mut store = HistoryStore::open(FsBackend::new(tmp.path().join("state")));
        let s = source.to_string_lossy().to_string();
        store
            .append(rec(&s, &tmp.path().join("missing").to_string_lossy(), "2024-01-02 00:00:00"))
            .unwrap();
        store
            .append(rec(&s, &plain.to_string_lossy(), "2024-01-01 00:00:00"))
            .unwrap();

        let entries = store.all_with_status(&OsProbe);
        assert_eq!(entries[0].status, RecordStatus::Checked(Validity::LinkMissing));
        assert_eq!(entries[1].status, RecordStatus::Checked(Validity::ExistsNotLink));
    }
}

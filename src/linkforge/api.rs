//! # API Facade
//!
//! [`LinkForgeApi`] is the session object: one value per process run that owns the
//! in-memory history, the link creator, the filesystem probe and the capability flag
//! saying whether links may be created at all. Every UI goes through it; nothing else
//! mutates the history.
//!
//! Like the rest of the library it is a **thin facade**: it dispatches to `commands/*`
//! and returns `CmdResult` values, leaving business logic to the commands and
//! presentation to the caller.
//!
//! ## Generic Over the Edges
//!
//! `LinkForgeApi<B, C, P>` is generic over the storage backend, the link creator and
//! the probe:
//! - Production: `LinkForgeApi<FsBackend, SystemLinkCreator, OsProbe>`
//! - Testing: `MemBackend` plus a scripted creator
//!
//! ## The Capability Flag
//!
//! `can_create` is decided once, when the session is built (elevation check plus
//! configuration), and only gates the call into the link creator. Validation and
//! dry runs behave the same with or without it.

use crate::commands::{self, CmdResult, LinkForgePaths};
use crate::creator::{LinkCreator, SystemLinkCreator};
use crate::error::Result;
use crate::request::LinkRequest;
use crate::store::backend::StorageBackend;
use crate::store::HistoryStore;
use crate::validity::{FsProbe, OsProbe};
use std::path::{Path, PathBuf};

pub struct LinkForgeApi<B, C = SystemLinkCreator, P = OsProbe>
where
    B: StorageBackend,
    C: LinkCreator,
    P: FsProbe,
{
    history: HistoryStore<B>,
    creator: C,
    probe: P,
    paths: LinkForgePaths,
    can_create: bool,
}

impl<B: StorageBackend> LinkForgeApi<B> {
    /// A session talking to the real system.
    pub fn new(history: HistoryStore<B>, paths: LinkForgePaths, can_create: bool) -> Self {
        Self::with_parts(history, SystemLinkCreator, OsProbe, paths, can_create)
    }
}

impl<B, C, P> LinkForgeApi<B, C, P>
where
    B: StorageBackend,
    C: LinkCreator,
    P: FsProbe,
{
    pub fn with_parts(
        history: HistoryStore<B>,
        creator: C,
        probe: P,
        paths: LinkForgePaths,
        can_create: bool,
    ) -> Self {
        Self {
            history,
            creator,
            probe,
            paths,
            can_create,
        }
    }

    pub fn create_link(&mut self, request: &LinkRequest, dry_run: bool) -> Result<CmdResult> {
        commands::create::run(
            &mut self.history,
            &self.creator,
            &self.probe,
            self.can_create,
            request,
            dry_run,
        )
    }

    pub fn preview(&self, request: &LinkRequest) -> CmdResult {
        commands::preview::run(request)
    }

    pub fn history(&self, only_invalid: bool) -> CmdResult {
        commands::history::run(&self.history, &self.probe, only_invalid)
    }

    pub fn check(&self, link: &Path, source: &Path) -> CmdResult {
        commands::check::run(&self.probe, link, source)
    }

    pub fn locate(&self, index: usize, location: Location, must_exist: bool) -> Result<CmdResult> {
        commands::locate::run(&self.history, &self.probe, index, location, must_exist)
    }

    /// Creation request pre-filled from history entry `index`.
    pub fn request_from_history(&self, index: usize) -> Result<LinkRequest> {
        commands::locate::seed(&self.history, index)
    }

    /// Re-read the history from storage, dropping unsaved records. Returns the count.
    pub fn reload(&mut self) -> usize {
        self.history.load().len()
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn can_create(&self) -> bool {
        self.can_create
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_location(&self) -> PathBuf {
        self.history.location()
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::locate::Location;
pub use crate::commands::preview::CommandPreview;
pub use commands::{CmdMessage, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create::tests::FakeCreator;
    use crate::error::LinkForgeError;
    use crate::store::mem_backend::MemBackend;
    use crate::validity::{RecordStatus, Validity};
    use std::fs;
    use tempfile::TempDir;

    fn session(
        tmp: &TempDir,
        can_create: bool,
    ) -> LinkForgeApi<MemBackend, FakeCreator, OsProbe> {
        LinkForgeApi::with_parts(
            HistoryStore::open(MemBackend::new()),
            FakeCreator::default(),
            OsProbe,
            LinkForgePaths {
                data_dir: tmp.path().join("state"),
            },
            can_create,
        )
    }

    fn dirs(tmp: &TempDir) -> (String, String) {
        let source = tmp.path().join("data");
        let parent = tmp.path().join("links");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&parent).unwrap();
        (
            source.to_string_lossy().to_string(),
            parent.to_string_lossy().to_string(),
        )
    }

    #[test]
    fn create_then_list() {
        let tmp = TempDir::new().unwrap();
        let (source, parent) = dirs(&tmp);
        let mut api = session(&tmp, true);

        api.create_link(&LinkRequest::new(&source, &parent, "d1"), false)
            .unwrap();
        let listed = api.history(false).listed;

        assert_eq!(listed.len(), 1);
        // FakeCreator makes a plain folder, so the entry is not a real link.
        assert_eq!(
            listed[0].status,
            RecordStatus::Checked(Validity::ExistsNotLink)
        );
        assert_eq!(api.history_len(), 1);
    }

    #[test]
    fn capability_flag_gates_creation() {
        let tmp = TempDir::new().unwrap();
        let (source, parent) = dirs(&tmp);
        let mut api = session(&tmp, false);
        assert!(!api.can_create());

        let err = api
            .create_link(&LinkRequest::new(&source, &parent, "d1"), false)
            .unwrap_err();
        assert!(matches!(err, LinkForgeError::NotElevated));
        assert!(api
            .create_link(&LinkRequest::new(&source, &parent, "d1"), true)
            .is_ok());
        assert_eq!(api.history_len(), 0);
    }

    #[test]
    fn seeded_request_round_trips_through_history() {
        let tmp = TempDir::new().unwrap();
        let (source, parent) = dirs(&tmp);
        let mut api = session(&tmp, true);
        api.create_link(&LinkRequest::new(&source, &parent, "d1"), false)
            .unwrap();

        let seeded = api.request_from_history(1).unwrap();
        assert_eq!(seeded.source, source);
        assert_eq!(seeded.name, "d1");
        assert_eq!(PathBuf::from(&seeded.parent), PathBuf::from(&parent));
    }

    #[test]
    fn locate_and_config_dispatch() {
        let tmp = TempDir::new().unwrap();
        let (source, parent) = dirs(&tmp);
        let mut api = session(&tmp, true);
        api.create_link(&LinkRequest::new(&source, &parent, "d1"), false)
            .unwrap();

        let located = api.locate(1, Location::Source, true).unwrap();
        assert_eq!(located.paths, vec![PathBuf::from(&source)]);

        let cfg = api.config(ConfigAction::ShowAll).unwrap();
        assert!(cfg.config.is_some());
    }

    #[test]
    fn reload_drops_unsaved_records() {
        let tmp = TempDir::new().unwrap();
        let (source, parent) = dirs(&tmp);
        let mut api = session(&tmp, true);
        api.history.backend.set_simulate_write_error(true);

        api.create_link(&LinkRequest::new(&source, &parent, "d1"), false)
            .unwrap();
        assert!(api.is_dirty());
        assert_eq!(api.reload(), 0);
        assert!(!api.is_dirty());
    }
}

use crate::commands::{CmdMessage, CmdResult};
use crate::creator::{CreateOutcome, DelegateFailure, LinkCreator};
use crate::error::{LinkForgeError, Result};
use crate::model::JunctionRecord;
use crate::request::{validate, LinkRequest};
use crate::store::backend::StorageBackend;
use crate::store::HistoryStore;
use crate::validity::FsProbe;
use tracing::info;

use super::preview;

/// Validates `request`, hands it to `creator` and records the new link.
///
/// Nothing is delegated unless validation passes and `can_create` is set. A delegate
/// that reports success without the link appearing on disk counts as a failure. Once
/// the link exists, a failure to persist the history is only a warning: the record
/// stays in the session's history either way.
pub fn run<B, C, P>(
    store: &mut HistoryStore<B>,
    creator: &C,
    probe: &P,
    can_create: bool,
    request: &LinkRequest,
    dry_run: bool,
) -> Result<CmdResult>
where
    B: StorageBackend,
    C: LinkCreator + ?Sized,
    P: FsProbe + ?Sized,
{
    let target = validate(probe, request)?;

    if dry_run {
        let mut result = CmdResult::default().with_preview(preview::render(request));
        result.add_message(CmdMessage::info(format!(
            "Ready to create '{}' -> '{}'",
            target.link.display(),
            target.source.display()
        )));
        return Ok(result);
    }

    if !can_create {
        return Err(LinkForgeError::NotElevated);
    }

    let outcome = creator.create(&target.link, &target.source)?;
    let appeared = probe.exists_no_follow(&target.link).unwrap_or(false);
    if !outcome.success || !appeared {
        let outcome = if outcome.success {
            CreateOutcome::failed(outcome.status_code, outcome.diagnostic)
        } else {
            outcome
        };
        return Err(LinkForgeError::Delegate(DelegateFailure::from_outcome(
            &target.link,
            &target.source,
            outcome,
        )));
    }

    let record = JunctionRecord::new(
        target.source.to_string_lossy(),
        target.link.to_string_lossy(),
    );
    info!("created junction {} -> {}", record.link, record.source);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Success: '{}' -> '{}'",
        target.name, record.source
    )));
    if let Err(e) = store.append(record) {
        result.add_message(CmdMessage::warning(format!(
            "Link created, but history could not be saved: {}",
            e
        )));
    }

    Ok(result)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::creator::FailureHint;
    use crate::request::InputError;
    use crate::store::mem_backend::MemBackend;
    use crate::validity::OsProbe;
    use std::cell::RefCell;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Creates plain directories in place of junctions, or fails on demand.
    #[derive(Default)]
    pub(crate) struct FakeCreator {
        pub calls: RefCell<Vec<(PathBuf, PathBuf)>>,
        pub fail_with: Option<CreateOutcome>,
        pub skip_creation: bool,
    }

    impl LinkCreator for FakeCreator {
        fn create(&self, link: &Path, source: &Path) -> Result<CreateOutcome> {
            self.calls
                .borrow_mut()
                .push((link.to_path_buf(), source.to_path_buf()));
            if let Some(outcome) = &self.fail_with {
                return Ok(outcome.clone());
            }
            if !self.skip_creation {
                fs::create_dir(link)?;
            }
            Ok(CreateOutcome::ok())
        }
    }

    struct Fixture {
        _tmp: TempDir,
        source: String,
        parent: String,
    }

    fn fixture() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("data");
        let parent = tmp.path().join("links");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&parent).unwrap();
        Fixture {
            source: source.to_string_lossy().to_string(),
            parent: parent.to_string_lossy().to_string(),
            _tmp: tmp,
        }
    }

    #[test]
    fn creates_and_records() {
        let fx = fixture();
        let mut store = HistoryStore::open(MemBackend::new());
        let creator = FakeCreator::default();

        let result = run(
            &mut store,
            &creator,
            &OsProbe,
            true,
            &LinkRequest::new(&fx.source, &fx.parent, "d1"),
            false,
        )
        .unwrap();

        assert_eq!(creator.calls.borrow().len(), 1);
        assert_eq!(store.len(), 1);
        let record = &store.records()[0];
        assert_eq!(record.source, fx.source);
        assert_eq!(
            PathBuf::from(&record.link),
            Path::new(&fx.parent).join("d1")
        );
        assert!(record.created_at_parsed().is_some());
        assert_eq!(result.messages[0].level, crate::commands::MessageLevel::Success);
        assert!(store.backend.raw().is_some());
    }

    #[test]
    fn reserved_character_is_rejected_before_delegation() {
        let fx = fixture();
        let mut store = HistoryStore::open(MemBackend::new());
        let creator = FakeCreator::default();

        let err = run(
            &mut store,
            &creator,
            &OsProbe,
            true,
            &LinkRequest::new(&fx.source, &fx.parent, "bad:name"),
            false,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            LinkForgeError::Input(InputError::InvalidName(_))
        ));
        assert!(creator.calls.borrow().is_empty());
        assert!(store.is_empty());
        assert!(store.backend.raw().is_none());
    }

    #[test]
    fn not_elevated_blocks_delegate_after_validation() {
        let fx = fixture();
        let mut store = HistoryStore::open(MemBackend::new());
        let creator = FakeCreator::default();
        let request = LinkRequest::new(&fx.source, &fx.parent, "d1");

        let err = run(&mut store, &creator, &OsProbe, false, &request, false).unwrap_err();
        assert!(matches!(err, LinkForgeError::NotElevated));
        assert!(creator.calls.borrow().is_empty());

        // Validation still runs first.
        let bad = LinkRequest::new(&fx.source, &fx.parent, "..");
        let err = run(&mut store, &creator, &OsProbe, false, &bad, false).unwrap_err();
        assert!(matches!(err, LinkForgeError::Input(_)));
    }

    #[test]
    fn dry_run_does_not_delegate() {
        let fx = fixture();
        let mut store = HistoryStore::open(MemBackend::new());
        let creator = FakeCreator::default();

        let result = run(
            &mut store,
            &creator,
            &OsProbe,
            false,
            &LinkRequest::new(&fx.source, &fx.parent, "d1"),
            true,
        )
        .unwrap();

        assert!(creator.calls.borrow().is_empty());
        assert!(store.is_empty());
        assert!(result.preview.unwrap().complete);
    }

    #[test]
    fn delegate_failure_keeps_diagnostic_and_history() {
        let fx = fixture();
        let mut store = HistoryStore::open(MemBackend::new());
        let creator = FakeCreator {
            fail_with: Some(CreateOutcome::failed(Some(1), "Access is denied.")),
            ..Default::default()
        };

        let err = run(
            &mut store,
            &creator,
            &OsProbe,
            true,
            &LinkRequest::new(&fx.source, &fx.parent, "d1"),
            false,
        )
        .unwrap_err();

        match err {
            LinkForgeError::Delegate(failure) => {
                assert_eq!(failure.hint, Some(FailureHint::AccessDenied));
                assert_eq!(failure.diagnostic, "Access is denied.");
                assert_eq!(failure.status_code, Some(1));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn success_without_link_on_disk_is_a_failure() {
        let fx = fixture();
        let mut store = HistoryStore::open(MemBackend::new());
        let creator = FakeCreator {
            skip_creation: true,
            ..Default::default()
        };

        let err = run(
            &mut store,
            &creator,
            &OsProbe,
            true,
            &LinkRequest::new(&fx.source, &fx.parent, "d1"),
            false,
        )
        .unwrap_err();

        match err {
            LinkForgeError::Delegate(failure) => {
                assert_eq!(failure.hint, Some(FailureHint::Silent));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn persistence_failure_is_a_warning() {
        let fx = fixture();
        let mut store = HistoryStore::open(MemBackend::new());
        store.backend.set_simulate_write_error(true);

        let result = run(
            &mut store,
            &FakeCreator::default(),
            &OsProbe,
            true,
            &LinkRequest::new(&fx.source, &fx.parent, "d1"),
            false,
        )
        .unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.is_dirty());
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == crate::commands::MessageLevel::Warning
                && m.content.contains("could not be saved")));
    }
}

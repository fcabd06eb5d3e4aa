use crate::commands::CmdResult;
use crate::error::{LinkForgeError, Result};
use crate::model::JunctionRecord;
use crate::request::LinkRequest;
use crate::store::backend::StorageBackend;
use crate::store::HistoryStore;
use crate::validity::FsProbe;
use std::path::{Path, PathBuf};

/// Which end of a history entry to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Link,
    Source,
}

/// Resolves display `index` to a path.
///
/// With `must_exist`, the link must exist (links not followed) and the source must be a
/// directory, which is what a file manager needs to show something useful.
pub fn run<B, P>(
    store: &HistoryStore<B>,
    probe: &P,
    index: usize,
    location: Location,
    must_exist: bool,
) -> Result<CmdResult>
where
    B: StorageBackend,
    P: FsProbe + ?Sized,
{
    let record = complete_entry(store, index)?;
    let path = match location {
        Location::Link => PathBuf::from(&record.link),
        Location::Source => PathBuf::from(&record.source),
    };

    if must_exist {
        check_present(probe, &path, location)?;
    }

    Ok(CmdResult::default().with_paths(vec![path]))
}

/// Pre-fills a creation request from history entry `index`.
pub fn seed<B: StorageBackend>(store: &HistoryStore<B>, index: usize) -> Result<LinkRequest> {
    let record = complete_entry(store, index)?;
    Ok(LinkRequest::from_link(&record.source, &record.link))
}

fn complete_entry<B: StorageBackend>(
    store: &HistoryStore<B>,
    index: usize,
) -> Result<&JunctionRecord> {
    let record = store
        .by_display_index(index)
        .ok_or_else(|| LinkForgeError::NotFound(format!("No history entry #{}", index)))?;
    if record.is_malformed() {
        return Err(LinkForgeError::Api(format!(
            "History entry #{} has incomplete data",
            index
        )));
    }
    Ok(record)
}

fn check_present<P: FsProbe + ?Sized>(probe: &P, path: &Path, location: Location) -> Result<()> {
    let present = match location {
        Location::Link => probe.exists_no_follow(path)?,
        Location::Source => probe.is_directory(path)?,
    };
    if present {
        return Ok(());
    }
    let what = match location {
        Location::Link => "The link path does not seem to exist",
        Location::Source => "The source path does not seem to exist or is not a directory",
    };
    Err(LinkForgeError::NotFound(format!("{}: {}", what, path.display())))
}

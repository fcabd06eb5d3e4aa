//! # Junction Validity
//!
//! Classifies a `(link, source)` pair into one of five health states. The check is a
//! point-in-time, read-only query; callers re-run it when they want fresh answers.
//!
//! Rules, first match wins:
//!
//! 1. Nothing at `link` (links are not followed) → [`Validity::LinkMissing`]
//! 2. Something at `link` that is not a reparse point / symlink → [`Validity::ExistsNotLink`]
//! 3. `source` is not a directory → [`Validity::SourceMissing`]
//! 4. Otherwise → [`Validity::Valid`]
//!
//! Any other I/O failure along the way yields [`Validity::ValidationError`] carrying the
//! failure's kind name.
//!
//! Codes are stable: UIs colour by them.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use tracing::warn;

/// Read-only filesystem predicates the classifier is built on.
pub trait FsProbe {
    /// Whether anything exists at `path`, without following links.
    fn exists_no_follow(&self, path: &Path) -> io::Result<bool>;

    /// Whether the entry at `path` is a reparse point (or a symlink where the
    /// attribute is unavailable).
    fn is_link_type(&self, path: &Path) -> io::Result<bool>;

    /// Whether `path` resolves to a directory (links followed).
    fn is_directory(&self, path: &Path) -> io::Result<bool>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsProbe;

fn absent(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

impl FsProbe for OsProbe {
    fn exists_no_follow(&self, path: &Path) -> io::Result<bool> {
        match fs::symlink_metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if absent(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn is_link_type(&self, path: &Path) -> io::Result<bool> {
        let meta = fs::symlink_metadata(path)?;
        Ok(is_reparse_point(&meta) || meta.file_type().is_symlink())
    }

    fn is_directory(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if absent(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(windows)]
fn is_reparse_point(meta: &fs::Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    use windows_sys::Win32::Storage::FileSystem::FILE_ATTRIBUTE_REPARSE_POINT;

    meta.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0
}

#[cfg(not(windows))]
fn is_reparse_point(_meta: &fs::Metadata) -> bool {
    false
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Valid,
    LinkMissing,
    SourceMissing,
    ExistsNotLink,
    /// Carries the name of the I/O error kind that interrupted the check.
    ValidationError(String),
}

/// How a UI should present a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Invalid,
    Error,
}

impl Validity {
    pub fn code(&self) -> u8 {
        match self {
            Validity::Valid => 0,
            Validity::LinkMissing => 1,
            Validity::SourceMissing => 2,
            Validity::ExistsNotLink => 3,
            Validity::ValidationError(_) => 4,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Validity::Valid => "Valid".to_string(),
            Validity::LinkMissing => "Link Missing".to_string(),
            Validity::SourceMissing => "Source Missing/Invalid".to_string(),
            Validity::ExistsNotLink => "Exists, Not Link/Junction".to_string(),
            Validity::ValidationError(kind) => format!("Validation Error ({})", kind),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Validity::Valid => Severity::Success,
            Validity::LinkMissing | Validity::SourceMissing | Validity::ExistsNotLink => {
                Severity::Invalid
            }
            Validity::ValidationError(_) => Severity::Error,
        }
    }
}

/// Status of a stored history record.
///
/// Records missing their source or link never reach the filesystem checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    Checked(Validity),
    DataError,
}

impl RecordStatus {
    pub fn code(&self) -> Option<u8> {
        match self {
            RecordStatus::Checked(v) => Some(v.code()),
            RecordStatus::DataError => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            RecordStatus::Checked(v) => v.label(),
            RecordStatus::DataError => "Data Error".to_string(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RecordStatus::Checked(v) => v.severity(),
            RecordStatus::DataError => Severity::Error,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, RecordStatus::Checked(Validity::Valid))
    }
}

impl Serialize for RecordStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RecordStatus", 3)?;
        state.serialize_field("code", &self.code())?;
        state.serialize_field("label", &self.label())?;
        state.serialize_field("severity", &self.severity())?;
        state.end()
    }
}

/// Classifies `link` against its expected `source`.
pub fn classify<P: FsProbe + ?Sized>(probe: &P, link: &Path, source: &Path) -> Validity {
    match try_classify(probe, link, source) {
        Ok(validity) => validity,
        Err(e) => {
            warn!("error validating junction {}: {}", link.display(), e);
            Validity::ValidationError(format!("{:?}", e.kind()))
        }
    }
}

fn try_classify<P: FsProbe + ?Sized>(
    probe: &P,
    link: &Path,
    source: &Path,
) -> io::Result<Validity> {
    if !probe.exists_no_follow(link)? {
        return Ok(Validity::LinkMissing);
    }
    if !probe.is_link_type(link)? {
        return Ok(Validity::ExistsNotLink);
    }
    if !probe.is_directory(source)? {
        return Ok(Validity::SourceMissing);
    }
    Ok(Validity::Valid)
}

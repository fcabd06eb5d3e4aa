//! Shape validation of a link-creation request.
//!
//! Everything here runs before the link creator is invoked; a rejected request
//! never reaches the operating system and never touches the history.

use crate::error::{LinkForgeError, Result};
use crate::validity::FsProbe;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Characters Windows refuses in a file name.
pub const INVALID_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("All fields are required (missing: {0})")]
    MissingField(&'static str),

    #[error("Source not found: {0}")]
    SourceNotDirectory(String),

    #[error("Link parent not found: {0}")]
    ParentNotDirectory(String),

    #[error("Link name invalid: {0:?} contains one of <>:\"/\\|?*")]
    InvalidName(String),

    #[error("Link name invalid: {0:?} is reserved")]
    ReservedName(String),

    #[error("Path exists: {0}")]
    TargetExists(String),
}

/// The three fields a user fills in to create a junction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRequest {
    pub source: String,
    pub parent: String,
    pub name: String,
}

impl LinkRequest {
    pub fn new(
        source: impl Into<String>,
        parent: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            parent: parent.into(),
            name: name.into(),
        }
    }

    /// Seeds a request from an existing link, splitting it into parent and name.
    pub fn from_link(source: &str, link: &str) -> Self {
        let link = Path::new(link);
        Self {
            source: source.to_string(),
            parent: link
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            name: link
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }

    /// Where the link would be created, if parent and name are both filled in.
    pub fn link_path(&self) -> Option<PathBuf> {
        let parent = self.parent.trim();
        let name = self.name.trim();
        if parent.is_empty() || name.is_empty() {
            return None;
        }
        Some(Path::new(parent).join(name))
    }
}

/// A request that passed every check. Paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLink {
    pub source: PathBuf,
    pub link: PathBuf,
    pub name: String,
}

/// Checks, in order: all fields present, source is a directory, parent is a
/// directory, name is legal, and nothing already occupies the link path.
pub fn validate<P: FsProbe + ?Sized>(probe: &P, request: &LinkRequest) -> Result<ValidatedLink> {
    let source = request.source.trim();
    let parent = request.parent.trim();
    let name = request.name.trim();

    for (field, value) in [("source", source), ("parent", parent), ("name", name)] {
        if value.is_empty() {
            return Err(InputError::MissingField(field).into());
        }
    }

    if !probe.is_directory(Path::new(source))? {
        return Err(InputError::SourceNotDirectory(source.to_string()).into());
    }
    if !probe.is_directory(Path::new(parent))? {
        return Err(InputError::ParentNotDirectory(parent.to_string()).into());
    }
    check_name(name)?;

    let link = absolute(&Path::new(parent).join(name))?;
    if probe.exists_no_follow(&link)? {
        return Err(InputError::TargetExists(link.to_string_lossy().to_string()).into());
    }

    Ok(ValidatedLink {
        source: absolute(Path::new(source))?,
        link,
        name: name.to_string(),
    })
}

/// Rejects names containing reserved characters and the `.`/`..` entries.
pub fn check_name(name: &str) -> std::result::Result<(), InputError> {
    if name.contains(INVALID_NAME_CHARS) {
        return Err(InputError::InvalidName(name.to_string()));
    }
    if name == "." || name == ".." {
        return Err(InputError::ReservedName(name.to_string()));
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(LinkForgeError::Io)
}

//! # Link Creator
//!
//! The operating-system side of creating a junction. The core never calls the OS
//! directly; it validates the request, then hands `(link, source)` to a
//! [`LinkCreator`] and inspects the [`CreateOutcome`].
//!
//! - Windows: an NTFS mount-point reparse point written by the `junction` crate, the
//!   same thing `mklink /J` produces. Paths go straight to the filesystem API, so no
//!   shell ever parses them.
//! - Elsewhere: a directory symlink via `std::os::unix::fs::symlink`
//!
//! ## Failure hints
//!
//! Failures only come with free-form text. [`FailureHint::detect`] looks for a few known
//! phrases to offer friendlier advice, but the raw diagnostic is always kept next to it
//! and is the authoritative account of what went wrong.

use crate::error::Result;
use std::fmt;
use std::io;
use std::path::Path;
use tracing::debug;

/// What the delegate reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub success: bool,
    pub status_code: Option<i32>,
    /// Raw error text reported by the system, trimmed.
    pub diagnostic: String,
}

impl CreateOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            status_code: Some(0),
            diagnostic: String::new(),
        }
    }

    pub fn failed(status_code: Option<i32>, diagnostic: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            diagnostic: diagnostic.into().trim().to_string(),
        }
    }
}

/// Makes a junction at `link` pointing to `source`.
///
/// Implementations report command-level failures through [`CreateOutcome`]; an `Err`
/// means the delegate could not even be started.
pub trait LinkCreator {
    fn create(&self, link: &Path, source: &Path) -> Result<CreateOutcome>;
}

/// The platform's own link facility.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLinkCreator;

impl LinkCreator for SystemLinkCreator {
    fn create(&self, link: &Path, source: &Path) -> Result<CreateOutcome> {
        debug!("linking {} -> {}", link.display(), source.display());
        match make_link(link, source) {
            Ok(()) => Ok(CreateOutcome::ok()),
            Err(e) => Ok(CreateOutcome::failed(e.raw_os_error(), e.to_string())),
        }
    }
}

#[cfg(windows)]
fn make_link(link: &Path, source: &Path) -> io::Result<()> {
    junction::create(source, link)
}

#[cfg(unix)]
fn make_link(link: &Path, source: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(not(any(windows, unix)))]
fn make_link(_link: &Path, _source: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Link creation not supported on this platform",
    ))
}

/// Best-effort reading of a failure diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureHint {
    Syntax,
    AlreadyExists,
    AccessDenied,
    /// The delegate failed without saying anything.
    Silent,
}

impl FailureHint {
    pub fn detect(diagnostic: &str) -> Option<Self> {
        let lower = diagnostic.to_lowercase();
        if lower.trim().is_empty() {
            Some(FailureHint::Silent)
        } else if lower.contains("syntax error")
            || lower.contains("syntax of the command is incorrect")
        {
            Some(FailureHint::Syntax)
        } else if lower.contains("already exists") {
            Some(FailureHint::AlreadyExists)
        } else if lower.contains("access is denied") {
            Some(FailureHint::AccessDenied)
        } else {
            None
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            FailureHint::Syntax => "Syntax error. Check paths.",
            FailureHint::AlreadyExists => "Path already exists.",
            FailureHint::AccessDenied => "Access Denied. Run as Admin?",
            FailureHint::Silent => "mklink failed. Check paths/permissions or run as admin.",
        }
    }
}

/// A creation attempt that did not produce a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateFailure {
    pub link: String,
    pub source: String,
    pub status_code: Option<i32>,
    pub diagnostic: String,
    pub hint: Option<FailureHint>,
}

impl DelegateFailure {
    pub fn from_outcome(link: &Path, source: &Path, outcome: CreateOutcome) -> Self {
        let hint = FailureHint::detect(&outcome.diagnostic);
        Self {
            link: link.to_string_lossy().to_string(),
            source: source.to_string_lossy().to_string(),
            status_code: outcome.status_code,
            diagnostic: outcome.diagnostic,
            hint,
        }
    }
}

impl fmt::Display for DelegateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(hint) = self.hint {
            write!(f, "{}", hint.advice())?;
            if let Some(code) = self.status_code {
                write!(f, " (code {})", code)?;
            }
            if hint == FailureHint::AlreadyExists {
                write!(f, "\n{}", self.link)?;
            }
        } else if let Some(code) = self.status_code {
            write!(f, "(code {})", code)?;
        }
        if !self.diagnostic.is_empty() {
            write!(f, "\n{}", self.diagnostic)?;
        }
        Ok(())
    }
}

//! Per-user data directory.
//!
//! LinkForge keeps its history under `<local data dir>/JunctionApp/LinkForge`, which on
//! Windows is `%LOCALAPPDATA%\JunctionApp\LinkForge`: the same folder older LinkForge
//! builds used, so existing history files keep working.

use crate::error::{LinkForgeError, Result};
use directories::BaseDirs;
use std::path::PathBuf;

pub const APP_AUTHOR: &str = "JunctionApp";
pub const APP_NAME: &str = "LinkForge";

/// Overrides the data directory when set (non-empty).
pub const DATA_DIR_ENV: &str = "LINKFORGE_DATA_DIR";

pub fn default_data_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.data_local_dir().join(APP_AUTHOR).join(APP_NAME))
        .ok_or_else(|| LinkForgeError::Store("Could not determine the user data directory".into()))
}

/// The data directory to use: `$LINKFORGE_DATA_DIR` if set, the default otherwise.
pub fn data_dir() -> Result<PathBuf> {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => default_data_dir(),
    }
}

use crate::error::{LinkForgeError, Result};
use std::path::Path;
use std::process::Command;

/// Opens `path` in the platform's file manager without waiting for it.
/// - Windows: explorer.exe
/// - macOS: open
/// - Linux: xdg-open
pub fn open_in_file_manager(path: &Path) -> Result<()> {
    let program = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    Command::new(program)
        .arg(path)
        .spawn()
        .map(|_| ())
        .map_err(|e| LinkForgeError::Api(format!("Failed to launch {}: {}", program, e)))
}

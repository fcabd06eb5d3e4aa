use super::backend::StorageBackend;
use super::{encode_history, parse_history};
use crate::error::{LinkForgeError, Result};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_HISTORY_FILE: &str = "history.json";

pub struct FsBackend {
    root: PathBuf,
    file_name: String,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            file_name: DEFAULT_HISTORY_FILE.to_string(),
        }
    }

    pub fn with_file_name(mut self, name: &str) -> Self {
        if !name.trim().is_empty() {
            self.file_name = name.trim().to_string();
        }
        self
    }

    pub fn history_file(&self) -> PathBuf {
        self.root.join(&self.file_name)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(LinkForgeError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_entries(&self) -> Result<Vec<Value>> {
        let path = self.history_file();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(LinkForgeError::Io)?;
        parse_history(&content)
    }

    fn save_entries(&self, entries: &[Value]) -> Result<()> {
        self.ensure_dir()?;
        let content = encode_history(entries)?;
        let target = self.history_file();

        // Atomic Write
        let tmp_file = self.root.join(format!(".history-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(LinkForgeError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &target) {
            let _ = fs::remove_file(&tmp_file);
            return Err(LinkForgeError::Io(e));
        }

        debug!("wrote {} entries to {}", entries.len(), target.display());
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.history_file()
    }
}

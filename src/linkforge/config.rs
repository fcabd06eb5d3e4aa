use crate::error::{LinkForgeError, Result};
use crate::store::fs_backend::DEFAULT_HISTORY_FILE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

const CONFIG_FILENAME: &str = "config.json";

pub const CONFIG_KEYS: &[&str] = &["history-file", "require-admin"];

/// Configuration for LinkForge, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkForgeConfig {
    /// Name of the history file inside the data directory
    #[serde(default = "default_history_file")]
    pub history_file: String,

    /// Refuse to create links unless running elevated
    #[serde(default = "default_require_admin")]
    pub require_admin: bool,
}

fn default_history_file() -> String {
    DEFAULT_HISTORY_FILE.to_string()
}

fn default_require_admin() -> bool {
    cfg!(windows)
}

impl Default for LinkForgeConfig {
    fn default() -> Self {
        Self {
            history_file: default_history_file(),
            require_admin: default_require_admin(),
        }
    }
}

impl LinkForgeConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(LinkForgeError::Io)?;
        let config: LinkForgeConfig =
            serde_json::from_str(&content).map_err(LinkForgeError::Serialization)?;
        Ok(config)
    }

    /// Like [`LinkForgeConfig::load`], but an unreadable file yields the defaults (with
    /// a warning) so that it can be repaired by saving over it.
    pub fn load_or_default<P: AsRef<Path>>(config_dir: P) -> Self {
        let config_dir = config_dir.as_ref();
        Self::load(config_dir).unwrap_or_else(|e| {
            warn!(
                "ignoring unreadable config in {}: {}",
                config_dir.display(),
                e
            );
            Self::default()
        })
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(LinkForgeError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(LinkForgeError::Serialization)?;
        fs::write(config_path, content).map_err(LinkForgeError::Io)?;
        Ok(())
    }

    /// Value of a key as shown to users (`history-file`, `require-admin`).
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "history-file" => Some(self.history_file.clone()),
            "require-admin" => Some(self.require_admin.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "history-file" => self.set_history_file(value),
            "require-admin" => self.set_require_admin(value),
            _ => Err(LinkForgeError::Api(format!("Unknown config key: {}", key))),
        }
    }

    /// Every key with its current value, in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    /// Set the history file name. Rejects names that would leave the data directory.
    pub fn set_history_file(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(LinkForgeError::Api(format!(
                "Invalid history file name: {:?}",
                name
            )));
        }
        self.history_file = name.to_string();
        Ok(())
    }

    /// Accepts the usual spellings of a boolean.
    pub fn set_require_admin(&mut self, value: &str) -> Result<()> {
        self.require_admin = match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => true,
            "false" | "no" | "off" | "0" => false,
            other => {
                return Err(LinkForgeError::Api(format!(
                    "Expected true or false, got {:?}",
                    other
                )))
            }
        };
        Ok(())
    }
}

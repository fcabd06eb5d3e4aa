use crate::config::LinkForgeConfig;
use crate::model::HistoryEntry;
use crate::validity::Validity;
use std::path::PathBuf;

pub mod check;
pub mod config;
pub mod create;
pub mod history;
pub mod locate;
pub mod preview;

#[derive(Debug, Clone)]
pub struct LinkForgePaths {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub listed: Vec<HistoryEntry>,
    pub paths: Vec<PathBuf>,
    pub validity: Option<Validity>,
    pub preview: Option<preview::CommandPreview>,
    pub config: Option<LinkForgeConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed(mut self, entries: Vec<HistoryEntry>) -> Self {
        self.listed = entries;
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_validity(mut self, validity: Validity) -> Self {
        self.validity = Some(validity);
        self
    }

    pub fn with_preview(mut self, preview: preview::CommandPreview) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn with_config(mut self, config: LinkForgeConfig) -> Self {
        self.config = Some(config);
        self
    }
}

use crate::validity::RecordStatus;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Layout of `JunctionRecord::created_at`. Locale independent and lexically sortable.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One junction created by LinkForge.
///
/// Field names are the on-disk contract of the history file. Missing keys, nulls and
/// values that are not strings decode as empty strings so a damaged entry still shows
/// up (as a data error) instead of vanishing from the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunctionRecord {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub source: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub link: String,
    #[serde(rename = "timestamp", default, deserialize_with = "string_or_empty")]
    pub created_at: String,
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

impl JunctionRecord {
    /// Creates a record stamped with the current local time.
    pub fn new(source: impl Into<String>, link: impl Into<String>) -> Self {
        Self::with_timestamp(source, link, Local::now().format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn with_timestamp(
        source: impl Into<String>,
        link: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            link: link.into(),
            created_at: created_at.into(),
        }
    }

    /// A record lacking its source or its link cannot be checked against the filesystem.
    pub fn is_malformed(&self) -> bool {
        self.source.trim().is_empty() || self.link.trim().is_empty()
    }

    pub fn created_at_parsed(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.created_at, TIMESTAMP_FORMAT).ok()
    }
}

/// A history record as presented to a UI: its 1-based position in display order
/// (newest first) plus its current health.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub index: usize,
    #[serde(flatten)]
    pub record: JunctionRecord,
    pub status: RecordStatus,
}

//! # Storage Layer
//!
//! LinkForge keeps one append-only log of every junction it created. Persistence is split
//! in two, the same way throughout the crate:
//!
//! - [`backend::StorageBackend`]: raw I/O ("where do the bytes go")
//!   - [`fs_backend::FsBackend`]: the history JSON file (production)
//!   - [`mem_backend::MemBackend`]: a string in memory (tests)
//! - [`history::HistoryStore`]: the log itself ("what do we keep"), generic over a backend
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── history.json        # JSON array of {"source", "link", "timestamp"}
//! └── config.json         # LinkForgeConfig
//! ```
//!
//! The history file is rewritten in full after every append. There is no incremental
//! format and no recovery of partially written files: the write goes to a temp file
//! that is renamed over the old one.
//!
//! ## Tolerant Decoding
//!
//! A file that is not JSON, or whose top-level value is not an array, is reported as
//! [`LinkForgeError::Corrupt`]/[`LinkForgeError::Serialization`] by the backend and turned
//! into "no history" by the store.
//!
//! Backends hand the store the array elements as raw [`Value`]s and take them back the
//! same way, so a rewrite reproduces every element it read: unknown keys, odd types and
//! entries that are not objects at all. The typed view is derived from those values.
//! Objects always yield a record (fields that are missing or not strings read as empty
//! and surface as data errors); anything else is left out of the listing with a warning.

use crate::error::{LinkForgeError, Result};
use crate::model::JunctionRecord;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::warn;

pub mod backend;
pub mod fs_backend;
pub mod history;
pub mod mem_backend;

pub use history::HistoryStore;

/// Splits stored text into its array elements, untouched.
pub(crate) fn parse_history(raw: &str) -> Result<Vec<Value>> {
    match serde_json::from_str(raw)? {
        Value::Array(items) => Ok(items),
        other => Err(LinkForgeError::Corrupt(format!(
            "expected a list of records, found {}",
            json_kind(&other)
        ))),
    }
}

/// Typed view of stored elements, in stored order.
pub(crate) fn records_from(entries: &[Value]) -> Vec<JunctionRecord> {
    let mut records = Vec::with_capacity(entries.len());
    for (pos, item) in entries.iter().enumerate() {
        if !item.is_object() {
            warn!(
                "ignoring history entry #{}: expected an object, found {}",
                pos,
                json_kind(item)
            );
            continue;
        }
        match JunctionRecord::deserialize(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!("ignoring unreadable history entry #{}: {}", pos, e),
        }
    }
    records
}

pub(crate) fn encode_history(entries: &[Value]) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    entries.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| LinkForgeError::Store(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

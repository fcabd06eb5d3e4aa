use crate::error::Result;
use serde_json::Value;
use std::path::PathBuf;

/// Abstract interface for raw history I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while `HistoryStore` handles the "what" (in-memory log, dirty tracking).
///
/// Backends deal in the stored array elements as they are, so whatever they load
/// can be written back unchanged.
pub trait StorageBackend {
    /// Load every persisted element, in stored order.
    /// Returns an empty list when nothing has been persisted yet.
    /// Returns Err when the stored data exists but is not a JSON array.
    fn load_entries(&self) -> Result<Vec<Value>>;

    /// Replace the persisted log with `entries`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_entries(&self, entries: &[Value]) -> Result<()>;

    /// Where the log lives. For MemBackend, a virtual path.
    fn location(&self) -> PathBuf;
}

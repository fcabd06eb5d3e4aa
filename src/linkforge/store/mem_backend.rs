use super::backend::StorageBackend;
use super::{encode_history, parse_history};
use crate::error::{LinkForgeError, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Holds the encoded JSON text rather than records, so decoding and corruption
/// handling run exactly as they do against the real file.
/// Uses `RefCell` for interior mutability since LinkForge is single-threaded.
#[derive(Default)]
pub struct MemBackend {
    raw: RefCell<Option<String>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pre-existing "file" contents.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
            simulate_write_error: RefCell::new(false),
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Current persisted text, if anything was ever written.
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl StorageBackend for MemBackend {
    fn load_entries(&self) -> Result<Vec<Value>> {
        match self.raw.borrow().as_deref() {
            Some(raw) => parse_history(raw),
            None => Ok(Vec::new()),
        }
    }

    fn save_entries(&self, entries: &[Value]) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(LinkForgeError::Store("Simulated write error".to_string()));
        }
        let encoded = encode_history(entries)?;
        *self.raw.borrow_mut() = Some(encoded);
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://history.json")
    }
}

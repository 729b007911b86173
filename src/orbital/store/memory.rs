use super::{StorageBackend, StoreKey};
use crate::error::{OrbitalError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since orbital is single-threaded,
/// which lets the `StorageBackend` trait take `&self` everywhere.
#[derive(Default)]
pub struct MemBackend {
    values: RefCell<HashMap<StoreKey, Vec<u8>>>,
    writes: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with raw values, as if written by an earlier run.
    pub fn with_value(self, key: StoreKey, bytes: impl Into<Vec<u8>>) -> Self {
        self.values.borrow_mut().insert(key, bytes.into());
        self
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Decode the stored value of a key. Test helper.
    pub fn decode<T: serde::de::DeserializeOwned>(&self, key: StoreKey) -> Option<T> {
        let values = self.values.borrow();
        values
            .get(&key)
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
    }
}

impl StorageBackend for MemBackend {
    fn get(&self, key: StoreKey) -> Result<Option<Vec<u8>>> {
        Ok(self.values.borrow().get(&key).cloned())
    }

    fn set(&self, key: StoreKey, bytes: &[u8]) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(OrbitalError::Store("Simulated write error".to_string()));
        }
        self.values.borrow_mut().insert(key, bytes.to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

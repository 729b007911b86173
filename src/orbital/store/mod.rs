//! # Persistence Gateway
//!
//! The domain model never talks to disk directly. It hands full sequences to a
//! [`StorageBackend`], a plain key-value store with one key per sequence:
//!
//! ```text
//! orbital_spaces       -> JSON array of Space
//! orbital_collections  -> JSON array of Collection
//! orbital_links        -> JSON array of Link
//! ```
//!
//! Writes always replace the whole sequence; there are no incremental patches.
//! The backend is swappable:
//!
//! - [`fs::FsBackend`]: one `<key>.json` file per key, written atomically.
//! - `memory::MemBackend`: in-memory, for tests (and the `test_utils`
//!   feature). Can simulate write failures.
//!
//! From the library's point of view writes are fire-and-forget: a failed write
//! is logged and the in-memory state stays authoritative until the next
//! successful write.

use crate::error::Result;

pub mod fs;
#[cfg(any(test, feature = "test_utils"))]
pub mod memory;

/// The three persisted sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Spaces,
    Collections,
    Links,
}

impl StoreKey {
    pub const ALL: [StoreKey; 3] = [StoreKey::Spaces, StoreKey::Collections, StoreKey::Links];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Spaces => "orbital_spaces",
            StoreKey::Collections => "orbital_collections",
            StoreKey::Links => "orbital_links",
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract key-value interface for raw storage I/O.
pub trait StorageBackend {
    /// Read the stored bytes for a key. `Ok(None)` when nothing was stored yet.
    fn get(&self, key: StoreKey) -> Result<Option<Vec<u8>>>;

    /// Replace the stored bytes for a key.
    fn set(&self, key: StoreKey, bytes: &[u8]) -> Result<()>;
}

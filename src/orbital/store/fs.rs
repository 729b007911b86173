use super::{StorageBackend, StoreKey};
use crate::error::{OrbitalError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File-backed storage: `<root>/<key>.json` per sequence.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key_path(&self, key: StoreKey) -> PathBuf {
        self.root.join(format!("{}.json", key.as_str()))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(OrbitalError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn get(&self, key: StoreKey) -> Result<Option<Vec<u8>>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path).map_err(OrbitalError::Io)?;
        Ok(Some(bytes))
    }

    fn set(&self, key: StoreKey, bytes: &[u8]) -> Result<()> {
        self.ensure_dir()?;

        // Atomic write
        let tmp_path = self
            .root
            .join(format!(".{}-{}.tmp", key.as_str(), Uuid::new_v4()));
        fs::write(&tmp_path, bytes).map_err(OrbitalError::Io)?;
        fs::rename(&tmp_path, self.key_path(key)).map_err(OrbitalError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::new(dir.path());
        assert!(backend.get(StoreKey::Links).unwrap().is_none());
    }

    #[test]
    fn set_then_get_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::new(dir.path().join("nested"));
        backend.set(StoreKey::Spaces, b"[]").unwrap();

        assert_eq!(backend.get(StoreKey::Spaces).unwrap().unwrap(), b"[]");
        assert!(backend.key_path(StoreKey::Spaces).ends_with("orbital_spaces.json"));
    }

    #[test]
    fn set_replaces_previous_value_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::new(dir.path());
        backend.set(StoreKey::Links, b"[1]").unwrap();
        backend.set(StoreKey::Links, b"[2]").unwrap();

        assert_eq!(backend.get(StoreKey::Links).unwrap().unwrap(), b"[2]");
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}

//! store::file
//!
//! Local-file waitlist storage.
//!
//! # Design
//!
//! The record is a single JSON file (`{"emails": [...], "count": n}`).
//! Writes are atomic: serialize to a temp file in the same directory,
//! sync, then rename over the target. A missing file is not an error;
//! `load` returns the default seeded state.
//!
//! An fs2 advisory lock on a sidecar `.lock` file guards the write against
//! other processes sharing the same data file. In-process serialization of
//! the read-modify-write cycle is the registrar's job, not the store's.
//!
//! # Example
//!
//! ```ignore
//! use waitroom::store::file::FileStore;
//! use waitroom::store::WaitlistStore;
//!
//! let store = FileStore::new("/var/lib/waitroom/waitlist.json".into());
//! let state = store.load().await?;
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use fs2::FileExt;

use super::traits::{StoreError, WaitlistStore};
use crate::core::types::WaitlistState;

/// File-backed waitlist store.
#[derive(Debug)]
pub struct FileStore {
    /// Path to the JSON record file.
    path: PathBuf,
}

impl FileStore {
    /// Create a file store at the given path.
    ///
    /// The file (and its parent directory) is created on first save.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the path to the record file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Path of the sidecar lock file.
    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Write the record atomically under an exclusive advisory lock.
    fn write_record(&self, state: &WaitlistState) -> Result<(), StoreError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::WriteError(format!("cannot create directory: {}", e)))?;
        }

        // Take the advisory lock for the duration of the write.
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| StoreError::WriteError(format!("cannot open lock file: {}", e)))?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StoreError::WriteError(format!("cannot acquire file lock: {}", e)))?;

        let content = serde_json::to_string_pretty(state)
            .map_err(|e| StoreError::WriteError(format!("cannot serialize record: {}", e)))?;

        // Write to a temp file first for atomicity
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| StoreError::WriteError(format!("cannot create temp file: {}", e)))?;

            file.write_all(content.as_bytes())
                .map_err(|e| StoreError::WriteError(format!("cannot write record: {}", e)))?;

            file.sync_all()
                .map_err(|e| StoreError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::WriteError(format!("cannot rename temp file: {}", e)))?;

        // Lock released when lock_file drops.
        Ok(())
    }

    /// Read and decode the record, or the default when the file is absent.
    fn read_record(&self) -> Result<WaitlistState, StoreError> {
        if !self.path.exists() {
            return Ok(WaitlistState::default());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::ReadError(format!("cannot read record file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| StoreError::ParseError(format!("cannot parse record file: {}", e)))
    }
}

#[async_trait]
impl WaitlistStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn load(&self) -> Result<WaitlistState, StoreError> {
        self.read_record()
    }

    async fn save(&self, state: &WaitlistState) -> Result<(), StoreError> {
        self.write_record(state)
    }
}

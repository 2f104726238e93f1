//! Durable storage seam for the debug memory store.
//!
//! The store only needs "read everything" and "replace everything" over
//! an opaque byte blob. The file implementation is simple, portable, and
//! human-inspectable; the in-memory one backs tests.

use async_trait::async_trait;
use snapsolve_core::error::MemoryError;
use std::path::PathBuf;
use std::sync::Mutex;

/// Key-value-ish durable storage: one blob, replaced wholesale.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the persisted blob, `None` when nothing has been written yet.
    async fn read_all(&self) -> Result<Option<Vec<u8>>, MemoryError>;

    /// Replace the persisted blob.
    async fn write_all(&self, bytes: &[u8]) -> Result<(), MemoryError>;
}

/// File-backed storage at a fixed path. The parent directory is created
/// on first write.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl StorageBackend for FileStorage {
    async fn read_all(&self) -> Result<Option<Vec<u8>>, MemoryError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MemoryError::Storage(format!(
                "Failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn write_all(&self, bytes: &[u8]) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MemoryError::Storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        std::fs::write(&self.path, bytes).map_err(|e| {
            MemoryError::Storage(format!("Failed to write {}: {e}", self.path.display()))
        })
    }
}

/// In-memory storage for tests.
#[derive(Default)]
pub struct InMemoryStorage {
    blob: Mutex<Option<Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn read_all(&self) -> Result<Option<Vec<u8>>, MemoryError> {
        Ok(self.blob.lock().unwrap().clone())
    }

    async fn write_all(&self, bytes: &[u8]) -> Result<(), MemoryError> {
        *self.blob.lock().unwrap() = Some(bytes.to_vec());
        Ok(())
    }
}

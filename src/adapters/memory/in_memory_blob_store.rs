//! In-memory blob store for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::domain::foundation::DomainError;
use crate::ports::BlobStore;

/// In-memory blob store for testing.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashSet<String>>,
}

impl InMemoryBlobStore {
    /// Creates an empty blob store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a blob at the given path.
    pub fn put(&self, storage_path: &str) {
        self.blobs.lock().unwrap().insert(storage_path.to_string());
    }

    /// Whether a blob exists at the given path.
    pub fn contains(&self, storage_path: &str) -> bool {
        self.blobs.lock().unwrap().contains(storage_path)
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn delete(&self, storage_path: &str) -> Result<(), DomainError> {
        // Absent-is-ok: overlapping sweeps may race on the same path
        self.blobs.lock().unwrap().remove(storage_path);
        Ok(())
    }
}

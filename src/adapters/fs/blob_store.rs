//! Local filesystem implementation of BlobStore.
//!
//! The upload path writes blobs under a base directory keyed by their
//! storage path; this core only ever removes them.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::BlobStore;

/// Local filesystem blob store rooted at a base directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    /// Base directory for all blob storage.
    base_path: PathBuf,
}

impl FsBlobStore {
    /// Creates a blob store rooted at the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Resolves a storage path under the base directory.
    ///
    /// Rejects absolute paths and `..` components so a stored path can
    /// never escape the base directory.
    fn resolve(&self, storage_path: &str) -> Result<PathBuf, DomainError> {
        let relative = Path::new(storage_path);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || storage_path.is_empty() {
            return Err(DomainError::new(
                ErrorCode::BlobStoreError,
                format!("Invalid storage path: {}", storage_path),
            ));
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn delete(&self, storage_path: &str) -> Result<(), DomainError> {
        let path = self.resolve(storage_path)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Absent-is-ok: overlapping sweeps may race on the same path
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(DomainError::new(
                ErrorCode::BlobStoreError,
                format!("Failed to delete blob {}: {}", storage_path, err),
            )),
        }
    }
}

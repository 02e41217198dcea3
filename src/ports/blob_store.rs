//! Blob store port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Port for the storage bucket holding uploaded blobs.
///
/// This core only ever deletes; the upload and download paths live
/// elsewhere in the product.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Deletes the blob at `storage_path`. Deleting an already-absent
    /// blob is not an error (sweeps overlap).
    async fn delete(&self, storage_path: &str) -> Result<(), DomainError>;
}

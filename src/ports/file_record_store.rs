//! File-record store port - metadata for stored blobs.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, FileRecordId, Timestamp};
use crate::domain::storage::FileRecord;

/// Port for blob metadata records.
#[async_trait]
pub trait FileRecordStore: Send + Sync {
    /// Records created strictly before `cutoff` whose premium snapshot is
    /// false. The premium filter is on the stored snapshot, never a join
    /// against the owner's current status.
    async fn stale_records(&self, cutoff: Timestamp) -> Result<Vec<FileRecord>, DomainError>;

    /// Deletes a metadata record. Deleting an already-absent record is
    /// not an error (sweeps overlap).
    async fn delete_record(&self, record_id: &FileRecordId) -> Result<(), DomainError>;
}

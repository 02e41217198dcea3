//! PostgreSQL implementation of FileRecordStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, FileRecordId, Timestamp, UserId};
use crate::domain::storage::FileRecord;
use crate::ports::FileRecordStore;

use super::store_error;

/// PostgreSQL implementation of the FileRecordStore port.
pub struct PgFileRecordStore {
    pool: PgPool,
}

impl PgFileRecordStore {
    /// Creates a new PgFileRecordStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a file record.
#[derive(Debug, sqlx::FromRow)]
struct FileRow {
    record_id: Uuid,
    owner_id: String,
    storage_path: String,
    created_at: DateTime<Utc>,
    is_premium: bool,
}

impl TryFrom<FileRow> for FileRecord {
    type Error = DomainError;

    fn try_from(row: FileRow) -> Result<Self, Self::Error> {
        let owner_id = UserId::new(row.owner_id)
            .map_err(|e| DomainError::new(ErrorCode::StoreError, format!("Invalid owner_id: {}", e)))?;

        Ok(FileRecord {
            record_id: FileRecordId::from_uuid(row.record_id),
            owner_id,
            storage_path: row.storage_path,
            created_at: Timestamp::from_datetime(row.created_at),
            is_premium: row.is_premium,
        })
    }
}

#[async_trait]
impl FileRecordStore for PgFileRecordStore {
    async fn stale_records(&self, cutoff: Timestamp) -> Result<Vec<FileRecord>, DomainError> {
        // The premium filter is on the stored snapshot column, not a
        // join against the owner's current status
        let rows: Vec<FileRow> = sqlx::query_as(
            "SELECT record_id, owner_id, storage_path, created_at, is_premium
             FROM file_records
             WHERE created_at < $1 AND is_premium = FALSE
             ORDER BY created_at",
        )
        .bind(cutoff.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("Failed to query stale file records", e))?;

        rows.into_iter().map(FileRecord::try_from).collect()
    }

    async fn delete_record(&self, record_id: &FileRecordId) -> Result<(), DomainError> {
        // Absent-is-ok: overlapping sweeps may race on the same record
        sqlx::query("DELETE FROM file_records WHERE record_id = $1")
            .bind(record_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete file record", e))?;
        Ok(())
    }
}

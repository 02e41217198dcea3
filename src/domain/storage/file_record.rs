//! FileRecord - metadata for a blob in the storage bucket.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{FileRecordId, Timestamp, UserId};

use super::RetentionWindow;

/// Metadata for a stored blob.
///
/// Created by the upload path (outside this core), deleted by the storage
/// reaper once eligible.
///
/// # Invariants
///
/// - `is_premium` is a snapshot of the owner's status at upload time, not
///   a live lookup. A record uploaded while premium is never auto-reaped,
///   even after the owner's entitlement lapses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Record identifier.
    pub record_id: FileRecordId,

    /// User who uploaded the blob.
    pub owner_id: UserId,

    /// Bucket path of the blob.
    pub storage_path: String,

    /// Upload time.
    pub created_at: Timestamp,

    /// Owner's premium status at upload time.
    pub is_premium: bool,
}

impl FileRecord {
    /// Creates a record for a freshly uploaded blob.
    pub fn new(
        owner_id: UserId,
        storage_path: impl Into<String>,
        created_at: Timestamp,
        is_premium: bool,
    ) -> Self {
        Self {
            record_id: FileRecordId::new(),
            owner_id,
            storage_path: storage_path.into(),
            created_at,
            is_premium,
        }
    }

    /// Whether the reaper may delete this record as of `now`.
    ///
    /// Eligible = uploaded on the free tier AND older than the retention
    /// window. The premium snapshot exempts a record forever.
    pub fn is_reapable(&self, now: Timestamp, retention: RetentionWindow) -> bool {
        !self.is_premium && self.created_at.is_before(&retention.cutoff(now))
    }
}

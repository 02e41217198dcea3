//! ReapStaleFilesHandler - Scheduled deletion of aged-out free-tier blobs.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::storage::RetentionWindow;
use crate::ports::{BlobStore, FileRecordStore};

/// Command for one reap run.
#[derive(Debug, Clone, Copy)]
pub struct ReapStaleFilesCommand {
    pub now: Timestamp,
    pub retention: RetentionWindow,
}

impl ReapStaleFilesCommand {
    /// A run at `now` with the product's default retention window.
    pub fn at(now: Timestamp) -> Self {
        Self {
            now,
            retention: RetentionWindow::default(),
        }
    }
}

/// Counters from one reap run, logged for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReapReport {
    /// Metadata records successfully removed.
    pub deleted: usize,
    /// Blob deletions that faulted (record deletion still attempted).
    pub blob_failures: usize,
    /// Record deletions that faulted (blob deletion still attempted).
    pub record_failures: usize,
}

/// Handler for the nightly storage retention sweep.
///
/// Invoked by the external scheduler every 24 hours. Eligibility comes
/// from the premium snapshot captured at upload time, never the owner's
/// current status. Blob and metadata deletions are issued together per
/// record; a fault in one never blocks the other, and no fault aborts
/// the run - best-effort batch, retried naturally on the next tick.
pub struct ReapStaleFilesHandler {
    files: Arc<dyn FileRecordStore>,
    blobs: Arc<dyn BlobStore>,
}

impl ReapStaleFilesHandler {
    pub fn new(files: Arc<dyn FileRecordStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { files, blobs }
    }

    pub async fn handle(&self, cmd: ReapStaleFilesCommand) -> Result<ReapReport, DomainError> {
        let cutoff = cmd.retention.cutoff(cmd.now);
        let stale = self.files.stale_records(cutoff).await?;

        let mut report = ReapReport::default();
        for record in &stale {
            let (blob_result, record_result) = futures::future::join(
                self.blobs.delete(&record.storage_path),
                self.files.delete_record(&record.record_id),
            )
            .await;

            if let Err(err) = blob_result {
                report.blob_failures += 1;
                tracing::warn!(
                    record_id = %record.record_id,
                    storage_path = %record.storage_path,
                    error = %err,
                    "failed to delete blob, left for next run"
                );
            }
            match record_result {
                Ok(()) => report.deleted += 1,
                Err(err) => {
                    report.record_failures += 1;
                    tracing::warn!(
                        record_id = %record.record_id,
                        error = %err,
                        "failed to delete file record, left for next run"
                    );
                }
            }
        }

        tracing::info!(
            deleted = report.deleted,
            blob_failures = report.blob_failures,
            record_failures = report.record_failures,
            retention_days = cmd.retention.as_days(),
            "storage retention sweep completed"
        );

        Ok(report)
    }
}

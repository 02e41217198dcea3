//! Storage handlers - retention sweep over free-tier blobs.

mod reap_stale_files;

pub use reap_stale_files::{ReapReport, ReapStaleFilesCommand, ReapStaleFilesHandler};

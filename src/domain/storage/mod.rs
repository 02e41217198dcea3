//! Storage domain - stored-blob metadata and retention rules.

mod file_record;
mod retention;

pub use file_record::FileRecord;
pub use retention::RetentionWindow;

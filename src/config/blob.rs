//! Blob storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Blob storage configuration (local bucket directory)
#[derive(Debug, Clone, Deserialize)]
pub struct BlobConfig {
    /// Base directory holding uploaded blobs
    pub root_dir: PathBuf,
}

impl BlobConfig {
    /// Validate blob storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.root_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("BLOB__ROOT_DIR"));
        }
        Ok(())
    }
}

//! Sidecar metadata reader.

use crate::error::storage_error;
use dropgo_core::{AppError, UploadRecord};
use dropgo_storage::UploadStore;
use std::sync::Arc;

/// Reads and parses sidecar records. Nothing is cached: every call reads the store.
#[derive(Clone)]
pub struct MetadataReader {
    store: Arc<dyn UploadStore>,
}

impl MetadataReader {
    pub fn new(store: Arc<dyn UploadStore>) -> Self {
        Self { store }
    }

    /// Read the record for `id`.
    ///
    /// Fails with `NotFound` when the sidecar is absent and `Malformed` when it cannot be
    /// parsed. Structurally invalid records are never partially accepted.
    pub async fn read(&self, id: &str) -> Result<UploadRecord, AppError> {
        let bytes = self.store.read_sidecar(id).await.map_err(storage_error)?;
        let record = UploadRecord::from_json(&bytes)?;

        if record.id != id {
            tracing::debug!(upload_id = %id, record_id = %record.id, "Sidecar ID differs from its file name");
        }

        Ok(record)
    }
}

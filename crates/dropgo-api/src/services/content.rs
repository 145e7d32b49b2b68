//! Content serving: download, ranged stream and delete of single uploads.

use crate::error::storage_error;
use crate::services::metadata::MetadataReader;
use crate::services::transfer::{window_stream, ByteStream};
use dropgo_core::{
    is_complete, resolve_range, validate_upload_id, AppError, ServingPlan, UploadRecord,
};
use dropgo_storage::{DataFile, UploadStore};
use std::sync::Arc;

/// A complete upload ready to be written to a response.
pub struct ServedContent {
    pub upload_id: String,
    pub filename: String,
    pub mime_type: String,
    pub plan: ServingPlan,
    pub body: ByteStream,
}

impl std::fmt::Debug for ServedContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServedContent")
            .field("upload_id", &self.upload_id)
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("plan", &self.plan)
            .finish()
    }
}

#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn UploadStore>,
    reader: MetadataReader,
    chunk_size: usize,
}

impl ContentService {
    pub fn new(store: Arc<dyn UploadStore>, reader: MetadataReader, chunk_size: usize) -> Self {
        Self {
            store,
            reader,
            chunk_size,
        }
    }

    /// Whole upload, for saving as an attachment.
    pub async fn download(&self, id: &str) -> Result<ServedContent, AppError> {
        let (record, file) = self.open_complete(id).await?;
        let plan = ServingPlan::Full {
            total_length: file.len,
        };
        self.serve(id, &record, file, plan).await
    }

    /// Upload or a byte window of it, resolved from an optional `Range` header value.
    ///
    /// An out-of-bounds range fails with `RangeNotSatisfiable` carrying the total length.
    pub async fn stream(&self, id: &str, range: Option<&str>) -> Result<ServedContent, AppError> {
        let (record, file) = self.open_complete(id).await?;
        let plan = resolve_range(range, file.len);

        if let ServingPlan::Unsatisfiable { total_length } = plan {
            return Err(AppError::RangeNotSatisfiable { total_length });
        }

        if let Some(window) = plan.window() {
            tracing::debug!(
                upload_id = %id,
                start = window.start,
                end = window.end,
                total_length = plan.total_length(),
                "Serving byte window"
            );
        }

        self.serve(id, &record, file, plan).await
    }

    /// Remove the upload's data file, then its sidecar.
    ///
    /// The identifier is validated before the store is touched. No completeness check is
    /// made: in-progress and orphaned uploads can be deleted too.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        validate_upload_id(id)?;

        self.store.remove_pair(id).await.map_err(storage_error)?;

        tracing::info!(upload_id = %id, "Upload deleted");
        Ok(())
    }

    /// Read the record, open the data file and check completion against the length of
    /// the opened handle, immediately before any byte is transferred.
    ///
    /// An unreadable sidecar leaves nothing resolvable to serve and answers `NotFound`.
    async fn open_complete(&self, id: &str) -> Result<(UploadRecord, DataFile), AppError> {
        validate_upload_id(id)?;

        let record = self.reader.read(id).await.map_err(|e| match e {
            AppError::Malformed(reason) => {
                tracing::warn!(upload_id = %id, reason = %reason, "Unreadable upload metadata");
                AppError::NotFound(format!("File {} not found", id))
            }
            other => other,
        })?;
        let file = self.store.open_data_file(id).await.map_err(storage_error)?;

        if !is_complete(&record, file.len) {
            return Err(AppError::Incomplete {
                id: id.to_string(),
                declared: record.declared_size,
                actual: file.len,
            });
        }

        Ok((record, file))
    }

    async fn serve(
        &self,
        id: &str,
        record: &UploadRecord,
        file: DataFile,
        plan: ServingPlan,
    ) -> Result<ServedContent, AppError> {
        let body = window_stream(id, file, plan.window(), self.chunk_size).await?;

        Ok(ServedContent {
            upload_id: id.to_string(),
            filename: record.metadata.filename_or(id).to_string(),
            mime_type: record.metadata.mime_type().to_string(),
            plan,
            body,
        })
    }
}

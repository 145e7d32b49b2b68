//! Catalog of complete uploads, rebuilt from the store on every call.

use crate::error::storage_error;
use crate::services::metadata::MetadataReader;
use dropgo_core::{is_complete, AppError, UploadSummary};
use dropgo_storage::UploadStore;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn UploadStore>,
    reader: MetadataReader,
    concurrency: usize,
}

impl CatalogService {
    pub fn new(store: Arc<dyn UploadStore>, reader: MetadataReader, concurrency: usize) -> Self {
        Self {
            store,
            reader,
            concurrency: concurrency.max(1),
        }
    }

    /// List every complete upload, in sidecar name order.
    ///
    /// Entries whose sidecar cannot be read or parsed, whose data file is missing, or
    /// whose data file has not reached the declared size are skipped. Only a failure to
    /// enumerate the store fails the call.
    pub async fn list(&self) -> Result<Vec<UploadSummary>, AppError> {
        let start = Instant::now();

        let ids = self.store.enumerate_sidecars().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to enumerate sidecars");
            storage_error(e)
        })?;
        let candidates = ids.len();

        // `buffered` keeps input order while reading several entries at once.
        let summaries: Vec<UploadSummary> = stream::iter(ids)
            .map(|id| self.summarize(id))
            .buffered(self.concurrency)
            .filter_map(futures::future::ready)
            .collect()
            .await;

        tracing::debug!(
            candidates,
            listed = summaries.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Catalog built"
        );

        Ok(summaries)
    }

    async fn summarize(&self, id: String) -> Option<UploadSummary> {
        let record = match self.reader.read(&id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(upload_id = %id, error = %e, "Skipping unreadable sidecar");
                return None;
            }
        };

        let size = match self.store.stat_data_file(&id).await {
            Ok(size) => size,
            Err(e) => {
                tracing::debug!(upload_id = %id, error = %e, "Skipping upload without data file");
                return None;
            }
        };

        if !is_complete(&record, size) {
            tracing::debug!(
                upload_id = %id,
                declared_size = record.declared_size,
                size_bytes = size,
                "Skipping incomplete upload"
            );
            return None;
        }

        Some(UploadSummary::from_record(&id, &record, size))
    }
}

//! Storage setup and initialization

use anyhow::{Context, Result};
use dropgo_core::Config;
use dropgo_storage::{LocalUploadStore, UploadStore};
use std::sync::Arc;

/// Open the shared upload directory, creating it if needed.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn UploadStore>> {
    tracing::info!(upload_dir = %config.upload_dir().display(), "Initializing upload store...");

    let store = LocalUploadStore::new(config.upload_dir())
        .await
        .context("Failed to open upload directory")?;

    tracing::info!(
        backend = %store.backend_type(),
        upload_dir = %store.base_path().display(),
        "Upload store initialized successfully"
    );

    Ok(Arc::new(store))
}

//! Application state shared by all handlers.

use crate::services::{CatalogService, ContentService, MetadataReader};
use dropgo_core::Config;
use dropgo_storage::UploadStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UploadStore>,
    pub catalog: CatalogService,
    pub content: ContentService,
}

impl AppState {
    /// Wire the services over a single store.
    pub fn new(config: &Config, store: Arc<dyn UploadStore>) -> Self {
        let reader = MetadataReader::new(store.clone());
        let catalog =
            CatalogService::new(store.clone(), reader.clone(), config.catalog_concurrency());
        let content = ContentService::new(store.clone(), reader, config.transfer_chunk_size());

        Self {
            store,
            catalog,
            content,
        }
    }
}

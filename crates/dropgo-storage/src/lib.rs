//! Dropgo Storage Library
//!
//! This crate provides the [`UploadStore`] abstraction over the directory shared with the
//! upload collaborator, with a local filesystem backend and an in-memory backend.
//!
//! # Layout
//!
//! The store is a flat namespace. Each upload `id` is two entries in the root:
//!
//! - `{id}`: the data file, possibly still growing
//! - `{id}.info`: the sidecar record
//!
//! Ids must not contain path separators or `..`; every backend validates ids before use.

#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod traits;

use std::fmt;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use local::LocalUploadStore;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryUploadStore;
pub use traits::{DataFile, DataReader, StorageError, StorageResult, UploadStore};

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Validate an upload id at the storage boundary.
pub(crate) fn check_id(id: &str) -> StorageResult<()> {
    dropgo_core::validate_upload_id(id).map_err(|e| StorageError::InvalidKey(e.to_string()))
}

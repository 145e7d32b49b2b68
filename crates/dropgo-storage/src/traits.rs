//! Upload store abstraction trait
//!
//! The store is the only component that touches the shared storage root. Every call
//! observes the current state of the backend; nothing is cached between calls.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncSeek};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid upload id: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Readable, seekable handle on an upload's data file.
pub trait DataReader: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> DataReader for T {}

/// An opened data file together with the length observed on the open handle.
///
/// The length is taken from the handle itself, so a completion check against it
/// describes exactly the file that will be read.
pub struct DataFile {
    pub len: u64,
    pub reader: Box<dyn DataReader>,
}

impl std::fmt::Debug for DataFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFile").field("len", &self.len).finish()
    }
}

/// Upload store abstraction trait
///
/// Uploads live in a flat namespace: a data file named by the upload id and a sidecar
/// record next to it. Implementations must reject ids that could address anything
/// outside that namespace with [`StorageError::InvalidKey`].
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Raw bytes of the sidecar record for `id`.
    async fn read_sidecar(&self, id: &str) -> StorageResult<Vec<u8>>;

    /// Current byte length of the data file for `id`.
    async fn stat_data_file(&self, id: &str) -> StorageResult<u64>;

    /// Open the data file for `id` for reading.
    async fn open_data_file(&self, id: &str) -> StorageResult<DataFile>;

    /// Upload ids of every sidecar in the store, sorted and without duplicates.
    async fn enumerate_sidecars(&self) -> StorageResult<Vec<String>>;

    /// Remove the data file for `id`.
    async fn remove_data_file(&self, id: &str) -> StorageResult<()>;

    /// Remove the sidecar record for `id`.
    async fn remove_sidecar(&self, id: &str) -> StorageResult<()>;

    /// Remove a whole upload: data file first, then the sidecar.
    ///
    /// If the data file cannot be removed the sidecar is left untouched. A sidecar
    /// without data is filtered out of listings, while data without a sidecar would be
    /// invisible and leak space. Sidecar removal is best-effort; a missing sidecar
    /// after the data file is gone is not an error.
    async fn remove_pair(&self, id: &str) -> StorageResult<()> {
        self.remove_data_file(id).await?;

        match self.remove_sidecar(id).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => {
                tracing::warn!(error = %e, upload_id = %id, "Failed to remove sidecar after data file");
            }
        }

        Ok(())
    }

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

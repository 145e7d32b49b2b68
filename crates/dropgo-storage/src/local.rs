use crate::traits::{DataFile, StorageError, StorageResult, UploadStore};
use crate::{check_id, StorageBackend};
use async_trait::async_trait;
use dropgo_core::constants::{id_from_sidecar_name, sidecar_name};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem upload store rooted at the shared upload directory
#[derive(Clone, Debug)]
pub struct LocalUploadStore {
    base_path: PathBuf,
}

impl LocalUploadStore {
    /// Create a new LocalUploadStore instance
    ///
    /// # Arguments
    /// * `base_path` - Directory shared with the upload collaborator (e.g., "./uploads")
    ///
    /// The directory is created if it does not exist yet and stored as an absolute path.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let base_path = fs::canonicalize(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to resolve upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalUploadStore { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the data file for `id`, after id validation.
    fn data_path(&self, id: &str) -> StorageResult<PathBuf> {
        check_id(id)?;
        Ok(self.base_path.join(id))
    }

    /// Path of the sidecar record for `id`, after id validation.
    fn sidecar_path(&self, id: &str) -> StorageResult<PathBuf> {
        check_id(id)?;
        Ok(self.base_path.join(sidecar_name(id)))
    }
}

fn not_found_or(
    id: &str,
    err: std::io::Error,
    wrap: impl FnOnce(std::io::Error) -> StorageError,
) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::NotFound(id.to_string())
    } else {
        wrap(err)
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn read_sidecar(&self, id: &str) -> StorageResult<Vec<u8>> {
        let path = self.sidecar_path(id)?;

        fs::read(&path).await.map_err(|e| {
            not_found_or(id, e, |e| {
                StorageError::ReadFailed(format!("Failed to read sidecar {}: {}", path.display(), e))
            })
        })
    }

    async fn stat_data_file(&self, id: &str) -> StorageResult<u64> {
        let path = self.data_path(id)?;

        let metadata = fs::metadata(&path).await.map_err(|e| {
            not_found_or(id, e, |e| {
                StorageError::ReadFailed(format!("Failed to stat {}: {}", path.display(), e))
            })
        })?;

        if !metadata.is_file() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        Ok(metadata.len())
    }

    async fn open_data_file(&self, id: &str) -> StorageResult<DataFile> {
        let path = self.data_path(id)?;

        let file = fs::File::open(&path).await.map_err(|e| {
            not_found_or(id, e, |e| {
                StorageError::ReadFailed(format!("Failed to open {}: {}", path.display(), e))
            })
        })?;

        let metadata = file.metadata().await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to stat {}: {}", path.display(), e))
        })?;

        if !metadata.is_file() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        tracing::debug!(
            path = %path.display(),
            upload_id = %id,
            size_bytes = metadata.len(),
            "Opened data file"
        );

        Ok(DataFile {
            len: metadata.len(),
            reader: Box::new(file),
        })
    }

    async fn enumerate_sidecars(&self) -> StorageResult<Vec<String>> {
        let start = std::time::Instant::now();

        let mut entries = fs::read_dir(&self.base_path).await.map_err(|e| {
            StorageError::ReadFailed(format!(
                "Failed to read upload directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                tracing::debug!(entry = ?file_name, "Skipping non UTF-8 directory entry");
                continue;
            };
            if let Some(id) = id_from_sidecar_name(name) {
                ids.push(id.to_string());
            }
        }

        ids.sort();
        ids.dedup();

        tracing::debug!(
            path = %self.base_path.display(),
            count = ids.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Enumerated sidecars"
        );

        Ok(ids)
    }

    async fn remove_data_file(&self, id: &str) -> StorageResult<()> {
        let path = self.data_path(id)?;
        let start = std::time::Instant::now();

        fs::remove_file(&path).await.map_err(|e| {
            not_found_or(id, e, |e| {
                StorageError::DeleteFailed(format!("Failed to delete {}: {}", path.display(), e))
            })
        })?;

        tracing::info!(
            path = %path.display(),
            upload_id = %id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Removed data file"
        );

        Ok(())
    }

    async fn remove_sidecar(&self, id: &str) -> StorageResult<()> {
        let path = self.sidecar_path(id)?;

        fs::remove_file(&path).await.map_err(|e| {
            not_found_or(id, e, |e| {
                StorageError::DeleteFailed(format!("Failed to delete {}: {}", path.display(), e))
            })
        })?;

        tracing::debug!(path = %path.display(), upload_id = %id, "Removed sidecar");

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    async fn store() -> (TempDir, LocalUploadStore) {
        let dir = TempDir::new().unwrap();
        let store = LocalUploadStore::new(dir.path()).await.unwrap();
        (dir, store)
    }

    fn write(dir: &TempDir, name: &str, contents: &[u8]) {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }

    #[tokio::test]
    async fn test_new_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("uploads");
        let store = LocalUploadStore::new(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(store.base_path().is_absolute());
        assert_eq!(store.base_path(), nested.canonicalize().unwrap().as_path());
        assert_eq!(store.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn test_enumerate_returns_sorted_ids_of_sidecars_only() {
        let (dir, store) = store().await;
        write(&dir, "b2.info", b"{}");
        write(&dir, "a1.info", b"{}");
        write(&dir, "a1", b"data");
        write(&dir, "notes.txt", b"x");
        write(&dir, ".info", b"{}");

        let ids = store.enumerate_sidecars().await.unwrap();
        assert_eq!(ids, vec!["a1".to_string(), "b2".to_string()]);
    }

    #[tokio::test]
    async fn test_enumerate_missing_root_fails() {
        let (dir, store) = store().await;
        drop(dir);
        assert!(matches!(
            store.enumerate_sidecars().await,
            Err(StorageError::ReadFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_stat_and_open_report_live_length() {
        let (dir, store) = store().await;
        write(&dir, "a1", b"0123456789");

        assert_eq!(store.stat_data_file("a1").await.unwrap(), 10);

        let mut file = store.open_data_file("a1").await.unwrap();
        assert_eq!(file.len, 10);
        let mut buf = Vec::new();
        file.reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"0123456789");
    }

    #[tokio::test]
    async fn test_missing_entries_are_not_found() {
        let (_dir, store) = store().await;
        assert!(matches!(store.read_sidecar("zz").await, Err(StorageError::NotFound(_))));
        assert!(matches!(store.stat_data_file("zz").await, Err(StorageError::NotFound(_))));
        assert!(matches!(store.open_data_file("zz").await, Err(StorageError::NotFound(_))));
        assert!(matches!(store.remove_data_file("zz").await, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_directory_is_not_a_data_file() {
        let (dir, store) = store().await;
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        assert!(matches!(store.stat_data_file("sub").await, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_traversal_ids_are_rejected() {
        let (_dir, store) = store().await;
        for id in ["..", "../etc/passwd", "a/b", "a\\b", "x.info"] {
            assert!(
                matches!(store.stat_data_file(id).await, Err(StorageError::InvalidKey(_))),
                "id {:?} was not rejected",
                id
            );
            assert!(matches!(store.remove_pair(id).await, Err(StorageError::InvalidKey(_))));
        }
    }

    #[tokio::test]
    async fn test_remove_pair_removes_both_files() {
        let (dir, store) = store().await;
        write(&dir, "a1", b"0123456789");
        write(&dir, "a1.info", b"{}");

        store.remove_pair("a1").await.unwrap();

        assert!(!dir.path().join("a1").exists());
        assert!(!dir.path().join("a1.info").exists());
        assert!(matches!(store.remove_pair("a1").await, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_pair_tolerates_missing_sidecar() {
        let (dir, store) = store().await;
        write(&dir, "orphan", b"data");

        store.remove_pair("orphan").await.unwrap();
        assert!(!dir.path().join("orphan").exists());
    }

    #[tokio::test]
    async fn test_remove_pair_keeps_sidecar_when_data_missing() {
        let (dir, store) = store().await;
        write(&dir, "c3.info", b"{}");

        assert!(matches!(store.remove_pair("c3").await, Err(StorageError::NotFound(_))));
        assert!(dir.path().join("c3.info").exists());
    }
}

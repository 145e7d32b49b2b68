//! In-memory upload store.
//!
//! Holds data files and sidecars in maps behind a lock. Opening a data file takes a
//! snapshot of its bytes, so a reader keeps working after the upload is removed, the
//! same way an open file descriptor survives an unlink.

use crate::traits::{DataFile, StorageError, StorageResult, UploadStore};
use crate::{check_id, StorageBackend};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct MemoryState {
    data: BTreeMap<String, Arc<[u8]>>,
    sidecars: BTreeMap<String, Vec<u8>>,
    removals_fail: bool,
}

/// In-memory upload store, cheap to clone and shared between clones
#[derive(Clone, Debug, Default)]
pub struct MemoryUploadStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryUploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| StorageError::BackendError("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| StorageError::BackendError("memory store lock poisoned".to_string()))
    }

    /// Replace the data file for `id`.
    pub fn put_data(&self, id: &str, bytes: impl Into<Vec<u8>>) -> StorageResult<()> {
        check_id(id)?;
        let bytes: Vec<u8> = bytes.into();
        self.write()?.data.insert(id.to_string(), Arc::from(bytes));
        Ok(())
    }

    /// Append to the data file for `id`, creating it if needed.
    pub fn append_data(&self, id: &str, bytes: &[u8]) -> StorageResult<()> {
        check_id(id)?;
        let mut state = self.write()?;
        let mut grown = state
            .data
            .get(id)
            .map(|existing| existing.to_vec())
            .unwrap_or_default();
        grown.extend_from_slice(bytes);
        state.data.insert(id.to_string(), Arc::from(grown));
        Ok(())
    }

    /// Replace the sidecar record for `id`.
    pub fn put_sidecar(&self, id: &str, bytes: impl Into<Vec<u8>>) -> StorageResult<()> {
        check_id(id)?;
        self.write()?.sidecars.insert(id.to_string(), bytes.into());
        Ok(())
    }

    pub fn has_data(&self, id: &str) -> bool {
        self.read().map(|s| s.data.contains_key(id)).unwrap_or(false)
    }

    pub fn has_sidecar(&self, id: &str) -> bool {
        self.read().map(|s| s.sidecars.contains_key(id)).unwrap_or(false)
    }

    /// Make every subsequent removal fail, as a read-only mount would.
    pub fn set_removals_fail(&self, fail: bool) -> StorageResult<()> {
        self.write()?.removals_fail = fail;
        Ok(())
    }
}

#[async_trait]
impl UploadStore for MemoryUploadStore {
    async fn read_sidecar(&self, id: &str) -> StorageResult<Vec<u8>> {
        check_id(id)?;
        self.read()?
            .sidecars
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn stat_data_file(&self, id: &str) -> StorageResult<u64> {
        check_id(id)?;
        self.read()?
            .data
            .get(id)
            .map(|bytes| bytes.len() as u64)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn open_data_file(&self, id: &str) -> StorageResult<DataFile> {
        check_id(id)?;
        let snapshot = self
            .read()?
            .data
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        Ok(DataFile {
            len: snapshot.len() as u64,
            reader: Box::new(Cursor::new(snapshot)),
        })
    }

    async fn enumerate_sidecars(&self) -> StorageResult<Vec<String>> {
        Ok(self.read()?.sidecars.keys().cloned().collect())
    }

    async fn remove_data_file(&self, id: &str) -> StorageResult<()> {
        check_id(id)?;
        let mut state = self.write()?;
        if state.removals_fail {
            return Err(StorageError::DeleteFailed(format!("{} is read-only", id)));
        }
        state
            .data
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn remove_sidecar(&self, id: &str) -> StorageResult<()> {
        check_id(id)?;
        let mut state = self.write()?;
        if state.removals_fail {
            return Err(StorageError::DeleteFailed(format!("{} is read-only", id)));
        }
        state
            .sidecars
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

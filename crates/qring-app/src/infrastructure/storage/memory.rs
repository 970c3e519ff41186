//! In-memory blob storage.
//!
//! Nothing survives the process.  The `fail_reads` / `fail_writes` switches
//! make every call return [`StorageError::Unavailable`], which lets tests
//! exercise the error paths of callers without a broken disk.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::config_store::{BlobStorage, StorageError};

#[derive(Debug, Default)]
pub struct InMemoryBlobStorage {
    blobs: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `get` fail (or succeed again with `false`).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set` / `remove` fail (or succeed again with `false`).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stores a raw blob directly, bypassing the failure switches.
    pub async fn insert_raw(&self, key: &str, value: &str) {
        self.blobs
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
    }

    /// Returns the raw blob, bypassing the failure switches.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.blobs.lock().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.blobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.lock().await.is_empty()
    }
}

#[async_trait]
impl BlobStorage for InMemoryBlobStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("read of {key} refused")));
        }
        Ok(self.blobs.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("write of {key} refused")));
        }
        self.blobs
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("delete of {key} refused")));
        }
        self.blobs.lock().await.remove(key);
        Ok(())
    }
}

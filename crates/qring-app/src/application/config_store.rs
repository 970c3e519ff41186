//! ConfigStore: the single source of truth for the persisted configuration.
//!
//! The store sits on top of a [`BlobStorage`] (a named-blob key-value
//! capability) and keeps an in-memory copy of the record in sync with it:
//!
//! - `load` reads and parses the blob; a blob that does not parse is treated
//!   as "not configured" and returned as `Ok(None)`.
//! - `save` writes the whole record and updates the cache only once the write
//!   succeeded.
//! - `clear` removes the blob and empties the cache.
//!
//! # Stored document
//!
//! The blob is the camelCase [`ConfigRecord`] with an extra `"version"` key.
//! A document without a version, or with a version other than
//! [`CONFIG_SCHEMA_VERSION`], loads as absent.
//!
//! # Concurrency
//!
//! One save is expected in flight at a time.  A second `save` while one is
//! pending is refused with [`StorageError::SaveInProgress`] rather than racing
//! on the backend.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use qring_core::{ConfigRecord, CONFIG_SCHEMA_VERSION, CONFIG_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Error type for the persistence boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing {key} at {path}: {source}")]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record could not be serialized to JSON.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend refused the operation (e.g. simulated outage in tests).
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    /// Another save is still pending.
    #[error("a save is already in progress")]
    SaveInProgress,
}

/// Named-blob key-value storage.
///
/// Infrastructure implementations write files or keep a map in memory;
/// removing a key that does not exist succeeds.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if there is none.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes the blob stored under `key`.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// ── Stored document ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct StoredConfigRef<'a> {
    version: u32,
    #[serde(flatten)]
    record: &'a ConfigRecord,
}

#[derive(Deserialize)]
struct StoredConfig {
    version: u32,
    #[serde(flatten)]
    record: ConfigRecord,
}

/// Serializes `record` into the stored JSON document.
///
/// # Errors
///
/// Returns [`StorageError::Serialize`] if serde fails.
pub fn encode_record(record: &ConfigRecord) -> Result<String, StorageError> {
    let doc = StoredConfigRef {
        version: CONFIG_SCHEMA_VERSION,
        record,
    };
    Ok(serde_json::to_string(&doc)?)
}

/// Parses a stored JSON document.
///
/// Returns `None` for anything that is not a well-formed document of the
/// current schema version.
pub fn decode_record(raw: &str) -> Option<ConfigRecord> {
    match serde_json::from_str::<StoredConfig>(raw) {
        Ok(doc) if doc.version == CONFIG_SCHEMA_VERSION => Some(doc.record),
        Ok(doc) => {
            warn!(
                version = doc.version,
                expected = CONFIG_SCHEMA_VERSION,
                "stored configuration has unsupported schema version, treating as absent"
            );
            None
        }
        Err(e) => {
            warn!("stored configuration is unreadable, treating as absent: {e}");
            None
        }
    }
}

// ── ConfigStore ───────────────────────────────────────────────────────────────

/// Resets the `saving` flag when a save finishes or its future is dropped.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owner of the canonical in-memory configuration record.
///
/// Construct once at startup and share via `Arc`.  Consumers receive cloned
/// snapshots; only the store mutates the cache.
pub struct ConfigStore {
    storage: Arc<dyn BlobStorage>,
    key: String,
    cache: RwLock<Option<ConfigRecord>>,
    loading: AtomicBool,
    saving: AtomicBool,
}

impl ConfigStore {
    /// Creates a store over `storage` using the fixed configuration key.
    pub fn new(storage: Arc<dyn BlobStorage>) -> Self {
        Self::with_key(storage, CONFIG_STORAGE_KEY)
    }

    /// Creates a store that persists under a custom key.
    pub fn with_key(storage: Arc<dyn BlobStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            cache: RwLock::new(None),
            loading: AtomicBool::new(true),
            saving: AtomicBool::new(false),
        }
    }

    /// The storage key this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// `true` until the first `load` has completed (successfully or not).
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// `true` while a `save` is pending.
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Returns a copy of the cached record.
    pub async fn snapshot(&self) -> Option<ConfigRecord> {
        self.cache.read().await.clone()
    }

    /// Reads the persisted record and refreshes the cache.
    ///
    /// An unparseable blob yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend read fails; the cache is left
    /// untouched in that case.
    pub async fn load(&self) -> Result<Option<ConfigRecord>, StorageError> {
        let result = self
            .storage
            .get(&self.key)
            .await
            .map(|raw| raw.as_deref().and_then(decode_record));

        match &result {
            Ok(record) => {
                debug!(configured = record.is_some(), "configuration loaded");
                *self.cache.write().await = record.clone();
            }
            Err(e) => error!("failed to read configuration: {e}"),
        }

        self.loading.store(false, Ordering::Release);
        result
    }

    /// Persists `record`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::SaveInProgress`] if another save is pending, or
    /// the backend/serialization error.  On any error the cache keeps its
    /// previous value.
    pub async fn save(&self, record: ConfigRecord) -> Result<(), StorageError> {
        if self
            .saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(StorageError::SaveInProgress);
        }
        let _guard = SavingGuard(&self.saving);

        let payload = encode_record(&record)?;
        if let Err(e) = self.storage.set(&self.key, &payload).await {
            error!("failed to save configuration: {e}");
            return Err(e);
        }

        *self.cache.write().await = Some(record);
        info!(key = %self.key, "configuration saved");
        Ok(())
    }

    /// Deletes the persisted record and resets the cache to absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend delete fails; the cache is left
    /// untouched in that case.
    pub async fn clear(&self) -> Result<(), StorageError> {
        if let Err(e) = self.storage.remove(&self.key).await {
            error!("failed to clear configuration: {e}");
            return Err(e);
        }
        *self.cache.write().await = None;
        info!(key = %self.key, "configuration cleared");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

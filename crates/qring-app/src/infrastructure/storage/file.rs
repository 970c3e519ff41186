//! File-backed blob storage.
//!
//! Each key maps to `<data_dir>/<sanitized key>.json`, e.g. the configuration
//! key `@QRing_WS:config` becomes `QRing_WS_config.json`.  Writes go to a
//! sibling `.tmp` file first and are renamed into place, so a crash mid-write
//! leaves either the old blob or the new one.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::config_store::{BlobStorage, StorageError};

/// Stores each blob as a file inside one directory.
#[derive(Debug, Clone)]
pub struct FileBlobStorage {
    dir: PathBuf,
}

impl FileBlobStorage {
    /// Creates storage rooted at `dir`.  The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolves the file that holds `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    fn io_error(key: &str, path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Replaces every character outside `[A-Za-z0-9_-]` with `_` and trims the
/// underscores at both ends.
///
/// The mapping is not injective: `a:b` and `a_b` share `a_b.json`. Only the
/// fixed configuration key is stored here, so callers with several keys must
/// keep them distinct after sanitizing.
fn sanitize_key(key: &str) -> String {
    let mapped: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = mapped.trim_matches('_');
    if trimmed.is_empty() {
        "blob".to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl BlobStorage for FileBlobStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => Ok(Some(text)),
                // A blob that is not UTF-8 is corrupt and reads as absent.
                Err(e) => {
                    warn!(path = %path.display(), "blob is not valid UTF-8, treating as absent: {e}");
                    Ok(None)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, &path, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Self::io_error(key, &self.dir, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| Self::io_error(key, &tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Self::io_error(key, &path, e))?;

        debug!(path = %path.display(), bytes = value.len(), "blob written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, &path, e)),
        }
    }
}

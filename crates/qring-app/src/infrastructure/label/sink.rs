//! File-system label sink and the matching permission check.
//!
//! On a phone the label goes to the photo gallery behind an OS prompt.  On a
//! desktop the "gallery" is the export directory, and access is granted when
//! that directory can be created and written to.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::export_label::{DeviceCapabilities, LabelSink, PermissionStatus};

/// Writes labels as `<dir>/<name>.svg`.
#[derive(Debug, Clone)]
pub struct FileLabelSink {
    dir: PathBuf,
}

impl FileLabelSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl LabelSink for FileLabelSink {
    async fn save_label(&self, name: &str, svg: &str) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{name}.svg"));
        tokio::fs::write(&path, svg).await?;
        debug!(path = %path.display(), "label written");
        Ok(path.display().to_string())
    }
}

/// Grants "gallery" access when the export directory is writable.
#[derive(Debug, Clone)]
pub struct DirectoryPermissions {
    dir: PathBuf,
}

impl DirectoryPermissions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DeviceCapabilities for DirectoryPermissions {
    async fn request_gallery_access(&self) -> PermissionStatus {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!(dir = %self.dir.display(), "export directory unavailable: {e}");
            return PermissionStatus::Denied;
        }
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => PermissionStatus::Granted,
            Ok(_) => PermissionStatus::Denied,
            Err(e) => {
                warn!(dir = %self.dir.display(), "cannot inspect export directory: {e}");
                PermissionStatus::Denied
            }
        }
    }
}

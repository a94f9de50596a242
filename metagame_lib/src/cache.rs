//! Write-through disk cache of fetched pages, one file per URL.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;

const CACHE_EXTENSION: &str = "html";

/// Mirrors fetched pages under a root directory.
///
/// Each URL maps to `<root>/<sanitized url>.html`, where sanitizing keeps only
/// alphanumeric characters and `/`. Every read and write holds a permit of
/// the shared file-handle semaphore.
pub struct DiskCache {
    root: PathBuf,
    files: Arc<Semaphore>,
}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>, files: Arc<Semaphore>) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the cache file for a URL or path.
    pub fn key(&self, url: &str) -> PathBuf {
        let sanitized: String = url
            .chars()
            .filter(|c| *c == '/' || c.is_alphanumeric())
            .collect();
        let relative = sanitized.trim_start_matches('/');
        self.root.join(format!("{}.{}", relative, CACHE_EXTENSION))
    }

    /// Returns the cached body, or `None` on a miss.
    ///
    /// Entries that exist but are empty count as a miss. Read failures are
    /// logged and reported as a miss so the caller falls back to the network.
    pub async fn read(&self, url: &str) -> Option<String> {
        let path = self.key(url);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() && meta.len() > 0 => {}
            _ => return None,
        }

        let _permit = self.files.acquire().await.ok()?;
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!("Failed to read cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Stores a body. Failures are logged and otherwise ignored.
    pub async fn write(&self, url: &str, body: &str) {
        let path = self.key(url);
        if let Err(e) = self.write_file(&path, body).await {
            tracing::warn!("Failed to write cache file {}: {}", path.display(), e);
        }
    }

    async fn write_file(&self, path: &Path, body: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let _permit = self
            .files
            .acquire()
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        tokio::fs::write(path, body).await
    }
}

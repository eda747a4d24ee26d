// ABOUTME: Filesystem object store used when no remote storage is configured
// ABOUTME: Writes under a root directory and serves URLs below a configured base URL

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::ObjectStore;
use crate::errors::{AppError, AppResult};

/// Object store writing into a local directory
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    /// Create a store rooted at `root` whose files are reachable under `public_base_url`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::storage(format!("Invalid object key: {key}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> AppResult<String> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage(format!("Failed to create photo directory: {e}")))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write photo: {e}")))?;

        debug!(key, content_type, size = bytes.len(), "Stored object locally");
        Ok(format!("{}/{key}", self.public_base_url))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "http://localhost:3001/photos/");

        let url = store
            .put("user-1/1_a.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3001/photos/user-1/1_a.png");
        let written = tokio::fs::read(dir.path().join("user-1/1_a.png")).await.unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn test_put_rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "http://localhost/photos");
        let err = store
            .put("../outside.png", Bytes::new(), "image/png")
            .await
            .unwrap_err();
        assert!(err.code.is_persistence());
    }
}

//! Filesystem-backed mockup store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, instrument};

use super::{validate_key, MockupStore, StorageError, StoredObject};

/// Writes mockups under a root directory
///
/// URLs are `{public_base_url}/{key}` when a base URL is configured,
/// otherwise `file://` URLs of the written paths.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: Option<String>) -> Self {
        LocalStore {
            root: root.into(),
            public_base_url: public_base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    fn url_for(&self, key: &str, path: &Path) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base, key),
            None => format!("file://{}", path.display()),
        }
    }
}

#[async_trait]
impl MockupStore for LocalStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<StoredObject, StorageError> {
        validate_key(key)?;

        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "Stored mockup");

        Ok(StoredObject {
            key: key.to_string(),
            url: self.url_for(key, &path),
            size: bytes.len(),
        })
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("mockup-store-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_put_writes_file_and_builds_public_url() {
        let root = temp_root();
        let store = LocalStore::new(&root, Some("https://cdn.example.com/mockups/".to_string()));

        let stored = tokio_test::block_on(store.put(
            "generated/2024-01-01/abc/gallery_mockup.png",
            Bytes::from_static(b"png-bytes"),
            "image/png",
        ))
        .unwrap();

        let written = std::fs::read(root.join("generated/2024-01-01/abc/gallery_mockup.png")).unwrap();
        std::fs::remove_dir_all(&root).ok();

        assert_eq!(written, b"png-bytes");
        assert_eq!(stored.size, 9);
        assert_eq!(
            stored.url,
            "https://cdn.example.com/mockups/generated/2024-01-01/abc/gallery_mockup.png"
        );
    }

    #[test]
    fn test_put_without_base_url_returns_file_url() {
        let root = temp_root();
        let store = LocalStore::new(&root, None);

        let stored = tokio_test::block_on(store.put("a/b.png", Bytes::from_static(b"x"), "image/png")).unwrap();
        std::fs::remove_dir_all(&root).ok();

        assert!(stored.url.starts_with("file://"));
        assert!(stored.url.ends_with("b.png"));
    }

    #[test]
    fn test_put_rejects_traversal() {
        let store = LocalStore::new(temp_root(), None);
        let result = tokio_test::block_on(store.put("../escape.png", Bytes::new(), "image/png"));
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}

//! Object storage for cover images.
//!
//! [`ObjectStorage`] is the seam handlers talk to. [`LocalObjectStorage`]
//! writes each bucket as a directory under a root path; the router serves
//! that root at `/storage`, so a stored object is reachable at
//! `{public_url}/storage/{bucket}/{key}`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

/// URL path the storage root is served under.
pub const STORAGE_ROUTE: &str = "/storage";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Bucket or key contains a path separator or a parent reference.
    #[error("invalid object path '{0}'")]
    InvalidPath(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Upload and delete objects addressed by `(bucket, key)`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` and return the object's public URL. An existing
    /// object under the same key is replaced.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Delete an object. Deleting a missing object succeeds.
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError>;
}

/// Filesystem-backed [`ObjectStorage`].
pub struct LocalObjectStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: PathBuf, public_url: impl Into<String>) -> Self {
        Self {
            root,
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL of an object, whether or not it exists yet.
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}{STORAGE_ROUTE}/{bucket}/{key}", self.public_url)
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StorageError> {
        check_segment(bucket)?;
        check_segment(key)?;
        Ok(self.root.join(bucket).join(key))
    }
}

fn check_segment(segment: &str) -> Result<(), StorageError> {
    if segment.is_empty()
        || segment == "."
        || segment.contains("..")
        || segment.contains(['/', '\\'])
    {
        return Err(StorageError::InvalidPath(segment.to_string()));
    }
    Ok(())
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError> {
        let path = self.object_path(bucket, key)?;
        fs::create_dir_all(self.root.join(bucket)).await?;
        fs::write(&path, bytes).await?;
        tracing::debug!(bucket, key, content_type, size = bytes.len(), "Object stored");
        Ok(self.public_url(bucket, key))
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        let path = self.object_path(bucket, key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn upload_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path().to_path_buf(), "http://cdn.test/");

        let url = storage
            .upload("covers", "7_1700000000000.png", b"png-bytes", "image/png")
            .await
            .unwrap();

        assert_eq!(url, "http://cdn.test/storage/covers/7_1700000000000.png");
        let stored = std::fs::read(dir.path().join("covers/7_1700000000000.png")).unwrap();
        assert_eq!(stored, b"png-bytes");
    }

    #[tokio::test]
    async fn delete_removes_file_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path().to_path_buf(), "http://cdn.test");
        storage
            .upload("covers", "a.jpg", b"x", "image/jpeg")
            .await
            .unwrap();

        storage.delete("covers", "a.jpg").await.unwrap();
        assert!(!dir.path().join("covers/a.jpg").exists());
        storage.delete("covers", "a.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn traversal_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path().to_path_buf(), "http://cdn.test");

        assert_matches!(
            storage.upload("covers", "../escape.png", b"x", "image/png").await,
            Err(StorageError::InvalidPath(_))
        );
        assert_matches!(
            storage.delete("../etc", "passwd").await,
            Err(StorageError::InvalidPath(_))
        );
    }
}

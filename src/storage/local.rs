use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;

use super::{StorageBackend, StorageError, StoredObject};

/// URL prefix the router serves the uploads directory under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Stores uploads as plain files in one directory.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn put(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(key), &data).await?;

        Ok(StoredObject {
            key: key.to_string(),
            url: format!("{}/{}", PUBLIC_PREFIX, key),
            provider_id: None,
        })
    }

    async fn delete(&self, object: &StoredObject) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.root.join(&object.key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_writes_file_and_returns_public_url() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(tmp.path().join("uploads"));

        let object = storage
            .put("20250101_120000_ab12cd34_lab.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();

        assert_eq!(object.url, "/uploads/20250101_120000_ab12cd34_lab.png");
        assert!(object.provider_id.is_none());
        let written = std::fs::read(storage.root().join(&object.key)).unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn delete_removes_file_and_tolerates_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let object = storage
            .put("a.gif", Bytes::from_static(b"gif"), "image/gif")
            .await
            .unwrap();
        storage.delete(&object).await.unwrap();
        assert!(!tmp.path().join("a.gif").exists());

        storage.delete(&object).await.unwrap();
    }

    #[test]
    fn keys_are_not_namespaced() {
        let storage = LocalStorage::new("/tmp");
        assert_eq!(storage.key_for("x.jpg", 3, "kegiatan"), "x.jpg");
    }
}

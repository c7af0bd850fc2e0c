mod image_host;
mod local;

use async_trait::async_trait;
use bytes::Bytes;

pub use self::image_host::ImageHostStorage;
pub use self::local::{LocalStorage, PUBLIC_PREFIX};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("no storage backend is configured")]
    NotConfigured,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image host rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unexpected response from image host: {0}")]
    InvalidResponse(String),
}

/// Where a stored image ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    /// Public URL the gallery links to
    pub url: String,
    /// Identifier assigned by a remote provider, if any
    pub provider_id: Option<String>,
}

/// A place to put uploaded image bytes.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Storage key for a file. `base` is already unique and path-safe.
    fn key_for(&self, base: &str, _user_id: i64, _category: &str) -> String {
        base.to_string()
    }

    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    async fn delete(&self, object: &StoredObject) -> Result<(), StorageError>;
}

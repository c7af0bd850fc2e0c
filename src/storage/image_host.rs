use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{StorageBackend, StorageError, StoredObject};

/// Remote image host reached over HTTP.
///
/// Uploads are a multipart POST carrying `file` and `public_id`, answered
/// with `{"url": ..., "id": ...}`. Deletes go to `DELETE <upload_url>/<id>`.
pub struct ImageHostStorage {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
    id: String,
}

impl ImageHostStorage {
    pub fn new(client: reqwest::Client, upload_url: &str, api_key: &str) -> Self {
        Self {
            client,
            upload_url: upload_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StorageError::Rejected {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl StorageBackend for ImageHostStorage {
    fn name(&self) -> &'static str {
        "image-host"
    }

    fn key_for(&self, base: &str, user_id: i64, category: &str) -> String {
        format!("portfolio/{}/{}/{}", user_id, category, base)
    }

    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let file_name = key.rsplit('/').next().unwrap_or(key).to_string();
        let part = Part::bytes(data.to_vec())
            .file_name(file_name)
            .mime_str(content_type)?;
        let form = Form::new()
            .text("public_id", key.to_string())
            .part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;

        tracing::debug!("Image host stored {} as {}", key, uploaded.id);
        Ok(StoredObject {
            key: key.to_string(),
            url: uploaded.url,
            provider_id: Some(uploaded.id),
        })
    }

    async fn delete(&self, object: &StoredObject) -> Result<(), StorageError> {
        let id = object.provider_id.as_deref().unwrap_or(&object.key);
        let response = self
            .client
            .delete(format!("{}/{}", self.upload_url, id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

use bytes::Bytes;
use chrono::Local;
use rusqlite::{params, TransactionBehavior};

use crate::db::models::Photo;
use crate::error::{AppError, AppResult};
use crate::services::ensure_user;
use crate::services::gallery::fetch_photo;
use crate::state::DbPool;
use crate::storage::{StorageBackend, StorageError, StoredObject};

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];
pub const DEFAULT_CATEGORY: &str = "general";
pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_CATEGORY_CHARS: usize = 50;

/// An image and its metadata as received from the upload form.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub user_id: i64,
}

/// Lowercased extension of `file_name` if it is one we accept.
pub fn allowed_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Reduce a user-supplied name to ASCII letters, digits, `-`, `_` and `.`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// `YYYYmmdd_HHMMSS_<8 random hex>_<stem>.<ext>`
fn unique_base(stem: &str, ext: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let uuid = uuid::Uuid::now_v7().simple().to_string();
    let suffix = &uuid[uuid.len() - 8..];
    format!("{}_{}_{}.{}", timestamp, suffix, stem, ext)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate an upload, hand the bytes to storage and record the photo.
///
/// Nothing is stored or written until every field has been checked. If the
/// row cannot be written the stored object is deleted again.
pub async fn upload_photo(
    pool: &DbPool,
    backend: Option<&dyn StorageBackend>,
    upload: PhotoUpload,
) -> AppResult<Photo> {
    let file_name = upload.file_name.trim();
    if file_name.is_empty() {
        return Err(AppError::BadRequest("No file selected".into()));
    }
    let ext = allowed_extension(file_name).ok_or_else(|| {
        AppError::BadRequest("Unsupported file type. Use PNG, JPG, JPEG or GIF".into())
    })?;
    if upload.data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| sanitize_filename(stem))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "photo".to_string());
    let display_name = format!("{}.{}", stem, ext);

    let title = non_empty(upload.title).unwrap_or_else(|| display_name.clone());
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::BadRequest(format!(
            "Title must be {} characters or less",
            MAX_TITLE_CHARS
        )));
    }
    let category = non_empty(upload.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    if category.chars().count() > MAX_CATEGORY_CHARS {
        return Err(AppError::BadRequest(format!(
            "Category must be {} characters or less",
            MAX_CATEGORY_CHARS
        )));
    }
    let description = non_empty(upload.description);

    {
        let conn = pool.get()?;
        ensure_user(&conn, upload.user_id)?;
    }

    let backend = backend.ok_or(StorageError::NotConfigured)?;

    let category_segment = match sanitize_filename(&category) {
        s if s.is_empty() => DEFAULT_CATEGORY.to_string(),
        s => s,
    };
    let key = backend.key_for(&unique_base(&stem, &ext), upload.user_id, &category_segment);
    let content_type = upload.content_type.unwrap_or_else(|| {
        mime_guess::from_path(&display_name)
            .first_or_octet_stream()
            .to_string()
    });

    let stored = backend.put(&key, upload.data, &content_type).await?;
    tracing::info!(
        "Stored {} via {} for student {}",
        stored.key,
        backend.name(),
        upload.user_id
    );

    let recorded = record_photo(
        pool,
        &stored,
        upload.user_id,
        &title,
        description.as_deref(),
        &category,
    );

    match recorded {
        Ok(photo) => Ok(photo),
        Err(e) => {
            if let Err(cleanup) = backend.delete(&stored).await {
                tracing::warn!("Could not remove orphaned upload {}: {}", stored.key, cleanup);
            }
            Err(e)
        }
    }
}

fn record_photo(
    pool: &DbPool,
    stored: &StoredObject,
    user_id: i64,
    title: &str,
    description: Option<&str>,
    category: &str,
) -> AppResult<Photo> {
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "INSERT INTO photos (user_id, storage_key, url, provider_id, title, description, category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            stored.key,
            stored.url,
            stored.provider_id,
            title,
            description,
            category
        ],
    )?;
    let photo = fetch_photo(&tx, tx.last_insert_rowid())?;
    tx.commit()?;

    Ok(photo)
}

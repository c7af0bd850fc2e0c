use askama::Template;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::catalog::{self, ClassInfo};
use crate::db::models::{Photo, User};
use crate::error::{AppError, AppResult};
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::routes::home::Html;
use crate::services::gallery::{self, ALL_CATEGORIES};
use crate::services::students::list_students;
use crate::services::upload::{upload_photo, PhotoUpload};
use crate::state::AppState;

// --- View structs ---

pub struct PhotoCard {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub url: String,
    pub uploader_name: String,
    pub category: String,
    pub uploaded_at: String,
    pub likes_count: i64,
    pub comments_count: i64,
}

impl From<Photo> for PhotoCard {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            title: photo.title,
            description: photo.description.unwrap_or_default(),
            url: photo.url,
            uploader_name: photo.uploader_name,
            category: photo.category,
            uploaded_at: photo.uploaded_at,
            likes_count: photo.likes_count,
            comments_count: photo.comments_count,
        }
    }
}

// --- Templates ---

#[derive(Template)]
#[template(path = "pages/gallery.html")]
pub struct GalleryTemplate {
    pub class: &'static ClassInfo,
    pub photos: Vec<PhotoCard>,
    pub students: Vec<User>,
    pub categories: Vec<String>,
    pub current_category: String,
}

// --- Requests ---

#[derive(Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct DeletePhotoRequest {
    pub user_id: i64,
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/gallery", get(gallery_page))
        .route("/upload", post(upload))
        .route("/api/photos", get(list_photos))
        .route("/api/photos/{id}", get(get_photo).delete(delete_photo))
        .route("/api/categories", get(list_categories))
}

// --- Handlers ---

async fn gallery_page(
    State(state): State<AppState>,
    query: Result<ApiQuery<CategoryQuery>, AppError>,
) -> AppResult<Html<GalleryTemplate>> {
    // A malformed query just shows everything
    let current_category = query
        .ok()
        .and_then(|ApiQuery(q)| q.category)
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());

    let photos = gallery::list_photos(&state.db, Some(&current_category))?
        .into_iter()
        .map(PhotoCard::from)
        .collect();
    let students = list_students(&state.db)?;
    let categories = gallery::categories(&state.db)?;

    Ok(Html(GalleryTemplate {
        class: &catalog::CLASS,
        photos,
        students,
        categories,
        current_category,
    }))
}

async fn list_photos(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> AppResult<Json<Value>> {
    let photos = gallery::list_photos(&state.db, query.category.as_deref())?;
    Ok(Json(json!({ "status": "success", "photos": photos })))
}

async fn get_photo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Value>> {
    let photo = gallery::get_photo(&state.db, id)?;
    Ok(Json(json!({ "status": "success", "photo": photo })))
}

async fn delete_photo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<DeletePhotoRequest>,
) -> AppResult<Json<Value>> {
    gallery::delete_photo(&state.db, state.storage(), id, req.user_id).await?;
    Ok(Json(json!({ "status": "success", "message": "Photo deleted" })))
}

async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let categories = gallery::categories(&state.db)?;
    Ok(Json(
        json!({ "status": "success", "categories": categories }),
    ))
}

async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<Value>> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut file: Option<(String, Option<String>, Bytes)> = None;
    let mut title = None;
    let mut description = None;
    let mut category = None;
    let mut user_id = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photo" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                file = Some((file_name, content_type, data));
            }
            "title" => title = Some(field.text().await?),
            "description" => description = Some(field.text().await?),
            "category" => category = Some(field.text().await?),
            "user_id" => user_id = Some(field.text().await?),
            other => tracing::debug!("Ignoring upload field {:?}", other),
        }
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("No file selected".into()))?;
    let user_id = user_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("user_id is required".into()))?
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest("user_id must be a number".into()))?;

    let photo = upload_photo(
        &state.db,
        state.storage(),
        PhotoUpload {
            file_name,
            content_type,
            data,
            title,
            description,
            category,
            user_id,
        },
    )
    .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Photo uploaded",
        "photo": photo,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(categories: &[&str], current: &str) -> String {
        GalleryTemplate {
            class: &catalog::CLASS,
            photos: Vec::new(),
            students: Vec::new(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            current_category: current.to_string(),
        }
        .render()
        .unwrap()
    }

    #[test]
    fn category_links_are_url_encoded() {
        let body = page(&["lab & praktik", "a+b#c"], "all");
        assert!(body.contains(r#"href="/gallery?category=lab%20%26%20praktik""#));
        assert!(body.contains(r#"href="/gallery?category=a%2Bb%23c""#));
        assert!(body.contains(">lab &amp; praktik</a>"));
    }

    #[test]
    fn current_category_is_marked_active() {
        let body = page(&["kegiatan", "praktikum"], "praktikum");
        assert!(body.contains(r#"href="/gallery?category=praktikum" class="active""#));
        assert!(!body.contains(r#"href="/gallery?category=kegiatan" class="active""#));
    }
}

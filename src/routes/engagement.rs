use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::services::engagement;
use crate::state::AppState;

// --- Requests ---

#[derive(Deserialize)]
pub struct LikeRequest {
    pub user_id: i64,
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub user_id: i64,
    #[serde(default)]
    pub comment: String,
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/like/{id}", get(like_status).post(toggle_like))
        .route("/comment/{id}", post(add_comment))
        .route("/comments/{id}", get(list_comments))
}

// --- Handlers ---

async fn toggle_like(
    State(state): State<AppState>,
    ApiPath(photo_id): ApiPath<i64>,
    ApiJson(req): ApiJson<LikeRequest>,
) -> AppResult<Json<Value>> {
    let outcome = engagement::toggle_like(&state.db, photo_id, req.user_id)?;
    Ok(Json(json!({
        "status": "success",
        "action": outcome.action,
        "likes_count": outcome.likes_count,
    })))
}

async fn like_status(
    State(state): State<AppState>,
    ApiPath(photo_id): ApiPath<i64>,
    ApiQuery(req): ApiQuery<LikeRequest>,
) -> AppResult<Json<Value>> {
    let status = engagement::like_status(&state.db, photo_id, req.user_id)?;
    Ok(Json(json!({
        "status": "success",
        "liked": status.liked,
        "likes_count": status.likes_count,
    })))
}

async fn add_comment(
    State(state): State<AppState>,
    ApiPath(photo_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CommentRequest>,
) -> AppResult<Json<Value>> {
    let comment = engagement::add_comment(&state.db, photo_id, req.user_id, &req.comment)?;
    Ok(Json(json!({
        "status": "success",
        "message": "Comment added",
        "comment": comment,
    })))
}

async fn list_comments(
    State(state): State<AppState>,
    ApiPath(photo_id): ApiPath<i64>,
) -> AppResult<Json<Value>> {
    let comments = engagement::list_comments(&state.db, photo_id)?;
    Ok(Json(json!({ "status": "success", "comments": comments })))
}

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub external_id: Option<String>,
    pub name: String,
    pub nickname: String,
    pub created_at: String,
}

/// A gallery photo as read back for display, with the uploader's name and
/// the comment count filled in at query time.
#[derive(Debug, Clone, Serialize)]
pub struct Photo {
    pub id: i64,
    pub user_id: i64,
    pub uploader_name: String,
    pub storage_key: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub uploaded_at: String,
    pub likes_count: i64,
    pub comments_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: i64,
    pub photo_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub body: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Liked,
    Unliked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeOutcome {
    pub action: LikeAction,
    pub likes_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub likes_count: i64,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A mirrored post. Ids come from the external feed, not from a local
/// sequence.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub body: String,
}

/// A post as served by the external feed.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalPost {
    pub id: i32,
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostsListResponse {
    pub posts_count: usize,
    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostsDeletedResponse {
    pub message: String,
}

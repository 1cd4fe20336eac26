use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

use super::model::{PostsDeletedResponse, PostsListResponse};
use super::service::PostsService;

/// Fetch posts from the external feed and save them
#[utoipa::path(
    get,
    path = "/api/posts/external",
    responses(
        (status = 200, description = "Posts saved", body = PostsListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Posts"
)]
#[instrument(skip(state, _auth_user))]
pub async fn sync_posts(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<PostsListResponse>, AppError> {
    let posts = PostsService::sync_posts(&state.db, &state.http, &state.posts_config).await?;
    Ok(Json(PostsListResponse {
        posts_count: posts.len(),
        posts,
    }))
}

/// Get mirrored posts
#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "Posts retrieved", body = PostsListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Posts"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_posts(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<PostsListResponse>, AppError> {
    let posts = PostsService::get_posts(&state.db).await?;
    Ok(Json(PostsListResponse {
        posts_count: posts.len(),
        posts,
    }))
}

/// Delete all mirrored posts
#[utoipa::path(
    delete,
    path = "/api/posts",
    responses(
        (status = 200, description = "Posts deleted", body = PostsDeletedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Posts"
)]
#[instrument(skip(state, _auth_user))]
pub async fn delete_posts(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<PostsDeletedResponse>, AppError> {
    PostsService::delete_posts(&state.db).await?;
    Ok(Json(PostsDeletedResponse {
        message: "All posts deleted from database".to_string(),
    }))
}

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    ChangeEmailRequest, ChangePasswordRequest, MessageResponse, User, UsersListResponse,
};
use super::service::UserService;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Get user by email
#[utoipa::path(
    get,
    path = "/api/users/get-by-email",
    params(("email" = String, Query, description = "Email of the user")),
    responses(
        (status = 200, description = "Retrieved user by email", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User with such email not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<EmailQuery>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user_by_email(&state.db, &query.email).await?;
    Ok(Json(user))
}

/// Get user by id
#[utoipa::path(
    get,
    path = "/api/users/get-by-id/{id}",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "Retrieved user by id", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User with such id not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user_by_id(&state.db, id).await?;
    Ok(Json(user))
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/users/get-all",
    responses(
        (status = 200, description = "Retrieved all users", body = UsersListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_all_users(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<UsersListResponse>, AppError> {
    let users = UserService::get_all_users(&state.db).await?;
    Ok(Json(UsersListResponse {
        amount: users.len(),
        users,
    }))
}

/// Change the authenticated user's email
#[utoipa::path(
    put,
    path = "/api/users/change-email",
    request_body = ChangeEmailRequest,
    responses(
        (status = 200, description = "User email changed", body = User),
        (status = 400, description = "Enter a new email", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "User with such email already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn change_user_email(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangeEmailRequest>,
) -> Result<Json<User>, AppError> {
    let user = UserService::change_user_email(&state.db, auth_user.user_id(), dto).await?;
    Ok(Json(user))
}

/// Change the authenticated user's password
#[utoipa::path(
    put,
    path = "/api/users/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "User password changed", body = User),
        (status = 400, description = "Wrong old password", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn change_user_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<User>, AppError> {
    let user = UserService::change_user_password(
        &state.db,
        &state.password_config,
        auth_user.user_id(),
        dto,
    )
    .await?;
    Ok(Json(user))
}

/// Delete the authenticated user
#[utoipa::path(
    delete,
    path = "/api/users/delete",
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::delete_user(&state.db, auth_user.user_id()).await?;
    Ok(Json(MessageResponse {
        message: "User deleted".to_string(),
    }))
}

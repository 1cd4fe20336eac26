use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::User;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    LoginRequest, LoginResponse, LogoutResponse, RefreshRequest, RefreshResponse, RegisterRequest,
};
use super::service::AuthService;

#[derive(serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "New user registered", body = User),
        (status = 409, description = "User with such email already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = AuthService::register_user(&state.db, &state.password_config, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login as user
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in as user", body = LoginResponse),
        (status = 400, description = "Wrong email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Logout the authenticated user
#[utoipa::path(
    delete,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "User logged out", body = LogoutResponse),
        (status = 400, description = "This user is not logged in", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, auth_user))]
pub async fn logout_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<LogoutResponse>, AppError> {
    let user_id = auth_user.user_id();
    AuthService::logout_user(&state.db, user_id).await?;
    Ok(Json(LogoutResponse {
        user_id,
        message: "User logged out".to_string(),
    }))
}

/// Refresh the access token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Access token refreshed", body = RefreshResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh_access_token(
    State(state): State<AppState>,
    Json(dto): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    if dto.refresh_token.is_empty() {
        return Err(AppError::unauthorized(anyhow::anyhow!(
            "Refresh token is required"
        )));
    }

    let access_token =
        AuthService::refresh_access_token(&state.db, &dto.refresh_token, &state.jwt_config).await?;
    Ok(Json(RefreshResponse { access_token }))
}

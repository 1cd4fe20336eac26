use axum::http::StatusCode;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::config::password::PasswordConfig;
use crate::modules::users::model::User;
use crate::utils::errors::AppError;
use crate::utils::jwt::{create_access_token, create_refresh_token, verify_refresh_token};
use crate::utils::password::{hash_password, verify_password};

use super::model::{LoginRequest, LoginResponse, RegisterRequest, TokenRecord};
use super::repository::{TokenKind, TokenRepository};

#[derive(sqlx::FromRow)]
struct UserWithPassword {
    id: Uuid,
    email: String,
    password: String,
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto))]
    pub async fn register_user(
        db: &PgPool,
        password_config: &PasswordConfig,
        dto: RegisterRequest,
    ) -> Result<User, AppError> {
        let existing_user = sqlx::query_as::<_, User>(
            "SELECT id, email, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?;

        if existing_user.is_some() {
            return Err(AppError::conflict(anyhow::anyhow!(
                "User with such email already exists"
            )));
        }

        let hashed_password = hash_password(&dto.password, password_config)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password)
             VALUES ($1, $2)
             RETURNING id, email, created_at, updated_at",
        )
        .bind(&dto.email)
        .bind(&hashed_password)
        .fetch_one(db)
        .await?;

        info!(user_id = %user.id, "New user registered");
        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let user = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, email, password FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Wrong email or password")))?;

        let is_valid = verify_password(&dto.password, &user.password)?;
        if !is_valid {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Wrong email or password"
            )));
        }

        // Single active session: a second login replaces the first one. A
        // concurrent logout may have already cleared the rows, which is fine.
        if Self::is_logged_in(db, user.id).await? {
            if let Err(e) = Self::logout_user(db, user.id).await {
                if e.status != StatusCode::BAD_REQUEST {
                    return Err(e);
                }
            }
        }

        let access_token = create_access_token(user.id, &user.email, jwt_config)?;
        let refresh_token = create_refresh_token(user.id, jwt_config)?;

        let now = Utc::now();
        TokenRepository::save(
            db,
            TokenKind::Access,
            user.id,
            &access_token,
            now + Duration::seconds(jwt_config.access_token_expiry),
        )
        .await?;
        TokenRepository::save(
            db,
            TokenKind::Refresh,
            user.id,
            &refresh_token,
            now + Duration::seconds(jwt_config.refresh_token_expiry),
        )
        .await?;

        info!(user_id = %user.id, email = %user.email, "Signed in as user");
        Ok(LoginResponse {
            id: user.id,
            email: user.email,
            access_token,
            refresh_token,
        })
    }

    #[instrument(skip(db))]
    pub async fn logout_user(db: &PgPool, user_id: Uuid) -> Result<(), AppError> {
        for kind in [TokenKind::Access, TokenKind::Refresh] {
            TokenRepository::delete_by_user_id(db, kind, user_id)
                .await
                .map_err(|e| {
                    if e.status == StatusCode::NOT_FOUND {
                        warn!(user_id = %user_id, "Failed to logout: user is not logged in");
                        AppError::bad_request(anyhow::anyhow!("This user is not logged in"))
                    } else {
                        e
                    }
                })?;
        }

        info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    #[instrument(skip(db, refresh_token, jwt_config))]
    pub async fn refresh_access_token(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<String, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid refresh token")))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid refresh token")))?;

        // The stored token string must match the submitted one exactly, so a
        // stale but still-unexpired refresh token is rejected after rotation.
        let stored = TokenRepository::find_by_user_id(db, TokenKind::Refresh, user_id).await?;
        match stored {
            Some(record) if record.token == refresh_token => {}
            _ => {
                return Err(AppError::unauthorized(anyhow::anyhow!(
                    "Invalid refresh token"
                )));
            }
        }

        let user = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, email, password FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        let new_access_token = create_access_token(user.id, &user.email, jwt_config)?;
        TokenRepository::save(
            db,
            TokenKind::Access,
            user.id,
            &new_access_token,
            Utc::now() + Duration::seconds(jwt_config.access_token_expiry),
        )
        .await?;

        info!(user_id = %user_id, "Access token refreshed");
        Ok(new_access_token)
    }

    /// A user counts as logged in while either token row exists. Deliberately
    /// a plain store lookup: the request guard runs this before any signature
    /// check to short-circuit revoked sessions cheaply.
    #[instrument(skip(db))]
    pub async fn is_logged_in(db: &PgPool, user_id: Uuid) -> Result<bool, AppError> {
        let access = TokenRepository::find_by_user_id(db, TokenKind::Access, user_id).await?;
        if access.is_some() {
            return Ok(true);
        }

        let refresh = TokenRepository::find_by_user_id(db, TokenKind::Refresh, user_id).await?;
        Ok(refresh.is_some())
    }

    pub async fn get_access_token(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<TokenRecord>, AppError> {
        TokenRepository::find_by_user_id(db, TokenKind::Access, user_id).await
    }

    pub async fn get_refresh_token(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<TokenRecord>, AppError> {
        TokenRepository::find_by_user_id(db, TokenKind::Refresh, user_id).await
    }
}

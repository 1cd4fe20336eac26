use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::password::PasswordConfig;
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};

use super::model::{ChangeEmailRequest, ChangePasswordRequest, User};

#[derive(sqlx::FromRow)]
struct UserWithPassword {
    id: Uuid,
    password: String,
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user_by_email(db: &PgPool, email: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with such email not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_user_by_id(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with such id not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_all_users(db: &PgPool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, created_at, updated_at FROM users ORDER BY created_at",
        )
        .fetch_all(db)
        .await?;

        Ok(users)
    }

    #[instrument(skip(db, dto))]
    pub async fn change_user_email(
        db: &PgPool,
        user_id: Uuid,
        dto: ChangeEmailRequest,
    ) -> Result<User, AppError> {
        let user = Self::get_user_by_id(db, user_id).await?;

        if user.email == dto.new_email {
            return Err(AppError::bad_request(anyhow::anyhow!("Enter a new email")));
        }

        let email_taken = sqlx::query_as::<_, User>(
            "SELECT id, email, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(&dto.new_email)
        .fetch_optional(db)
        .await?;
        if email_taken.is_some() {
            return Err(AppError::conflict(anyhow::anyhow!(
                "User with such email already exists"
            )));
        }

        let updated = sqlx::query_as::<_, User>(
            "UPDATE users SET email = $1, updated_at = NOW() WHERE id = $2
             RETURNING id, email, created_at, updated_at",
        )
        .bind(&dto.new_email)
        .bind(user_id)
        .fetch_one(db)
        .await?;

        info!(user_id = %user_id, old_email = %user.email, new_email = %updated.email, "User email changed");
        Ok(updated)
    }

    #[instrument(skip(db, password_config, dto))]
    pub async fn change_user_password(
        db: &PgPool,
        password_config: &PasswordConfig,
        user_id: Uuid,
        dto: ChangePasswordRequest,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, password FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if !verify_password(&dto.old_password, &user.password)? {
            return Err(AppError::bad_request(anyhow::anyhow!("Wrong old password")));
        }

        if verify_password(&dto.new_password, &user.password)? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Enter a new password"
            )));
        }

        let hashed = hash_password(&dto.new_password, password_config)?;

        let updated = sqlx::query_as::<_, User>(
            "UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2
             RETURNING id, email, created_at, updated_at",
        )
        .bind(&hashed)
        .bind(user.id)
        .fetch_one(db)
        .await?;

        info!(user_id = %user_id, "User password changed");
        Ok(updated)
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, user_id: Uuid) -> Result<(), AppError> {
        let user = Self::get_user_by_id(db, user_id).await?;

        // Token rows cascade with the user, ending any active session.
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(db)
            .await?;

        info!(user_id = %user.id, email = %user.email, "User deleted");
        Ok(())
    }
}

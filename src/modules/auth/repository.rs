use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::model::TokenRecord;
use crate::utils::errors::AppError;

/// Which of the two token tables an operation targets. The tables are
/// schema-identical; the kind only selects the table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn table(self) -> &'static str {
        match self {
            TokenKind::Access => "access_tokens",
            TokenKind::Refresh => "refresh_tokens",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Persistence for token records, keyed by user id. Exclusively owns the
/// `access_tokens` and `refresh_tokens` tables; at most one row per user and
/// kind exists at any time.
pub struct TokenRepository;

impl TokenRepository {
    /// Stores a token for a user, replacing any existing row of the same
    /// kind. The replace is a single atomic upsert on `user_id`, so two
    /// concurrent saves cannot leave a user with zero or two rows.
    pub async fn save(
        db: &PgPool,
        kind: TokenKind,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<TokenRecord, AppError> {
        let query = format!(
            "INSERT INTO {table} (user_id, token, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE
                 SET token = EXCLUDED.token,
                     expires_at = EXCLUDED.expires_at,
                     created_at = NOW()
             RETURNING id, user_id, token, expires_at, created_at",
            table = kind.table()
        );

        sqlx::query_as::<_, TokenRecord>(&query)
            .bind(user_id)
            .bind(token)
            .bind(expires_at)
            .fetch_one(db)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                    AppError::conflict(anyhow::anyhow!(
                        "Such {} token already exists",
                        kind.label()
                    ))
                }
                _ => e.into(),
            })
    }

    pub async fn delete_by_user_id(
        db: &PgPool,
        kind: TokenKind,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let query = format!("DELETE FROM {table} WHERE user_id = $1", table = kind.table());

        let result = sqlx::query(&query).bind(user_id).execute(db).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Token not found")));
        }

        Ok(())
    }

    pub async fn find_by_user_id(
        db: &PgPool,
        kind: TokenKind,
        user_id: Uuid,
    ) -> Result<Option<TokenRecord>, AppError> {
        let query = format!(
            "SELECT id, user_id, token, expires_at, created_at FROM {table} WHERE user_id = $1",
            table = kind.table()
        );

        let record = sqlx::query_as::<_, TokenRecord>(&query)
            .bind(user_id)
            .fetch_optional(db)
            .await?;

        Ok(record)
    }

    pub async fn find_all(db: &PgPool, kind: TokenKind) -> Result<Vec<TokenRecord>, AppError> {
        let query = format!(
            "SELECT id, user_id, token, expires_at, created_at FROM {table}",
            table = kind.table()
        );

        let records = sqlx::query_as::<_, TokenRecord>(&query).fetch_all(db).await?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kind_tables() {
        assert_eq!(TokenKind::Access.table(), "access_tokens");
        assert_eq!(TokenKind::Refresh.table(), "refresh_tokens");
    }

    #[test]
    fn test_token_kind_labels() {
        assert_eq!(TokenKind::Access.label(), "access");
        assert_eq!(TokenKind::Refresh.label(), "refresh");
    }
}

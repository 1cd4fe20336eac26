use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Fully verified access token claims. Only produced by signature-checked
/// decoding; this is the identity handlers see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub id: Uuid,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// Refresh token claims. Carries only the subject user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Claims peeked out of a token *without* signature or expiry checks.
/// Deliberately a separate type from [`AccessClaims`]: the only legitimate
/// use is extracting a candidate user id for a store lookup.
#[derive(Debug, Deserialize)]
pub struct UnverifiedClaims {
    pub id: Uuid,
}

/// A stored token row. `access_tokens` and `refresh_tokens` share this shape.
#[derive(Debug, Clone, FromRow)]
pub struct TokenRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub id: Uuid,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub user_id: Uuid,
    pub message: String,
}

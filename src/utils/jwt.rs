use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::{AccessClaims, RefreshClaims, UnverifiedClaims};
use crate::utils::errors::AppError;

/// Verification failure for a signed token. Expiry is a distinct variant
/// because the request guard treats an expired access token as refreshable,
/// while any other failure is terminal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        }
    }
}

pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = AccessClaims {
        id: user_id,
        email: email.to_string(),
        iat: now as usize,
        exp: (now + jwt_config.access_token_expiry) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create access token: {}", e)))
}

pub fn create_refresh_token(user_id: Uuid, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = RefreshClaims {
        sub: user_id.to_string(),
        iat: now as usize,
        exp: (now + jwt_config.refresh_token_expiry) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create refresh token: {}", e)))
}

pub fn verify_access_token(token: &str, jwt_config: &JwtConfig) -> Result<AccessClaims, TokenError> {
    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(TokenError::from)
}

pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshClaims, TokenError> {
    decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(TokenError::from)
}

/// Decodes a token without checking signature or expiry. The result is only
/// good enough to look up the owning user before real verification; it must
/// never be attached to a request as an authenticated identity.
pub fn decode_unverified(token: &str) -> Option<UnverifiedClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    decode::<UnverifiedClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}

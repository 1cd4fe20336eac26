use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, header, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use crate::modules::auth::model::AccessClaims;
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{TokenError, decode_unverified, verify_access_token};

/// Extractor gating every protected handler. Public endpoints simply don't
/// take this extractor.
///
/// Beyond signature verification, a token is only accepted while the user
/// still has a stored session, so logged-out tokens are rejected even though
/// their signature remains valid. An access token that turns out to be
/// expired is rotated in place: the stored refresh token mints a replacement,
/// the request's bearer header is overwritten with it and the handler never
/// observes the expiry.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessClaims);

impl AuthUser {
    pub fn user_id(&self) -> Uuid {
        self.0.id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

pub(crate) fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers)
            .ok_or_else(|| {
                warn!("User is not identified, access token is missing");
                AppError::unauthorized(anyhow::anyhow!("Access token is missing"))
            })?
            .to_owned();

        // Untrusted peek: only good for looking up the candidate session.
        let user_id = decode_unverified(&token)
            .map(|claims| claims.id)
            .ok_or_else(|| {
                warn!("Invalid token format");
                AppError::unauthorized(anyhow::anyhow!("Invalid token format"))
            })?;

        // Cheap store lookup before any signature check; rejects revoked or
        // never-existing sessions without touching crypto.
        if !AuthService::is_logged_in(&state.db, user_id).await? {
            warn!(user_id = %user_id, "User is not logged in");
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "User is not logged in"
            )));
        }

        match verify_access_token(&token, &state.jwt_config) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(TokenError::Expired) => {
                let stored = AuthService::get_refresh_token(&state.db, user_id)
                    .await?
                    .ok_or_else(|| {
                        warn!(user_id = %user_id, "Refresh token is missing");
                        AppError::unauthorized(anyhow::anyhow!("Refresh token is missing"))
                    })?;

                let new_token = AuthService::refresh_access_token(
                    &state.db,
                    &stored.token,
                    &state.jwt_config,
                )
                .await
                .map_err(|e| {
                    warn!(user_id = %user_id, error = %e.error, "Invalid refresh token");
                    AppError::unauthorized(anyhow::anyhow!("Invalid refresh token"))
                })?;

                let claims = verify_access_token(&new_token, &state.jwt_config)
                    .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid access token")))?;

                // The handler sees the rotated token as if the client had sent it.
                if let Ok(value) = HeaderValue::from_str(&format!("Bearer {new_token}")) {
                    parts.headers.insert(header::AUTHORIZATION, value);
                }

                Ok(AuthUser(claims))
            }
            Err(TokenError::Invalid) => {
                warn!(user_id = %user_id, "Invalid access token");
                Err(AppError::unauthorized(anyhow::anyhow!(
                    "Invalid access token"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(extract_bearer(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_bearer_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);
    }

    #[test]
    fn test_extract_bearer_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(extract_bearer(&headers), None);
    }
}

use bcrypt::{hash, verify};

use crate::config::password::PasswordConfig;
use crate::utils::errors::AppError;

/// Hashes a password with the configured bcrypt cost. A missing or
/// non-numeric `PASSWORD_SALT_ROUNDS` is a configuration error and fails
/// here, at hashing time, so registration and password changes surface it
/// while plain verification keeps working.
pub fn hash_password(password: &str, config: &PasswordConfig) -> Result<String, AppError> {
    let cost = config.cost()?;
    hash(password, cost)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to verify password: {}", e)))
}

use std::env;

use crate::utils::errors::AppError;

/// Bcrypt cost configuration. The raw environment value is kept as-is and
/// only parsed when a hash is actually computed, so a misconfigured cost
/// factor fails registration and password changes but not login verification.
#[derive(Clone, Debug)]
pub struct PasswordConfig {
    pub salt_rounds: Option<String>,
}

impl PasswordConfig {
    pub fn from_env() -> Self {
        Self {
            salt_rounds: env::var("PASSWORD_SALT_ROUNDS").ok(),
        }
    }

    pub fn cost(&self) -> Result<u32, AppError> {
        let raw = self.salt_rounds.as_deref().ok_or_else(|| {
            AppError::internal(anyhow::anyhow!("PASSWORD_SALT_ROUNDS is not configured"))
        })?;

        raw.parse().map_err(|_| {
            AppError::internal(anyhow::anyhow!(
                "PASSWORD_SALT_ROUNDS must be a valid number"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_parses_numeric_value() {
        let config = PasswordConfig {
            salt_rounds: Some("10".to_string()),
        };
        assert_eq!(config.cost().unwrap(), 10);
    }

    #[test]
    fn test_cost_missing_is_error() {
        let config = PasswordConfig { salt_rounds: None };
        assert!(config.cost().is_err());
    }

    #[test]
    fn test_cost_non_numeric_is_error() {
        let config = PasswordConfig {
            salt_rounds: Some("ten".to_string()),
        };
        assert!(config.cost().is_err());
    }
}

use super::jwt::TOKEN_TTL;
use core_config::{ConfigError, FromEnv, env_or_default, env_required};

const MIN_SECRET_LEN: usize = 32;

/// JWT authentication configuration.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required) - at least 32 characters
/// - `JWT_TTL_SECS` (optional) - token lifetime, defaults to 24 hours
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: String,
    /// Token lifetime in seconds
    pub ttl_seconds: i64,
}

impl JwtConfig {
    /// Create a JwtConfig with the default token lifetime.
    ///
    /// # Panics
    /// Panics if the secret is shorter than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= MIN_SECRET_LEN,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            ttl_seconds: TOKEN_TTL,
        }
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        let ttl_seconds = env_or_default("JWT_TTL_SECS", &TOKEN_TTL.to_string())
            .parse::<i64>()
            .ok()
            .filter(|ttl| *ttl > 0)
            .ok_or_else(|| ConfigError::ParseError {
                key: "JWT_TTL_SECS".to_string(),
                details: "must be a positive number of seconds".to_string(),
            })?;

        Ok(Self {
            secret,
            ttl_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    fn test_jwt_config_new_valid() {
        let config = JwtConfig::new(SECRET);
        assert_eq!(config.secret, SECRET);
        assert_eq!(config.ttl_seconds, TOKEN_TTL);
    }

    #[test]
    #[should_panic(expected = "JWT secret must be at least 32 characters")]
    fn test_jwt_config_new_too_short() {
        JwtConfig::new("short");
    }

    #[test]
    fn test_jwt_config_from_env_valid() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_TTL_SECS", None::<&str>)],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, SECRET);
                assert_eq!(config.ttl_seconds, 86_400);
            },
        );
    }

    #[test]
    fn test_jwt_config_custom_ttl() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_TTL_SECS", Some("60"))],
            || {
                assert_eq!(JwtConfig::from_env().unwrap().ttl_seconds, 60);
            },
        );
    }

    #[test]
    fn test_jwt_config_invalid_ttl() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_TTL_SECS", Some("-5"))],
            || {
                let err = JwtConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_TTL_SECS"));
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_missing() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_jwt_config_from_env_too_short() {
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("32 characters"));
        });
    }
}

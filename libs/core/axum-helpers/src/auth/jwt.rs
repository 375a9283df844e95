use super::config::JwtConfig;
use crate::errors::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Bearer token lifetime in seconds (24 hours)
pub const TOKEN_TTL: i64 = 86_400;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // Subject (user ID)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
    pub jti: String, // JWT ID
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token is missing")]
    MissingToken,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing(msg) => {
                tracing::error!("Token signing failed: {}", msg);
                AppError::InternalServerError("An internal error occurred".to_string())
            }
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

/// Stateless HS256 token issuer and verifier.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!("JWT auth initialized");
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl_seconds: config.ttl_seconds,
        }
    }

    /// Override the token lifetime.
    pub fn with_ttl(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Issue a signed token whose subject is `subject`.
    pub fn issue_token(&self, subject: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject.to_string(),
            exp: (now + Duration::seconds(self.ttl_seconds)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        decode::<JwtClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid,
            })
    }
}

//! Authentication module.
//!
//! Stateless HS256 bearer tokens:
//! - [`JwtAuth`] issues and verifies tokens
//! - [`jwt_auth_middleware`] guards routes and exposes the caller as [`AuthUser`]
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/api/protected", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

// Re-export commonly used types
pub use config::JwtConfig;
pub use jwt::{AuthError, JwtAuth, JwtClaims, TOKEN_TTL};
pub use middleware::{AuthUser, jwt_auth_middleware};

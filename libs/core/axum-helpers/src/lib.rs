//! # Axum Helpers
//!
//! Shared HTTP plumbing for the API services.
//!
//! ## Modules
//!
//! - **[`auth`]**: stateless JWT bearer authentication
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: structured error responses with error codes
//! - **[`extractors`]**: validated JSON bodies
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = create_router::<ApiDoc>(Router::new())?;
//!     let server = ServerConfig::default();
//!     create_production_app(router, &server, server.shutdown_timeout(), async {}).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

// Re-export auth types
pub use auth::{AuthError, AuthUser, JwtAuth, JwtClaims, JwtConfig, TOKEN_TTL, jwt_auth_middleware};

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

// Re-export HTTP middleware
pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse};

// Re-export extractors
pub use extractors::ValidatedJson;

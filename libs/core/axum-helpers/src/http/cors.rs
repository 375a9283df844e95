use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Parse a comma-separated origin list (`CORS_ALLOWED_ORIGIN` format).
pub fn parse_allowed_origins(origins: &str) -> io::Result<Vec<HeaderValue>> {
    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<_, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if allowed.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    Ok(allowed)
}

/// CORS layer for the given origins.
///
/// - Methods: GET, POST, PUT, DELETE, OPTIONS
/// - Headers: Content-Type, Authorization, Accept
/// - Max age: 1 hour
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// CORS layer built from the required `CORS_ALLOWED_ORIGIN` variable.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let origins = std::env::var("CORS_ALLOWED_ORIGIN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN environment variable is required. Example: CORS_ALLOWED_ORIGIN=http://localhost:3000",
        )
    })?;

    let allowed = parse_allowed_origins(&origins)?;
    tracing::info!("CORS configured with allowed origins: {}", origins);

    Ok(create_cors_layer(allowed))
}

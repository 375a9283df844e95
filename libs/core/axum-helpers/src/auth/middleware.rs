use super::jwt::{AuthError, JwtAuth};
use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

/// Verified caller identity, inserted into request extensions by
/// [`jwt_auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// JWT authentication middleware
///
/// Rejects the request with 401 when the bearer token is missing, expired
/// or invalid. On success inserts [`AuthUser`] into request extensions.
///
/// # Example
///
/// ```ignore
/// let protected = Router::new()
///     .route("/", post(create_region))
///     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers()).ok_or_else(|| {
        tracing::debug!("No bearer token in Authorization header");
        AuthError::MissingToken
    })?;

    let claims = auth.verify_token(token).inspect_err(|e| {
        tracing::debug!("JWT verification failed: {}", e);
    })?;

    request.extensions_mut().insert(AuthUser { id: claims.sub });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use axum::{Router, body::Body, http::StatusCode, middleware, routing::get};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn whoami(user: AuthUser) -> String {
        user.id
    }

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("this-is-a-valid-secret-with-32-chars!"))
    }

    fn app(auth: JwtAuth) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
    }

    fn request(authorization: Option<String>) -> Request {
        let mut builder = Request::builder().uri("/me");
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn message(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        body["eror"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_valid_token_sets_auth_user() {
        let auth = auth();
        let token = auth.issue_token("user-1").unwrap();

        let response = app(auth)
            .oneshot(request(Some(format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"user-1");
    }

    #[tokio::test]
    async fn test_missing_token() {
        let response = app(auth()).oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(message(response).await, "Token is missing");
    }

    #[tokio::test]
    async fn test_expired_token() {
        let token = auth().with_ttl(-3600).issue_token("user-1").unwrap();

        let response = app(auth())
            .oneshot(request(Some(format!("Bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(message(response).await, "Token expired");
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let response = app(auth())
            .oneshot(request(Some("Bearer garbage".to_string())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(message(response).await, "Invalid token");
    }
}

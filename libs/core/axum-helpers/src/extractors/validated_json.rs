//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Malformed bodies and `Validate` failures are both rejected with a 400
/// [`ErrorResponse`](crate::errors::ErrorResponse).
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Login {
///     #[validate(email)]
///     email: String,
///     password: String,
/// }
///
/// async fn login(ValidatedJson(payload): ValidatedJson<Login>) -> String {
///     payload.email
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Payload {
        #[validate(email)]
        email: String,
    }

    async fn handler(ValidatedJson(payload): ValidatedJson<Payload>) -> String {
        payload.email
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload() {
        let app = Router::new().route("/", post(handler));
        let response = app.oneshot(request(r#"{"email":"a@x.com"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_field_is_bad_request() {
        let app = Router::new().route("/", post(handler));
        let response = app
            .oneshot(request(r#"{"email":"not-an-email"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = Router::new().route("/", post(handler));
        let response = app.oneshot(request("{")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

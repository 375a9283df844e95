pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for every error response:
/// - `code`: integer error code for logging/monitoring (e.g., 1004)
/// - `error`: machine-readable identifier (e.g., "NOT_FOUND")
/// - `message`: human-readable message
/// - `eror`: the same message under the key older clients read
/// - `details`: optional structured details (e.g., validation errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Region not found",
///   "eror": "Region not found"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Legacy key carrying the message
    pub eror: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            eror: message.clone(),
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(_)
            | AppError::ValidationError(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                ErrorResponse::new(ErrorCode::JsonExtraction, e.body_text())
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                let details = serde_json::to_value(&e).unwrap_or(serde_json::Value::Null);
                ErrorResponse::new(
                    ErrorCode::ValidationError,
                    validation_message(&e),
                )
                .with_details(details)
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                ErrorResponse::new(ErrorCode::BadRequest, msg)
            }
            AppError::Unauthorized(msg) => {
                tracing::info!("Unauthorized: {}", msg);
                ErrorResponse::new(ErrorCode::Unauthorized, msg)
            }
            AppError::NotFound(msg) => {
                tracing::info!(
                    error_code = ErrorCode::NotFound.code(),
                    "Not found: {}",
                    msg
                );
                ErrorResponse::new(ErrorCode::NotFound, msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                ErrorResponse::new(ErrorCode::InternalError, msg)
            }
        };

        (status, Json(body)).into_response()
    }
}

/// "Request validation failed: email, name" style summary.
fn validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<&str> = field_errors.keys().map(|f| f.as_ref()).collect();
    fields.sort_unstable();

    if fields.is_empty() {
        ErrorCode::ValidationError.default_message().to_string()
    } else {
        format!(
            "{}: {}",
            ErrorCode::ValidationError.default_message(),
            fields.join(", ")
        )
    }
}

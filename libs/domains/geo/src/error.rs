//! Classified errors shared by every domain service.
//!
//! Each failure carries an [`ErrorKind`] (machine-checkable) and a
//! caller-facing message. The HTTP boundary renders it through
//! [`axum_helpers::AppError`] at the kind's status code.

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;
use utoipa::ToSchema;

/// Message returned to callers for faults that must not leak details.
pub const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// MongoDB server error code for unique index violations.
#[cfg(feature = "mongodb")]
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB server error code when a `2dsphere` index rejects a geometry.
#[cfg(feature = "mongodb")]
pub const CANNOT_EXTRACT_GEO_KEYS_CODE: i32 = 16755;

/// Failure category, each mapped to one caller-facing status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or invalid input (400)
    BadRequest,
    /// Missing, expired or rejected credentials (401)
    Unauthorized,
    /// Referenced entity absent, or a query matched nothing (404)
    NotFound,
    /// Unexpected fault in a collaborator (500)
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind
    pub const fn status_code(self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error type produced by validation, geocoding and persistence
/// failures across the domain services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClassifiedError {
    kind: ErrorKind,
    message: String,
}

pub type ClassifiedResult<T> = Result<T, ClassifiedError>;

impl ClassifiedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Unexpected fault. The cause is logged; callers only see a generic message.
    pub fn internal(cause: impl Display) -> Self {
        tracing::error!(error = %cause, "Internal error");
        Self::new(ErrorKind::Internal, INTERNAL_MESSAGE)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }
}

/// Convert ClassifiedError to AppError for standardized error responses
impl From<ClassifiedError> for AppError {
    fn from(err: ClassifiedError) -> Self {
        match err.kind {
            ErrorKind::BadRequest => AppError::BadRequest(err.message),
            ErrorKind::Unauthorized => AppError::Unauthorized(err.message),
            ErrorKind::NotFound => AppError::NotFound(err.message),
            ErrorKind::Internal => AppError::InternalServerError(err.message),
        }
    }
}

impl IntoResponse for ClassifiedError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Server error code carried by a write or command failure.
#[cfg(feature = "mongodb")]
fn server_error_code(err: &mongodb::error::Error) -> Option<i32> {
    use mongodb::error::{ErrorKind as MongoErrorKind, WriteFailure};

    match err.kind.as_ref() {
        MongoErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        MongoErrorKind::Command(command) => Some(command.code),
        _ => None,
    }
}

/// Whether a driver error is a unique index violation.
#[cfg(feature = "mongodb")]
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    server_error_code(err) == Some(DUPLICATE_KEY_CODE)
}

/// Caller-facing classification of server error codes that stem from input.
#[cfg(feature = "mongodb")]
fn classify_server_code(code: i32) -> Option<ClassifiedError> {
    match code {
        DUPLICATE_KEY_CODE => Some(ClassifiedError::bad_request("Resource already exists")),
        CANNOT_EXTRACT_GEO_KEYS_CODE => Some(ClassifiedError::bad_request(
            "Geometry is not a valid polygon",
        )),
        _ => None,
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for ClassifiedError {
    fn from(err: mongodb::error::Error) -> Self {
        if let Some(classified) = server_error_code(&err).and_then(classify_server_code) {
            tracing::info!(error = %err, "Write rejected by MongoDB");
            return classified;
        }
        ClassifiedError::internal(err)
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::bson::ser::Error> for ClassifiedError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ClassifiedError::internal(err)
    }
}

#[cfg(feature = "mongodb")]
impl From<mongodb::bson::de::Error> for ClassifiedError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        ClassifiedError::internal(err)
    }
}

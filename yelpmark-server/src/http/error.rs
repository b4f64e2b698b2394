//! API error types with IntoResponse
//!
//! Every failure leaves the server as `{"error": {"name": ..., "message": ...}}`.
//! Store errors map to 500 when fatal and 400 otherwise. Directory errors
//! reuse the upstream status.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::{Severity, StoreError};
use crate::directory::DirectoryError;
use crate::models::ValidationError;
use crate::store_view::StoreViewError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Bad request input (400)
    Validation(ValidationError),

    /// Store failure (500 fatal / 400 otherwise / 404 missing row)
    Store(StoreError),

    /// Directory failure (upstream status, 500 for transport)
    Directory(DirectoryError),
}

impl ApiError {
    /// Status code and `(name, message)` for the envelope.
    fn parts(&self) -> (StatusCode, String, String) {
        match self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                "ValidationError".into(),
                e.to_string(),
            ),
            Self::Store(StoreError::NotFound { .. }) => (
                StatusCode::NOT_FOUND,
                "NotFound".into(),
                "Could not find resource".into(),
            ),
            Self::Store(StoreError::Connection { message }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DbError".into(),
                message.clone(),
            ),
            Self::Store(StoreError::Query { severity, message }) => {
                let status = match severity {
                    Severity::Fatal => StatusCode::INTERNAL_SERVER_ERROR,
                    Severity::Error => StatusCode::BAD_REQUEST,
                };
                (status, "DbError".into(), message.clone())
            }
            Self::Directory(DirectoryError::Upstream {
                status,
                name,
                message,
            }) => (upstream_status(*status), name.clone(), message.clone()),
            Self::Directory(DirectoryError::Transport { message }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DirectoryTransportError".into(),
                message.clone(),
            ),
        }
    }
}

/// Reuse the upstream status when it is an error status, else 500.
fn upstream_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, name, message) = self.parts();

        match &self {
            Self::Store(e) if e.is_fatal() => tracing::error!(status = status.as_u16(), "store error: {}", e),
            Self::Store(e) => tracing::warn!(status = status.as_u16(), "store error: {}", e),
            Self::Directory(e) => tracing::warn!(status = status.as_u16(), "directory error: {}", e),
            Self::Validation(_) => {}
        }

        let body = Json(json!({
            "error": {
                "name": name,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<DirectoryError> for ApiError {
    fn from(e: DirectoryError) -> Self {
        Self::Directory(e)
    }
}

impl From<StoreViewError> for ApiError {
    fn from(e: StoreViewError) -> Self {
        match e {
            StoreViewError::Store(e) => Self::Store(e),
            StoreViewError::Directory(e) => Self::Directory(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(ValidationError::Malformed {
            reason: rejection.body_text(),
        })
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(ValidationError::Malformed {
            reason: rejection.body_text(),
        })
    }
}

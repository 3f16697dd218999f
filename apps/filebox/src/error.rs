//! API error type for the file-reading server.

use std::path::PathBuf;

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to HTTP clients as a status code plus JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed validation (missing/empty/NUL filename).
    #[error("{0}")]
    Validation(String),

    /// Resolved path escapes the base directory.
    #[error("path traversal detected")]
    Traversal,

    /// Requested file does not exist.
    #[error("file not found")]
    NotFound,

    /// Requested file does not exist; the 404 body echoes the joined
    /// path. Used by the unvalidated endpoint, where the echo is part
    /// of the information leak being demonstrated.
    #[error("file not found")]
    NotFoundAt(PathBuf),

    /// Filesystem failure while reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Traversal => StatusCode::FORBIDDEN,
            Self::NotFound | Self::NotFoundAt(_) => StatusCode::NOT_FOUND,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body, `{"error": "..."}` plus the joined path when the
/// error carries one.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let path = match &self {
            Self::NotFoundAt(p) => Some(p.display().to_string()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            path,
        };
        (status, Json(body)).into_response()
    }
}

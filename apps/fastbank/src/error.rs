//! API error type for the banking server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to HTTP clients as a status code plus JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// Missing, unknown, or wrong credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Requested resource (or, insecure variant only, username) unknown.
    #[error("{0}")]
    NotFound(String),

    /// Database failure. Propagated, never swallowed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl ApiError {
    /// Error for a request without a valid session.
    #[must_use]
    pub fn not_authenticated() -> Self {
        Self::Unauthorized("not authenticated".to_string())
    }

    /// HTTP status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body, `{"error": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let Self::Database(ref e) = self {
            tracing::error!(error = %e, "database error");
        }
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

//! Axum router and request handlers for the file-reading server.
//!
//! # Endpoints
//!
//! - `POST /read` - Resolve and read a file, with traversal protection
//! - `POST /read-no-validate` - Naive join and read, traversable on purpose
//! - `POST /setup-sample` - Write the sample files under the base dir
//! - `GET /health` - Liveness probe

use std::path::PathBuf;
use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get, routing::post};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::paths::{self, PathError};

/// Sample files written by `/setup-sample`.
const SAMPLE_FILES: [(&str, &str); 2] = [
    ("hello.txt", "Hello from safe file!\n"),
    ("notes/readme.md", "# Readme\nSample readme file"),
];

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Base directory that served files must live under.
    pub base_dir: Arc<PathBuf>,
}

impl AppState {
    /// Create state for the given base directory.
    #[must_use]
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir: Arc::new(base_dir),
        }
    }
}

/// Create the Axum router with all endpoints.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/read", post(read_validated))
        .route("/read-no-validate", post(read_unvalidated))
        .route("/setup-sample", post(setup_sample))
        .with_state(state)
}

/// Liveness probe.
async fn health() -> &'static str {
    "OK"
}

/// Request body for the read endpoints.
#[derive(Debug, Deserialize)]
pub struct ReadRequest {
    /// Filename to resolve against the base directory.
    #[serde(default)]
    pub filename: Option<String>,
}

/// Response for a successful read.
#[derive(Debug, Serialize)]
pub struct ReadResponse {
    /// The path that was read.
    pub path: String,
    /// File contents (UTF-8).
    pub content: String,
}

/// Protected read: validates the filename and the resolved path.
async fn read_validated(
    State(state): State<AppState>,
    Json(req): Json<ReadRequest>,
) -> Result<Json<ReadResponse>, ApiError> {
    let filename = req
        .filename
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("filename is required".to_string()))?;

    if filename.contains('\0') {
        return Err(ApiError::Validation(
            "filename contains a NUL byte".to_string(),
        ));
    }

    let resolved = paths::resolve_safe(&state.base_dir, filename).map_err(|e| match e {
        PathError::NulByte => ApiError::Validation(e.to_string()),
        PathError::Traversal => {
            tracing::warn!(filename, "traversal attempt rejected");
            ApiError::Traversal
        }
    })?;

    if !resolved.exists() {
        return Err(ApiError::NotFound);
    }

    let content = tokio::fs::read_to_string(&resolved).await?;

    tracing::info!(path = %resolved.display(), "file served");

    Ok(Json(ReadResponse {
        path: resolved.display().to_string(),
        content,
    }))
}

/// Unprotected read: joins the filename with no containment check.
///
/// This is the vulnerable half of the demo; `..` segments walk out of
/// the base directory.
async fn read_unvalidated(
    State(state): State<AppState>,
    Json(req): Json<ReadRequest>,
) -> Result<Json<ReadResponse>, ApiError> {
    let filename = req.filename.unwrap_or_default();
    let joined = paths::join_unchecked(&state.base_dir, &filename);

    if !joined.exists() {
        // Echoing the joined path back is part of the leak on display.
        return Err(ApiError::NotFoundAt(joined));
    }

    let content = tokio::fs::read_to_string(&joined).await?;

    tracing::info!(path = %joined.display(), "file served without validation");

    Ok(Json(ReadResponse {
        path: joined.display().to_string(),
        content,
    }))
}

/// Response for `/setup-sample`.
#[derive(Debug, Serialize)]
pub struct SetupResponse {
    /// Always true on success.
    pub ok: bool,
    /// Base directory the samples were written under.
    pub base: String,
}

/// Write the sample files under the base directory.
async fn setup_sample(State(state): State<AppState>) -> Result<Json<SetupResponse>, ApiError> {
    for (name, contents) in SAMPLE_FILES {
        let path = state.base_dir.join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, contents).await?;
    }

    tracing::info!(base = %state.base_dir.display(), "sample files written");

    Ok(Json(SetupResponse {
        ok: true,
        base: state.base_dir.display().to_string(),
    }))
}

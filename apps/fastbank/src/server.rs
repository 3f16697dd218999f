//! Axum router, auth guard, and request handlers for the banking server.
//!
//! # Endpoints
//!
//! - `POST /login` - Authenticate and set the `sid` session cookie
//! - `GET  /me` - Profile of the session user
//! - `GET  /transactions?q=` - Search the session user's transactions
//! - `POST /feedback` / `GET /feedback` - Store and list comments
//! - `POST /change-email` - Update the session user's email
//! - `GET  /health` - Liveness probe
//!
//! Session identity rides in an unsigned `sid` cookie. The insecure
//! variant sets it bare; the hardened variant adds `HttpOnly` and
//! `SameSite=Strict` (the CSRF half of the lesson).

use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Query, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::config::Variant;
use crate::db;
use crate::error::ApiError;
use crate::models::{FeedbackRow, TransactionRow, UserProfile};
use crate::session::SessionStore;

/// Name of the session cookie.
const SESSION_COOKIE: &str = "sid";

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Database handle. A `Mutex` serializes access; queries are quick
    /// and never await while holding the lock.
    pub db: Arc<Mutex<Connection>>,
    /// Live sessions.
    pub sessions: Arc<SessionStore>,
    /// Selected behavior variant.
    pub variant: Variant,
}

impl AppState {
    /// Open and seed the database and create empty session state.
    ///
    /// # Errors
    ///
    /// Returns the underlying `rusqlite` error if seeding fails.
    pub fn new(variant: Variant) -> rusqlite::Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
            sessions: Arc::new(SessionStore::new()),
            variant,
        })
    }
}

/// Create the Axum router with all endpoints.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/transactions", get(transactions))
        .route("/feedback", post(post_feedback).get(get_feedback))
        .route("/change-email", post(change_email))
        .with_state(state)
}

/// Liveness probe.
async fn health() -> &'static str {
    "OK"
}

/// Pull the session token out of the `Cookie` header, if any.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Resolve the session user or fail with 401.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<i64, ApiError> {
    session_token(headers)
        .and_then(|token| state.sessions.user_id(&token))
        .ok_or_else(ApiError::not_authenticated)
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username to authenticate as.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Always true on success.
    pub success: bool,
}

/// Authenticate and set the session cookie.
///
/// The insecure variant looks the user up with interpolated SQL and
/// answers 404 for unknown usernames (enumeration); the hardened variant
/// binds the parameter and answers 401 either way.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(username = %req.username, "login attempt");

    let user = {
        let conn = state.db.lock().unwrap_or_else(PoisonError::into_inner);
        db::find_login_user(&conn, state.variant, &req.username)?
    };

    let Some(user) = user else {
        return Err(match state.variant {
            Variant::Insecure => ApiError::NotFound("unknown username".to_string()),
            Variant::Hardened => ApiError::Unauthorized("invalid credentials".to_string()),
        });
    };

    if db::hash_password(&req.password) != user.password_hash {
        return Err(match state.variant {
            Variant::Insecure => ApiError::Unauthorized("wrong password".to_string()),
            Variant::Hardened => ApiError::Unauthorized("invalid credentials".to_string()),
        });
    }

    let token = state.sessions.issue(state.variant, &user.username, user.id);
    let cookie = match state.variant {
        Variant::Insecure => format!("{SESSION_COOKIE}={token}"),
        Variant::Hardened => format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Strict"),
    };

    tracing::info!(user_id = user.id, "login succeeded");

    Ok((
        StatusCode::OK,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse { success: true }),
    ))
}

/// Profile of the session user.
async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, ApiError> {
    let user_id = authenticate(&state, &headers)?;

    let conn = state.db.lock().unwrap_or_else(PoisonError::into_inner);
    let profile = db::user_profile(&conn, user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    Ok(Json(profile))
}

/// Query string for `GET /transactions`.
#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    /// Description substring to search for. Empty matches everything.
    #[serde(default)]
    pub q: String,
}

/// Search the session user's transactions.
async fn transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<TransactionsQuery>,
) -> Result<Json<Vec<TransactionRow>>, ApiError> {
    let user_id = authenticate(&state, &headers)?;

    tracing::info!(user_id, q = %params.q, "transaction search");

    let conn = state.db.lock().unwrap_or_else(PoisonError::into_inner);
    let rows = db::search_transactions(&conn, state.variant, user_id, &params.q)?;

    Ok(Json(rows))
}

/// Feedback request body.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    /// Comment text, stored verbatim.
    pub comment: String,
}

/// Feedback response body.
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    /// Always true on success.
    pub success: bool,
}

/// Store a comment under the session user's name.
async fn post_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let user_id = authenticate(&state, &headers)?;

    let conn = state.db.lock().unwrap_or_else(PoisonError::into_inner);
    let profile = db::user_profile(&conn, user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    db::insert_feedback(&conn, state.variant, &profile.username, &req.comment)?;

    tracing::info!(user_id, "feedback stored");

    Ok(Json(FeedbackResponse { success: true }))
}

/// List all feedback, newest first.
async fn get_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<FeedbackRow>>, ApiError> {
    authenticate(&state, &headers)?;

    let conn = state.db.lock().unwrap_or_else(PoisonError::into_inner);
    let rows = db::list_feedback(&conn)?;

    Ok(Json(rows))
}

/// Change-email request body.
#[derive(Debug, Deserialize)]
pub struct ChangeEmailRequest {
    /// New email address.
    pub email: String,
}

/// Change-email response body.
#[derive(Debug, Serialize)]
pub struct ChangeEmailResponse {
    /// Always true on success.
    pub success: bool,
    /// The stored email.
    pub email: String,
}

/// Update the session user's email.
async fn change_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ChangeEmailRequest>,
) -> Result<Json<ChangeEmailResponse>, ApiError> {
    let user_id = authenticate(&state, &headers)?;

    if !req.email.contains('@') {
        return Err(ApiError::BadRequest("invalid email".to_string()));
    }

    let conn = state.db.lock().unwrap_or_else(PoisonError::into_inner);
    db::update_email(&conn, state.variant, user_id, &req.email)?;

    tracing::info!(user_id, "email updated");

    Ok(Json(ChangeEmailResponse {
        success: true,
        email: req.email,
    }))
}

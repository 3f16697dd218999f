//! Row types returned to clients.

use serde::{Deserialize, Serialize};

/// User row as needed by the login flow. Never serialized to clients.
#[derive(Debug, Clone)]
pub struct LoginUser {
    /// Primary key.
    pub id: i64,
    /// Unique username.
    pub username: String,
    /// SHA-256 hex digest of the password.
    pub password_hash: String,
}

/// Profile returned by `GET /me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique username.
    pub username: String,
    /// Contact email.
    pub email: String,
}

/// Transaction row returned by `GET /transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRow {
    /// Primary key.
    pub id: i64,
    /// Transaction amount.
    pub amount: f64,
    /// Free-text description.
    pub description: String,
}

/// Feedback row returned by `GET /feedback`.
///
/// The comment is stored and returned verbatim; escaping is the
/// renderer's problem, which is exactly the stored-XSS lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRow {
    /// Username of the author.
    pub user: String,
    /// Comment text, unescaped.
    pub comment: String,
}

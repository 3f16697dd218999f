//! In-memory session store and token generation.
//!
//! The store is a process-wide map from session token to user id. It is
//! unbounded and entries never expire, matching the classroom fixture;
//! the token *format* is where the two variants differ.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use uuid::Uuid;

use crate::config::Variant;

/// Map from session token to user id.
///
/// Wrapped in an `RwLock` because axum handlers run concurrently; the
/// original demo leaned on a single-threaded runtime instead.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, i64>>,
}

impl SessionStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Issue a token for the user and record the session.
    ///
    /// Insecure tokens are `{username}-{unix_millis}` (guessable from
    /// the username and a clock); hardened tokens are random UUIDs.
    pub fn issue(&self, variant: Variant, username: &str, user_id: i64) -> String {
        let token = match variant {
            Variant::Insecure => format!("{username}-{}", Utc::now().timestamp_millis()),
            Variant::Hardened => Uuid::new_v4().to_string(),
        };
        // A poisoned lock only means a handler panicked mid-access; the
        // map itself is still usable.
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), user_id);
        token
    }

    /// Look up the user id for a token.
    #[must_use]
    pub fn user_id(&self, token: &str) -> Option<i64> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .copied()
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

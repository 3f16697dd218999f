#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Fastbank - Toy Banking Demo Server
//!
//! A session-gated banking API backed by an in-memory SQLite database.
//! The same codebase runs in two variants selected at startup:
//!
//! - **Insecure**: login and data queries are built by string
//!   concatenation (SQL injection), session tokens are predictable,
//!   login leaks whether a username exists, and feedback is stored and
//!   returned verbatim (stored XSS when rendered by a naive client).
//! - **Hardened**: every query binds its parameters, session tokens are
//!   random UUIDs, login failures are indistinguishable, and the session
//!   cookie is `HttpOnly` with `SameSite=Strict`.
//!
//! # Modules
//!
//! - `config`: Environment-variable configuration and the variant switch
//! - `db`: Schema, seed data, and all data-access functions
//! - `error`: API error type with HTTP status mapping
//! - `models`: Row types serialized to clients
//! - `session`: In-memory session store and token generation
//! - `server`: Axum router, auth guard, and request handlers

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod session;
pub mod server;

pub use config::{ConfigError, FastbankConfig, Variant};
pub use error::ApiError;
pub use server::{AppState, create_router};
pub use session::SessionStore;

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Filebox - Path Traversal Demo Server
//!
//! A small file-reading service that resolves user-supplied filenames
//! against a base directory. It exists to demonstrate path traversal:
//! `/read` validates the resolved path and rejects anything that escapes
//! the base directory, while `/read-no-validate` performs the naive join
//! that the validation exists to prevent.
//!
//! # Modules
//!
//! - `config`: Environment-variable configuration
//! - `error`: API error type with HTTP status mapping
//! - `paths`: Filename resolution, safe and deliberately unsafe
//! - `server`: Axum router and request handlers

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod paths;
pub mod server;

pub use config::{ConfigError, FileboxConfig};
pub use error::ApiError;
pub use paths::{PathError, join_unchecked, resolve_safe};
pub use server::{AppState, create_router};

//! Filename resolution against the base directory.
//!
//! `resolve_safe` is the protected resolution used by `/read`:
//! percent-decode, reject NUL bytes, lexically normalize, and require the
//! result to stay strictly inside the base directory. Normalization is
//! lexical (no filesystem access) because a traversal attempt must be
//! rejected even when the target path does not exist.
//!
//! `join_unchecked` is the naive join used by `/read-no-validate` and is
//! traversable on purpose.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Errors from safe path resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Filename contains a NUL byte (raw or percent-encoded).
    #[error("filename contains a NUL byte")]
    NulByte,

    /// Resolved path escapes the base directory.
    #[error("path escapes the base directory")]
    Traversal,
}

/// Resolve `input` against `base`, rejecting anything that escapes it.
///
/// The input is percent-decoded first (best effort: inputs that do not
/// decode to valid UTF-8 are used as given), so encoded traversal such as
/// `%2e%2e%2f` is caught. An absolute input replaces the base entirely
/// during the join and is therefore rejected by the containment check,
/// as is a path that normalizes to the base directory itself.
///
/// # Errors
///
/// [`PathError::NulByte`] for embedded NUL bytes, [`PathError::Traversal`]
/// when the normalized path is not strictly inside `base`.
pub fn resolve_safe(base: &Path, input: &str) -> Result<PathBuf, PathError> {
    let decoded = percent_decode_str(input)
        .decode_utf8()
        .map_or_else(|_| input.to_string(), |s| s.into_owned());

    if decoded.contains('\0') {
        return Err(PathError::NulByte);
    }

    let normalized = normalize_lexically(&base.join(&decoded));
    let base_normalized = normalize_lexically(base);

    if normalized.starts_with(&base_normalized) && normalized != base_normalized {
        Ok(normalized)
    } else {
        Err(PathError::Traversal)
    }
}

/// The deliberately unsafe join: `..` segments are honored.
#[must_use]
pub fn join_unchecked(base: &Path, input: &str) -> PathBuf {
    base.join(input)
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// A `..` that would climb above the start of the path is kept, so the
/// caller's containment check fails for it.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Pop a real component if there is one; a leading `..`
                // stays in place, and one past the root is dropped.
                match out.components().next_back() {
                    Some(Component::Normal(_)) => {
                        out.pop();
                    }
                    Some(Component::RootDir) => {}
                    _ => out.push(".."),
                }
            }
            other => out.push(other),
        }
    }
    out
}

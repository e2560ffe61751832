//! File reference normalization.
//!
//! Participants in a descriptor may point at auxiliary files (timing
//! configuration, signal mappings). Those references are written relative to
//! the descriptor, so before they are handed to the system they are resolved
//! against the descriptor's directory. Resolution is lexical only; the
//! filesystem is never consulted.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Prefix marking a reference as a macro. Macros are passed through verbatim.
pub const MACRO_PREFIX: &str = "$(";

/// A classified file reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PathReference {
    /// No reference (empty or whitespace-only input).
    Empty,
    /// A `$(...)` macro, kept exactly as declared (after trimming).
    Macro(String),
    /// An absolute path.
    Absolute(PathBuf),
    /// A path relative to some anchor.
    Relative(PathBuf),
}

impl PathReference {
    /// Classify a raw reference string without resolving it.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else if trimmed.starts_with(MACRO_PREFIX) {
            Self::Macro(trimmed.to_string())
        } else {
            Self::from_path(PathBuf::from(trimmed))
        }
    }

    fn from_path(path: PathBuf) -> Self {
        if path.is_absolute() {
            Self::Absolute(path)
        } else {
            Self::Relative(path)
        }
    }

    /// Returns `true` for the `$(...)` escape.
    #[must_use]
    pub fn is_macro(&self) -> bool {
        matches!(self, Self::Macro(_))
    }

    /// Returns `true` if there is no reference at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for PathReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Macro(raw) => f.write_str(raw),
            Self::Absolute(path) | Self::Relative(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Lexically canonicalize a path.
///
/// Drops `.` segments, folds `..` into the preceding segment, and collapses
/// repeated separators. A `..` directly under the root is dropped; leading
/// `..` segments of a relative path are kept.
#[must_use]
pub fn canonicalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Resolve `reference` against `anchor_dir`.
///
/// - Empty input stays [`PathReference::Empty`].
/// - Surrounding whitespace is trimmed before anything else.
/// - `$(...)` macros are returned verbatim.
/// - Relative paths are joined onto `anchor_dir`, then canonicalized.
/// - Absolute paths are canonicalized in place.
#[must_use]
pub fn normalize(reference: &str, anchor_dir: &Path) -> PathReference {
    match PathReference::classify(reference) {
        PathReference::Relative(relative) => {
            PathReference::from_path(canonicalize(&anchor_dir.join(relative)))
        }
        PathReference::Absolute(absolute) => PathReference::Absolute(canonicalize(&absolute)),
        other => other,
    }
}

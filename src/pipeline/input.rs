//! Input resolution: normalise a user-supplied path string.
//!
//! Shells do not expand `~` inside quotes, and config files never do, so a
//! leading `~` or `~/` is replaced with the home directory here. The result
//! is canonicalised so later log lines and report entries carry absolute
//! paths.

use crate::error::Office2PdfError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What kind of filesystem object an input path names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    File,
    Directory,
    /// Exists, but is neither (socket, device, FIFO).
    Other,
}

/// Resolve `input` to an absolute, existing path.
pub fn resolve_input_path(input: &str) -> Result<PathBuf, Office2PdfError> {
    let expanded = expand_tilde(input);
    match std::fs::canonicalize(&expanded) {
        Ok(path) => {
            debug!("Resolved input '{}' to {}", input, path.display());
            Ok(path)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Office2PdfError::PathNotFound { path: expanded })
        }
        Err(e) => Err(Office2PdfError::WalkFailed {
            path: expanded,
            source: e,
        }),
    }
}

/// Classify an existing path, following a symlink given as the input itself.
pub fn input_kind(path: &Path) -> InputKind {
    match std::fs::metadata(path) {
        Ok(m) if m.is_file() => InputKind::File,
        Ok(m) if m.is_dir() => InputKind::Directory,
        _ => InputKind::Other,
    }
}

/// Replace a leading `~` with the user's home directory.
///
/// `~user` forms are left alone.
pub fn expand_tilde(input: &str) -> PathBuf {
    let rest = if input == "~" {
        Some("")
    } else {
        input
            .strip_prefix("~/")
            .or_else(|| input.strip_prefix("~\\"))
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(input),
    }
}

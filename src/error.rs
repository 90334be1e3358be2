//! Error types for the edgequake-office2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Office2PdfError`] — **Fatal**: the run cannot proceed at all
//!   (input path missing, LibreOffice not installed, bad configuration).
//!   Returned as `Err(Office2PdfError)` from the top-level `convert*`
//!   functions.
//!
//! * [`BackendError`] — **Non-fatal**: a single document failed (the office
//!   application threw, `soffice` exited non-zero, the call timed out) but the
//!   rest of the batch is fine. Stored inside
//!   [`crate::output::FileOutcome`] so callers can inspect partial success
//!   rather than losing a whole directory to one corrupt workbook.
//!
//! The one exception is [`BackendError::ToolMissing`]: the external tool
//! vanished, so every remaining file would fail the same way. The
//! orchestrator turns it into [`Office2PdfError::ToolUnavailable`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-office2pdf library.
///
/// Per-file failures use [`BackendError`] and are stored in
/// [`crate::output::FileOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Office2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The user-supplied path does not exist.
    #[error("Error: path not found: {}", .path.display())]
    PathNotFound { path: PathBuf },

    /// The path exists but is neither a regular file nor a directory.
    #[error("Enter a valid file or directory path. ('{}' is neither)", .path.display())]
    InvalidPath { path: PathBuf },

    /// The directory (or one of its ancestors) could not be read.
    #[error("Failed to read directory '{}': {source}", .path.display())]
    WalkFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Backend errors ────────────────────────────────────────────────────
    /// The external conversion tool could not be located before the run.
    #[error("{0}")]
    ToolNotFound(#[from] soffice_locate::LocateError),

    /// The external tool disappeared mid-run; remaining files were not attempted.
    #[error(
        "Conversion tool '{}' could not be started; {remaining} remaining file(s) were not attempted.\n\
Check that LibreOffice is installed, or pass --soffice <PATH>.",
        .program.display()
    )]
    ToolUnavailable { program: PathBuf, remaining: usize },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single document.
///
/// Returned by every [`crate::backend::ConversionBackend`] and stored in
/// [`crate::output::FileOutcome`]. Adapters never log these themselves;
/// the orchestrator does.
#[derive(Debug, Clone, Error, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendError {
    /// The office automation server rejected a call (COM `HRESULT` failure).
    #[error("automation call '{call}' failed: {detail}")]
    Automation { call: String, detail: String },

    /// The external tool ran but exited unsuccessfully.
    #[error("{program} exited with {}{}", exit_label(.code), stderr_suffix(.stderr))]
    ExitStatus {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The external tool exists but could not be started.
    #[error("failed to start {program}: {detail}")]
    Spawn { program: String, detail: String },

    /// The external tool could not be found at all.
    #[error("{program} not found")]
    ToolMissing { program: String },

    /// The tool reported success but left no PDF behind.
    #[error("no PDF was produced at '{path}'")]
    OutputMissing { path: String },

    /// A PDF from an earlier run is in the way and could not be removed.
    #[error("could not replace existing '{path}': {detail}")]
    StaleOutput { path: String, detail: String },

    /// The conversion did not finish within the configured timeout.
    #[error("timed out after {secs}s")]
    Timeout { secs: u64 },
}

impl BackendError {
    /// `true` when every remaining file would fail the same way.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BackendError::ToolMissing { .. })
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_not_found_display() {
        let e = Office2PdfError::PathNotFound {
            path: PathBuf::from("/nope/docs"),
        };
        assert_eq!(e.to_string(), "Error: path not found: /nope/docs");
    }

    #[test]
    fn invalid_path_display() {
        let e = Office2PdfError::InvalidPath {
            path: PathBuf::from("/dev/null"),
        };
        assert!(e.to_string().starts_with("Enter a valid file or directory path."));
    }

    #[test]
    fn exit_status_display_with_stderr() {
        let e = BackendError::ExitStatus {
            program: "soffice".into(),
            code: Some(81),
            stderr: "  source file could not be loaded\n".into(),
        };
        assert_eq!(
            e.to_string(),
            "soffice exited with status 81: source file could not be loaded"
        );
    }

    #[test]
    fn exit_status_display_signal() {
        let e = BackendError::ExitStatus {
            program: "soffice".into(),
            code: None,
            stderr: String::new(),
        };
        assert!(e.to_string().contains("terminated by signal"));
    }

    #[test]
    fn timeout_display() {
        let e = BackendError::Timeout { secs: 30 };
        assert_eq!(e.to_string(), "timed out after 30s");
    }

    #[test]
    fn only_tool_missing_is_fatal() {
        assert!(BackendError::ToolMissing {
            program: "soffice".into()
        }
        .is_fatal());
        assert!(!BackendError::Timeout { secs: 1 }.is_fatal());
        assert!(!BackendError::Automation {
            call: "Open".into(),
            detail: "0x800A03EC".into()
        }
        .is_fatal());
    }

    #[test]
    fn backend_error_serialises_with_kind_tag() {
        let e = BackendError::Timeout { secs: 5 };
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, r#"{"kind":"timeout","secs":5}"#);
    }

    #[test]
    fn tool_unavailable_display() {
        let e = Office2PdfError::ToolUnavailable {
            program: PathBuf::from("/opt/libreoffice25.2/program/soffice"),
            remaining: 3,
        };
        let msg = e.to_string();
        assert!(msg.contains("3 remaining"), "got: {msg}");
        assert!(msg.contains("/opt/libreoffice25.2/program/soffice"));
    }
}

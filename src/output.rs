//! Result types returned by the conversion entry points.

use crate::backend::Platform;
use crate::error::BackendError;
use crate::family::DocumentFamily;
use serde::Serialize;
use std::path::PathBuf;

/// How the input path was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// The input was a single file, converted directly.
    SingleFile,
    /// The input was a directory, walked recursively.
    Directory,
}

/// Why a file was not handed to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The extension is not in any family.
    UnsupportedExtension,
    /// The active backend has no adapter for this family.
    UnsupportedFamily { family: DocumentFamily },
}

/// Final state of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Converted,
    Failed { error: BackendError },
    Skipped { skip: SkipReason },
}

/// Per-file record kept in [`ConversionReport::outcomes`].
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// `None` when the extension was not recognised.
    pub family: Option<DocumentFamily>,
    #[serde(flatten)]
    pub status: FileStatus,
    /// Label shown in the success line (`WORD`, `EXCEL`, `PPT`, `PDF`).
    pub tag: Option<String>,
    pub duration_ms: u64,
}

impl FileOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self.status, FileStatus::Converted)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, FileStatus::Skipped { .. })
    }

    pub fn error(&self) -> Option<&BackendError> {
        match &self.status {
            FileStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Summary of one invocation of [`crate::convert_path`].
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub platform: Platform,
    /// Name of the active backend (`soffice`, `com`, or a custom one).
    pub backend: String,
    pub mode: RunMode,
    /// Files selected for conversion: matches in directory mode, 1 otherwise.
    pub discovered: usize,
    /// Outcomes in the order the files were attempted.
    pub outcomes: Vec<FileOutcome>,
    pub total_duration_ms: u64,
}

impl ConversionReport {
    pub fn converted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_converted()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    /// `true` if no attempted file failed. Skips do not count as failures.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

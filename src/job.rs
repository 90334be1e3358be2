//! A single pending conversion: where the document is, where the PDF goes.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// `(source, destination)` pair for one document.
///
/// The destination is always the source with its final extension replaced
/// by `pdf`, in the same directory. Jobs carry no identity beyond that and
/// are dropped as soon as the conversion returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl ConversionJob {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let destination = pdf_destination(&source);
        Self {
            source,
            destination,
        }
    }

    /// Directory the PDF is written into.
    ///
    /// Falls back to `.` for bare file names.
    pub fn output_dir(&self) -> &Path {
        match self.destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    /// Source file name for log lines (`report.pptx`).
    pub fn source_name(&self) -> String {
        display_name(&self.source)
    }

    /// Destination file name for log lines (`report.pdf`).
    pub fn destination_name(&self) -> String {
        display_name(&self.destination)
    }
}

/// `dir/name.ext` → `dir/name.pdf`; only the last extension is replaced.
pub fn pdf_destination(source: &Path) -> PathBuf {
    source.with_extension("pdf")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

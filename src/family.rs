//! Extension classifier: which office application owns a file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

const WORD_PROCESSOR_EXTENSIONS: &[&str] = &["doc", "docx"];
const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm"];
const PRESENTATION_EXTENSIONS: &[&str] = &["ppt", "pptx", "pptm"];

/// The office document family a file belongs to.
///
/// Each family maps to one automation server on Windows (Word, Excel,
/// PowerPoint); on every other platform LibreOffice handles all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFamily {
    /// `.doc`, `.docx`
    WordProcessor,
    /// `.xls`, `.xlsx`, `.xlsm`
    Spreadsheet,
    /// `.ppt`, `.pptx`, `.pptm`
    Presentation,
}

impl DocumentFamily {
    /// All families, in classification order.
    pub const ALL: [DocumentFamily; 3] = [
        DocumentFamily::WordProcessor,
        DocumentFamily::Spreadsheet,
        DocumentFamily::Presentation,
    ];

    /// Classify a bare extension (`"docx"`, `".XLSX"`).
    ///
    /// Matching is exact and case-insensitive; one leading dot is ignored.
    /// Returns `None` for anything outside the three fixed sets.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|family| family.extensions().contains(&ext.as_str()))
    }

    /// Classify a path by its final extension.
    ///
    /// Dotfiles such as `.docx` have no extension and are unsupported.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Lower-case extensions recognised for this family (no leading dot).
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            DocumentFamily::WordProcessor => WORD_PROCESSOR_EXTENSIONS,
            DocumentFamily::Spreadsheet => SPREADSHEET_EXTENSIONS,
            DocumentFamily::Presentation => PRESENTATION_EXTENSIONS,
        }
    }

    /// Short upper-case tag used in per-file log lines.
    pub fn tag(self) -> &'static str {
        match self {
            DocumentFamily::WordProcessor => "WORD",
            DocumentFamily::Spreadsheet => "EXCEL",
            DocumentFamily::Presentation => "PPT",
        }
    }
}

impl fmt::Display for DocumentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentFamily::WordProcessor => "word-processor",
            DocumentFamily::Spreadsheet => "spreadsheet",
            DocumentFamily::Presentation => "presentation",
        })
    }
}

/// `true` if `path` has an extension from any of the three families.
pub fn is_supported_path(path: &Path) -> bool {
    DocumentFamily::from_path(path).is_some()
}

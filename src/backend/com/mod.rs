//! Microsoft Office adapters over COM automation (Windows only).
//!
//! One adapter per family, each driving its own application:
//!
//! | Family         | ProgID                   | Export call                          |
//! |----------------|--------------------------|--------------------------------------|
//! | word-processor | `Word.Application`       | `Document.ExportAsFixedFormat(dst, 17)` |
//! | spreadsheet    | `Excel.Application`      | `Workbook.ExportAsFixedFormat(0, dst)`  |
//! | presentation   | `PowerPoint.Application` | `Presentation.SaveAs(dst, 32)`          |
//!
//! Automation calls block, and COM objects are bound to the apartment that
//! created them, so every conversion runs start-to-finish on one
//! `spawn_blocking` thread with its own apartment.

mod dispatch;
mod excel;
mod powerpoint;
mod word;

use super::ConversionBackend;
use crate::error::BackendError;
use crate::family::DocumentFamily;
use crate::job::ConversionJob;
use async_trait::async_trait;
use std::path::Path;

/// Office COM automation backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComBackend;

impl ComBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConversionBackend for ComBackend {
    fn name(&self) -> &str {
        "com"
    }

    fn supports(&self, family: DocumentFamily) -> bool {
        matches!(
            family,
            DocumentFamily::WordProcessor
                | DocumentFamily::Spreadsheet
                | DocumentFamily::Presentation
        )
    }

    fn tag(&self, family: DocumentFamily) -> &'static str {
        family.tag()
    }

    async fn convert(
        &self,
        family: DocumentFamily,
        job: &ConversionJob,
    ) -> Result<(), BackendError> {
        let source = office_path(&job.source);
        let destination = office_path(&job.destination);

        tokio::task::spawn_blocking(move || match family {
            DocumentFamily::WordProcessor => word::export_pdf(&source, &destination),
            DocumentFamily::Spreadsheet => excel::export_pdf(&source, &destination),
            DocumentFamily::Presentation => powerpoint::export_pdf(&source, &destination),
        })
        .await
        .map_err(|e| BackendError::Automation {
            call: "worker".into(),
            detail: format!("automation thread panicked: {e}"),
        })?
    }
}

/// Absolute path string Office accepts.
///
/// `canonicalize` yields `\\?\C:\…` verbatim paths, which Office rejects.
fn office_path(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let s = absolute.to_string_lossy();
    if let Some(rest) = s.strip_prefix(r"\\?\UNC\") {
        format!(r"\\{rest}")
    } else if let Some(rest) = s.strip_prefix(r"\\?\") {
        rest.to_string()
    } else {
        s.into_owned()
    }
}

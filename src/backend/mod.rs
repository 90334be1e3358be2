//! Conversion backends: the external programs that actually produce PDFs.
//!
//! Callers depend only on [`ConversionBackend`]; which implementation is
//! active is decided once per run by [`select_backend`]:
//!
//! ```text
//! Windows  ──▶ com::ComBackend       Word / Excel / PowerPoint via COM automation
//! other    ──▶ soffice::SofficeBackend  headless LibreOffice subprocess
//! ```
//!
//! The adapter for the other platform family is not compiled at all.
//!
//! Backends never log and never panic. Every failure comes back as a
//! [`BackendError`] so the orchestrator in [`crate::convert`] owns logging
//! and timeout policy in one place.

#[cfg(windows)]
pub mod com;
#[cfg(not(windows))]
pub mod soffice;

use crate::config::ConversionConfig;
use crate::error::{BackendError, Office2PdfError};
use crate::family::DocumentFamily;
use crate::job::ConversionJob;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Which backend family this build targets. Fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Microsoft Office driven through COM automation (Windows).
    ComAutomation,
    /// LibreOffice `soffice` invoked as a subprocess (everything else).
    CommandLine,
}

impl Platform {
    pub const fn current() -> Self {
        if cfg!(windows) {
            Platform::ComAutomation
        } else {
            Platform::CommandLine
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::ComAutomation => "com-automation",
            Platform::CommandLine => "command-line",
        })
    }
}

/// Something that can turn one office document into a PDF.
#[async_trait]
pub trait ConversionBackend: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &str;

    /// Whether this backend has an adapter for `family`.
    ///
    /// Files of unsupported families are skipped, never attempted.
    fn supports(&self, family: DocumentFamily) -> bool {
        let _ = family;
        true
    }

    /// Label printed in the per-file success line.
    fn tag(&self, family: DocumentFamily) -> &'static str {
        let _ = family;
        "PDF"
    }

    /// Write `job.destination` as a PDF rendering of `job.source`.
    ///
    /// Must not return before the external program has finished. The caller
    /// wraps this future in a timeout and may drop it; implementations must
    /// release what they hold on drop.
    async fn convert(&self, family: DocumentFamily, job: &ConversionJob)
        -> Result<(), BackendError>;
}

/// Pick the backend for this run.
///
/// 1. `config.backend` if the caller injected one;
/// 2. otherwise the platform default. On non-Windows hosts this locates the
///    `soffice` executable up front, so a missing LibreOffice install fails
///    the run before any file is touched.
pub fn select_backend(
    config: &ConversionConfig,
) -> Result<Arc<dyn ConversionBackend>, Office2PdfError> {
    if let Some(ref backend) = config.backend {
        return Ok(Arc::clone(backend));
    }

    #[cfg(windows)]
    {
        Ok(Arc::new(com::ComBackend::new()))
    }

    #[cfg(not(windows))]
    {
        Ok(Arc::new(soffice::SofficeBackend::from_config(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    #[async_trait]
    impl ConversionBackend for Dummy {
        fn name(&self) -> &str {
            "dummy"
        }

        async fn convert(
            &self,
            _family: DocumentFamily,
            _job: &ConversionJob,
        ) -> Result<(), BackendError> {
            Ok(())
        }
    }

    #[test]
    fn platform_matches_target() {
        if cfg!(windows) {
            assert_eq!(Platform::current(), Platform::ComAutomation);
        } else {
            assert_eq!(Platform::current(), Platform::CommandLine);
        }
    }

    #[test]
    fn default_trait_methods() {
        let d = Dummy;
        for family in DocumentFamily::ALL {
            assert!(d.supports(family));
            assert_eq!(d.tag(family), "PDF");
        }
    }

    #[test]
    fn injected_backend_wins() {
        let injected: Arc<dyn ConversionBackend> = Arc::new(Dummy);
        let config = ConversionConfig::builder()
            .backend(Arc::clone(&injected))
            .build()
            .unwrap();
        let selected = select_backend(&config).unwrap();
        assert_eq!(selected.name(), "dummy");
        assert!(Arc::ptr_eq(&selected, &injected));
    }

    #[cfg(not(windows))]
    #[test]
    fn missing_explicit_soffice_fails_selection() {
        let config = ConversionConfig::builder()
            .soffice_path("/definitely/not/installed/soffice")
            .build()
            .unwrap();
        let err = select_backend(&config).err().expect("selection must fail");
        assert!(matches!(err, Office2PdfError::ToolNotFound(_)));
    }
}

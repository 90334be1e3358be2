//! Configuration types for office-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Every knob lives in one struct so the
//! CLI, tests and library callers configure a run the same way.

use crate::backend::ConversionBackend;
use crate::error::Office2PdfError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for a conversion run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_office2pdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .timeout_secs(120)
///     .soffice_path("/opt/libreoffice25.2/program/soffice")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Per-document timeout in seconds. Default: 300.
    ///
    /// Office automation servers and `soffice` can hang forever on a broken
    /// document or a hidden modal dialog. When the timeout elapses the file is
    /// recorded as [`crate::error::BackendError::Timeout`] and the batch moves
    /// on; a `soffice` child is killed, a COM worker thread is abandoned.
    pub timeout_secs: u64,

    /// Explicit LibreOffice executable. If None, `soffice-locate` searches
    /// `SOFFICE_PATH`, the vendor install path, and `PATH`.
    ///
    /// Ignored on Windows, where Office COM automation is used instead.
    pub soffice_path: Option<PathBuf>,

    /// Run `soffice` with a throw-away user profile. Default: true.
    ///
    /// LibreOffice refuses to start a second headless instance against a
    /// profile that a desktop session already holds, and exits 0 without
    /// writing anything. A private profile avoids that at the cost of a
    /// slower first conversion.
    pub isolated_profile: bool,

    /// Convert Office owner files (`~$report.docx`) found during a directory
    /// walk. Default: false.
    pub include_lock_files: bool,

    /// Pre-constructed backend. Takes precedence over platform selection.
    pub backend: Option<Arc<dyn ConversionBackend>>,

    /// Receives per-file events. If None, events are only logged.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            soffice_path: None,
            isolated_profile: true,
            include_lock_files: false,
            backend: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("timeout_secs", &self.timeout_secs)
            .field("soffice_path", &self.soffice_path)
            .field("isolated_profile", &self.isolated_profile)
            .field("include_lock_files", &self.include_lock_files)
            .field(
                "backend",
                &self.backend.as_ref().map(|b| format!("<dyn ConversionBackend: {}>", b.name())),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// [`Self::timeout_secs`] as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn soffice_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.soffice_path = Some(path.into());
        self
    }

    pub fn isolated_profile(mut self, v: bool) -> Self {
        self.config.isolated_profile = v;
        self
    }

    pub fn include_lock_files(mut self, v: bool) -> Self {
        self.config.include_lock_files = v;
        self
    }

    pub fn backend(mut self, backend: Arc<dyn ConversionBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Office2PdfError> {
        let c = &self.config;
        if c.timeout_secs == 0 {
            return Err(Office2PdfError::InvalidConfig(
                "Timeout must be ≥ 1 second".into(),
            ));
        }
        if let Some(ref p) = c.soffice_path {
            if p.as_os_str().is_empty() {
                return Err(Office2PdfError::InvalidConfig(
                    "soffice path must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

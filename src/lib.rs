//! # edgequake-office2pdf
//!
//! Convert Word, Excel and PowerPoint documents to PDF, one file or a whole
//! directory tree at a time.
//!
//! ## Why this crate?
//!
//! Only the office suites themselves render their formats faithfully, so
//! this crate drives them instead of reimplementing layout. On Windows it
//! automates Microsoft Office over COM. Everywhere else it runs LibreOffice
//! headless (`soffice --convert-to pdf`). Callers see one API either way.
//!
//! ## Pipeline Overview
//!
//! ```text
//! path
//!  │
//!  ├─ 1. Input    ~ expansion, canonicalise, file vs. directory
//!  ├─ 2. Walk     recursive, supported extensions only, sorted
//!  ├─ 3. Backend  COM (Windows) or soffice (elsewhere), chosen once
//!  ├─ 4. Convert  one file at a time, each under a timeout
//!  └─ 5. Report   per-file outcome, counts, durations
//! ```
//!
//! | Family         | Extensions               |
//! |----------------|--------------------------|
//! | word-processor | `.docx` `.doc`           |
//! | spreadsheet    | `.xlsx` `.xls` `.xlsm`   |
//! | presentation   | `.pptx` `.ppt` `.pptm`   |
//!
//! Every PDF is written next to its source with the extension replaced
//! (`Q3.report.xlsx` → `Q3.report.pdf`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_office2pdf::{convert_path, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder().timeout_secs(120).build()?;
//!     let report = convert_path("~/Documents/reports", &config).await?;
//!     eprintln!(
//!         "{} converted, {} failed, {} skipped",
//!         report.converted(),
//!         report.failed(),
//!         report.skipped()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `office2pdf` binary (clap + anyhow + indicatif + tracing-subscriber + serde_json) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-office2pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod config;
pub mod convert;
pub mod error;
pub mod family;
pub mod job;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use backend::{select_backend, ConversionBackend, Platform};
pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert_file, convert_path, convert_path_sync, list_documents};
pub use error::{BackendError, Office2PdfError};
pub use family::{is_supported_path, DocumentFamily};
pub use job::ConversionJob;
pub use output::{ConversionReport, FileOutcome, FileStatus, RunMode, SkipReason};
pub use pipeline::walk::discover_documents;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};

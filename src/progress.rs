//! Progress-callback trait for per-file conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the walker processes each document. The CLI uses this to print
//! the `[WORD] a.docx -> a.pdf` lines and drive its progress bar; library
//! callers can forward events anywhere without the library knowing how the
//! host application communicates.
//!
//! # Example
//!
//! ```rust
//! use edgequake_office2pdf::{ConversionConfig, ConversionJob, ConversionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     converted: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_file_converted(&self, job: &ConversionJob, _tag: &str, _elapsed_ms: u64) {
//!         self.converted.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("done: {}", job.destination.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { converted: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::BackendError;
use crate::job::ConversionJob;
use crate::output::{ConversionReport, SkipReason};
use std::path::Path;
use std::sync::Arc;

/// Called by the walker as it processes each file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive sequentially from one task, but the
/// trait is `Send + Sync` so a callback can be shared with other threads.
///
/// `on_batch_start` / `on_batch_complete` fire only in directory mode; a
/// single-file run produces file events only.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after the directory walk, before any conversion.
    ///
    /// # Arguments
    /// * `total_files` — number of supported documents found
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a document is handed to the backend.
    ///
    /// # Arguments
    /// * `index` — 1-based position in the batch
    /// * `total` — batch size (1 in single-file mode)
    fn on_file_start(&self, index: usize, total: usize, job: &ConversionJob) {
        let _ = (index, total, job);
    }

    /// Called when the PDF was written.
    ///
    /// # Arguments
    /// * `tag` — backend label for the family (`WORD`, `EXCEL`, `PPT`, `PDF`)
    fn on_file_converted(&self, job: &ConversionJob, tag: &str, elapsed_ms: u64) {
        let _ = (job, tag, elapsed_ms);
    }

    /// Called when the backend reported a failure for this document.
    fn on_file_failed(&self, job: &ConversionJob, error: &BackendError) {
        let _ = (job, error);
    }

    /// Called when a file was not handed to any backend.
    fn on_file_skipped(&self, source: &Path, reason: &SkipReason) {
        let _ = (source, reason);
    }

    /// Called once after every discovered document has been attempted.
    fn on_batch_complete(&self, report: &ConversionReport) {
        let _ = report;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

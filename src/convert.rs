//! Conversion entry points: one file, or a whole directory tree.
//!
//! ## Flow
//!
//! ```text
//! convert_path(input)
//!  ├─ resolve    ~ expansion, canonicalise            (PathNotFound)
//!  ├─ select     active backend, locate soffice       (ToolNotFound)
//!  ├─ file?      ──▶ run_job                           no batch events
//!  ├─ directory? ──▶ discover ──▶ run_job × N           batch events
//!  └─ other      InvalidPath
//! ```
//!
//! Files are converted strictly one after another. Every backend call is
//! bounded by [`ConversionConfig::timeout`]; a per-file failure is recorded
//! in the report and the batch continues. The only per-file error that ends
//! a batch early is [`BackendError::ToolMissing`], because every remaining
//! file would fail the same way.

use crate::backend::{select_backend, ConversionBackend, Platform};
use crate::config::ConversionConfig;
use crate::error::{BackendError, Office2PdfError};
use crate::family::{is_supported_path, DocumentFamily};
use crate::job::ConversionJob;
use crate::output::{ConversionReport, FileOutcome, FileStatus, RunMode, SkipReason};
use crate::pipeline::input::{self, InputKind};
use crate::pipeline::walk;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Convert a file, or every supported document under a directory.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(ConversionReport)` once every file was attempted, even if some
/// failed (check [`ConversionReport::is_success`]).
///
/// # Errors
/// Returns `Err(Office2PdfError)` only for fatal errors:
/// - path not found, or neither a file nor a directory
/// - unreadable directory root
/// - conversion tool not installed, or gone mid-run
pub async fn convert_path(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionReport, Office2PdfError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting conversion: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let path = input::resolve_input_path(input_str)?;
    let kind = input::input_kind(&path);
    if kind == InputKind::Other {
        return Err(Office2PdfError::InvalidPath { path });
    }

    // ── Step 2: Pick backend ─────────────────────────────────────────────
    let backend = select_backend(config)?;
    debug!("Using backend '{}' ({})", backend.name(), Platform::current());

    // ── Step 3: Convert ──────────────────────────────────────────────────
    let (mode, discovered, outcomes) = match kind {
        InputKind::File => {
            let outcome = run_job(backend.as_ref(), &path, 1, 1, config).await;
            short_circuit(&outcome, 0)?;
            (RunMode::SingleFile, 1, vec![outcome])
        }
        _ => {
            let files = walk::discover_documents(&path, config.include_lock_files)?;
            let total = files.len();
            info!("Found {} files under {}", total, path.display());
            if let Some(ref cb) = config.progress_callback {
                cb.on_batch_start(total);
            }

            let mut outcomes = Vec::with_capacity(total);
            for (i, file) in files.iter().enumerate() {
                let outcome = run_job(backend.as_ref(), file, i + 1, total, config).await;
                short_circuit(&outcome, total - i - 1)?;
                outcomes.push(outcome);
            }
            (RunMode::Directory, total, outcomes)
        }
    };

    let report = ConversionReport {
        platform: Platform::current(),
        backend: backend.name().to_string(),
        mode,
        discovered,
        outcomes,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} converted, {} failed, {} skipped in {}ms",
        report.converted(),
        report.failed(),
        report.skipped(),
        report.total_duration_ms
    );

    if mode == RunMode::Directory {
        if let Some(ref cb) = config.progress_callback {
            cb.on_batch_complete(&report);
        }
    }

    Ok(report)
}

/// Convert exactly one file, whatever its extension.
///
/// Unsupported files come back as a [`FileStatus::Skipped`] outcome rather
/// than an error. Fires file events only.
pub async fn convert_file(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<FileOutcome, Office2PdfError> {
    let path = path.as_ref();
    match input::input_kind(path) {
        InputKind::File => {}
        _ if !path.exists() => {
            return Err(Office2PdfError::PathNotFound {
                path: path.to_path_buf(),
            })
        }
        _ => {
            return Err(Office2PdfError::InvalidPath {
                path: path.to_path_buf(),
            })
        }
    }

    let backend = select_backend(config)?;
    let outcome = run_job(backend.as_ref(), path, 1, 1, config).await;
    short_circuit(&outcome, 0)?;
    Ok(outcome)
}

/// Synchronous wrapper around [`convert_path`].
///
/// Creates a temporary current-thread tokio runtime internally. The runtime
/// is shut down without waiting, so a COM worker abandoned by a timeout
/// cannot hold the caller hostage.
pub fn convert_path_sync(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionReport, Office2PdfError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Office2PdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?;
    let result = rt.block_on(convert_path(input_str, config));
    rt.shutdown_background();
    result
}

/// The documents [`convert_path`] would attempt, without converting anything.
///
/// A single supported file lists itself; an unsupported one lists nothing.
/// Does not require LibreOffice or Office to be installed.
pub fn list_documents(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<Vec<PathBuf>, Office2PdfError> {
    let path = input::resolve_input_path(input_str.as_ref())?;
    match input::input_kind(&path) {
        InputKind::File if is_supported_path(&path) => Ok(vec![path]),
        InputKind::File => Ok(Vec::new()),
        InputKind::Directory => walk::discover_documents(&path, config.include_lock_files),
        InputKind::Other => Err(Office2PdfError::InvalidPath { path }),
    }
}

// ── Per-file step ────────────────────────────────────────────────────────

/// Classify, convert under the timeout, log, and notify. Never fails: every
/// outcome, including a missing tool, is folded into the returned record.
async fn run_job(
    backend: &dyn ConversionBackend,
    source: &Path,
    index: usize,
    total: usize,
    config: &ConversionConfig,
) -> FileOutcome {
    let start = Instant::now();
    let job = ConversionJob::new(source);
    let family = DocumentFamily::from_path(source);

    let family = match family {
        Some(f) if backend.supports(f) => f,
        other => {
            let reason = match other {
                Some(f) => SkipReason::UnsupportedFamily { family: f },
                None => SkipReason::UnsupportedExtension,
            };
            info!("Skipping unsupported file: {}", source.display());
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_skipped(source, &reason);
            }
            return FileOutcome {
                source: job.source,
                destination: job.destination,
                family: other,
                status: FileStatus::Skipped { skip: reason },
                tag: None,
                duration_ms: 0,
            };
        }
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_file_start(index, total, &job);
    }
    debug!(
        "[{}/{}] {} ({}) via {}",
        index,
        total,
        source.display(),
        family,
        backend.name()
    );

    let result = match tokio::time::timeout(config.timeout(), backend.convert(family, &job)).await
    {
        Ok(r) => r,
        Err(_) => {
            warn!(
                "Conversion of {} exceeded {}s; abandoning it",
                source.display(),
                config.timeout_secs
            );
            Err(BackendError::Timeout {
                secs: config.timeout_secs,
            })
        }
    };
    let duration_ms = start.elapsed().as_millis() as u64;
    let tag = backend.tag(family);

    let status = match result {
        Ok(()) => {
            info!(
                "[{}] {} -> {} ({}ms)",
                tag,
                source.display(),
                job.destination.display(),
                duration_ms
            );
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_converted(&job, tag, duration_ms);
            }
            FileStatus::Converted
        }
        Err(e) => {
            error!("Failed to convert {}: {}", source.display(), e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_failed(&job, &e);
            }
            FileStatus::Failed { error: e }
        }
    };

    FileOutcome {
        source: job.source,
        destination: job.destination,
        family: Some(family),
        status,
        tag: Some(tag.to_string()),
        duration_ms,
    }
}

/// Escalate a missing tool into a fatal error; `remaining` files are abandoned.
fn short_circuit(outcome: &FileOutcome, remaining: usize) -> Result<(), Office2PdfError> {
    match outcome.error() {
        Some(BackendError::ToolMissing { program }) => {
            error!(
                "Conversion tool '{}' is gone; abandoning {} remaining file(s)",
                program, remaining
            );
            Err(Office2PdfError::ToolUnavailable {
                program: PathBuf::from(program),
                remaining,
            })
        }
        _ => Ok(()),
    }
}

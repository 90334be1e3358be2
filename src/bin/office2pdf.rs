//! CLI binary for edgequake-office2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_office2pdf::{
    convert_path_sync, list_documents, BackendError, ConversionConfig, ConversionJob,
    ConversionProgressCallback, ConversionReport, Office2PdfError, ProgressCallback, SkipReason,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: prints one line per file on stdout and, in
/// directory mode, keeps a progress bar anchored at the bottom of stderr.
struct CliProgressCallback {
    /// Created by `on_batch_start`; never set in single-file mode.
    bar: OnceLock<ProgressBar>,
    show_bar: bool,
    /// Only `[ERROR]` lines.
    quiet: bool,
    /// Colour only when stdout is a terminal.
    color: bool,
}

impl CliProgressCallback {
    fn new(show_bar: bool, quiet: bool) -> Arc<Self> {
        Arc::new(Self {
            bar: OnceLock::new(),
            show_bar,
            quiet,
            color: io::stdout().is_terminal(),
        })
    }

    fn paint(&self, style: fn(&str) -> String, s: &str) -> String {
        if self.color {
            style(s)
        } else {
            s.to_string()
        }
    }

    /// Print above the bar so the two never interleave.
    fn emit(&self, line: String) {
        match self.bar.get() {
            Some(bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    fn advance(&self) {
        if let Some(bar) = self.bar.get() {
            bar.inc(1);
        }
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        if !self.quiet {
            self.emit(format!("Found {total_files} files. Converting..."));
        }
        if !self.show_bar || total_files == 0 {
            return;
        }

        let bar = ProgressBar::new(total_files as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} files  \
                 ⏱ {elapsed_precise}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));
        let _ = self.bar.set(bar);
    }

    fn on_file_start(&self, _index: usize, _total: usize, job: &ConversionJob) {
        if let Some(bar) = self.bar.get() {
            bar.set_message(job.source_name());
        }
    }

    fn on_file_converted(&self, job: &ConversionJob, tag: &str, elapsed_ms: u64) {
        if !self.quiet {
            self.emit(format!(
                "{} {} -> {}  {}",
                self.paint(green, &format!("[{tag}]")),
                job.source_name(),
                job.destination_name(),
                self.paint(dim, &format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
            ));
        }
        self.advance();
    }

    fn on_file_failed(&self, job: &ConversionJob, error: &BackendError) {
        self.emit(format!(
            "{} {}: {}",
            self.paint(red, "[ERROR]"),
            job.source_name(),
            error
        ));
        self.advance();
    }

    fn on_file_skipped(&self, source: &Path, reason: &SkipReason) {
        if self.quiet {
            return;
        }
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        let line = match reason {
            SkipReason::UnsupportedExtension => format!("Unsupported file: {name}"),
            SkipReason::UnsupportedFamily { family } => {
                format!("Unsupported file: {name} (no {family} converter)")
            }
        };
        self.emit(format!("{} {line}", self.paint(cyan, "[SKIP]")));
    }

    fn on_batch_complete(&self, report: &ConversionReport) {
        if let Some(bar) = self.bar.get() {
            bar.finish_and_clear();
        }
        if self.quiet {
            return;
        }

        println!("All files converted.");
        let failed = report.failed();
        if failed > 0 {
            println!(
                "{} {}/{} files failed  {}",
                self.paint(red, "✘"),
                self.paint(bold, &failed.to_string()),
                report.discovered,
                self.paint(dim, &format!("{}ms total", report.total_duration_ms)),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one document (PDF lands next to it)
  office2pdf report.docx

  # Convert every Word/Excel/PowerPoint file under a folder, recursively
  office2pdf ~/Documents/quarterly

  # Show what would be converted
  office2pdf --list-only ~/Documents/quarterly

  # Use a specific LibreOffice build and a longer timeout
  office2pdf --soffice /opt/libreoffice25.2/program/soffice --timeout 900 big.xlsx

  # Machine-readable report
  office2pdf --json ~/Documents/quarterly > report.json

SUPPORTED FILES:
  Family          Extensions            Windows (COM)   Elsewhere
  ──────────────  ────────────────────  ──────────────  ─────────────
  word-processor  .docx .doc            Word            soffice
  spreadsheet     .xlsx .xls .xlsm      Excel           soffice
  presentation    .pptx .ppt .pptm      PowerPoint      soffice

  Office lock files (~$name.docx) are ignored unless --include-lock-files.

ENVIRONMENT VARIABLES:
  SOFFICE_PATH            LibreOffice executable (lower priority than --soffice)
  OFFICE2PDF_TIMEOUT      Per-file timeout in seconds
  OFFICE2PDF_SOFFICE      Same as --soffice
  RUST_LOG                Override the tracing filter (e.g. office2pdf=debug)

EXIT STATUS:
  0  every attempted file converted (skipped files do not count)
  1  path missing or invalid, converter not found, or any file failed
"#;

/// Convert Word, Excel and PowerPoint documents to PDF.
#[derive(Parser, Debug)]
#[command(
    name = "office2pdf",
    version,
    about = "Convert Word, Excel and PowerPoint documents to PDF",
    long_about = "Convert a single office document, or every office document under a directory \
(recursively), to PDF. Uses Microsoft Office via COM automation on Windows and headless \
LibreOffice (soffice) everywhere else. Each PDF is written next to its source.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Office document or directory to convert.
    path: String,

    /// Per-file conversion timeout in seconds.
    #[arg(long, env = "OFFICE2PDF_TIMEOUT", default_value_t = 300,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// LibreOffice executable (ignored on Windows).
    #[arg(long, env = "OFFICE2PDF_SOFFICE")]
    soffice: Option<PathBuf>,

    /// Run soffice against the user's own LibreOffice profile.
    #[arg(
        long,
        env = "OFFICE2PDF_SHARED_PROFILE",
        long_help = "Run soffice against the user's own LibreOffice profile instead of a \
          temporary one. Faster start-up, but conversions silently do nothing while a \
          LibreOffice window is open."
    )]
    shared_profile: bool,

    /// Also convert Office owner files (~$name.docx).
    #[arg(long, env = "OFFICE2PDF_INCLUDE_LOCK_FILES")]
    include_lock_files: bool,

    /// Print the files that would be converted, convert nothing.
    #[arg(long)]
    list_only: bool,

    /// Output the ConversionReport as JSON instead of per-file lines.
    #[arg(long, env = "OFFICE2PDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "OFFICE2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OFFICE2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "OFFICE2PDF_QUIET")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the per-file lines carry everything the user needs.
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.json && !cli.list_only && io::stderr().is_terminal();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli, show_progress) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", red("error:"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, show_progress: bool) -> Result<ExitCode> {
    // ── List-only mode ───────────────────────────────────────────────────
    if cli.list_only {
        let config = build_config(cli, None)?;
        let files = match list_documents(&cli.path, &config) {
            Ok(files) => files,
            Err(e) => return Ok(report_fatal(&e)),
        };

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&files).context("Failed to serialise file list")?
            );
        } else {
            for file in &files {
                println!("{}", file.display());
            }
            if !cli.quiet {
                eprintln!("{} {} file(s)", cyan("◆"), files.len());
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if cli.json {
        None
    } else {
        let cb = CliProgressCallback::new(show_progress, cli.quiet);
        Some(cb as Arc<dyn ConversionProgressCallback>)
    };
    let config = build_config(cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let report = match convert_path_sync(&cli.path, &config) {
        Ok(report) => report,
        Err(e) => return Ok(report_fatal(&e)),
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Print a fatal library error the way the user expects to see it.
fn report_fatal(err: &Office2PdfError) -> ExitCode {
    match err {
        // Plain answers to a bad argument, not diagnostics.
        Office2PdfError::PathNotFound { .. } | Office2PdfError::InvalidPath { .. } => {
            println!("{err}");
        }
        _ => eprintln!("{} {err}", red("error:")),
    }
    ExitCode::FAILURE
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .timeout_secs(cli.timeout)
        .isolated_profile(!cli.shared_profile)
        .include_lock_files(cli.include_lock_files);

    if let Some(ref path) = cli.soffice {
        builder = builder.soffice_path(path);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

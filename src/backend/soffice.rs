//! LibreOffice adapter: `soffice --headless --convert-to pdf`.
//!
//! One adapter serves all three document families; LibreOffice picks the
//! import filter from the file itself. The command line is:
//!
//! ```text
//! soffice -env:UserInstallation=file:///tmp/.tmpXXXX \
//!         --headless --convert-to pdf --outdir <dir of source> <source>
//! ```
//!
//! `soffice` names the output `<stem>.pdf` inside `--outdir`, which is exactly
//! [`ConversionJob::destination`].
//!
//! ## Why check the output file?
//!
//! When another LibreOffice process owns the user profile, `soffice` hands the
//! request to it (or drops it) and exits 0 without writing anything. A zero
//! exit status alone is therefore not proof of success. Any PDF left by an
//! earlier run is removed first, so "the file exists afterwards" is.
//!
//! On Unix the launcher runs in its own process group; a timed-out
//! conversion takes the whole `soffice` → `oosplash` → `soffice.bin` tree
//! down with it instead of leaving a worker that still holds the profile.

use super::ConversionBackend;
use crate::config::ConversionConfig;
use crate::error::{BackendError, Office2PdfError};
use crate::family::DocumentFamily;
use crate::job::ConversionJob;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;

/// Converts documents by running the LibreOffice `soffice` executable.
#[derive(Debug)]
pub struct SofficeBackend {
    program: PathBuf,
    /// Private user profile; removed when the backend is dropped.
    profile: Option<TempDir>,
}

impl SofficeBackend {
    /// Use `program` as the `soffice` executable.
    ///
    /// With `isolated_profile`, a temporary LibreOffice profile directory is
    /// created now and shared by every conversion this backend runs.
    pub fn new(program: impl Into<PathBuf>, isolated_profile: bool) -> Result<Self, Office2PdfError> {
        let profile = if isolated_profile {
            Some(
                tempfile::Builder::new()
                    .prefix("office2pdf-profile-")
                    .tempdir()
                    .map_err(|e| {
                        Office2PdfError::Internal(format!(
                            "Failed to create LibreOffice profile directory: {e}"
                        ))
                    })?,
            )
        } else {
            None
        };

        Ok(Self {
            program: program.into(),
            profile,
        })
    }

    /// Locate `soffice` (see [`soffice_locate::locate_soffice`]) and build a backend.
    pub fn from_config(config: &ConversionConfig) -> Result<Self, Office2PdfError> {
        let program = soffice_locate::locate_soffice(config.soffice_path.as_deref())?;
        Self::new(program, config.isolated_profile)
    }

    /// The executable this backend runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Full argument vector for `job`, excluding the program itself.
    pub fn args(&self, job: &ConversionJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(7);
        if let Some(ref profile) = self.profile {
            args.push(format!("-env:UserInstallation={}", file_url(profile.path())).into());
        }
        args.push("--headless".into());
        args.push("--convert-to".into());
        args.push("pdf".into());
        args.push("--outdir".into());
        args.push(job.output_dir().as_os_str().to_owned());
        args.push(job.source.as_os_str().to_owned());
        args
    }

    fn program_label(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

#[async_trait]
impl ConversionBackend for SofficeBackend {
    fn name(&self) -> &str {
        "soffice"
    }

    async fn convert(
        &self,
        _family: DocumentFamily,
        job: &ConversionJob,
    ) -> Result<(), BackendError> {
        // soffice exits 0 without writing when it hands the request to another
        // instance; an old PDF left in place would look like success.
        match tokio::fs::remove_file(&job.destination).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(BackendError::StaleOutput {
                    path: job.destination.display().to_string(),
                    detail: e.to_string(),
                })
            }
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(job))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // `soffice` is a launcher script; the worker (`soffice.bin`) is a
        // grandchild. Its own group lets a timeout kill the whole tree.
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BackendError::ToolMissing {
                    program: self.program.display().to_string(),
                }
            } else {
                BackendError::Spawn {
                    program: self.program_label(),
                    detail: e.to_string(),
                }
            }
        })?;

        let group = ProcessGroup::new(child.id());
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| BackendError::Spawn {
                program: self.program_label(),
                detail: e.to_string(),
            })?;
        group.disarm();

        if !output.status.success() {
            return Err(BackendError::ExitStatus {
                program: self.program_label(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        if tokio::fs::metadata(&job.destination)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
        {
            Ok(())
        } else {
            Err(BackendError::OutputMissing {
                path: job.destination.display().to_string(),
            })
        }
    }
}

/// Kills the child's whole process group when dropped while armed.
///
/// Armed for the lifetime of the `wait`; if the timeout drops the conversion
/// future first, the group goes down with it.
struct ProcessGroup {
    #[cfg_attr(not(unix), allow(dead_code))]
    pgid: Option<u32>,
}

impl ProcessGroup {
    fn new(pid: Option<u32>) -> Self {
        Self { pgid: pid }
    }

    fn disarm(mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Some(pgid) = self.pgid.and_then(|p| libc::pid_t::try_from(p).ok()) {
            // ESRCH (group already gone) is fine.
            unsafe {
                libc::killpg(pgid, libc::SIGKILL);
            }
        }
    }
}

/// `file://` URL for an absolute path, as LibreOffice's `-env:` expects.
fn file_url(path: &Path) -> String {
    let mut url = String::from("file://");
    for ch in path.to_string_lossy().chars() {
        match ch {
            ' ' => url.push_str("%20"),
            '%' => url.push_str("%25"),
            '#' => url.push_str("%23"),
            '?' => url.push_str("%3F"),
            c => url.push(c),
        }
    }
    url
}

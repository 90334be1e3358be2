//! # soffice-locate
//!
//! Find the LibreOffice `soffice` executable so callers can drive headless
//! conversions (`soffice --headless --convert-to pdf …`) without asking users
//! to configure anything on a standard install.
//!
//! ## How it works
//!
//! [`locate_soffice`] walks a fixed search order and returns the first hit:
//!
//! 1. An explicit path supplied by the caller. If it is missing, that is an
//!    error; there is no fallback.
//! 2. The `SOFFICE_PATH` environment variable.
//! 3. The vendor tarball location [`FIXED_INSTALL_PATH`].
//! 4. Any other `/opt/libreoffice*/program/soffice`, newest version first.
//! 5. Distribution and macOS bundle locations (see [`candidate_paths`]).
//! 6. `soffice` or `libreoffice` on `PATH`.
//!
//! Steps 3–6 touch the file system, so their result is cached for the
//! process lifetime. Steps 1–2 are re-evaluated on every call.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use soffice_locate::locate_soffice;
//!
//! let soffice = locate_soffice(None).expect("LibreOffice is not installed");
//! println!("using {}", soffice.display());
//! ```
//!
//! ## Environment variable overrides
//!
//! - `SOFFICE_PATH` — path to an existing `soffice` executable; skips probing.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variable holding an explicit `soffice` path.
pub const SOFFICE_PATH_ENV: &str = "SOFFICE_PATH";

/// Install location of the LibreOffice 25.2 vendor tarball on Linux.
pub const FIXED_INSTALL_PATH: &str = "/opt/libreoffice25.2/program/soffice";

/// Executable names tried on `PATH`, in order.
const PATH_NAMES: &[&str] = &["soffice", "libreoffice"];

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by [`locate_soffice`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// The caller named a path and nothing executable lives there.
    #[error("LibreOffice executable not found at '{}'", .path.display())]
    ExplicitPathMissing { path: PathBuf },

    /// `SOFFICE_PATH` is set but points nowhere useful.
    #[error("SOFFICE_PATH is set to '{}', which is not an executable file", .path.display())]
    EnvPathMissing { path: PathBuf },

    /// Every location in the search order came up empty.
    #[error(
        "LibreOffice was not found. Make sure LibreOffice is installed and on PATH, \
or set SOFFICE_PATH.\nSearched:\n{}",
        format_searched(.searched)
    )]
    NotFound { searched: Vec<PathBuf> },
}

fn format_searched(searched: &[PathBuf]) -> String {
    searched
        .iter()
        .map(|p| format!("  • {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Thread-safe singleton path cache ─────────────────────────────────────────

static PROBED_PATH: OnceLock<Result<PathBuf, LocateError>> = OnceLock::new();

// ── Public API ───────────────────────────────────────────────────────────────

/// Resolve the `soffice` executable.
///
/// `explicit` takes precedence over everything else and is never cached.
///
/// # Errors
///
/// - [`LocateError::ExplicitPathMissing`] when `explicit` is not an
///   executable file.
/// - [`LocateError::EnvPathMissing`] when `SOFFICE_PATH` is set to a bad path.
/// - [`LocateError::NotFound`] when probing found nothing; carries the list
///   of locations that were searched.
pub fn locate_soffice(explicit: Option<&Path>) -> Result<PathBuf, LocateError> {
    if let Some(path) = explicit {
        return if is_executable_file(path) {
            Ok(path.to_path_buf())
        } else {
            Err(LocateError::ExplicitPathMissing {
                path: path.to_path_buf(),
            })
        };
    }

    if let Some(value) = std::env::var_os(SOFFICE_PATH_ENV) {
        if !value.is_empty() {
            let path = PathBuf::from(value);
            return if is_executable_file(&path) {
                Ok(path)
            } else {
                Err(LocateError::EnvPathMissing { path })
            };
        }
    }

    PROBED_PATH.get_or_init(probe).clone()
}

/// Fixed locations probed before falling back to `PATH`, in search order.
///
/// The list is platform-specific; entries that do not exist are kept so
/// diagnostics can show what was tried.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if cfg!(target_os = "linux") {
        paths.push(PathBuf::from(FIXED_INSTALL_PATH));
        for dir in versioned_opt_installs(Path::new("/opt")) {
            if !paths.contains(&dir) {
                paths.push(dir);
            }
        }
        paths.extend(
            [
                "/usr/bin/soffice",
                "/usr/local/bin/soffice",
                "/usr/lib/libreoffice/program/soffice",
                "/usr/lib64/libreoffice/program/soffice",
                "/snap/bin/libreoffice",
            ]
            .iter()
            .map(PathBuf::from),
        );
    } else if cfg!(target_os = "macos") {
        paths.push(PathBuf::from(
            "/Applications/LibreOffice.app/Contents/MacOS/soffice",
        ));
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join("Applications/LibreOffice.app/Contents/MacOS/soffice"));
        }
        paths.push(PathBuf::from("/opt/homebrew/bin/soffice"));
        paths.push(PathBuf::from("/usr/local/bin/soffice"));
    } else if cfg!(windows) {
        paths.push(PathBuf::from(
            r"C:\Program Files\LibreOffice\program\soffice.exe",
        ));
        paths.push(PathBuf::from(
            r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
        ));
    } else {
        // Other Unixes (FreeBSD, illumos, …) install through ports/pkgsrc.
        paths.push(PathBuf::from("/usr/local/bin/soffice"));
        paths.push(PathBuf::from("/usr/local/lib/libreoffice/program/soffice"));
    }

    paths
}

// ── Internals ────────────────────────────────────────────────────────────────

fn probe() -> Result<PathBuf, LocateError> {
    let candidates = candidate_paths();
    if let Some(found) = candidates.iter().find(|p| is_executable_file(p)) {
        return Ok(found.clone());
    }

    for name in PATH_NAMES {
        if let Ok(found) = which::which(name) {
            return Ok(found);
        }
    }

    let mut searched = candidates;
    searched.extend(PATH_NAMES.iter().map(|n| PathBuf::from(format!("$PATH/{n}"))));
    Err(LocateError::NotFound { searched })
}

/// `<root>/libreoffice*/program/soffice`, highest version first.
fn versioned_opt_installs(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name.starts_with("libreoffice"))
        .collect();
    names.sort_unstable_by_key(|name| std::cmp::Reverse(version_key(name)));

    names
        .into_iter()
        .map(|name| root.join(name).join("program").join("soffice"))
        .collect()
}

/// `libreoffice25.2` → `[25, 2]`; non-numeric parts sort lowest.
fn version_key(dir_name: &str) -> Vec<u32> {
    dir_name
        .trim_start_matches("libreoffice")
        .split('.')
        .map(|part| part.parse().unwrap_or(0))
        .collect()
}

fn is_executable_file(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_path_is_an_error() {
        let missing = Path::new("/definitely/not/here/soffice");
        let err = locate_soffice(Some(missing)).unwrap_err();
        assert_eq!(
            err,
            LocateError::ExplicitPathMissing {
                path: missing.to_path_buf()
            }
        );
        assert!(err.to_string().contains("/definitely/not/here/soffice"));
    }

    #[cfg(unix)]
    #[test]
    fn explicit_executable_is_returned_verbatim() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("soffice");
        std::fs::write(&exe, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(locate_soffice(Some(&exe)).unwrap(), exe);
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("soffice");
        std::fs::write(&plain, "not a program").unwrap();

        assert!(locate_soffice(Some(&plain)).is_err());
    }

    /// The only test in this crate that touches `SOFFICE_PATH`.
    #[cfg(unix)]
    #[test]
    fn env_override_is_read_on_every_call() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        std::env::set_var(SOFFICE_PATH_ENV, &missing);
        assert_eq!(
            locate_soffice(None).unwrap_err(),
            LocateError::EnvPathMissing { path: missing }
        );

        let exe = dir.path().join("soffice");
        std::fs::write(&exe, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();
        std::env::set_var(SOFFICE_PATH_ENV, &exe);
        let found = locate_soffice(None);
        std::env::remove_var(SOFFICE_PATH_ENV);
        assert_eq!(found.unwrap(), exe);
    }

    #[test]
    fn directories_are_not_executables() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_executable_file(dir.path()));
    }

    #[test]
    fn versioned_installs_sorted_newest_first() {
        let root = tempfile::tempdir().unwrap();
        for name in ["libreoffice7.6", "libreoffice25.2", "libreoffice24.8", "openoffice4"] {
            std::fs::create_dir(root.path().join(name)).unwrap();
        }

        let found = versioned_opt_installs(root.path());
        let names: Vec<String> = found
            .iter()
            .map(|p| {
                p.strip_prefix(root.path())
                    .unwrap()
                    .components()
                    .next()
                    .unwrap()
                    .as_os_str()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();

        assert_eq!(names, vec!["libreoffice25.2", "libreoffice24.8", "libreoffice7.6"]);
        assert!(found.iter().all(|p| p.ends_with("program/soffice")));
    }

    #[test]
    fn missing_root_yields_no_versioned_installs() {
        assert!(versioned_opt_installs(Path::new("/definitely/not/a/dir")).is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn fixed_install_path_is_probed_first_on_linux() {
        let paths = candidate_paths();
        assert_eq!(paths[0], PathBuf::from(FIXED_INSTALL_PATH));
    }

    #[test]
    fn not_found_lists_searched_locations() {
        let err = LocateError::NotFound {
            searched: vec![PathBuf::from("/a/soffice"), PathBuf::from("/b/soffice")],
        };
        let msg = err.to_string();
        assert!(msg.contains("/a/soffice"), "got: {msg}");
        assert!(msg.contains("/b/soffice"), "got: {msg}");
        assert!(msg.contains(SOFFICE_PATH_ENV), "got: {msg}");
    }
}

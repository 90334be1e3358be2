//! Recursive discovery of convertible documents under a directory.
//!
//! Rules:
//! - only regular files are yielded; symlinks to files are followed, symlinks
//!   to directories are not (no cycles);
//! - entries are visited in byte-wise lexicographic order within each
//!   directory, files and subdirectories interleaved, so the same tree
//!   always produces the same job order;
//! - an unreadable root is fatal, an unreadable subdirectory is logged and
//!   skipped;
//! - Office owner files (`~$report.docx`) are dropped unless requested.

use crate::error::Office2PdfError;
use crate::family::is_supported_path;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Every supported document under `root`, in discovery order.
pub fn discover_documents(
    root: &Path,
    include_lock_files: bool,
) -> Result<Vec<PathBuf>, Office2PdfError> {
    let entries = read_sorted(root).map_err(|source| Office2PdfError::WalkFailed {
        path: root.to_path_buf(),
        source,
    })?;

    let mut found = Vec::new();
    visit(entries, include_lock_files, &mut found);
    debug!("Discovered {} document(s) under {}", found.len(), root.display());
    Ok(found)
}

/// `~$name.ext`: the owner file Office keeps next to an open document.
pub fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"))
}

fn visit(entries: Vec<PathBuf>, include_lock_files: bool, found: &mut Vec<PathBuf>) {
    for path in entries {
        let Ok(link_meta) = std::fs::symlink_metadata(&path) else {
            continue;
        };

        if link_meta.is_dir() {
            match read_sorted(&path) {
                Ok(children) => visit(children, include_lock_files, found),
                Err(e) => warn!("Skipping unreadable directory {}: {}", path.display(), e),
            }
            continue;
        }

        // Resolves file symlinks; a dangling link or a link to a directory
        // fails the `is_file` check.
        let is_file = std::fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
        if !is_file || !is_supported_path(&path) {
            continue;
        }
        if !include_lock_files && is_lock_file(&path) {
            debug!("Ignoring Office lock file {}", path.display());
            continue;
        }
        found.push(path);
    }
}

fn read_sorted(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect::<Vec<_>>();
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn names(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn filters_and_orders_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("b.xlsx"));
        touch(&root.join("a.docx"));
        touch(&root.join("c.txt"));
        touch(&root.join("sub/deck.PPTX"));
        touch(&root.join("sub/notes.md"));
        touch(&root.join("sub/deeper/old.doc"));

        let found = discover_documents(root, false).unwrap();
        assert_eq!(
            names(root, &found),
            vec!["a.docx", "b.xlsx", "sub/deck.PPTX", "sub/deeper/old.doc"]
        );
    }

    #[test]
    fn lock_files_excluded_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("report.docx"));
        touch(&root.join("~$report.docx"));

        let found = discover_documents(root, false).unwrap();
        assert_eq!(names(root, &found), vec!["report.docx"]);

        let found = discover_documents(root, true).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn directory_named_like_document_is_descended() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("weird.docx")).unwrap();
        touch(&root.join("weird.docx/inner.xls"));

        let found = discover_documents(root, false).unwrap();
        assert_eq!(names(root, &found), vec!["weird.docx/inner.xls"]);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_documents(dir.path(), false).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_walk_failed() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_documents(&dir.path().join("gone"), false).unwrap_err();
        assert!(matches!(err, Office2PdfError::WalkFailed { .. }));
    }

    #[test]
    fn lock_file_detection() {
        assert!(is_lock_file(Path::new("/x/~$Budget.xlsx")));
        assert!(!is_lock_file(Path::new("/x/Budget~$.xlsx")));
        assert!(!is_lock_file(Path::new("/x/~Budget.xlsx")));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("a.docx"));
        touch(&root.join("locked/hidden.xlsx"));
        touch(&root.join("z/deck.pptx"));

        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // root ignores permission bits; nothing to check there.
        let readable_anyway = fs::read_dir(&locked).is_ok();

        let found = discover_documents(root, false);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if readable_anyway {
            return;
        }

        assert_eq!(names(root, &found.unwrap()), vec!["a.docx", "z/deck.pptx"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        touch(&root.join("a.docx"));
        std::os::unix::fs::symlink(&root, root.join("loop")).unwrap();

        let found = discover_documents(&root, false).unwrap();
        assert_eq!(names(&root, &found), vec!["a.docx"]);
    }
}

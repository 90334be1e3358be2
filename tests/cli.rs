//! Tests for the `office2pdf` binary: messages on stdout and exit status.
//!
//! Conversions use a fake `soffice` shell script, so the converting tests
//! are Unix-only. Run with:
//!   cargo test --test cli

use std::path::Path;
use std::process::{Command, Output};

fn office2pdf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_office2pdf"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("SOFFICE_PATH")
        .env_remove("OFFICE2PDF_SOFFICE")
        .env_remove("OFFICE2PDF_JSON")
        .env_remove("OFFICE2PDF_QUIET")
        .env_remove("OFFICE2PDF_TIMEOUT")
        .output()
        .expect("failed to run office2pdf")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"PK\x03\x04").unwrap();
}

#[test]
fn test_no_arguments_prints_help() {
    let out = office2pdf(&[]);
    assert!(!out.status.success());
    let text = format!("{}{}", stdout(&out), String::from_utf8_lossy(&out.stderr));
    assert!(text.contains("Usage"), "got: {text}");
}

#[test]
fn test_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nowhere");
    let out = office2pdf(&[missing.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(
        stdout(&out).starts_with("Error: path not found:"),
        "got: {}",
        stdout(&out)
    );
}

#[test]
fn test_zero_timeout_is_rejected_by_clap() {
    let dir = tempfile::tempdir().unwrap();
    let out = office2pdf(&["--timeout", "0", dir.path().to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("--timeout"));
}

#[test]
fn test_list_only() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("a.docx"));
    touch(&dir.path().join("b.xlsx"));
    touch(&dir.path().join("c.txt"));
    touch(&dir.path().join("~$a.docx"));

    let out = office2pdf(&["--list-only", dir.path().to_str().unwrap()]);
    assert!(out.status.success());
    let listed: Vec<String> = stdout(&out).lines().map(str::to_string).collect();
    assert_eq!(listed.len(), 2, "got: {listed:?}");
    assert!(listed[0].ends_with("a.docx"));
    assert!(listed[1].ends_with("b.xlsx"));
    assert!(!dir.path().join("a.pdf").exists());
}

#[cfg(unix)]
mod with_fake_soffice {
    use super::{office2pdf, stdout, touch};
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    static SPAWN_LOCK: Mutex<()> = Mutex::new(());

    const SCRIPT: &str = r#"#!/bin/sh
outdir=""
src=""
while [ $# -gt 0 ]; do
  case "$1" in
    --outdir) outdir="$2"; shift 2 ;;
    -*) shift ;;
    *) src="$1"; shift ;;
  esac
done
name=$(basename "$src")
stem="${name%.*}"
case "$stem" in
  fail*) echo "cannot load" >&2; exit 2 ;;
esac
printf '%%PDF-1.4\n' > "$outdir/$stem.pdf"
"#;

    fn install(dir: &Path) -> PathBuf {
        let path = dir.join("soffice");
        std::fs::write(&path, SCRIPT).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_directory_run_messages() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let tools = tempfile::tempdir().unwrap();
        let soffice = install(tools.path());
        let docs = tempfile::tempdir().unwrap();
        touch(&docs.path().join("a.docx"));
        touch(&docs.path().join("b.xlsx"));
        touch(&docs.path().join("c.txt"));

        let out = office2pdf(&[
            "--no-progress",
            "--soffice",
            soffice.to_str().unwrap(),
            docs.path().to_str().unwrap(),
        ]);
        let text = stdout(&out);

        assert_eq!(out.status.code(), Some(0), "stdout: {text}");
        assert!(text.contains("Found 2 files. Converting..."), "{text}");
        assert!(text.contains("[PDF] a.docx -> a.pdf"), "{text}");
        assert!(text.contains("[PDF] b.xlsx -> b.pdf"), "{text}");
        assert!(text.contains("All files converted."), "{text}");
        assert!(!text.contains("c.txt"), "{text}");
    }

    #[test]
    fn test_single_unsupported_file() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let tools = tempfile::tempdir().unwrap();
        let soffice = install(tools.path());
        let docs = tempfile::tempdir().unwrap();
        let txt = docs.path().join("c.txt");
        touch(&txt);

        let out = office2pdf(&["--soffice", soffice.to_str().unwrap(), txt.to_str().unwrap()]);
        let text = stdout(&out);
        assert_eq!(out.status.code(), Some(0));
        assert!(text.contains("[SKIP] Unsupported file: c.txt"), "{text}");
        assert!(!text.contains("Found"), "{text}");
    }

    #[test]
    fn test_failure_sets_exit_status() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let tools = tempfile::tempdir().unwrap();
        let soffice = install(tools.path());
        let docs = tempfile::tempdir().unwrap();
        touch(&docs.path().join("fail.pptx"));
        touch(&docs.path().join("ok.pptx"));

        let out = office2pdf(&[
            "--no-progress",
            "--soffice",
            soffice.to_str().unwrap(),
            docs.path().to_str().unwrap(),
        ]);
        let text = stdout(&out);
        assert_eq!(out.status.code(), Some(1), "{text}");
        assert!(text.contains("[ERROR] fail.pptx:"), "{text}");
        assert!(text.contains("[PDF] ok.pptx -> ok.pdf"), "{text}");
        assert!(docs.path().join("ok.pdf").is_file());
    }

    #[test]
    fn test_json_report() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let tools = tempfile::tempdir().unwrap();
        let soffice = install(tools.path());
        let docs = tempfile::tempdir().unwrap();
        let src = docs.path().join("report.pptx");
        touch(&src);

        let out = office2pdf(&[
            "--json",
            "--soffice",
            soffice.to_str().unwrap(),
            src.to_str().unwrap(),
        ]);
        assert!(out.status.success());
        let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
        assert_eq!(json["mode"], "single_file");
        assert_eq!(json["outcomes"][0]["status"], "converted");
        assert!(docs.path().join("report.pdf").is_file());
    }

    #[test]
    fn test_missing_soffice_reports_search() {
        let docs = tempfile::tempdir().unwrap();
        touch(&docs.path().join("a.docx"));
        let bogus = docs.path().join("missing-soffice");

        let out = office2pdf(&[
            "--soffice",
            bogus.to_str().unwrap(),
            docs.path().to_str().unwrap(),
        ]);
        assert_eq!(out.status.code(), Some(1));
        let err = String::from_utf8_lossy(&out.stderr);
        assert!(err.contains("missing-soffice"), "{err}");
        assert!(!docs.path().join("a.pdf").exists());
    }
}

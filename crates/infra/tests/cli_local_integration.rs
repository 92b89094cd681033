//! Integration tests for the local CLI runners against real directories.

use sigdex_infra::{LocalRunOptions, run_complete_local, run_scan_local, run_watch_local};
use sigdex_shared::{ErrorCode, ErrorEnvelope, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;

fn write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(ErrorEnvelope::from)?;
    }
    fs::write(path, contents).map_err(ErrorEnvelope::from)
}

fn project() -> Result<tempfile::TempDir> {
    let dir = tempfile::tempdir().map_err(ErrorEnvelope::from)?;
    write(
        &dir.path().join("src/server.js"),
        "function listen(port, host) {}\nhandler = function(req, res) {}\n",
    )?;
    write(&dir.path().join("src/nested/util.js"), "function helper() {}\n")?;
    write(&dir.path().join("node_modules/x/index.js"), "function hidden() {}\n")?;
    write(&dir.path().join("dist/bundle.min.js"), "function packed() {}\n")?;
    Ok(dir)
}

fn options(root: &Path) -> LocalRunOptions {
    LocalRunOptions {
        roots: vec![root.to_path_buf()],
        overrides_json: Some(r#"{"excludedFilesOrFolders": ["node_modules"]}"#.to_owned()),
        ..LocalRunOptions::default()
    }
}

#[test]
fn scan_reports_counts() -> Result<()> {
    let dir = project()?;
    let report = run_scan_local(&options(dir.path()))?;

    assert_eq!(report.indexed_files, 2);
    assert_eq!(report.functions, 3);
    assert_eq!(report.stats.eligible_files, 2);
    assert!(!report.stats.aborted);
    assert_eq!(report.roots.len(), 1);
    Ok(())
}

#[test]
fn complete_merges_buffer_symbols() -> Result<()> {
    let dir = project()?;
    let buffer = dir.path().join("scratch.js");
    write(&buffer, "function helpful(a) {}\nvar hello = 1;\n")?;

    let entries = run_complete_local(&options(dir.path()), "hel", Some(&buffer))?;
    let labels: Vec<_> = entries.iter().map(|entry| &*entry.label).collect();

    // scratch.js sits under the root, so the crawl indexed it too.
    assert_eq!(
        labels,
        vec!["helpful(a)\tscratch.js", "helper()\tutil.js", "hello\tscratch.js"]
    );
    Ok(())
}

#[test]
fn config_file_errors_surface() -> Result<()> {
    let dir = project()?;
    let mut options = options(dir.path());
    options.config_path = Some(dir.path().join("missing.toml"));

    let result = run_scan_local(&options);
    assert!(result.is_err_and(|error| {
        error.code == ErrorCode::new("config", "config_file_not_found")
    }));
    Ok(())
}

#[test]
fn watch_runs_a_scan_within_its_window() -> Result<()> {
    let dir = project()?;
    let mut options = options(dir.path());
    options.overrides_json = Some(
        r#"{"excludedFilesOrFolders": ["node_modules"], "rootChangeCheckIntervalSeconds": 1}"#
            .to_owned(),
    );

    let report = run_watch_local(&options, Duration::from_millis(1500))?;
    assert!(report.last_scan.is_some());
    assert_eq!(report.indexed_files, 2);
    assert!(report.watched_ms >= 1500);
    Ok(())
}

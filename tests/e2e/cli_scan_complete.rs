//! `sigdex scan`, `complete`, and `watch` against real temp directories.

use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_sigdex"));
    command.args(args);
    for (key, _) in std::env::vars() {
        if key.starts_with("SIGDEX_") {
            command.env_remove(key);
        }
    }
    command.output()
}

fn write_project(root: &Path) -> io::Result<()> {
    fs::create_dir_all(root.join("src"))?;
    fs::create_dir_all(root.join("node_modules/dep"))?;
    fs::write(
        root.join("app.js"),
        "function start(port, host) {\n}\nvar stop = function () {};\n",
    )?;
    fs::write(root.join("src/util.js"), "function clamp(value, lo, hi) {}\n")?;
    fs::write(root.join("app.min.js"), "function hidden(a) {}\n")?;
    fs::write(root.join("node_modules/dep/index.js"), "function dep() {}\n")?;
    fs::write(root.join("README.md"), "function notCode() {}\n")?;
    Ok(())
}

#[test]
fn scan_indexes_eligible_files_only() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    write_project(dir.path())?;
    let root = dir.path().to_string_lossy().into_owned();

    let output = run_cli(&[
        "--output",
        "json",
        "scan",
        "--root",
        &root,
        "--overrides-json",
        r#"{"excludedFilesOrFolders": ["node_modules/"]}"#,
    ])?;
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["report"]["indexedFiles"], 2);
    assert_eq!(value["report"]["functions"], 3);
    assert_eq!(value["report"]["stats"]["aborted"], false);
    Ok(())
}

#[test]
fn complete_matches_substrings_across_files() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    write_project(dir.path())?;
    let root = dir.path().to_string_lossy().into_owned();

    let output = run_cli(&["--quiet", "complete", "--root", &root, "--prefix", "a"])?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let labels: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split(" => ").next())
        .collect();
    assert_eq!(
        labels,
        vec!["start(port, host)\tapp.js", "clamp(value, lo, hi)\tutil.js"]
    );
    Ok(())
}

#[test]
fn complete_offers_live_buffer_symbols() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    write_project(dir.path())?;
    let buffer = dir.path().join("scratch.js");
    fs::write(&buffer, "function fresh(x) {}\nvar total = 0;\n")?;
    let root = dir.path().to_string_lossy().into_owned();
    let buffer = buffer.to_string_lossy().into_owned();

    let output = run_cli(&[
        "--output", "json", "complete", "--root", &root, "--prefix", "zzz", "--buffer", &buffer,
    ])?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let labels: Vec<&str> = value["entries"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry["label"].as_str())
                .collect()
        })
        .unwrap_or_default();
    assert!(labels.contains(&"fresh(x)\tscratch.js"));
    assert!(labels.contains(&"total\tscratch.js"));
    Ok(())
}

#[test]
fn missing_buffers_fail_with_io_exit_code() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().to_string_lossy().into_owned();
    let missing = dir.path().join("gone.js").to_string_lossy().into_owned();

    let output = run_cli(&[
        "complete", "--root", &root, "--prefix", "a", "--buffer", &missing,
    ])?;
    assert_eq!(output.status.code(), Some(3));
    Ok(())
}

#[test]
fn watch_runs_the_first_scan_then_stops() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    write_project(dir.path())?;
    let root = dir.path().to_string_lossy().into_owned();

    let output = run_cli(&[
        "--output",
        "json",
        "watch",
        "--root",
        &root,
        "--duration-secs",
        "1",
    ])?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["report"]["indexedFiles"], 3);
    assert!(value["report"]["lastScan"].is_object());
    Ok(())
}

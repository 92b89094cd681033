//! `sigdex config` end-to-end tests.

use std::fs;
use std::io;
use std::process::{Command, Output};

fn run_cli(args: &[&str], env: &[(&str, &str)]) -> io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_sigdex"));
    command.args(args);
    for (key, _) in std::env::vars() {
        if key.starts_with("SIGDEX_") {
            command.env_remove(key);
        }
    }
    command.envs(env.iter().copied());
    command.output()
}

#[test]
fn show_prints_defaults_as_json() -> io::Result<()> {
    let output = run_cli(&["config", "show"], &[])?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["scanTimeoutSeconds"], 60);
    assert_eq!(value["forgetDeletedFiles"], false);
    Ok(())
}

#[test]
fn env_overrides_win_over_the_config_file() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sigdex.toml");
    fs::write(&path, "scanTimeoutSeconds = 5\nmaxLineLength = 300\n")?;
    let path = path.to_string_lossy().into_owned();

    let output = run_cli(
        &["config", "show", "--path", &path],
        &[("SIGDEX_SCAN_TIMEOUT_SECONDS", "7")],
    )?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["scanTimeoutSeconds"], 7);
    assert_eq!(value["maxLineLength"], 300);
    Ok(())
}

#[test]
fn check_rejects_unknown_fields() -> io::Result<()> {
    let output = run_cli(
        &[
            "--output",
            "json",
            "config",
            "check",
            "--overrides-json",
            r#"{"embeddingProvider": "x"}"#,
        ],
        &[],
    )?;

    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["status"], "error");
    Ok(())
}

#[test]
fn check_reports_missing_files_as_io() -> io::Result<()> {
    let output = run_cli(
        &["config", "check", "--path", "/definitely/missing/sigdex.json"],
        &[],
    )?;
    assert_eq!(output.status.code(), Some(3));
    Ok(())
}

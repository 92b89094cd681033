//! CLI smoke tests: version, info, and argument errors.

use std::io;
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

#[test]
fn info_is_deterministic() -> io::Result<()> {
    let first = run_cli(&["info"])?;
    let second = run_cli(&["info"])?;

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    let stdout = String::from_utf8_lossy(&first.stdout);
    assert!(stdout.contains("name: sigdex-cli"));
    Ok(())
}

#[test]
fn info_json_is_parseable() -> io::Result<()> {
    let output = run_cli(&["--output", "json", "info"])?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["status"], "ok");
    assert!(value["build"]["version"].is_string());
    Ok(())
}

#[test]
fn scan_without_roots_is_invalid_input() -> io::Result<()> {
    let output = run_cli(&["scan"])?;

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("code: core:invalid_input"));
    Ok(())
}

#[test]
fn unknown_subcommands_are_rejected() -> io::Result<()> {
    let output = run_cli(&["reindex"])?;
    assert!(!output.status.success());
    Ok(())
}

//! Integration tests for parsing and loading config fixtures.

use sigdex_config::{
    CURRENT_CONFIG_VERSION, IndexerEnv, load_indexer_config_from_path, parse_indexer_config_json,
    parse_indexer_config_toml, to_pretty_json, to_pretty_toml,
};
use sigdex_shared::ErrorCode;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn fixture_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

fn read_fixture(relative: &str) -> Result<String, Box<dyn Error>> {
    Ok(fs::read_to_string(fixture_path(relative))?)
}

#[test]
fn parses_valid_json_fixture_and_normalizes() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("indexer-config.valid.json")?;
    let config = parse_indexer_config_json(&contents)?;

    assert_eq!(config.version, CURRENT_CONFIG_VERSION);
    assert_eq!(
        config.excluded_files_or_folders,
        vec![Box::<str>::from("dist/vendor"), Box::<str>::from("node_modules")]
    );
    assert!(config.forget_deleted_files);
    assert_eq!(config.scan_timeout(), Duration::from_secs(120));
    assert_eq!(config.root_change_check_interval(), Duration::from_secs(10));
    assert_eq!(config.max_line_length(), 300);
    assert_eq!(
        config.file_extensions,
        vec![Box::<str>::from("js"), Box::<str>::from("mjs")]
    );
    assert!(config.file_type_policy().is_eligible("/proj/lib/util.mjs"));
    Ok(())
}

#[test]
fn parses_valid_toml_fixture() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("indexer-config.valid.toml")?;
    let config = parse_indexer_config_toml(&contents)?;

    assert_eq!(config.scan_timeout_seconds, 45);
    assert_eq!(config.max_line_length(), 500);
    assert!(!config.skip_minified_files);
    assert_eq!(config.signature_patterns.len(), 1);
    assert!(config.file_type_policy().is_eligible("/proj/vendor.min.js"));
    Ok(())
}

#[test]
fn invalid_fixture_reports_limit_error() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("indexer-config.invalid-timeout.json")?;
    let error = match parse_indexer_config_json(&contents) {
        Ok(_) => return Err("expected an invalid config".into()),
        Err(error) => error,
    };

    assert_eq!(error.code, ErrorCode::new("config", "invalid_limit"));
    assert_eq!(
        error.metadata.get("field").map(String::as_str),
        Some("scanTimeoutSeconds")
    );
    Ok(())
}

#[test]
fn loads_by_extension_and_round_trips_pretty_output() -> Result<(), Box<dyn Error>> {
    let env = IndexerEnv::default();
    let from_toml = load_indexer_config_from_path(
        Some(&fixture_path("indexer-config.valid.toml")),
        None,
        &env,
    )?;

    let json = to_pretty_json(&from_toml)?;
    assert!(json.ends_with('\n'));
    assert_eq!(parse_indexer_config_json(&json)?, from_toml);

    let toml = to_pretty_toml(&from_toml)?;
    assert_eq!(parse_indexer_config_toml(&toml)?, from_toml);
    Ok(())
}

#[test]
fn missing_config_file_is_an_expected_error() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("absent.json");
    let error = match load_indexer_config_from_path(Some(&missing), None, &IndexerEnv::default()) {
        Ok(_) => return Err("expected a missing-file error".into()),
        Err(error) => error,
    };

    assert_eq!(error.code, ErrorCode::new("config", "config_file_not_found"));
    Ok(())
}

//! Integration tests for env parsing and env-to-config merging.

use sigdex_config::{
    ENV_SCAN_TIMEOUT_SECONDS, EnvParseError, IndexerConfig, IndexerEnv, apply_env_overrides,
    load_indexer_config_from_sources,
};
use sigdex_shared::ErrorCode;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;

fn read_env_map(relative: &str) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative);
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[test]
fn env_fixture_merges_into_effective_config() -> Result<(), Box<dyn Error>> {
    let env_map = read_env_map("indexer-env.valid.json")?;
    let env = IndexerEnv::from_map(&env_map)?;

    let config = apply_env_overrides(IndexerConfig::default(), &env)?;

    assert_eq!(
        config.excluded_files_or_folders,
        vec![Box::<str>::from("build"), Box::<str>::from("node_modules")]
    );
    assert!(config.forget_deleted_files);
    assert_eq!(config.scan_timeout_seconds, 15);
    assert_eq!(config.max_line_length(), 200);
    assert_eq!(
        config.file_extensions,
        vec![Box::<str>::from("js"), Box::<str>::from("jsx")]
    );
    assert!(!config.skip_minified_files);
    Ok(())
}

#[test]
fn env_beats_file_content() -> Result<(), Box<dyn Error>> {
    let env_map = read_env_map("indexer-env.valid.json")?;
    let env = IndexerEnv::from_map(&env_map)?;

    let config = load_indexer_config_from_sources(
        Some(r#"{"scanTimeoutSeconds": 300, "alwaysOnCompletions": ["debugger"]}"#),
        None,
        &env,
    )?;

    assert_eq!(config.scan_timeout_seconds, 15);
    assert_eq!(config.always_on_completions, vec![Box::<str>::from("debugger")]);
    Ok(())
}

#[test]
fn out_of_range_env_values_fail_validation() -> Result<(), Box<dyn Error>> {
    let mut env_map = BTreeMap::new();
    env_map.insert(ENV_SCAN_TIMEOUT_SECONDS.to_owned(), "7200".to_owned());
    let env = IndexerEnv::from_map(&env_map)?;

    let error = match apply_env_overrides(IndexerConfig::default(), &env) {
        Ok(_) => return Err("expected an out-of-range error".into()),
        Err(error) => error,
    };
    assert_eq!(error.code, ErrorCode::new("config", "invalid_limit"));
    Ok(())
}

#[test]
fn malformed_env_values_are_typed_errors() {
    let mut env_map = BTreeMap::new();
    env_map.insert(ENV_SCAN_TIMEOUT_SECONDS.to_owned(), "-1".to_owned());

    assert!(matches!(
        IndexerEnv::from_map(&env_map),
        Err(EnvParseError::InvalidInt { var, .. }) if var == ENV_SCAN_TIMEOUT_SECONDS
    ));
}

//! Config loading helpers for CLI surfaces.

use crate::InfraResult;
use sigdex_config::{IndexerEnv, load_indexer_config_from_path, to_pretty_json, to_pretty_toml};
use sigdex_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::path::Path;

/// Output format for the effective config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// Pretty JSON.
    #[default]
    Json,
    /// Pretty TOML.
    Toml,
}

/// Load and validate the effective config, returning it rendered in `format`.
pub fn load_effective_config(
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
    format: ConfigFormat,
) -> InfraResult<String> {
    let env = IndexerEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    let config = load_indexer_config_from_path(config_path, overrides_json, &env)?;
    match format {
        ConfigFormat::Json => to_pretty_json(&config),
        ConfigFormat::Toml => to_pretty_toml(&config),
    }
}

/// Load and validate the effective config, returning deterministic pretty JSON.
pub fn load_effective_config_json(
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
) -> InfraResult<String> {
    load_effective_config(env, config_path, overrides_json, ConfigFormat::Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_render_as_json_and_toml() -> InfraResult<()> {
        let env = BTreeMap::new();
        let json = load_effective_config_json(&env, None, None)?;
        assert!(json.contains("\"scanTimeoutSeconds\": 60"));

        let toml = load_effective_config(&env, None, None, ConfigFormat::Toml)?;
        assert!(toml.contains("scanTimeoutSeconds = 60"));
        Ok(())
    }

    #[test]
    fn overrides_apply_before_validation() -> InfraResult<()> {
        let env = BTreeMap::new();
        let json = load_effective_config_json(
            &env,
            None,
            Some(r#"{"excludedFilesOrFolders": ["Node_Modules\\"]}"#),
        )?;
        assert!(json.contains("\"node_modules/\""));
        Ok(())
    }
}

//! # sigdex-config
//!
//! Configuration schema, validation, and normalization logic for the indexer.
//! This crate depends on `domain` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file + overrides).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use env::{
    ENV_ALWAYS_ON_COMPLETIONS, ENV_EXCLUDED_FILES_OR_FOLDERS, ENV_FILE_EXTENSIONS,
    ENV_FORGET_DELETED_FILES, ENV_MAX_LINE_LENGTH, ENV_ROOT_CHANGE_CHECK_INTERVAL_SECONDS,
    ENV_SCAN_TIMEOUT_SECONDS, ENV_SKIP_MINIFIED_FILES, EnvParseError, IndexerEnv,
    apply_env_overrides,
};
pub use load::{
    load_indexer_config_from_path, load_indexer_config_from_sources, load_indexer_config_std_env,
    to_pretty_json, to_pretty_toml,
};
pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigLimits, ConfigSchemaError, IndexerConfig, MAX_LIST_ENTRIES,
    ValidatedIndexerConfig, parse_indexer_config_json, parse_indexer_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigdex_domain::domain_crate_version;
    use sigdex_shared::shared_crate_version;

    #[test]
    fn config_crate_compiles() {
        let version = config_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn config_can_use_domain_and_shared() {
        let domain_version = domain_crate_version();
        let shared_version = shared_crate_version();

        assert!(!domain_version.is_empty());
        assert!(!shared_version.is_empty());
    }
}

//! Builds an `AppContext` from validated configuration and local adapters.

use sigdex_adapters::{
    BufferSymbolScanner, LocalFileSystem, LocalPathNormalizer, RegexSignatureMatcher,
    SubstringExclusionFilter,
};
use sigdex_app::{AppContext, AppDeps, IndexerSettings};
use sigdex_config::ValidatedIndexerConfig;
use sigdex_ports::{FileSystemPort, LoggerPort, PathNormalizerPort, WorkspacePort};
use std::sync::Arc;

/// Resolve runtime settings from a validated config.
#[must_use]
pub fn settings_from_config(config: &ValidatedIndexerConfig) -> IndexerSettings {
    IndexerSettings {
        file_types: config.file_type_policy(),
        forget_deleted_files: config.forget_deleted_files,
        always_on: Vec::new(),
        scan_timeout: config.scan_timeout(),
        root_change_check_interval: config.root_change_check_interval(),
        max_line_length: config.max_line_length(),
    }
    .with_always_on(config.always_on_completions.iter())
}

/// Overridable ports for the composition root. `None` selects the local
/// adapter.
#[derive(Clone, Default)]
pub struct CompositionOverrides {
    /// Filesystem port.
    pub filesystem: Option<Arc<dyn FileSystemPort>>,
    /// Path normalizer port.
    pub path_normalizer: Option<Arc<dyn PathNormalizerPort>>,
}

/// Wire a fresh context (empty index, idle scan state) for `config`.
///
/// Malformed signature patterns are reported once through `logger` and the
/// built-in rules are used instead.
pub fn build_app_context(
    config: &ValidatedIndexerConfig,
    workspace: Arc<dyn WorkspacePort>,
    logger: Arc<dyn LoggerPort>,
    overrides: CompositionOverrides,
) -> Arc<AppContext> {
    let matcher =
        RegexSignatureMatcher::from_patterns_or_default(&config.signature_patterns, logger.as_ref());
    let deps = AppDeps {
        filesystem: overrides
            .filesystem
            .unwrap_or_else(|| Arc::new(LocalFileSystem::new())),
        path_normalizer: overrides
            .path_normalizer
            .unwrap_or_else(|| Arc::new(LocalPathNormalizer::new())),
        exclusion: Arc::new(SubstringExclusionFilter::new(
            config.excluded_files_or_folders.iter(),
        )),
        matcher: Arc::new(matcher),
        workspace,
        logger,
    };
    Arc::new(AppContext::new(deps, settings_from_config(config)))
}

/// Live-buffer scanner sharing the context's matcher and line limit.
#[must_use]
pub fn buffer_scanner(app: &AppContext) -> BufferSymbolScanner {
    BufferSymbolScanner::new(
        Arc::clone(&app.deps().matcher),
        app.settings().max_line_length,
    )
}

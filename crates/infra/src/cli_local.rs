//! Local CLI orchestration helpers.

use crate::composition::{CompositionOverrides, buffer_scanner, build_app_context};
use crate::{InfraError, InfraResult};
use serde::Serialize;
use sigdex_adapters::log_sink::StderrLogSink;
use sigdex_adapters::logger::JsonLogger;
use sigdex_app::{AppContext, CompletionServer, ScanCoordinator, ScanOutcome};
use sigdex_config::{ValidatedIndexerConfig, load_indexer_config_std_env};
use sigdex_domain::{CompletionEntry, CompletionRequest, ScanStatistics, basename};
use sigdex_ports::{LogLevel, LoggerPort, NoopLogger, PathNormalizerPort, WorkspacePort, log_fields};
use sigdex_shared::{CancellationToken, ErrorClass, ErrorCode, ErrorEnvelope, RequestContext};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Workspace made of explicit CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct StaticWorkspace {
    folders: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

impl StaticWorkspace {
    /// Workspace with the given roots and open files.
    #[must_use]
    pub const fn new(folders: Vec<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self { folders, files }
    }
}

impl WorkspacePort for StaticWorkspace {
    fn open_folders(&self) -> Vec<PathBuf> {
        self.folders.clone()
    }

    fn open_files(&self) -> Vec<PathBuf> {
        self.files.clone()
    }
}

/// Shared inputs of the local commands.
#[derive(Debug, Clone, Default)]
pub struct LocalRunOptions {
    /// Folders to crawl.
    pub roots: Vec<PathBuf>,
    /// Files treated as open in the editor.
    pub files: Vec<PathBuf>,
    /// Optional JSON or TOML config file.
    pub config_path: Option<PathBuf>,
    /// Optional partial config JSON applied over the file.
    pub overrides_json: Option<String>,
}

/// Result of `scan`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Crawl counters.
    pub stats: ScanStatistics,
    /// Files with a record after the crawl.
    pub indexed_files: usize,
    /// Signatures across all records.
    pub functions: usize,
    /// Reduced roots the crawl covered.
    pub roots: Vec<Box<str>>,
}

/// Result of `watch`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchReport {
    /// Statistics of the last finished scan, if any ran.
    pub last_scan: Option<ScanStatistics>,
    /// Files with a record when the watcher stopped.
    pub indexed_files: usize,
    /// Signatures across all records.
    pub functions: usize,
    /// How long the watcher ran, in milliseconds.
    pub watched_ms: u64,
}

/// Run one full crawl over the given roots.
pub fn run_scan_local(options: &LocalRunOptions) -> InfraResult<ScanReport> {
    let config = load_config(options)?;
    let ctx = RequestContext::new_request();
    let logger = scope_logger(&observability_from_env(), &ctx);
    let app = local_context(&config, options, logger);

    run_async_with_ctx(ctx, move |ctx| async move {
        let stats = run_scan(&ctx, &app).await?;
        Ok(ScanReport {
            stats,
            indexed_files: app.index().len(),
            functions: app.index().function_count(),
            roots: app.scan_state().known_roots().to_vec(),
        })
    })
}

/// Crawl, then answer one completion request. Live symbols come from
/// `buffer` when given.
pub fn run_complete_local(
    options: &LocalRunOptions,
    prefix: &str,
    buffer: Option<&Path>,
) -> InfraResult<Vec<CompletionEntry>> {
    let config = load_config(options)?;
    let buffer = buffer
        .map(|path| read_buffer(path).map(|text| (path.to_path_buf(), text)))
        .transpose()?;
    let ctx = RequestContext::new_request();
    let logger = scope_logger(&observability_from_env(), &ctx);
    let app = local_context(&config, options, logger);
    let prefix: Box<str> = prefix.into();

    run_async_with_ctx(ctx, move |ctx| async move {
        run_scan(&ctx, &app).await?;

        let mut request = CompletionRequest::new(prefix);
        if let Some((path, text)) = buffer {
            let key = app.deps().path_normalizer.normalize(&path);
            let label = basename(&key);
            let live = buffer_scanner(&app).scan(&text, label);
            request = request.with_live(live, label);
        }
        Ok(CompletionServer::new(Arc::clone(&app))
            .complete(&ctx, &request)
            .await)
    })
}

/// Run the coordinator with its root-change watcher for `duration`.
pub fn run_watch_local(options: &LocalRunOptions, duration: Duration) -> InfraResult<WatchReport> {
    let config = load_config(options)?;
    let ctx = RequestContext::new_request();
    let logger = scope_logger(&observability_from_env(), &ctx);
    let app = local_context(&config, options, logger);

    run_async_with_ctx(ctx, move |ctx| async move {
        let started = std::time::Instant::now();
        let token = CancellationToken::new();
        let watcher = ScanCoordinator::new(Arc::clone(&app)).spawn_watcher(token.clone());

        tokio::select! {
            () = ctx.cancelled() => {},
            () = tokio::time::sleep(duration) => {},
        }
        token.cancel();
        watcher.await.map_err(|error| {
            ErrorEnvelope::unexpected(
                ErrorCode::internal(),
                format!("watcher task failed: {error}"),
                ErrorClass::NonRetriable,
            )
        })?;

        Ok(WatchReport {
            last_scan: app.scan_state().last_stats(),
            indexed_files: app.index().len(),
            functions: app.index().function_count(),
            watched_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        })
    })
}

async fn run_scan(ctx: &RequestContext, app: &Arc<AppContext>) -> InfraResult<ScanStatistics> {
    match ScanCoordinator::new(Arc::clone(app)).run_full_scan(ctx).await? {
        ScanOutcome::Completed(stats) => Ok(stats),
        ScanOutcome::AlreadyRunning => Err(ErrorEnvelope::invariant(
            ErrorCode::internal(),
            "fresh context reported a running scan",
        )),
    }
}

fn load_config(options: &LocalRunOptions) -> InfraResult<ValidatedIndexerConfig> {
    if options.roots.is_empty() && options.files.is_empty() {
        return Err(ErrorEnvelope::expected(
            ErrorCode::invalid_input(),
            "at least one --root or --file is required",
        ));
    }
    load_indexer_config_std_env(
        options.config_path.as_deref(),
        options.overrides_json.as_deref(),
    )
}

fn local_context(
    config: &ValidatedIndexerConfig,
    options: &LocalRunOptions,
    logger: Arc<dyn LoggerPort>,
) -> Arc<AppContext> {
    let workspace = StaticWorkspace::new(options.roots.clone(), options.files.clone());
    build_app_context(
        config,
        Arc::new(workspace),
        logger,
        CompositionOverrides::default(),
    )
}

fn read_buffer(path: &Path) -> InfraResult<String> {
    let bytes = std::fs::read(path)
        .map_err(|error| InfraError::from(error).with_metadata("path", path.display().to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

const LOG_FORMAT_ENV: &str = "SIGDEX_LOG_FORMAT";
const LOG_LEVEL_ENV: &str = "SIGDEX_LOG_LEVEL";

fn observability_from_env() -> Arc<dyn LoggerPort> {
    let log_enabled = std::env::var(LOG_FORMAT_ENV)
        .ok()
        .is_some_and(|value| value.eq_ignore_ascii_case("json"));
    if !log_enabled {
        return Arc::new(NoopLogger);
    }
    Arc::new(JsonLogger::new(Arc::new(StderrLogSink)).with_min_level(parse_log_level()))
}

fn parse_log_level() -> LogLevel {
    let value = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .map(|value| value.to_ascii_lowercase());
    match value.as_deref() {
        Some("debug") => LogLevel::Debug,
        Some("warn") => LogLevel::Warn,
        Some("error") => LogLevel::Error,
        _ => LogLevel::Info,
    }
}

fn scope_logger(logger: &Arc<dyn LoggerPort>, ctx: &RequestContext) -> Arc<dyn LoggerPort> {
    Arc::from(logger.child(log_fields([(
        "requestId",
        ctx.correlation_id().as_str(),
    )])))
}

fn run_async_with_ctx<F, T>(
    ctx: RequestContext,
    op: impl FnOnce(RequestContext) -> F,
) -> InfraResult<T>
where
    F: Future<Output = Result<T, ErrorEnvelope>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(InfraError::from)?;
    runtime.block_on(async { op(ctx).await })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_need_something_to_crawl() {
        let result = run_scan_local(&LocalRunOptions::default());
        assert!(result.is_err_and(|error| error.code == ErrorCode::invalid_input()));
    }

    #[test]
    fn missing_buffers_surface_as_not_found() {
        let result = read_buffer(Path::new("/definitely/not/a/buffer.js"));
        assert!(result.is_err_and(|error| error.code == ErrorCode::not_found()));
    }
}

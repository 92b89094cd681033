//! Editor-facing host: routes editor events to the engine and owns the
//! watcher task of the current indexer generation.

use crate::composition::{CompositionOverrides, buffer_scanner, build_app_context};
use sigdex_adapters::BufferSymbolScanner;
use sigdex_app::{
    AppContext, CompletionServer, ReparseOutcome, ReparseTrigger, RootCheck, ScanCoordinator,
    ScanOutcome,
};
use sigdex_config::ValidatedIndexerConfig;
use sigdex_domain::{CompletionEntry, CompletionRequest, LiveBufferSymbols, basename};
use sigdex_ports::{LoggerPort, WorkspacePort};
use sigdex_shared::{CancellationToken, RequestContext, Result};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::task::JoinHandle;

/// Inbound editor notifications.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// A file was written to disk.
    FileSaved(PathBuf),
    /// A file was opened in a view.
    FileOpened(PathBuf),
    /// A view gained focus.
    BufferActivated,
    /// The editor wants completions for the active buffer.
    CompletionRequested {
        /// Text typed so far.
        prefix: Box<str>,
        /// Current, possibly unsaved, buffer contents.
        buffer_text: Box<str>,
        /// File backing the buffer; `None` for scratch buffers.
        file_name: Option<PathBuf>,
    },
    /// Configuration was edited.
    SettingsChanged(ValidatedIndexerConfig),
}

/// What handling an event produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostResponse {
    /// Result of a save/open reparse.
    Reparsed(ReparseOutcome),
    /// Result of a root-change check.
    Roots(RootCheck),
    /// Ordered completion entries.
    Completions(Vec<CompletionEntry>),
    /// A new generation was built and its first scan ran.
    Reconfigured(ScanOutcome),
}

struct Generation {
    app: Arc<AppContext>,
    coordinator: ScanCoordinator,
    completion: CompletionServer,
    scanner: BufferSymbolScanner,
    watcher_token: CancellationToken,
    watcher: Option<JoinHandle<()>>,
}

impl Generation {
    fn new(
        config: &ValidatedIndexerConfig,
        workspace: Arc<dyn WorkspacePort>,
        logger: Arc<dyn LoggerPort>,
        overrides: CompositionOverrides,
    ) -> Self {
        let app = build_app_context(config, workspace, logger, overrides);
        Self {
            coordinator: ScanCoordinator::new(Arc::clone(&app)),
            completion: CompletionServer::new(Arc::clone(&app)),
            scanner: buffer_scanner(&app),
            watcher_token: CancellationToken::new(),
            watcher: None,
            app,
        }
    }

    fn start_watcher(&mut self) {
        self.watcher = Some(self.coordinator.spawn_watcher(self.watcher_token.clone()));
    }

    fn stop(&mut self) -> Option<JoinHandle<()>> {
        self.watcher_token.cancel();
        self.watcher.take()
    }
}

/// Long-lived indexer bound to one editor workspace.
///
/// Holds the current generation (context, coordinator, completion server,
/// watcher). A settings change swaps in a new generation; requests already
/// running against the old one finish on the old context.
pub struct IndexerHost {
    workspace: Arc<dyn WorkspacePort>,
    logger: Arc<dyn LoggerPort>,
    overrides: CompositionOverrides,
    current: RwLock<Generation>,
}

impl IndexerHost {
    /// Build the first generation and start its watcher. Must be called
    /// inside a tokio runtime.
    pub fn start(
        config: &ValidatedIndexerConfig,
        workspace: Arc<dyn WorkspacePort>,
        logger: Arc<dyn LoggerPort>,
        overrides: CompositionOverrides,
    ) -> Self {
        let mut generation = Generation::new(
            config,
            Arc::clone(&workspace),
            Arc::clone(&logger),
            overrides.clone(),
        );
        generation.start_watcher();
        Self {
            workspace,
            logger,
            overrides,
            current: RwLock::new(generation),
        }
    }

    /// Context of the current generation.
    #[must_use]
    pub fn app(&self) -> Arc<AppContext> {
        Arc::clone(&self.read().app)
    }

    /// Coordinator of the current generation.
    #[must_use]
    pub fn coordinator(&self) -> ScanCoordinator {
        self.read().coordinator.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Generation> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Route one editor event.
    #[tracing::instrument(skip_all, fields(correlation_id = %ctx.correlation_id()))]
    pub async fn handle(&self, ctx: &RequestContext, event: EditorEvent) -> Result<HostResponse> {
        match event {
            EditorEvent::FileSaved(path) => {
                let coordinator = self.coordinator();
                let outcome = coordinator
                    .reparse_file(ctx, &path, ReparseTrigger::Saved)
                    .await?;
                Ok(HostResponse::Reparsed(outcome))
            },
            EditorEvent::FileOpened(path) => {
                let coordinator = self.coordinator();
                let outcome = coordinator
                    .reparse_file(ctx, &path, ReparseTrigger::Opened)
                    .await?;
                Ok(HostResponse::Reparsed(outcome))
            },
            EditorEvent::BufferActivated => {
                let coordinator = self.coordinator();
                Ok(HostResponse::Roots(coordinator.check_roots(ctx).await?))
            },
            EditorEvent::CompletionRequested {
                prefix,
                buffer_text,
                file_name,
            } => Ok(HostResponse::Completions(
                self.complete(ctx, prefix, &buffer_text, file_name).await,
            )),
            EditorEvent::SettingsChanged(config) => {
                let outcome = self.reconfigure(ctx, &config).await?;
                Ok(HostResponse::Reconfigured(outcome))
            },
        }
    }

    async fn complete(
        &self,
        ctx: &RequestContext,
        prefix: Box<str>,
        buffer_text: &str,
        file_name: Option<PathBuf>,
    ) -> Vec<CompletionEntry> {
        let (app, completion, scanner) = {
            let generation = self.read();
            (
                Arc::clone(&generation.app),
                generation.completion.clone(),
                generation.scanner.clone(),
            )
        };

        let label: Box<str> = match &file_name {
            Some(path) => {
                let key = app.deps().path_normalizer.normalize(path);
                if !app.is_candidate(&key) {
                    return Vec::new();
                }
                basename(&key).into()
            },
            None => "".into(),
        };

        let live: LiveBufferSymbols = scanner.scan(buffer_text, &label);
        let request = CompletionRequest::new(prefix).with_live(live, label);
        completion.complete(ctx, &request).await
    }

    /// Replace the generation: stop the old watcher, clear the old index,
    /// wire a new context, run its first full scan, and start its watcher.
    pub async fn reconfigure(
        &self,
        ctx: &RequestContext,
        config: &ValidatedIndexerConfig,
    ) -> Result<ScanOutcome> {
        let next = Generation::new(
            config,
            Arc::clone(&self.workspace),
            Arc::clone(&self.logger),
            self.overrides.clone(),
        );
        let coordinator = next.coordinator.clone();
        let (previous_app, previous_watcher) = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            let mut previous = std::mem::replace(&mut *current, next);
            let watcher = previous.stop();
            (previous.app, watcher)
        };
        if let Some(handle) = previous_watcher {
            let _ = handle.await;
        }
        previous_app.index().clear();

        self.logger.info(
            "index.settings.changed",
            "Settings changed; index cleared",
            None,
        );
        let outcome = coordinator.run_full_scan(ctx).await?;
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .start_watcher();
        Ok(outcome)
    }

    /// Stop the watcher of the current generation and wait for it to exit.
    pub async fn shutdown(&self) {
        let handle = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .stop();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl std::fmt::Debug for IndexerHost {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("IndexerHost")
            .field("app", &self.read().app)
            .finish_non_exhaustive()
    }
}

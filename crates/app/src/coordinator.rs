//! Scan scheduling: single-flight full scans, root-change detection,
//! single-file reparses, and the periodic watcher task.

use crate::context::AppContext;
use crate::crawler::{CrawlMode, crawl};
use crate::workspace::WorkspaceSnapshot;
use sigdex_domain::{ScanStatistics, basename};
use sigdex_ports::{LogLevel, log_fields};
use sigdex_shared::{CancellationToken, CorrelationId, RequestContext, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Result of a full-scan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The crawl ran (possibly stopping at its deadline).
    Completed(ScanStatistics),
    /// Another scan held the slot; nothing was crawled.
    AlreadyRunning,
}

/// What caused a single-file reparse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReparseTrigger {
    /// File saved: always parsed again.
    Saved,
    /// File opened: parsed only when not yet indexed.
    Opened,
}

/// Result of a single-file reparse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReparseOutcome {
    /// The record was replaced.
    Reparsed {
        /// Signatures in the new record.
        functions: usize,
    },
    /// Opened file already had a record.
    AlreadyIndexed,
    /// Excluded or ineligible file.
    Ignored,
}

/// Result of a root-change check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootCheck {
    /// Reduced roots equal the last scanned set.
    Unchanged,
    /// Roots may have changed but a scan is already running.
    Busy,
    /// Roots changed and a scan was attempted.
    Rescanned(ScanOutcome),
}

/// Drives full scans and reparses over one `AppContext`.
#[derive(Debug, Clone)]
pub struct ScanCoordinator {
    app: Arc<AppContext>,
}

impl ScanCoordinator {
    /// Coordinate scans over `app`.
    #[must_use]
    pub const fn new(app: Arc<AppContext>) -> Self {
        Self { app }
    }

    /// The context this coordinator drives.
    #[must_use]
    pub const fn app(&self) -> &Arc<AppContext> {
        &self.app
    }

    /// Run a full crawl unless one is already running. Cached files are
    /// skipped.
    pub async fn run_full_scan(&self, ctx: &RequestContext) -> Result<ScanOutcome> {
        self.run_scan(ctx, CrawlMode::SkipCached).await
    }

    /// Run a full crawl with an explicit cache mode.
    pub async fn run_scan(&self, ctx: &RequestContext, mode: CrawlMode) -> Result<ScanOutcome> {
        let logger = self.app.logger().child(log_fields([(
            "correlationId",
            ctx.correlation_id().as_str(),
        )]));

        let Some(guard) = self.app.scan_state().try_begin() else {
            logger.debug(
                "index.scan.skipped_running",
                "Full scan already running; request dropped",
                None,
            );
            return Ok(ScanOutcome::AlreadyRunning);
        };

        let snapshot = WorkspaceSnapshot::capture(&self.app);
        guard.set_known_roots(snapshot.roots().clone());
        logger.info(
            "index.scan.started",
            "Full scan started",
            Some(log_fields([
                ("roots", serde_json::json!(snapshot.roots().to_vec())),
                ("trackedFiles", serde_json::json!(snapshot.tracked_files().len())),
            ])),
        );

        let deadline = guard.start_deadline(self.app.settings().scan_timeout);
        let stats = crawl(ctx, &self.app, logger.as_ref(), &snapshot, deadline, mode).await?;

        let fields = Some(log_fields([("stats", serde_json::json!(stats))]));
        if stats.aborted {
            logger.warn(
                "index.scan.aborted",
                "Full scan stopped at its deadline",
                fields,
            );
        } else {
            logger.info("index.scan.completed", "Full scan completed", fields);
        }

        guard.finish(stats);
        Ok(ScanOutcome::Completed(stats))
    }

    /// Start a full scan on its own task with a fresh `scan_*` context.
    #[must_use]
    pub fn request_full_scan(&self) -> JoinHandle<Result<ScanOutcome>> {
        self.spawn_scan(RequestContext::new(CorrelationId::new_scan_id()))
    }

    /// Start a full scan on its own task using `ctx` for cancellation.
    #[must_use]
    pub fn spawn_scan(&self, ctx: RequestContext) -> JoinHandle<Result<ScanOutcome>> {
        let this = self.clone();
        tokio::spawn(async move { this.run_full_scan(&ctx).await })
    }

    /// Compare the current reduced roots with the last scanned set and
    /// rescan when they differ and nothing is running.
    pub async fn check_roots(&self, ctx: &RequestContext) -> Result<RootCheck> {
        let current = WorkspaceSnapshot::capture(&self.app);
        if *self.app.scan_state().known_roots() == *current.roots() {
            return Ok(RootCheck::Unchanged);
        }
        if self.app.scan_state().is_running() {
            return Ok(RootCheck::Busy);
        }

        self.app.logger().info(
            "index.roots.changed",
            "Open folders changed; rescanning",
            Some(log_fields([(
                "roots",
                serde_json::json!(current.roots().to_vec()),
            )])),
        );
        let outcome = self.run_full_scan(ctx).await?;
        Ok(RootCheck::Rescanned(outcome))
    }

    /// Parse one file outside the full-scan gate.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn reparse_file(
        &self,
        ctx: &RequestContext,
        path: &Path,
        trigger: ReparseTrigger,
    ) -> Result<ReparseOutcome> {
        let key = self.app.deps().path_normalizer.normalize(path);
        if !self.app.is_candidate(&key) {
            return Ok(ReparseOutcome::Ignored);
        }
        if trigger == ReparseTrigger::Opened && self.app.index().has(&key) {
            return Ok(ReparseOutcome::AlreadyIndexed);
        }

        let record = match self.app.parser().parse(ctx, &key).await {
            Ok(record) => record,
            Err(error) => {
                if !error.is_cancelled() {
                    self.app.logger().failure(
                        LogLevel::Debug,
                        "index.parse.failed",
                        &error,
                        Some(log_fields([("path", &*key)])),
                    );
                }
                return Err(error);
            },
        };

        let functions = record.len();
        self.app.index().upsert(&key, record);
        self.app.logger().debug(
            "index.reparse.completed",
            "File reparsed",
            Some(log_fields([
                ("file", serde_json::json!(basename(&key))),
                ("functions", serde_json::json!(functions)),
                ("trigger", serde_json::json!(trigger.as_str())),
            ])),
        );
        Ok(ReparseOutcome::Reparsed { functions })
    }

    /// Spawn the root-change watcher. Each tick checks the roots on its own
    /// task; the loop ends when `token` is cancelled.
    #[must_use]
    pub fn spawn_watcher(&self, token: CancellationToken) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(this.app.settings().root_change_check_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => this.on_tick(&token),
                }
            }
            this.app.logger().info(
                "index.watcher.stopped",
                "Root-change watcher stopped",
                None,
            );
        })
    }

    fn on_tick(&self, token: &CancellationToken) {
        if self.app.scan_state().is_running() {
            return;
        }
        let this = self.clone();
        let ctx = RequestContext::with_cancellation(CorrelationId::new_scan_id(), token.clone());
        tokio::spawn(async move {
            if let Err(error) = this.check_roots(&ctx).await {
                if !error.is_cancelled() {
                    this.app.logger().failure(
                        LogLevel::Error,
                        "index.scan.failed",
                        &error,
                        None,
                    );
                }
            }
        });
    }
}

impl ReparseTrigger {
    /// Lowercase name used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Opened => "opened",
        }
    }
}

//! Full-crawl traversal: tracked files first, then each root breadth-first.

use crate::context::AppContext;
use crate::scan_state::ScanDeadline;
use crate::workspace::WorkspaceSnapshot;
use sigdex_domain::ScanStatistics;
use sigdex_ports::{FileSystemEntryKind, LogLevel, LoggerPort, log_fields};
use sigdex_shared::{RequestContext, Result};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Whether indexed files are parsed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlMode {
    /// Files already in the index count as cache hits.
    SkipCached,
    /// Every eligible file is parsed again.
    Force,
}

/// Crawl `snapshot`, feeding eligible files into the index.
///
/// Stops at the first step past `deadline` with `aborted` set and keeps
/// whatever was indexed so far. Per-file failures are counted and logged;
/// only cancellation ends the crawl with an error.
#[tracing::instrument(
    skip_all,
    fields(
        correlation_id = %ctx.correlation_id(),
        roots = snapshot.roots().len(),
        tracked = snapshot.tracked_files().len(),
    )
)]
pub async fn crawl(
    ctx: &RequestContext,
    app: &AppContext,
    logger: &dyn LoggerPort,
    snapshot: &WorkspaceSnapshot,
    deadline: ScanDeadline,
    mode: CrawlMode,
) -> Result<ScanStatistics> {
    let mut run = CrawlRun {
        ctx,
        app,
        logger,
        deadline,
        mode,
        stats: ScanStatistics::default(),
        visited: HashSet::new(),
    };

    for file in snapshot.tracked_files() {
        if run.should_stop()? {
            break;
        }
        run.visit_file(file).await?;
    }

    for root in snapshot.roots().iter() {
        if run.stats.aborted {
            break;
        }
        run.walk(root).await?;
    }

    run.stats.elapsed_ms = deadline.elapsed_ms();
    Ok(run.stats)
}

struct CrawlRun<'a> {
    ctx: &'a RequestContext,
    app: &'a AppContext,
    logger: &'a dyn LoggerPort,
    deadline: ScanDeadline,
    mode: CrawlMode,
    stats: ScanStatistics,
    visited: HashSet<Box<str>>,
}

impl CrawlRun<'_> {
    fn should_stop(&mut self) -> Result<bool> {
        self.ctx.ensure_not_cancelled("index.crawl")?;
        if self.deadline.is_exceeded() {
            self.stats.aborted = true;
        }
        Ok(self.stats.aborted)
    }

    async fn walk(&mut self, root: &str) -> Result<()> {
        if self.app.is_excluded(root) {
            return Ok(());
        }

        let mut pending = VecDeque::from([root.to_owned()]);
        while let Some(dir) = pending.pop_front() {
            if self.should_stop()? {
                return Ok(());
            }

            let listing = self
                .app
                .deps()
                .filesystem
                .read_dir(self.ctx, PathBuf::from(&dir))
                .await;
            let mut entries = match listing {
                Ok(entries) => entries,
                Err(error) if error.is_cancelled() => return Err(error),
                Err(error) => {
                    self.logger.failure(
                        LogLevel::Warn,
                        "index.scan.dir_read_failed",
                        &error,
                        Some(log_fields([("dir", dir.as_str())])),
                    );
                    continue;
                },
            };
            entries.sort_by(|a, b| a.name.cmp(&b.name));

            for entry in entries {
                if self.should_stop()? {
                    return Ok(());
                }
                let child = join_path(&dir, &entry.name);
                match entry.kind {
                    FileSystemEntryKind::Directory => {
                        if !self.app.is_excluded(&child) {
                            pending.push_back(child);
                        }
                    },
                    FileSystemEntryKind::File => self.visit_file(&child).await?,
                    FileSystemEntryKind::Other => {},
                }
            }
        }
        Ok(())
    }

    async fn visit_file(&mut self, path: &str) -> Result<()> {
        self.stats.files_seen += 1;
        if !self.app.is_candidate(path) {
            return Ok(());
        }
        self.stats.eligible_files += 1;

        let key = self.app.deps().path_normalizer.normalize(Path::new(path));
        let first_visit = self.visited.insert(key.clone());
        let cached = self.mode == CrawlMode::SkipCached && self.app.index().has(&key);
        if !first_visit || cached {
            self.stats.cache_hits += 1;
            return Ok(());
        }

        match self.app.parser().parse(self.ctx, &key).await {
            Ok(record) => {
                self.app.index().upsert(&key, record);
                self.stats.cache_misses += 1;
            },
            Err(error) if error.is_cancelled() => return Err(error),
            Err(error) => {
                self.stats.failures += 1;
                self.logger.failure(
                    LogLevel::Debug,
                    "index.parse.failed",
                    &error,
                    Some(log_fields([("path", &*key)])),
                );
            },
        }
        Ok(())
    }
}

fn join_path(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_keeps_a_single_separator() {
        assert_eq!(join_path("/", "a.js"), "/a.js");
        assert_eq!(join_path("/proj", "a.js"), "/proj/a.js");
        assert_eq!(join_path("C:/", "a.js"), "C:/a.js");
    }
}

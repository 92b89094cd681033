//! Completion serving over the index plus the active buffer.

use crate::context::AppContext;
use sigdex_domain::{CompletionEntry, CompletionRequest};
use sigdex_shared::RequestContext;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Answers completion lookups. Never waits on a crawl.
#[derive(Debug, Clone)]
pub struct CompletionServer {
    app: Arc<AppContext>,
}

impl CompletionServer {
    /// Serve completions from `app`.
    #[must_use]
    pub const fn new(app: Arc<AppContext>) -> Self {
        Self { app }
    }

    /// Merge always-on entries, indexed functions matching the prefix, and
    /// live buffer symbols not already offered.
    ///
    /// A cancelled request returns whatever was gathered so far.
    #[tracing::instrument(
        skip_all,
        fields(correlation_id = %ctx.correlation_id(), prefix = %request.prefix)
    )]
    pub async fn complete(
        &self,
        ctx: &RequestContext,
        request: &CompletionRequest,
    ) -> Vec<CompletionEntry> {
        let settings = self.app.settings();
        let mut entries = settings.always_on.clone();
        let mut offered: HashSet<&str> = HashSet::new();

        let snapshot = self.app.index().all_entries();
        for (path, record) in &snapshot {
            if ctx.is_cancelled() {
                return entries;
            }
            if settings.forget_deleted_files
                && !self
                    .app
                    .deps()
                    .filesystem
                    .exists(ctx, PathBuf::from(&**path))
                    .await
            {
                continue;
            }
            for signature in record.iter() {
                if signature.name().contains(&*request.prefix) {
                    entries.push(signature.completion().clone());
                    offered.insert(signature.name());
                }
            }
        }

        for signature in &request.live.functions {
            if offered.insert(signature.name()) {
                entries.push(signature.completion().clone());
            }
        }

        for variable in &request.live.variables {
            if variable.chars().count() > 1 && !offered.contains(&**variable) {
                entries.push(CompletionEntry::for_variable(
                    variable,
                    &request.current_file_label,
                ));
            }
        }

        entries
    }
}

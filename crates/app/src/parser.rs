//! Per-file signature extraction.

use sigdex_domain::{
    FileRecord, FileRecordBuilder, FunctionSignature, SourceLine, basename, source_lines,
};
use sigdex_ports::{FileSystemPort, LineMatch, SignatureMatcherPort};
use sigdex_shared::{RequestContext, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Reads a file and extracts its function signatures.
#[derive(Clone)]
pub struct FileParser {
    filesystem: Arc<dyn FileSystemPort>,
    matcher: Arc<dyn SignatureMatcherPort>,
    max_line_length: usize,
}

impl FileParser {
    /// Build a parser over the given ports.
    pub fn new(
        filesystem: Arc<dyn FileSystemPort>,
        matcher: Arc<dyn SignatureMatcherPort>,
        max_line_length: usize,
    ) -> Self {
        Self {
            filesystem,
            matcher,
            max_line_length,
        }
    }

    /// Read `path` (normalized) and extract its record.
    ///
    /// Read failures come back as `index:file_unreadable`; cancellation is
    /// passed through unchanged.
    #[tracing::instrument(level = "debug", skip(self, ctx))]
    pub async fn parse(&self, ctx: &RequestContext, path: &str) -> Result<FileRecord> {
        ctx.ensure_not_cancelled("index.parse")?;
        let text = self
            .filesystem
            .read_file_lossy(ctx, PathBuf::from(path))
            .await
            .map_err(|error| error.into_file_unreadable(path))?;
        Ok(self.parse_text(&text, basename(path)))
    }

    /// Extract signatures from already-decoded text.
    #[must_use]
    pub fn parse_text(&self, text: &str, location: &str) -> FileRecord {
        let mut builder = FileRecordBuilder::default();
        for line in source_lines(text).filter(|line| self.is_candidate(line)) {
            if let LineMatch::Matched { name, parameters } = self.matcher.match_line(line.content)
            {
                builder.push(FunctionSignature::new(name, parameters, location));
            }
        }
        builder.build()
    }

    fn is_candidate(&self, line: &SourceLine<'_>) -> bool {
        line.content.contains("function") && line.shorter_than(self.max_line_length)
    }
}

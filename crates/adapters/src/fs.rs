//! Filesystem and path normalization adapters.

use sigdex_domain::normalize_lexical;
use sigdex_ports::{
    BoxFuture, FileSystemDirEntry, FileSystemEntryKind, FileSystemPort, PathNormalizerPort,
};
use sigdex_shared::{ErrorEnvelope, RequestContext, Result};
use std::path::{Path, PathBuf};

/// Local filesystem adapter using async IO.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Build a filesystem adapter.
    pub const fn new() -> Self {
        Self
    }
}

impl FileSystemPort for LocalFileSystem {
    fn read_dir(
        &self,
        ctx: &RequestContext,
        dir: PathBuf,
    ) -> BoxFuture<'_, Result<Vec<FileSystemDirEntry>>> {
        let ready = ctx.ensure_not_cancelled("fs.read_dir");
        Box::pin(async move {
            ready?;
            let mut entries = Vec::new();
            let mut read_dir = tokio::fs::read_dir(&dir)
                .await
                .map_err(|error| ErrorEnvelope::from(error).with_metadata("path", dir.display().to_string()))?;

            while let Some(entry) = read_dir.next_entry().await.map_err(ErrorEnvelope::from)? {
                let kind = match entry.file_type().await {
                    Ok(file_type) if file_type.is_symlink() => {
                        symlink_kind(&entry.path()).await
                    },
                    Ok(file_type) if file_type.is_file() => FileSystemEntryKind::File,
                    Ok(file_type) if file_type.is_dir() => FileSystemEntryKind::Directory,
                    Ok(_) | Err(_) => FileSystemEntryKind::Other,
                };
                let name = entry.file_name().to_string_lossy().into_owned();
                entries.push(FileSystemDirEntry::new(name, kind));
            }

            tracing::trace!(path = %dir.display(), entries = entries.len(), "listed directory");
            Ok(entries)
        })
    }

    fn read_file_lossy(
        &self,
        ctx: &RequestContext,
        file: PathBuf,
    ) -> BoxFuture<'_, Result<Box<str>>> {
        let ready = ctx.ensure_not_cancelled("fs.read_file");
        Box::pin(async move {
            ready?;
            let bytes = tokio::fs::read(&file).await.map_err(ErrorEnvelope::from)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned().into_boxed_str())
        })
    }

    fn exists(&self, _ctx: &RequestContext, path: PathBuf) -> BoxFuture<'_, bool> {
        Box::pin(async move { tokio::fs::symlink_metadata(&path).await.is_ok() })
    }
}

/// Symlinks count as files when they resolve to one. Symlinked directories are
/// reported as `Other` so the crawler never follows them into cycles.
async fn symlink_kind(path: &Path) -> FileSystemEntryKind {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => FileSystemEntryKind::File,
        Ok(_) | Err(_) => FileSystemEntryKind::Other,
    }
}

/// Resolves symlinks with `dunce` (no `\\?\` prefixes on Windows), falling
/// back to lexical normalization of the absolute path.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPathNormalizer;

impl LocalPathNormalizer {
    /// Build a normalizer.
    pub const fn new() -> Self {
        Self
    }
}

impl PathNormalizerPort for LocalPathNormalizer {
    fn normalize(&self, path: &Path) -> Box<str> {
        let resolved = dunce::canonicalize(path)
            .or_else(|_| std::path::absolute(path))
            .unwrap_or_else(|_| path.to_path_buf());
        normalize_lexical(&resolved.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigdex_shared::ErrorCode;
    use std::fs;

    #[tokio::test]
    async fn read_file_lossy_replaces_invalid_bytes() -> Result<()> {
        let dir = tempfile::tempdir().map_err(ErrorEnvelope::from)?;
        let file = dir.path().join("bad.js");
        fs::write(&file, b"function a() {}\n\xff\xfe\n").map_err(ErrorEnvelope::from)?;

        let ctx = RequestContext::new_request();
        let text = LocalFileSystem::new().read_file_lossy(&ctx, file).await?;
        assert!(text.starts_with("function a() {}"));
        assert!(text.contains('\u{FFFD}'));
        Ok(())
    }

    #[tokio::test]
    async fn missing_files_map_to_not_found() {
        let ctx = RequestContext::new_request();
        let result = LocalFileSystem::new()
            .read_file_lossy(&ctx, PathBuf::from("/definitely/not/here.js"))
            .await;
        assert_eq!(result.err().map(|error| error.code), Some(ErrorCode::not_found()));
    }

    #[tokio::test]
    async fn cancelled_requests_do_not_touch_disk() {
        let ctx = RequestContext::new_request();
        ctx.cancel();
        let result = LocalFileSystem::new()
            .read_dir(&ctx, PathBuf::from("/"))
            .await;
        assert!(result.is_err_and(|error| error.is_cancelled()));
    }

    #[test]
    fn normalizer_collapses_relative_segments_for_missing_paths() {
        let normalized = LocalPathNormalizer::new().normalize(Path::new("/no/such/dir/../file.js"));
        assert!(normalized.ends_with("/no/such/file.js"));
    }

    #[test]
    fn normalizer_resolves_existing_paths() -> Result<()> {
        let dir = tempfile::tempdir().map_err(ErrorEnvelope::from)?;
        let nested = dir.path().join("a");
        fs::create_dir(&nested).map_err(ErrorEnvelope::from)?;

        let normalizer = LocalPathNormalizer::new();
        let direct = normalizer.normalize(&nested);
        let dotted = normalizer.normalize(&dir.path().join("a/./../a"));
        assert_eq!(direct, dotted);
        assert!(!direct.contains('\\'));
        Ok(())
    }
}

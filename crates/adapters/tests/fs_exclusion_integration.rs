//! Filesystem + exclusion integration tests.

use sigdex_adapters::{LocalFileSystem, LocalPathNormalizer, SubstringExclusionFilter};
use sigdex_ports::{ExclusionPort, FileSystemEntryKind, FileSystemPort, PathNormalizerPort};
use sigdex_shared::{ErrorEnvelope, RequestContext, Result};
use std::fs;
use std::path::PathBuf;

fn fixture() -> Result<tempfile::TempDir> {
    let dir = tempfile::tempdir().map_err(ErrorEnvelope::from)?;
    let root = dir.path();
    fs::create_dir_all(root.join("src")).map_err(ErrorEnvelope::from)?;
    fs::create_dir_all(root.join("node_modules/pkg")).map_err(ErrorEnvelope::from)?;
    fs::write(root.join("src/app.js"), "function main() {}\n").map_err(ErrorEnvelope::from)?;
    fs::write(root.join("node_modules/pkg/index.js"), "function dep() {}\n")
        .map_err(ErrorEnvelope::from)?;
    fs::write(root.join("README.md"), "# readme\n").map_err(ErrorEnvelope::from)?;
    Ok(dir)
}

#[tokio::test]
async fn walk_fixture_with_exclusions() -> Result<()> {
    let dir = fixture()?;
    let ctx = RequestContext::new_request();
    let fs = LocalFileSystem::new();
    let normalizer = LocalPathNormalizer::new();
    let exclusion = SubstringExclusionFilter::new(["node_modules"]);

    let mut pending = vec![PathBuf::from(&*normalizer.normalize(dir.path()))];
    let mut files = Vec::new();
    while let Some(current) = pending.pop() {
        for entry in fs.read_dir(&ctx, current.clone()).await? {
            let path = current.join(&*entry.name);
            let key = normalizer.normalize(&path);
            if exclusion.is_excluded(&key) {
                continue;
            }
            match entry.kind {
                FileSystemEntryKind::Directory => pending.push(path),
                FileSystemEntryKind::File => files.push(sigdex_domain::basename(&key).to_owned()),
                FileSystemEntryKind::Other => {},
            }
        }
    }

    files.sort();
    assert_eq!(files, vec!["README.md".to_string(), "app.js".to_string()]);
    Ok(())
}

#[tokio::test]
async fn exists_tracks_deletions() -> Result<()> {
    let dir = fixture()?;
    let ctx = RequestContext::new_request();
    let fs = LocalFileSystem::new();
    let file = dir.path().join("src/app.js");

    assert!(fs.exists(&ctx, file.clone()).await);
    std::fs::remove_file(&file).map_err(ErrorEnvelope::from)?;
    assert!(!fs.exists(&ctx, file).await);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn symlinked_directories_are_not_descendable() -> Result<()> {
    let dir = fixture()?;
    let root = dir.path();
    std::os::unix::fs::symlink(root.join("src"), root.join("loop")).map_err(ErrorEnvelope::from)?;
    std::os::unix::fs::symlink(root.join("src/app.js"), root.join("alias.js"))
        .map_err(ErrorEnvelope::from)?;

    let ctx = RequestContext::new_request();
    let entries = LocalFileSystem::new()
        .read_dir(&ctx, root.to_path_buf())
        .await?;
    let kind_of = |name: &str| {
        entries
            .iter()
            .find(|entry| &*entry.name == name)
            .map(|entry| entry.kind)
    };

    assert_eq!(kind_of("loop"), Some(FileSystemEntryKind::Other));
    assert_eq!(kind_of("alias.js"), Some(FileSystemEntryKind::File));
    assert_eq!(kind_of("src"), Some(FileSystemEntryKind::Directory));

    let normalizer = LocalPathNormalizer::new();
    assert_eq!(
        normalizer.normalize(&root.join("alias.js")),
        normalizer.normalize(&root.join("src/app.js"))
    );
    Ok(())
}

//! Contract-style tests for port traits using in-memory adapters.

use sigdex_ports::{
    FileSystemEntryKind, FileSystemPort, LogLevel, LoggerPort, PathNormalizerPort, WorkspacePort,
    log_fields,
};
use sigdex_shared::{ErrorCode, RequestContext, Result};
use sigdex_testkit::in_memory::{
    InMemoryFileSystem, LexicalPathNormalizer, RecordingLogger, StaticWorkspace,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[tokio::test]
async fn filesystem_port_contract_smoke() -> Result<()> {
    let ctx = RequestContext::new_request();
    let fs = InMemoryFileSystem::new()
        .with_file("/proj/lib.js", "function a() {}\n")
        .with_file("/proj/node_modules/dep/index.js", "");

    let listing = fs.read_dir(&ctx, PathBuf::from("/proj")).await?;
    let names: Vec<_> = listing.iter().map(|entry| (&*entry.name, entry.kind)).collect();
    assert_eq!(
        names,
        vec![
            ("lib.js", FileSystemEntryKind::File),
            ("node_modules", FileSystemEntryKind::Directory),
        ]
    );

    let text = fs.read_file_lossy(&ctx, PathBuf::from("/proj/lib.js")).await?;
    assert!(text.contains("function a"));

    let missing = fs.read_file_lossy(&ctx, PathBuf::from("/proj/none.js")).await;
    assert_eq!(missing.err().map(|error| error.code), Some(ErrorCode::not_found()));
    Ok(())
}

#[tokio::test]
async fn filesystem_honours_cancellation() {
    let ctx = RequestContext::new_request();
    ctx.cancel();
    let fs = InMemoryFileSystem::new().with_file("/proj/lib.js", "");

    let result = fs.read_dir(&ctx, PathBuf::from("/proj")).await;
    assert!(result.is_err_and(|error| error.is_cancelled()));
    assert_eq!(fs.read_count(), 0);
}

#[tokio::test]
async fn read_delay_applies_to_every_read() -> Result<()> {
    let ctx = RequestContext::new_request();
    let fs = InMemoryFileSystem::new().with_file("/proj/lib.js", "x");
    fs.set_read_delay(Duration::from_millis(50));

    let started = std::time::Instant::now();
    fs.read_file_lossy(&ctx, PathBuf::from("/proj/lib.js")).await?;
    assert!(started.elapsed() >= Duration::from_millis(50));
    Ok(())
}

#[test]
fn lexical_normalizer_unifies_separators() {
    let normalizer = LexicalPathNormalizer;
    assert_eq!(&*normalizer.normalize(Path::new("/proj/./src/../lib.js")), "/proj/lib.js");
}

#[test]
fn workspace_reports_what_was_set() {
    let workspace = StaticWorkspace::with_folders(["/proj"]);
    workspace.set_files(["/other/a.js"]);
    assert_eq!(workspace.open_folders(), vec![PathBuf::from("/proj")]);
    assert_eq!(workspace.open_files(), vec![PathBuf::from("/other/a.js")]);
}

#[test]
fn recording_logger_merges_child_fields() {
    let logger = RecordingLogger::default();
    let child = logger.child(log_fields([("correlationId", "scan_7")]));
    child.warn("index.scan.aborted", "stopped", Some(log_fields([("files", 3)])));
    logger.log(sigdex_ports::LogEvent::new(LogLevel::Info, "plain", "plain"));

    assert_eq!(logger.event_names(), vec!["index.scan.aborted", "plain"]);
    let events = logger.events();
    let fields = events[0].fields.clone().unwrap_or_default();
    assert_eq!(fields.len(), 2);
    assert_eq!(logger.count("plain"), 1);
}

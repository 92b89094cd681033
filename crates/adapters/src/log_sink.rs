//! Log sinks receiving pre-formatted JSON lines.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// A sink that receives pre-formatted log lines.
pub trait LogSink: Send + Sync {
    /// Write a line to the sink.
    fn write_line(&self, line: &str);
}

/// Log sink that writes to stderr.
#[derive(Debug, Default)]
pub struct StderrLogSink;

impl LogSink for StderrLogSink {
    fn write_line(&self, line: &str) {
        let mut stderr = std::io::stderr().lock();
        if let Err(error) = stderr.write_all(line.as_bytes()) {
            eprintln!("log sink write failed: {error}");
        }
    }
}

/// Log sink buffering lines in memory; used by embedders and tests that
/// assert on emitted events.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogSink {
    /// Drain buffered lines.
    pub fn take(&self) -> Vec<String> {
        let mut guard = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *guard)
    }

    /// Parse buffered lines as JSON without draining them. Lines that fail to
    /// parse are skipped.
    pub fn events(&self) -> Vec<serde_json::Value> {
        let guard = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .iter()
            .filter_map(|line| serde_json::from_str(line.trim()).ok())
            .collect()
    }

    /// Names of buffered events in emission order.
    pub fn event_names(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|event| event.get("event").and_then(serde_json::Value::as_str))
            .map(str::to_owned)
            .collect()
    }
}

impl LogSink for MemoryLogSink {
    fn write_line(&self, line: &str) {
        let mut guard = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        guard.push(line.to_string());
    }
}

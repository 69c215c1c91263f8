//! Logging sinks for finished audit lines.
//!
//! The sink owns transport and severity tagging only; rendering and role
//! prefixes are the logger's job. Sink unavailability is the platform
//! layer's concern and never aborts the caller.

use std::sync::Mutex;

use tracing::{error, info};

/// Severity of a forwarded audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Destination for finished audit lines.
pub trait LogSink: Send + Sync {
    fn info(&self, line: &str);
    fn error(&self, line: &str);
}

/// Default sink: the process-wide tracing subscriber.
///
/// The subscriber is opened once per process (see the helper binary's
/// logging setup) and plays the role a system log facility does for
/// daemon-style services.
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, line: &str) {
        info!(target: "audit", "{line}");
    }

    fn error(&self, line: &str) {
        error!(target: "audit", "{line}");
    }
}

/// Discards all lines; for callers that disable auditing.
pub struct NullSink;

impl LogSink for NullSink {
    fn info(&self, _line: &str) {}
    fn error(&self, _line: &str) {}
}

/// Records lines in memory; a test double.
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<(Severity, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything forwarded so far.
    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Severity, String)>> {
        // A poisoned lock only means a test panicked mid-push.
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LogSink for RecordingSink {
    fn info(&self, line: &str) {
        self.lock().push((Severity::Info, line.to_string()));
    }

    fn error(&self, line: &str) {
        self.lock().push((Severity::Error, line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_severity_and_order() {
        let sink = RecordingSink::new();
        sink.info("first");
        sink.error("second");

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (Severity::Info, "first".to_string()));
        assert_eq!(lines[1], (Severity::Error, "second".to_string()));
    }

    #[test]
    fn test_null_sink_accepts_lines() {
        let sink = NullSink;
        sink.info("ignored");
        sink.error("ignored");
    }
}

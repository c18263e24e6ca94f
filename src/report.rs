//! Diagnostics reporting.
//!
//! Components that need to emit diagnostics receive a [`Reporter`] instead of
//! logging through a process-wide logger. The binary hands out a
//! [`TracingReporter`], which forwards to `tracing` (and from there to the
//! subscriber on standard error); tests use a [`RecordingReporter`] to inspect
//! what was reported.

use std::sync::Mutex;

pub use tracing::Level;

/// Capability for emitting diagnostics
pub trait Reporter: Send + Sync + std::fmt::Debug {
    /// Emit one diagnostic message at the given level
    fn report(&self, level: Level, message: &str);

    fn error(&self, message: &str) {
        self.report(Level::ERROR, message);
    }

    fn warn(&self, message: &str) {
        self.report(Level::WARN, message);
    }

    fn info(&self, message: &str) {
        self.report(Level::INFO, message);
    }

    fn debug(&self, message: &str) {
        self.report(Level::DEBUG, message);
    }
}

/// Reporter that forwards to `tracing` under the `pdf2bibtex` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "pdf2bibtex", "{}", message),
            Level::WARN => tracing::warn!(target: "pdf2bibtex", "{}", message),
            Level::INFO => tracing::info!(target: "pdf2bibtex", "{}", message),
            Level::DEBUG => tracing::debug!(target: "pdf2bibtex", "{}", message),
            _ => tracing::trace!(target: "pdf2bibtex", "{}", message),
        }
    }
}

/// Reporter that keeps every message in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<(Level, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first
    pub fn events(&self) -> Vec<(Level, String)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at exactly `level`
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    /// Warning messages
    pub fn warnings(&self) -> Vec<String> {
        self.messages_at(Level::WARN)
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, level: Level, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push((level, message.to_string()));
        }
    }
}

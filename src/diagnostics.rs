//! Verbose indexing diagnostics.
//!
//! Messages are produced by closures that only run when the session's
//! verbose flag is on, so building a message never costs anything in
//! normal operation.

use std::fmt::Debug;
use std::sync::Arc;

/// Log target of verbose indexing messages.
pub const CRAWLING_TARGET: &str = "glaive::crawling";

/// Receives verbose diagnostic messages.
pub trait DiagnosticSink: Send + Sync + Debug {
    /// Whether messages would be recorded at all.
    fn enabled(&self) -> bool {
        true
    }

    fn trace(&self, message: String);
}

/// Sink writing to the `log` facade at debug level.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn enabled(&self) -> bool {
        log::log_enabled!(target: CRAWLING_TARGET, log::Level::Debug)
    }

    fn trace(&self, message: String) {
        log::debug!(target: CRAWLING_TARGET, "{message}");
    }
}

/// Session-scoped verbose diagnostics.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    verbose: bool,
    sink: Arc<dyn DiagnosticSink>,
}

impl Diagnostics {
    /// Diagnostics sending to the `log` facade.
    pub fn new(verbose: bool) -> Self {
        Self::with_sink(verbose, Arc::new(LogSink))
    }

    pub fn with_sink(verbose: bool, sink: Arc<dyn DiagnosticSink>) -> Self {
        Diagnostics { verbose, sink }
    }

    /// Whether verbose messages are produced.
    pub fn is_enabled(&self) -> bool {
        self.verbose && self.sink.enabled()
    }

    /// Record a message. `message` is not called unless enabled.
    pub fn debug<F>(&self, message: F)
    where
        F: FnOnce() -> String,
    {
        if self.is_enabled() {
            self.sink.trace(message());
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(false)
    }
}

//! Typed observable events
//!
//! Every log line the service emits names one of these events, so operators
//! can grep for a stable identifier instead of free-form text.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration resolved
    ConfigLoaded,
    /// Listener bound, ready to serve
    Serving,
    /// Graceful shutdown finished
    ShutdownComplete,

    // Document store
    /// Backing file absent, empty document substituted
    DocumentMissing,
    /// Backing file unreadable or unparsable, empty document substituted
    DocumentCorrupt,
    /// Document written to disk
    DocumentSaved,
    /// Document could not be written
    DocumentSaveFailed,
    /// Canonical empty document created by `init`
    DocumentInitialized,

    // Requests
    /// One HTTP request handled
    RequestHandled,
    /// Export document rendered
    ExportRendered,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "REQAI_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::DocumentMissing => "DOCUMENT_MISSING",
            Event::DocumentCorrupt => "DOCUMENT_CORRUPT",
            Event::DocumentSaved => "DOCUMENT_SAVED",
            Event::DocumentSaveFailed => "DOCUMENT_SAVE_FAILED",
            Event::DocumentInitialized => "DOCUMENT_INITIALIZED",

            Event::RequestHandled => "REQUEST_HANDLED",
            Event::ExportRendered => "EXPORT_RENDERED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::DocumentMissing | Event::DocumentCorrupt => Severity::Warn,
            Event::DocumentSaveFailed => Severity::Error,
            Event::RequestHandled | Event::DocumentSaved => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_events_are_warnings() {
        assert_eq!(Event::DocumentMissing.severity(), Severity::Warn);
        assert_eq!(Event::DocumentCorrupt.severity(), Severity::Warn);
    }

    #[test]
    fn test_save_failure_is_error() {
        assert_eq!(Event::DocumentSaveFailed.severity(), Severity::Error);
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(Event::Serving.to_string(), "REQAI_SERVING");
    }
}

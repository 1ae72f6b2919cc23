//! Observability for reqai
//!
//! Structured JSON-lines logging with typed events. Logging is synchronous,
//! has no side effects on request handling, and never fails the caller.
//!
//! # Usage
//!
//! ```ignore
//! use reqai::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::DocumentCorrupt, &[("path", "data.json")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a typed event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a typed event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

//! reqai - requirements entity store with RTF export
//!
//! Named collections of loosely-typed items (stakeholders, goals,
//! requirements, ...) persisted as one JSON document, served over HTTP, and
//! exportable as a formatted RTF document.

pub mod cli;
pub mod export;
pub mod http_server;
pub mod observability;
pub mod store;

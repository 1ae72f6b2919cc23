//! # Export
//!
//! Renders the whole document as a downloadable RTF file.
//!
//! - [`renderer`]: recursive JSON -> RTF body rendering with escaping
//! - [`writer`]: preamble/trailer, ASCII encoding, timestamped file name

pub mod renderer;
pub mod writer;

pub use renderer::{escape, render};
pub use writer::{ExportDocument, ExportWriter, DEFAULT_BASE_NAME, MEDIA_TYPE};

use chrono::NaiveDateTime;

use crate::store::Document;

/// Export `doc` with an optional caller-chosen base file name.
pub fn export_document(doc: &Document, base_name: Option<&str>, generated_at: NaiveDateTime) -> ExportDocument {
    let writer = match base_name {
        Some(name) => ExportWriter::new().with_base_name(name),
        None => ExportWriter::new(),
    };
    writer.write(&doc.to_value(), generated_at)
}

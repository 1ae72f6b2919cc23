//! Export document assembly
//!
//! Wraps the rendered body in an RTF preamble (font table, default paragraph
//! formatting, title block) and trailer, encodes it to 7-bit bytes, and names
//! the file `<base>_<YYYYMMDD_HHMMSS>.rtf`.

use chrono::NaiveDateTime;
use serde_json::Value;

use super::renderer::{escape, render};

/// Media type of the export document
pub const MEDIA_TYPE: &str = "application/rtf";

/// File extension of the export document
pub const EXTENSION: &str = "rtf";

/// Base file name used when the caller supplies none (or nothing usable)
pub const DEFAULT_BASE_NAME: &str = "requirements_export";

/// Title paragraph at the top of every export
pub const DEFAULT_TITLE: &str = "Requirements Export";

const PREAMBLE: &str = "{\\rtf1\\ansi\\ansicpg1252\\deff0\n\
{\\fonttbl{\\f0\\fswiss\\fcharset0 Helvetica;}}\n\
\\viewkind4\\uc1\\pard\\sa120\\f0\\fs22\n";

const TRAILER: &str = "}\n";

/// A rendered export, ready to be written to disk or sent over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ExportDocument {
    pub fn media_type(&self) -> &'static str {
        MEDIA_TYPE
    }

    /// `Content-Disposition` value offering the document as a download
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Builds [`ExportDocument`]s.
#[derive(Debug, Clone)]
pub struct ExportWriter {
    title: String,
    base_name: String,
}

impl Default for ExportWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportWriter {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            base_name: DEFAULT_BASE_NAME.to_string(),
        }
    }

    /// Use a caller-supplied base name, sanitized.
    ///
    /// Falls back to [`DEFAULT_BASE_NAME`] if nothing survives sanitizing.
    pub fn with_base_name(mut self, raw: &str) -> Self {
        let clean = sanitize_base_name(raw);
        if !clean.is_empty() {
            self.base_name = clean;
        }
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Render `value` into a complete export document.
    pub fn write(&self, value: &Value, generated_at: NaiveDateTime) -> ExportDocument {
        let body = render(value);

        let mut text = String::with_capacity(PREAMBLE.len() + body.len() + 256);
        text.push_str(PREAMBLE);
        text.push_str("\\pard\\li0\\fi0\\qc{\\b\\fs32 ");
        text.push_str(&escape(&self.title));
        text.push_str("}\\par\n");
        text.push_str("\\pard\\li0\\fi0\\qc{\\i Generated ");
        text.push_str(&generated_at.format("%Y-%m-%d %H:%M:%S").to_string());
        text.push_str("}\\par\n\\par\n");
        text.push_str(&body);
        text.push_str(TRAILER);

        ExportDocument {
            filename: self.filename(generated_at),
            bytes: encode_ascii(&text),
        }
    }

    /// `<base>_<YYYYMMDD_HHMMSS>.rtf`
    pub fn filename(&self, generated_at: NaiveDateTime) -> String {
        format!(
            "{}_{}.{}",
            self.base_name,
            generated_at.format("%Y%m%d_%H%M%S"),
            EXTENSION
        )
    }
}

/// Keep only ASCII alphanumerics and `.`, `_`, `-`.
pub fn sanitize_base_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// Escaping already removed every non-ASCII character; anything that slips
/// through is replaced rather than emitted raw.
fn encode_ascii(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 1)
            .unwrap()
            .and_hms_opt(21, 10, 18)
            .unwrap()
    }

    #[test]
    fn test_filename_format() {
        let writer = ExportWriter::new();
        assert_eq!(writer.filename(at()), "requirements_export_20250401_211018.rtf");
    }

    #[test]
    fn test_base_name_is_sanitized() {
        let writer = ExportWriter::new().with_base_name("../my report!.v2");
        assert_eq!(writer.base_name(), "..myreport.v2");
    }

    #[test]
    fn test_unusable_base_name_falls_back() {
        let writer = ExportWriter::new().with_base_name("/// ???");
        assert_eq!(writer.base_name(), DEFAULT_BASE_NAME);
    }

    #[test]
    fn test_document_is_wrapped() {
        let doc = ExportWriter::new().write(&json!({"requirements": []}), at());
        let text = String::from_utf8(doc.bytes).unwrap();

        assert!(text.starts_with("{\\rtf1\\ansi"));
        assert!(text.contains("\\fonttbl"));
        assert!(text.contains("{\\b\\fs32 Requirements Export}"));
        assert!(text.contains("Generated 2025-04-01 21:10:18"));
        assert!(text.contains("{\\b requirements}\\par\n"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_output_is_ascii() {
        let doc = ExportWriter::new()
            .with_title("Anforderungsübersicht")
            .write(&json!({"stakeholders": [{"name": "Zoë 😀"}]}), at());
        assert!(doc.bytes.is_ascii());
    }

    #[test]
    fn test_headers() {
        let doc = ExportWriter::new().write(&json!({}), at());
        assert_eq!(doc.media_type(), "application/rtf");
        assert_eq!(
            doc.content_disposition(),
            "attachment; filename=\"requirements_export_20250401_211018.rtf\""
        );
    }
}

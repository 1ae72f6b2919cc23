//! Recursive RTF rendering of JSON values
//!
//! Layout rules:
//! - Mapping: each key becomes a bold label. Nested values go on the
//!   following paragraphs one level deeper; scalars follow the label inline.
//! - Sequence: each element gets a numbered marker paragraph (`1.`, `2.`, ...),
//!   its content one level deeper, then a blank paragraph.
//! - Scalar: a standalone paragraph.
//!
//! Indentation is paragraph formatting (`\li` / `\fi`), never literal
//! whitespace. All text passes through [`escape`], so the body contains only
//! 7-bit characters and no unescaped `\`, `{` or `}` from content.

use std::fmt::Write;

use serde_json::Value;

/// Left indent per nesting level, in twips
pub const INDENT_TWIPS: i64 = 360;

/// Hanging first-line indent for nested paragraphs, in twips
pub const HANG_TWIPS: i64 = 180;

/// Render `value` starting at depth 0.
pub fn render(value: &Value) -> String {
    render_at(value, 0)
}

/// Render `value` at an explicit starting depth.
pub fn render_at(value: &Value, depth: usize) -> String {
    let mut out = String::new();
    render_value(&mut out, value, depth);
    out
}

fn render_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                open_paragraph(out, depth);
                out.push_str("{\\b ");
                out.push_str(&escape(key));
                out.push('}');
                if is_container(child) {
                    out.push_str("\\par\n");
                    render_value(out, child, depth + 1);
                } else {
                    out.push_str(": ");
                    out.push_str(&escape(&scalar_text(child)));
                    out.push_str("\\par\n");
                }
            }
        }
        Value::Array(elements) => {
            for (index, element) in elements.iter().enumerate() {
                open_paragraph(out, depth);
                let _ = write!(out, "{{\\b {}.}}\\par\n", index + 1);
                render_value(out, element, depth + 1);
                out.push_str("\\par\n");
            }
        }
        scalar => {
            open_paragraph(out, depth);
            out.push_str(&escape(&scalar_text(scalar)));
            out.push_str("\\par\n");
        }
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn open_paragraph(out: &mut String, depth: usize) {
    let (left, first) = indent_for(depth);
    let _ = write!(out, "\\pard\\li{left}\\fi{first} ");
}

/// Left / first-line indent pair for a depth, in twips.
pub fn indent_for(depth: usize) -> (i64, i64) {
    let depth = i64::try_from(depth).unwrap_or(i64::MAX / INDENT_TWIPS);
    let left = depth.saturating_mul(INDENT_TWIPS);
    let first = if depth > 0 { -HANG_TWIPS } else { 0 };
    (left, first)
}

/// Textual form of a scalar. Containers fall back to compact JSON.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Escape text for an RTF body.
///
/// Structural characters get a backslash; line breaks and tabs become
/// control words; every non-ASCII character becomes a `\uN?` escape of its
/// UTF-16 code units (signed, as RTF requires).
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\n' => out.push_str("\\line "),
            '\t' => out.push_str("\\tab "),
            '\r' => {}
            c if c.is_ascii_control() => {}
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{}?", *unit as i16);
                }
            }
        }
    }
    out
}

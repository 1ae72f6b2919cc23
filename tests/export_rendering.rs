//! Export Rendering Properties
//!
//! Whatever the document holds, the export must be 7-bit text whose group
//! braces balance: content can never open or close an RTF group.

use chrono::NaiveDate;
use proptest::prelude::*;
use reqai::export::{escape, render, ExportWriter};
use serde_json::{json, Map, Value};

// =============================================================================
// Strategies
// =============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,12}",
        "[{}\\\\\n\t\r]{0,6}",
        any::<String>(),
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        arb_text().prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_text(), inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

// =============================================================================
// Helpers
// =============================================================================

/// Net group depth over the text, skipping escaped characters.
/// Returns None if a close brace ever precedes its open brace.
fn group_balance(text: &str) -> Option<i64> {
    let mut depth = 0i64;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    Some(depth)
}

fn generated_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(14, 5, 0)
        .unwrap()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_escape_is_ascii_and_brace_safe(text in arb_text()) {
        let escaped = escape(&text);
        prop_assert!(escaped.is_ascii());
        prop_assert_eq!(group_balance(&escaped), Some(0));
    }

    #[test]
    fn prop_body_groups_balance(value in arb_json()) {
        let body = render(&value);
        prop_assert!(body.is_ascii());
        prop_assert_eq!(group_balance(&body), Some(0));
    }

    #[test]
    fn prop_full_export_is_one_group(value in arb_json()) {
        let export = ExportWriter::new().write(&value, generated_at());
        prop_assert!(export.bytes.is_ascii());

        let text = String::from_utf8(export.bytes).unwrap();
        prop_assert!(text.starts_with("{\\rtf1"), "export does not start with the RTF header");
        prop_assert_eq!(group_balance(&text), Some(0));
    }
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_nested_layout_indents_by_depth() {
    let body = render(&json!({
        "requirements": [{"id": "REQ001", "tags": ["auth"]}]
    }));

    assert!(body.contains("\\pard\\li0\\fi0 {\\b requirements}\\par"));
    assert!(body.contains("\\pard\\li360\\fi-180 {\\b 1.}\\par"));
    assert!(body.contains("\\pard\\li720\\fi-180 {\\b id}: REQ001\\par"));
    assert!(body.contains("\\pard\\li1080\\fi-180 {\\b 1.}\\par"));
    assert!(body.contains("\\pard\\li1440\\fi-180 auth\\par"));
}

#[test]
fn test_astral_characters_use_surrogate_pairs() {
    assert_eq!(escape("\u{1F600}"), "\\u-10179?\\u-8704?");
}

//! Human-readable identifier allocation
//!
//! Identifiers look like `REQ007`: an alphabetic prefix followed by a decimal
//! suffix zero-padded to at least three digits. The next identifier is
//! derived from the collection's current contents on every call; there is no
//! stored counter. Callers must allocate inside [`DocumentStore::update`] so
//! that the derivation and the following append happen atomically.
//!
//! [`DocumentStore::update`]: super::DocumentStore::update

use std::sync::OnceLock;

use regex::Regex;

use super::collection::prefix_for;
use super::document::{item_id, Document};

/// Minimum width of the numeric suffix
const SUFFIX_WIDTH: usize = 3;

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Anchored at the start only: "REQ012-old" still reads as REQ / 12.
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z]+)([0-9]+)").expect("static id pattern"))
}

/// Derive the next identifier for `collection_key`.
///
/// The first id matching "letters then digits" fixes the prefix; the
/// result is that prefix followed by the highest suffix sharing it, plus one.
/// Ids that don't match, or carry another prefix, are ignored for the
/// maximum. If nothing matches, the prefix comes from the letters of the
/// first non-empty id, then from the collection's prefix table.
pub fn next_id(collection_key: &str, doc: &Document) -> String {
    let items = match doc.collection(collection_key) {
        Some(items) if !items.is_empty() => items,
        _ => return format_id(&prefix_for(collection_key), 1),
    };

    let mut prefix = String::new();
    let mut max_suffix: u64 = 0;

    for item in items {
        let id = item_id(item).unwrap_or("");

        if let Some(caps) = id_pattern().captures(id) {
            let candidate = &caps[1];
            if prefix.is_empty() {
                prefix = candidate.to_string();
            }
            if candidate == prefix {
                // Suffixes beyond u64 are ignored rather than wrapped.
                if let Ok(n) = caps[2].parse::<u64>() {
                    max_suffix = max_suffix.max(n);
                }
            }
        } else if prefix.is_empty() && !id.is_empty() {
            prefix = id.chars().filter(|c| c.is_alphabetic()).collect();
            if prefix.is_empty() {
                prefix = prefix_for(collection_key);
            }
        }
    }

    if prefix.is_empty() {
        prefix = prefix_for(collection_key);
    }

    format_id(&prefix, max_suffix.saturating_add(1))
}

fn format_id(prefix: &str, number: u64) -> String {
    format!("{prefix}{number:0width$}", width = SUFFIX_WIDTH)
}

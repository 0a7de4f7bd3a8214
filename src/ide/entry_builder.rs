//! Renders the text of a new catalog entry.

use crate::syntax::json_tree::KEY_SEPARATOR;

/// Renders `"a": { "b": { "c": "value" } }` for the key segments `a.b.c`.
///
/// `value` is quoted as a JSON string. With `trailing_separator` the
/// outermost fragment is followed by `,\n`.
#[must_use]
pub fn build_entry(key: &str, value: &str, trailing_separator: bool) -> String {
    let segments: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    build_entry_literal(&segments, &quote(value), trailing_separator)
}

/// Like [`build_entry`] but with segments already split and `literal`
/// inserted verbatim as the innermost value.
#[must_use]
pub fn build_entry_literal(segments: &[&str], literal: &str, trailing_separator: bool) -> String {
    let Some((last, parents)) = segments.split_last() else {
        return String::new();
    };

    let mut entry = format!("{}: {literal}", quote(last));
    for segment in parents.iter().rev() {
        entry = format!("{}: {{ {entry} }}", quote(segment));
    }
    if trailing_separator {
        entry.push_str(",\n");
    }
    entry
}

/// JSON string literal for `text`.
pub(crate) fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}

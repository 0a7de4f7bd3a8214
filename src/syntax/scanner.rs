//! Finds translation helper calls in Handlebars templates.
//!
//! Two call shapes are recognized, with a single- or double-quoted key:
//! the mustache form `{{t "key"}}` (optionally with `~` whitespace control)
//! and the sub-expression form `(t "key")`.

use regex::{
    Captures,
    Regex,
};

use crate::types::{
    LineIndex,
    SourceRange,
    TextSpan,
};

/// One translation call found in a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsageOccurrence {
    /// The literal key, without quotes.
    pub key: String,
    /// Span of the whole call, delimiters included.
    pub full_span: TextSpan,
    /// Span of the key text, quotes excluded.
    pub key_span: TextSpan,
    pub full_range: SourceRange,
    pub key_range: SourceRange,
}

/// Builds the call pattern for a helper name.
pub fn usage_pattern(function_name: &str) -> Result<Regex, regex::Error> {
    let name = regex::escape(function_name);
    let literal = r#"(?:"([^"\r\n]*)"|'([^'\r\n]*)')"#;
    Regex::new(&format!(
        r"\{{\{{~?\s*{name}\s+{literal}\s*~?\}}\}}|\(\s*{name}\s+{literal}\s*\)"
    ))
}

/// Scans `text` for calls matching `pattern`, in document order.
#[must_use]
pub fn scan_usages(text: &str, pattern: &Regex) -> Vec<UsageOccurrence> {
    let lines = LineIndex::new(text);
    pattern
        .captures_iter(text)
        .filter_map(|captures| {
            let full = captures.get(0)?;
            let key = key_group(&captures)?;
            let full_span = TextSpan::between(full.start(), full.end());
            let key_span = TextSpan::between(key.start(), key.end());
            Some(UsageOccurrence {
                key: key.as_str().to_string(),
                full_span,
                key_span,
                full_range: lines.range(full_span),
                key_range: lines.range(key_span),
            })
        })
        .collect()
}

/// The key group that took part in the match; each call shape has one per quote style.
fn key_group<'h>(captures: &Captures<'h>) -> Option<regex::Match<'h>> {
    (1..=4).find_map(|group| captures.get(group))
}

//! Helpers shared by unit tests.
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use crate::indexer::TranslationIndex;
use crate::input::project::Project;
use crate::syntax::CatalogKind;
use crate::types::LineIndex;

/// Catalog owned by the default project.
pub(crate) const CATALOG_URI: &str = "file:///app/translations/en-us.json";

/// Catalog no project claims, shared by every project.
pub(crate) const SECOND_CATALOG_URI: &str = "file:///app/translations/fr.json";

pub(crate) const TEMPLATE_URI: &str = "file:///app/templates/index.hbs";

pub(crate) const OTHER_TEMPLATE_URI: &str = "file:///app/templates/other.hbs";

/// Builds an index with the default project and the given documents.
///
/// Catalog kinds are inferred from the URI extension.
pub(crate) fn index_with(catalogs: &[(&str, &str)], templates: &[(&str, &str)]) -> TranslationIndex {
    let mut index = TranslationIndex::default();
    index.set_projects(vec![Project::default()]);
    for (uri, text) in catalogs {
        let kind = CatalogKind::from_uri(uri).unwrap_or(CatalogKind::Json);
        index.update_catalog(uri, kind, (*text).to_string()).unwrap();
    }
    for (uri, text) in templates {
        index.update_template(uri, (*text).to_string());
    }
    index
}

/// Byte offset of the first occurrence of `needle` in `text`, plus `delta`.
pub(crate) fn offset_of(text: &str, needle: &str, delta: usize) -> usize {
    text.find(needle).unwrap() + delta
}

/// Applies edits (given as document ranges) to `text`, last edit first.
pub(crate) fn apply_edits(text: &str, edits: &[(crate::types::SourceRange, String)]) -> String {
    let lines = LineIndex::new(text);
    let mut spans: Vec<(usize, usize, &str)> = edits
        .iter()
        .map(|(range, new_text)| {
            (lines.offset(range.start).unwrap(), lines.offset(range.end).unwrap(), new_text.as_str())
        })
        .collect();
    spans.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

    let mut result = text.to_string();
    for (start, end, new_text) in spans {
        result.replace_range(start..end, new_text);
    }
    result
}

//! Edit plans for the generate and remove translation commands.

use super::edits::PlannedEdit;
use super::entry_builder::{
    build_entry,
    build_entry_literal,
};
use crate::indexer::TranslationIndex;
use crate::input::catalog::Catalog;
use crate::syntax::json_tree::KEY_SEPARATOR;
use crate::types::TextSpan;

/// Plans the insertion of `key` with `value` into the catalog at `catalog_uri`.
///
/// The entry goes before the first child of the deepest existing ancestor
/// object, creating the missing segments. Returns `None` when the catalog is
/// unknown, already defines the key, or a scalar blocks the path.
#[must_use]
pub fn generate_translation_edit(
    index: &TranslationIndex,
    catalog_uri: &str,
    key: &str,
    value: &str,
) -> Option<PlannedEdit> {
    let Some(catalog) = index.catalog(catalog_uri) else {
        tracing::warn!(catalog_uri, "Unknown catalog for generated translation");
        return None;
    };
    planned_insertion(index, catalog, key, |missing, trailing_separator| {
        let separator = KEY_SEPARATOR.to_string();
        build_entry(&missing.join(separator.as_str()), value, trailing_separator)
    })
}

/// Plans an insertion of `key` whose value is the JSON text `literal`.
pub(super) fn insertion_edit(
    index: &TranslationIndex,
    catalog: Catalog,
    key: &str,
    literal: &str,
) -> Option<PlannedEdit> {
    planned_insertion(index, catalog, key, |missing, trailing_separator| {
        build_entry_literal(missing, literal, trailing_separator)
    })
}

/// Places the entry rendered from the key segments missing in `catalog`.
fn planned_insertion(
    index: &TranslationIndex,
    catalog: Catalog,
    key: &str,
    render: impl FnOnce(&[&str], bool) -> String,
) -> Option<PlannedEdit> {
    let parsed = catalog.parsed(index.db());
    let Some(point) = parsed.insertion_point(key) else {
        tracing::debug!(key, catalog = %catalog.uri(index.db()), "No insertion point for key");
        return None;
    };

    let missing: Vec<&str> = key.split(KEY_SEPARATOR).skip(point.depth).collect();
    let text = render(&missing, point.trailing_separator);
    let range = index.catalog_range(catalog, TextSpan::new(point.offset, 0));
    Some(PlannedEdit::new(catalog.uri(index.db()).clone(), range, text))
}

/// Plans the deletion of `key` from every catalog defining it exactly and of
/// every template call using it.
#[must_use]
pub fn remove_translation_edits(index: &TranslationIndex, key: &str) -> Vec<PlannedEdit> {
    let mut edits: Vec<PlannedEdit> = index
        .catalogs()
        .iter()
        .filter_map(|catalog| removal_edit(index, *catalog, key))
        .collect();

    for (uri, usages) in index.all_usages() {
        edits.extend(
            usages
                .into_iter()
                .filter(|usage| usage.key == key)
                .map(|usage| PlannedEdit::new(uri, usage.full_range, "")),
        );
    }
    edits
}

/// Deletes the property of `key` in one catalog, separator included.
pub(super) fn removal_edit(
    index: &TranslationIndex,
    catalog: Catalog,
    key: &str,
) -> Option<PlannedEdit> {
    let parsed = catalog.parsed(index.db());
    if !parsed.contains_key(key) {
        return None;
    }
    let span = parsed.removal_span(key)?;
    let range = index.catalog_range(catalog, span);
    Some(PlannedEdit::new(catalog.uri(index.db()).clone(), range, ""))
}

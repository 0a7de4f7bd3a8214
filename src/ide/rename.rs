//! Rename support for translation keys.

use thiserror::Error;

use super::edits::PlannedEdit;
use super::entry_builder::{
    build_entry_literal,
    quote,
};
use super::translation_edits::{
    insertion_edit,
    removal_edit,
};
use crate::indexer::TranslationIndex;
use crate::input::catalog::Catalog;
use crate::syntax::json_tree::{
    KEY_SEPARATOR,
    UnitLookup,
};
use crate::types::SourceRange;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenameError {
    #[error("Rename cannot be applied. Name {name} already defined in translation file.")]
    NameCollision { name: String },
    /// A catalog has a value where the new key needs an object.
    #[error("Rename cannot be applied. Name {name} conflicts with a value in {catalog}.")]
    BlockedPath { name: String, catalog: String },
}

/// Range of the key literal under `offset`, if a rename may start there.
#[must_use]
pub fn prepare_rename(index: &TranslationIndex, uri: &str, offset: usize) -> Option<SourceRange> {
    index.find_key_at(uri, offset).map(|occurrence| occurrence.key_range)
}

#[must_use]
pub fn can_rename(index: &TranslationIndex, uri: &str, offset: usize) -> bool {
    prepare_rename(index, uri, offset).is_some()
}

/// Plans renaming the key under `offset` to `new_name`.
///
/// Every call using the old key gets its literal replaced, and every catalog
/// defining it gets its property renamed. Nothing is applied, and no edits are
/// returned unless every catalog can take the new key.
/// Returns `Ok(None)` when `offset` is not inside a key literal.
pub fn plan_rename(
    index: &TranslationIndex,
    uri: &str,
    offset: usize,
    new_name: &str,
) -> Result<Option<Vec<PlannedEdit>>, RenameError> {
    if is_defined(index, uri, new_name) {
        return Err(RenameError::NameCollision { name: new_name.to_string() });
    }

    let Some(occurrence) = index.find_key_at(uri, offset) else {
        return Ok(None);
    };
    let old_name = occurrence.key;

    let mut catalog_edits = Vec::new();
    for catalog in index.catalogs() {
        catalog_edits.extend(catalog_rename_edits(index, *catalog, &old_name, new_name)?);
    }

    let mut edits = Vec::new();
    for (template_uri, usages) in index.all_usages() {
        edits.extend(
            usages
                .into_iter()
                .filter(|usage| usage.key == old_name)
                .map(|usage| PlannedEdit::new(template_uri, usage.key_range, new_name)),
        );
    }
    edits.extend(catalog_edits);

    tracing::debug!(old_name, new_name, edits = edits.len(), "Planned rename");
    Ok(Some(edits))
}

/// Whether a catalog of the document defines `name`, as a unit (ignoring case)
/// or as an object.
fn is_defined(index: &TranslationIndex, uri: &str, name: &str) -> bool {
    let db = index.db();
    let lowered = name.to_lowercase();
    index.catalogs_for_document(uri).into_iter().any(|catalog| {
        let parsed = catalog.parsed(db);
        parsed.units().iter().any(|unit| unit.key.to_lowercase() == lowered)
            || matches!(parsed.find_unit(name), Some(UnitLookup::ExactMatch(_)))
    })
}

/// Splits a dotted key into its parent path and leaf segment.
fn split_parent(key: &str) -> (&str, &str) {
    key.rsplit_once(KEY_SEPARATOR).unwrap_or(("", key))
}

/// Edits renaming the property of `old_name` in one catalog.
///
/// A rename within the same parent only rewrites the leaf key; moving to
/// another parent removes the property and inserts the new key with the
/// old value.
fn catalog_rename_edits(
    index: &TranslationIndex,
    catalog: Catalog,
    old_name: &str,
    new_name: &str,
) -> Result<Vec<PlannedEdit>, RenameError> {
    let db = index.db();
    let parsed = catalog.parsed(db);
    let Some(UnitLookup::ExactMatch(property)) = parsed.find_unit(old_name) else {
        return Ok(Vec::new());
    };

    let (old_parent, _) = split_parent(old_name);
    let (new_parent, new_leaf) = split_parent(new_name);
    if old_parent == new_parent {
        let span = parsed.document_span(property.key.span);
        return Ok(vec![PlannedEdit::new(
            catalog.uri(db).clone(),
            index.catalog_range(catalog, span),
            quote(new_leaf),
        )]);
    }

    let value_span = parsed.document_span(property.value.span());
    let text = catalog.text(db);
    let literal = text.get(value_span.offset..value_span.end()).unwrap_or("\"\"");
    let (Some(removal), Some(point)) =
        (parsed.removal_span(old_name), parsed.insertion_point(new_name))
    else {
        tracing::info!(catalog = %catalog.uri(db), old_name, new_name, "New key path is blocked");
        return Err(RenameError::BlockedPath {
            name: new_name.to_string(),
            catalog: catalog.display_name(db).clone(),
        });
    };

    // The new entry lands where the old one starts: replace it in one edit and
    // keep a separator only if the removed text carried one.
    if point.offset == removal.offset {
        let removed = text.get(removal.offset..removal.end()).unwrap_or_default();
        let segments: Vec<&str> = new_name.split(KEY_SEPARATOR).skip(point.depth).collect();
        let entry = build_entry_literal(&segments, literal, removed.trim_end().ends_with(','));
        return Ok(vec![PlannedEdit::new(
            catalog.uri(db).clone(),
            index.catalog_range(catalog, removal),
            entry,
        )]);
    }

    Ok(removal_edit(index, catalog, old_name)
        .into_iter()
        .chain(insertion_edit(index, catalog, new_name, literal))
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::test_utils::{
        CATALOG_URI,
        OTHER_TEMPLATE_URI,
        SECOND_CATALOG_URI,
        TEMPLATE_URI,
        apply_edits,
        index_with,
    };
    use crate::types::SourcePosition;

    fn apply(text: &str, edits: &[PlannedEdit], uri: &str) -> String {
        let edits: Vec<_> = edits
            .iter()
            .filter(|edit| edit.uri == uri)
            .map(|edit| (edit.range, edit.new_text.clone()))
            .collect();
        apply_edits(text, &edits)
    }

    #[googletest::test]
    fn test_prepare_rename() {
        let index = index_with(&[], &[(TEMPLATE_URI, r#"{{t "greeting.hello"}}"#)]);

        expect_that!(
            prepare_rename(&index, TEMPLATE_URI, 6),
            some(eq(SourceRange::new(SourcePosition::new(0, 5), SourcePosition::new(0, 19))))
        );
        expect_that!(can_rename(&index, TEMPLATE_URI, 1), eq(false));
    }

    #[rstest]
    #[case::exact("greeting.bye")]
    #[case::case_insensitive("GREETING.Bye")]
    fn test_name_collision(#[case] new_name: &str) {
        let index = index_with(
            &[(CATALOG_URI, r#"{"greeting": {"hello": "Hi", "bye": "B"}}"#)],
            &[(TEMPLATE_URI, r#"{{t "greeting.hello"}}"#)],
        );

        let result = plan_rename(&index, TEMPLATE_URI, 6, new_name);

        assert_that!(
            result,
            err(eq(&RenameError::NameCollision { name: new_name.to_string() }))
        );
        let message = plan_rename(&index, TEMPLATE_URI, 6, new_name).unwrap_err().to_string();
        assert_that!(
            message,
            eq(&format!(
                "Rename cannot be applied. Name {new_name} already defined in translation file."
            ))
        );
    }

    #[googletest::test]
    fn test_outside_key_literal() {
        let index = index_with(&[], &[(TEMPLATE_URI, r#"<p>{{t "a"}}</p>"#)]);
        expect_that!(plan_rename(&index, TEMPLATE_URI, 1, "b"), ok(none()));
    }

    #[googletest::test]
    fn test_rename_within_same_parent() {
        let catalog = r#"{"greeting": {"hello": "Hi", "bye": "B"}}"#;
        let template = r#"<p>{{t "greeting.hello"}}</p>"#;
        let other = r#"{{t "greeting.hello"}}{{t "greeting.bye"}}"#;
        let index = index_with(
            &[(CATALOG_URI, catalog)],
            &[(TEMPLATE_URI, template), (OTHER_TEMPLATE_URI, other)],
        );

        let edits = plan_rename(&index, TEMPLATE_URI, 9, "greeting.hi").unwrap().unwrap();

        expect_that!(edits, len(eq(3)));
        expect_that!(apply(catalog, &edits, CATALOG_URI), eq(r#"{"greeting": {"hi": "Hi", "bye": "B"}}"#));
        expect_that!(apply(template, &edits, TEMPLATE_URI), eq(r#"<p>{{t "greeting.hi"}}</p>"#));
        expect_that!(
            apply(other, &edits, OTHER_TEMPLATE_URI),
            eq(r#"{{t "greeting.hi"}}{{t "greeting.bye"}}"#)
        );
    }

    #[rstest]
    #[case::to_new_parent(
        r#"{"greeting": {"hello": "Hi", "bye": "B"}, "title": "T"}"#,
        "greeting.hello",
        "farewell.hello",
        "{\"farewell\": { \"hello\": \"Hi\" },\n\"greeting\": {\"bye\": \"B\"}, \"title\": \"T\"}"
    )]
    #[case::replaces_only_child(r#"{"a": {"x": "X"}}"#, "a.x", "a.y.z", r#"{"a": {"y": { "z": "X" }}}"#)]
    #[case::replaces_first_child(
        r#"{"a": {"x": "X", "w": "W"}}"#,
        "a.x",
        "a.y.z",
        "{\"a\": {\"y\": { \"z\": \"X\" },\n\"w\": \"W\"}}"
    )]
    fn test_rename_moves_entry(
        #[case] catalog: &str,
        #[case] old_name: &str,
        #[case] new_name: &str,
        #[case] expected: &str,
    ) {
        let template = format!(r#"{{{{t "{old_name}"}}}}"#);
        let index = index_with(&[(CATALOG_URI, catalog)], &[(TEMPLATE_URI, &template)]);

        let edits = plan_rename(&index, TEMPLATE_URI, 6, new_name).unwrap().unwrap();
        let result = apply(catalog, &edits, CATALOG_URI);

        assert_that!(result, eq(expected));
        assert_that!(serde_json::from_str::<serde_json::Value>(&result).is_ok(), eq(true));
        assert_that!(apply(&template, &edits, TEMPLATE_URI), eq(&format!(r#"{{{{t "{new_name}"}}}}"#)));
    }

    #[googletest::test]
    fn test_move_blocked_by_scalar_is_rejected() {
        let catalog = r#"{"x": "X", "greeting": "Hi"}"#;
        let index = index_with(&[(CATALOG_URI, catalog)], &[(TEMPLATE_URI, r#"{{t "x"}}"#)]);

        let result = plan_rename(&index, TEMPLATE_URI, 6, "greeting.deep");

        assert_that!(
            result,
            err(eq(&RenameError::BlockedPath {
                name: "greeting.deep".to_string(),
                catalog: "en-us".to_string(),
            }))
        );
    }

    #[googletest::test]
    fn test_blocked_catalog_rejects_the_whole_plan() {
        let index = index_with(
            &[
                (CATALOG_URI, r#"{"x": "X"}"#),
                (SECOND_CATALOG_URI, r#"{"x": "X", "greeting": "Hi"}"#),
            ],
            &[(TEMPLATE_URI, r#"{{t "x"}}"#), (OTHER_TEMPLATE_URI, r#"{{t "x"}}"#)],
        );

        let result = plan_rename(&index, TEMPLATE_URI, 6, "greeting.deep");

        expect_that!(result.is_err(), eq(true));
        expect_that!(
            result.unwrap_err().to_string(),
            eq("Rename cannot be applied. Name greeting.deep conflicts with a value in fr.")
        );
    }

    #[googletest::test]
    fn test_existing_object_is_a_collision() {
        let index = index_with(
            &[(CATALOG_URI, r#"{"x": "X", "greeting": {"hello": "Hi"}}"#)],
            &[(TEMPLATE_URI, r#"{{t "x"}}"#)],
        );

        let result = plan_rename(&index, TEMPLATE_URI, 6, "greeting");

        assert_that!(
            result,
            err(eq(&RenameError::NameCollision { name: "greeting".to_string() }))
        );
    }
}

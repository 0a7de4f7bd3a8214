//! Completion implementation

use std::collections::BTreeSet;

use tower_lsp::lsp_types::{
    CompletionItem,
    CompletionItemKind,
    CompletionTextEdit,
    Documentation,
    MarkupContent,
    MarkupKind,
    TextEdit,
};

use crate::indexer::TranslationIndex;
use crate::syntax::UsageOccurrence;

/// Keys of the document's catalogs containing the typed key, case-insensitively.
///
/// Returns the key occurrence being edited with the sorted, de-duplicated
/// candidates, or `None` when `offset` is not inside a key literal.
#[must_use]
pub fn completion_candidates(
    index: &TranslationIndex,
    uri: &str,
    offset: usize,
) -> Option<(UsageOccurrence, Vec<String>)> {
    let occurrence = index.find_key_at(uri, offset)?;
    let typed = occurrence.key.to_lowercase();
    let db = index.db();

    let candidates: BTreeSet<&str> = index
        .catalogs_for_document(uri)
        .into_iter()
        .flat_map(|catalog| catalog.parsed(db).units())
        .map(|unit| unit.key.as_str())
        .filter(|key| key.to_lowercase().contains(&typed))
        .collect();
    let candidates = candidates.into_iter().map(ToString::to_string).collect();
    Some((occurrence, candidates))
}

/// Completion items replacing the whole key literal, documented with each
/// catalog's value.
#[must_use]
pub fn generate_completions(
    index: &TranslationIndex,
    uri: &str,
    offset: usize,
) -> Option<Vec<CompletionItem>> {
    let (occurrence, candidates) = completion_candidates(index, uri, offset)?;
    let catalogs = index.catalogs_for_document(uri);
    let db = index.db();

    let items = candidates
        .into_iter()
        .map(|key| {
            let documentation = catalogs
                .iter()
                .filter_map(|catalog| {
                    let value = catalog.parsed(db).value(&key)?;
                    Some(format!("- **{}**: {value}", catalog.display_name(db)))
                })
                .collect::<Vec<_>>()
                .join("\n");
            CompletionItem {
                label: key.clone(),
                kind: Some(CompletionItemKind::CONSTANT),
                documentation: Some(Documentation::MarkupContent(MarkupContent {
                    kind: MarkupKind::Markdown,
                    value: documentation,
                })),
                text_edit: Some(CompletionTextEdit::Edit(TextEdit {
                    range: occurrence.key_range.into(),
                    new_text: key,
                })),
                ..Default::default()
            }
        })
        .collect();
    Some(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use tower_lsp::lsp_types::{
        Position,
        Range,
    };

    use super::*;
    use crate::test_utils::{
        CATALOG_URI,
        SECOND_CATALOG_URI,
        TEMPLATE_URI,
        index_with,
    };

    fn index(template: &str) -> TranslationIndex {
        index_with(
            &[
                (CATALOG_URI, r#"{"greeting": {"hello": "Hi", "bye": "Bye"}, "title": "T"}"#),
                (SECOND_CATALOG_URI, r#"{"greeting": {"Hello": "Salut", "bye": "Au revoir"}}"#),
            ],
            &[(TEMPLATE_URI, template)],
        )
    }

    #[googletest::test]
    fn test_candidates_are_sorted_and_unique() {
        let index = index(r#"{{t "GREET"}}"#);

        let (_, candidates) = completion_candidates(&index, TEMPLATE_URI, 6).unwrap();

        expect_that!(
            candidates,
            elements_are![eq("greeting.Hello"), eq("greeting.bye"), eq("greeting.hello")]
        );
    }

    #[googletest::test]
    fn test_empty_key_lists_everything() {
        let index = index(r#"{{t ""}}"#);

        let (_, candidates) = completion_candidates(&index, TEMPLATE_URI, 5).unwrap();

        expect_that!(candidates, len(eq(4)));
    }

    #[googletest::test]
    fn test_outside_key_literal() {
        let index = index(r#"{{t "greet"}}"#);
        expect_that!(completion_candidates(&index, TEMPLATE_URI, 1), none());
    }

    #[googletest::test]
    fn test_items_replace_key_span() {
        let index = index(r#"{{t "tit"}}"#);

        let items = generate_completions(&index, TEMPLATE_URI, 7).unwrap();

        assert_that!(items, len(eq(1)));
        expect_that!(items[0].label, eq("title"));
        expect_that!(
            items[0].text_edit,
            some(eq(&CompletionTextEdit::Edit(TextEdit {
                range: Range::new(Position::new(0, 5), Position::new(0, 8)),
                new_text: "title".to_string(),
            })))
        );
    }

    #[googletest::test]
    fn test_items_document_values_per_catalog() {
        let index = index(r#"{{t "greeting.bye"}}"#);

        let items = generate_completions(&index, TEMPLATE_URI, 7).unwrap();

        let Some(Documentation::MarkupContent(content)) = &items[0].documentation else {
            panic!("Expected Markup content");
        };
        expect_that!(content.value, eq("- **en-us**: Bye\n- **fr**: Au revoir"));
    }
}

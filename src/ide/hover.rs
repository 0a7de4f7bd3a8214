//! Hover implementation

use std::fmt::Write as _;

use serde::Serialize;
use tower_lsp::lsp_types::{
    Range,
    Url,
};

use super::protocol::GOTO_TRANSLATION_COMMAND;
use crate::indexer::TranslationIndex;
use crate::syntax::json_tree::UnitLookup;
use crate::types::SourceRange;

/// Shown for catalogs that lack the key or hold an empty string.
pub const NO_TRANSLATION: &str = "`no translation`";

/// One catalog's view of the hovered key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTranslation {
    pub catalog_name: String,
    pub catalog_uri: String,
    /// The value, or [`NO_TRANSLATION`].
    pub translation: String,
    /// Value range for exact matches, deepest ancestor's key range otherwise.
    pub jump_target: Option<SourceRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverInfo {
    pub key: String,
    /// Range of the hovered call.
    pub range: SourceRange,
    pub entries: Vec<CatalogTranslation>,
}

/// Collects the translations of the call under `offset`.
///
/// Returns `None` outside a call or when no catalog serves the document.
#[must_use]
pub fn hover(index: &TranslationIndex, uri: &str, offset: usize) -> Option<HoverInfo> {
    let occurrence = index.find_occurrence_at(uri, offset)?;
    let catalogs = index.catalogs_for_document(uri);
    if catalogs.is_empty() {
        return None;
    }

    let db = index.db();
    let entries = catalogs
        .into_iter()
        .map(|catalog| {
            let parsed = catalog.parsed(db);
            let translation = parsed
                .value(&occurrence.key)
                .filter(|value| !value.is_empty())
                .unwrap_or(NO_TRANSLATION)
                .to_string();
            let jump_target = parsed.find_unit(&occurrence.key).map(|lookup| {
                let span = match lookup {
                    UnitLookup::ExactMatch(property) => property.value.content_span(),
                    UnitLookup::PartialMatch { ancestor, .. } => ancestor.key.span,
                };
                index.catalog_range(catalog, parsed.document_span(span))
            });
            CatalogTranslation {
                catalog_name: catalog.display_name(db).clone(),
                catalog_uri: catalog.uri(db).clone(),
                translation,
                jump_target,
            }
        })
        .collect();

    Some(HoverInfo { key: occurrence.key, range: occurrence.full_range, entries })
}

/// Arguments of the go-to-translation command link.
#[derive(Debug, Serialize)]
struct GotoArguments<'a> {
    /// Catalog to open
    uri: &'a str,
    /// Selection inside the catalog
    range: Range,
}

/// Renders hover content as Markdown. Catalog names link to their jump target.
#[must_use]
pub fn render_markdown(info: &HoverInfo) -> String {
    let mut content = format!("**Translation Key:** `{}`\n\n", info.key);
    for entry in &info.entries {
        let name = entry
            .jump_target
            .and_then(|range| goto_link(&entry.catalog_uri, range))
            .map_or_else(
                || format!("**{}**", entry.catalog_name),
                |link| format!("[**{}**]({link})", entry.catalog_name),
            );
        let _ = writeln!(content, "- {name}: {}", entry.translation);
    }
    content
}

/// `command:` URI running the go-to-translation command.
fn goto_link(catalog_uri: &str, range: SourceRange) -> Option<String> {
    let arguments =
        serde_json::to_string(&GotoArguments { uri: catalog_uri, range: range.into() }).ok()?;
    let mut link = Url::parse(&format!("command:{GOTO_TRANSLATION_COMMAND}")).ok()?;
    link.set_query(Some(&arguments));
    Some(link.to_string())
}

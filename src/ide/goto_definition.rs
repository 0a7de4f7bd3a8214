//! Go to Definition implementation

use tower_lsp::lsp_types::{
    Location,
    Url,
};

use crate::indexer::TranslationIndex;

/// Key locations of the hovered call's key in every catalog defining it.
///
/// Each location spans the property's key literal; catalogs with only a
/// partial match are skipped.
#[must_use]
pub fn find_definitions(index: &TranslationIndex, uri: &str, offset: usize) -> Vec<Location> {
    let Some(occurrence) = index.find_occurrence_at(uri, offset) else {
        return Vec::new();
    };

    let db = index.db();
    let mut locations = Vec::new();
    for catalog in index.catalogs_for_document(uri) {
        let parsed = catalog.parsed(db);
        if !parsed.contains_key(&occurrence.key) {
            continue;
        }
        let Some(lookup) = parsed.find_unit(&occurrence.key) else {
            continue;
        };
        let Ok(catalog_uri) = Url::parse(catalog.uri(db)) else {
            tracing::warn!(uri = %catalog.uri(db), "Failed to parse catalog URI");
            continue;
        };

        let span = parsed.document_span(lookup.property().key.span);
        locations.push(Location { uri: catalog_uri, range: index.catalog_range(catalog, span).into() });
    }
    locations
}

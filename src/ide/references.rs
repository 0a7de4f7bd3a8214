//! Find References implementation

use tower_lsp::lsp_types::{
    Location,
    Url,
};

use crate::indexer::TranslationIndex;

/// Key ranges of every call, in every template, using the key under `offset`.
///
/// `offset` must fall inside a key literal. Keys compare case-sensitively.
#[must_use]
pub fn find_references(index: &TranslationIndex, uri: &str, offset: usize) -> Vec<Location> {
    let Some(occurrence) = index.find_key_at(uri, offset) else {
        return Vec::new();
    };

    let mut locations = Vec::new();
    for (template_uri, usages) in index.all_usages() {
        let Ok(location_uri) = Url::parse(template_uri) else {
            tracing::warn!(uri = template_uri, "Failed to parse template URI");
            continue;
        };
        locations.extend(
            usages
                .into_iter()
                .filter(|usage| usage.key == occurrence.key)
                .map(|usage| Location { uri: location_uri.clone(), range: usage.key_range.into() }),
        );
    }
    locations
}

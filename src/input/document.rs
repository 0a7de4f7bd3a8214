//! Classification of incoming documents.

use crate::syntax::CatalogKind;

/// What an opened document is to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Catalog(CatalogKind),
    Template,
}

impl DocumentKind {
    #[must_use]
    pub fn from_language_id(language_id: &str) -> Option<Self> {
        match language_id {
            "handlebars" | "html.handlebars" => Some(Self::Template),
            other => CatalogKind::from_language_id(other).map(Self::Catalog),
        }
    }

    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        let path = uri.split(['?', '#']).next().unwrap_or(uri);
        if path.ends_with(".hbs") || path.ends_with(".handlebars") {
            return Some(Self::Template);
        }
        CatalogKind::from_uri(path).map(Self::Catalog)
    }

    /// Language id first, file extension as fallback.
    #[must_use]
    pub fn detect(language_id: Option<&str>, uri: &str) -> Option<Self> {
        language_id.and_then(Self::from_language_id).or_else(|| Self::from_uri(uri))
    }
}

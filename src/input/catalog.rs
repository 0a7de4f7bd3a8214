//! Catalog document input.

use super::project::document_path;
use crate::syntax::{
    CatalogKind,
    ParsedCatalog,
};

/// A translation catalog and its last successful parse.
#[salsa::input(debug)]
pub struct Catalog {
    #[returns(ref)]
    pub uri: String,

    pub kind: CatalogKind,

    /// Name shown to users, see [`display_name`].
    #[returns(ref)]
    pub display_name: String,

    #[returns(ref)]
    pub text: String,

    #[returns(ref)]
    pub parsed: ParsedCatalog,

    /// Label of the owning project, `None` until a project claims the catalog.
    #[returns(ref)]
    pub project: Option<String>,
}

/// Name of a catalog: the file name up to its first dot, or the parent
/// directory for module catalogs (`locales/fr/translations.js` → `fr`).
#[must_use]
pub fn display_name(uri: &str, kind: CatalogKind) -> String {
    let path = document_path(uri);
    let mut segments = path.rsplit(['/', '\\']);
    let file_name = segments.next().unwrap_or_default();
    let name = match kind {
        CatalogKind::Json => file_name.split('.').next().unwrap_or(file_name),
        CatalogKind::Module => segments.next().filter(|dir| !dir.is_empty()).unwrap_or(file_name),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::json("file:///app/translations/en-us.json", CatalogKind::Json, "en-us")]
    #[case::json_multiple_dots("file:///app/fr.admin.json", CatalogKind::Json, "fr")]
    #[case::module("file:///app/locales/fr/translations.js", CatalogKind::Module, "fr")]
    #[case::module_at_root("translations.js", CatalogKind::Module, "translations.js")]
    fn test_display_name(#[case] uri: &str, #[case] kind: CatalogKind, #[case] expected: &str) {
        assert_that!(display_name(uri, kind), eq(expected));
    }
}

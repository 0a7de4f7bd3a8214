pub mod catalog_parser;
pub mod error;
pub mod json_tree;
pub mod scanner;

pub use catalog_parser::{
    CatalogKind,
    ParsedCatalog,
    TransUnit,
    parse_catalog,
};
pub use error::ParseError;
pub use scanner::UsageOccurrence;

use crate::db::I18nDatabase;
use crate::input::template::TemplateFile;

/// Scans a template for translation calls of `function_name`.
#[salsa::tracked]
#[allow(clippy::needless_pass_by_value)]
pub fn scan_template(
    db: &dyn I18nDatabase,
    file: TemplateFile,
    function_name: String,
) -> Vec<UsageOccurrence> {
    let pattern = match scanner::usage_pattern(&function_name) {
        Ok(pattern) => pattern,
        Err(error) => {
            tracing::warn!(%error, function_name = %function_name, "Invalid translation function name");
            return Vec::new();
        }
    };
    scanner::scan_usages(file.text(db), &pattern)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use salsa::Setter;

    use super::*;
    use crate::db::I18nDatabaseImpl;

    #[googletest::test]
    fn test_scan_template_follows_text_updates() {
        let mut db = I18nDatabaseImpl::default();
        let file = TemplateFile::new(
            &db,
            "file:///app/index.hbs".to_string(),
            r#"{{t "a"}}"#.to_string(),
        );

        let first: Vec<String> =
            scan_template(&db, file, "t".to_string()).into_iter().map(|u| u.key).collect();
        file.set_text(&mut db).to(r#"{{t "a"}} {{t "b"}}"#.to_string());
        let second: Vec<String> =
            scan_template(&db, file, "t".to_string()).into_iter().map(|u| u.key).collect();

        expect_that!(first, elements_are![eq("a")]);
        expect_that!(second, elements_are![eq("a"), eq("b")]);
    }

    #[googletest::test]
    fn test_scan_template_uses_function_name() {
        let db = I18nDatabaseImpl::default();
        let file = TemplateFile::new(
            &db,
            "file:///app/index.hbs".to_string(),
            r#"{{t "a"}} {{translate "b"}}"#.to_string(),
        );

        let usages = scan_template(&db, file, "translate".to_string());

        expect_that!(usages, elements_are![field!(UsageOccurrence.key, eq("b"))]);
    }
}

//! Missing-translation diagnostics for templates.

use serde_json::json;
use tower_lsp::lsp_types::{
    Diagnostic,
    DiagnosticSeverity,
    NumberOrString,
};

use crate::config::MissingTranslationMode;
use crate::indexer::TranslationIndex;

pub const MISSING_TRANSLATION_MESSAGE: &str = "Missed translation in project";
pub const MISSING_TRANSLATION_CODE: &str = "missing-translation";
pub const DIAGNOSTIC_SOURCE: &str = "hbs-i18n";

/// Warns about calls whose key the document's catalogs do not define.
///
/// `mode` decides whether a key must be missing from every catalog or from
/// any of them. Empty keys are skipped since they are still being typed.
/// Nothing is reported until a catalog serves the document.
#[must_use]
pub fn generate_diagnostics(
    index: &TranslationIndex,
    uri: &str,
    mode: MissingTranslationMode,
) -> Vec<Diagnostic> {
    let catalogs = index.catalogs_for_document(uri);
    if catalogs.is_empty() {
        return Vec::new();
    }
    let db = index.db();

    index
        .usages(uri)
        .into_iter()
        .filter(|usage| !usage.key.is_empty())
        .filter(|usage| {
            let mut defined = catalogs.iter().map(|catalog| catalog.parsed(db).contains_key(&usage.key));
            match mode {
                MissingTranslationMode::All => !defined.any(|found| found),
                MissingTranslationMode::Any => !defined.all(|found| found),
            }
        })
        .map(|usage| Diagnostic {
            range: usage.full_range.into(),
            severity: Some(DiagnosticSeverity::WARNING),
            code: Some(NumberOrString::String(MISSING_TRANSLATION_CODE.to_string())),
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message: MISSING_TRANSLATION_MESSAGE.to_string(),
            data: Some(json!({ "key": usage.key })),
            ..Default::default()
        })
        .collect()
}

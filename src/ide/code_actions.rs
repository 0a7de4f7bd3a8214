//! Quick fixes offered on a translation key.

use serde::{
    Deserialize,
    Serialize,
};
use tower_lsp::lsp_types::{
    CodeAction,
    CodeActionKind,
    CodeActionOrCommand,
    Command,
};

use super::protocol::{
    GENERATE_TRANSLATION_COMMAND,
    REMOVE_TRANSLATION_COMMAND,
};
use crate::indexer::TranslationIndex;

/// Payload of the generate command: which key to add to which catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTranslationArgs {
    pub key: String,
    /// Target catalog.
    pub uri: String,
    /// Seed value, taken from a catalog that already translates the key.
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationAction {
    /// Add the key to one catalog.
    Generate { catalog_name: String, args: GenerateTranslationArgs },
    /// Add the key to every catalog missing it.
    GenerateAll { args: Vec<GenerateTranslationArgs> },
    /// Delete the key from every catalog and template.
    Remove { key: String },
}

impl TranslationAction {
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::Generate { catalog_name, .. } => {
                format!("Generate translation unit for {catalog_name}")
            }
            Self::GenerateAll { .. } => "Generate translations for all...".to_string(),
            Self::Remove { key } => format!("Remove translations and references for '{key}'"),
        }
    }

    /// Command running the action.
    #[must_use]
    pub fn command(&self) -> Command {
        let (command, arguments) = match self {
            Self::Generate { args, .. } => {
                (GENERATE_TRANSLATION_COMMAND, vec![serde_json::to_value(args)])
            }
            Self::GenerateAll { args } => {
                (GENERATE_TRANSLATION_COMMAND, args.iter().map(serde_json::to_value).collect())
            }
            Self::Remove { key } => {
                (REMOVE_TRANSLATION_COMMAND, vec![Ok(serde_json::Value::from(key.as_str()))])
            }
        };
        Command {
            title: self.title(),
            command: command.to_string(),
            arguments: Some(arguments.into_iter().filter_map(Result::ok).collect()),
        }
    }

    #[must_use]
    pub fn into_code_action(self) -> CodeActionOrCommand {
        CodeActionOrCommand::CodeAction(CodeAction {
            title: self.title(),
            kind: Some(CodeActionKind::QUICKFIX),
            command: Some(self.command()),
            ..Default::default()
        })
    }
}

/// Actions for the call under `offset`.
///
/// One generate action per catalog lacking the key, preceded by an aggregate
/// one when at least two lack it, followed by the remove action. Empty when
/// there is no call at `offset` or no catalog serves the document.
#[must_use]
pub fn code_actions(index: &TranslationIndex, uri: &str, offset: usize) -> Vec<TranslationAction> {
    let Some(occurrence) = index.find_occurrence_at(uri, offset) else {
        return Vec::new();
    };
    let catalogs = index.catalogs_for_document(uri);
    if catalogs.is_empty() {
        return Vec::new();
    }

    let db = index.db();
    let key = occurrence.key;
    let source = catalogs
        .iter()
        .rev()
        .filter_map(|catalog| catalog.parsed(db).value(&key))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string();

    let missing: Vec<(String, GenerateTranslationArgs)> = catalogs
        .iter()
        .filter(|catalog| !catalog.parsed(db).contains_key(&key))
        .map(|catalog| {
            let args = GenerateTranslationArgs {
                key: key.clone(),
                uri: catalog.uri(db).clone(),
                source: source.clone(),
            };
            (catalog.display_name(db).clone(), args)
        })
        .collect();

    let mut actions = Vec::with_capacity(missing.len() + 2);
    if missing.len() > 1 {
        let args = missing.iter().map(|(_, args)| args.clone()).collect();
        actions.push(TranslationAction::GenerateAll { args });
    }
    actions.extend(
        missing
            .into_iter()
            .map(|(catalog_name, args)| TranslationAction::Generate { catalog_name, args }),
    );
    actions.push(TranslationAction::Remove { key });
    actions
}

//! Execute Command handler
//!
//! Runs the commands behind the code actions and hover links.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    ExecuteCommandParams,
    ShowDocumentParams,
};

use super::super::backend::Backend;
use crate::ide::code_actions::GenerateTranslationArgs;
use crate::ide::protocol::{
    GENERATE_TRANSLATION_COMMAND,
    GOTO_TRANSLATION_COMMAND,
    GotoTranslationArgs,
    REMOVE_TRANSLATION_COMMAND,
};
use crate::ide::translation_edits::{
    generate_translation_edit,
    remove_translation_edits,
};

/// `workspace/executeCommand`
pub async fn handle_execute_command(
    backend: &Backend,
    params: ExecuteCommandParams,
) -> Result<Option<Value>> {
    tracing::debug!(command = %params.command, "Execute Command request");

    match params.command.as_str() {
        GENERATE_TRANSLATION_COMMAND => handle_generate_translation(backend, params.arguments).await,
        REMOVE_TRANSLATION_COMMAND => handle_remove_translation(backend, params.arguments).await,
        GOTO_TRANSLATION_COMMAND => handle_goto_translation(backend, params.arguments).await,
        _ => {
            tracing::warn!(command = %params.command, "Unknown command");
            Ok(None)
        }
    }
}

/// Flattens command arguments given either one by one or as arrays.
fn parse_arguments<T: DeserializeOwned>(arguments: Vec<Value>) -> Vec<T> {
    arguments
        .into_iter()
        .flat_map(|argument| match argument {
            Value::Array(items) => items,
            other => vec![other],
        })
        .filter_map(|argument| match serde_json::from_value(argument) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                tracing::warn!(%error, "Ignoring malformed command argument");
                None
            }
        })
        .collect()
}

/// `i18n.generateTranslation`: one edit per `{key, uri, source}` payload.
async fn handle_generate_translation(
    backend: &Backend,
    arguments: Vec<Value>,
) -> Result<Option<Value>> {
    let requests: Vec<GenerateTranslationArgs> = parse_arguments(arguments);

    let edits = {
        let index = backend.state.index.lock().await;
        requests
            .iter()
            .filter_map(|args| generate_translation_edit(&index, &args.uri, &args.key, &args.source))
            .collect()
    };
    backend.apply_edits(edits).await;
    Ok(None)
}

/// `i18n.removeTranslation`: the first argument is the key.
async fn handle_remove_translation(
    backend: &Backend,
    arguments: Vec<Value>,
) -> Result<Option<Value>> {
    let Some(key) = parse_arguments::<String>(arguments).into_iter().next() else {
        tracing::warn!("Invalid arguments for i18n.removeTranslation");
        return Ok(None);
    };

    let edits = remove_translation_edits(&*backend.state.index.lock().await, &key);
    tracing::debug!(key = %key, count = edits.len(), "Removing translation");
    backend.apply_edits(edits).await;
    Ok(None)
}

/// `i18n.gotoTranslation`: reveals `{uri, range}` in the editor.
async fn handle_goto_translation(
    backend: &Backend,
    arguments: Vec<Value>,
) -> Result<Option<Value>> {
    let Some(target) = parse_arguments::<GotoTranslationArgs>(arguments).into_iter().next() else {
        tracing::warn!("Invalid arguments for i18n.gotoTranslation");
        return Ok(None);
    };

    let params = ShowDocumentParams {
        uri: target.uri,
        external: None,
        take_focus: Some(true),
        selection: Some(target.range),
    };
    if let Err(error) = backend.client.show_document(params).await {
        tracing::error!(%error, "Failed to show translation");
    }
    Ok(None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;

    use super::*;

    #[googletest::test]
    fn test_parse_arguments_flattens_arrays() {
        let arguments = vec![
            json!({"key": "a", "uri": "file:///en.json", "source": "A"}),
            json!([
                {"key": "b", "uri": "file:///en.json"},
                {"key": "b", "uri": "file:///fr.json"}
            ]),
            json!("not an object"),
        ];

        let parsed: Vec<GenerateTranslationArgs> = parse_arguments(arguments);

        expect_that!(
            parsed,
            elements_are![
                field!(GenerateTranslationArgs.key, eq("a")),
                all![
                    field!(GenerateTranslationArgs.key, eq("b")),
                    field!(GenerateTranslationArgs.source, eq(""))
                ],
                field!(GenerateTranslationArgs.uri, eq("file:///fr.json"))
            ]
        );
    }

    #[googletest::test]
    fn test_parse_key_argument() {
        let parsed: Vec<String> = parse_arguments(vec![json!("greeting.hello")]);
        expect_that!(parsed, elements_are![eq("greeting.hello")]);
    }
}

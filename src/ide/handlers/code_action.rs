//! Code Action handler
//!
//! Offers generate and remove quick fixes on the call under the cursor.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CodeActionParams,
    CodeActionResponse,
};

use super::super::backend::Backend;
use super::template_offset;
use crate::ide::code_actions::{
    TranslationAction,
    code_actions,
};

/// `textDocument/codeAction`
pub async fn handle_code_action(
    backend: &Backend,
    params: CodeActionParams,
) -> Result<Option<CodeActionResponse>> {
    let uri = &params.text_document.uri;
    let position = params.range.start;

    tracing::debug!(uri = %uri, line = position.line, character = position.character, "Code Action request");

    let actions = {
        let index = backend.state.index.lock().await;
        let Some(offset) = template_offset(&index, uri, position) else {
            return Ok(Some(vec![]));
        };
        code_actions(&index, uri.as_str(), offset)
    };

    tracing::debug!(count = actions.len(), "Generated code actions");

    Ok(Some(actions.into_iter().map(TranslationAction::into_code_action).collect()))
}

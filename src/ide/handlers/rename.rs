//! Rename handlers: `prepareRename`, `rename`.

use tower_lsp::jsonrpc::{
    Error,
    Result,
};
use tower_lsp::lsp_types::{
    PrepareRenameResponse,
    RenameParams,
    TextDocumentPositionParams,
    WorkspaceEdit,
};

use super::super::backend::Backend;
use super::template_offset;
use crate::ide::edits::into_workspace_edit;
use crate::ide::rename::{
    plan_rename,
    prepare_rename,
};

/// `textDocument/prepareRename`
pub async fn handle_prepare_rename(
    backend: &Backend,
    params: TextDocumentPositionParams,
) -> Result<Option<PrepareRenameResponse>> {
    let uri = params.text_document.uri;
    let position = params.position;

    tracing::debug!(uri = %uri, line = position.line, character = position.character, "Prepare Rename request");

    let index = backend.state.index.lock().await;
    let range = template_offset(&index, &uri, position)
        .and_then(|offset| prepare_rename(&index, uri.as_str(), offset));
    Ok(range.map(|range| PrepareRenameResponse::Range(range.into())))
}

/// `textDocument/rename`
///
/// A rejected rename (name collision or blocked key path) is surfaced as a
/// protocol error carrying the user-visible message.
pub async fn handle_rename(backend: &Backend, params: RenameParams) -> Result<Option<WorkspaceEdit>> {
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    tracing::debug!(uri = %uri, line = position.line, character = position.character, new_name = %params.new_name, "Rename request");

    let index = backend.state.index.lock().await;
    let Some(offset) = template_offset(&index, &uri, position) else {
        return Ok(None);
    };
    match plan_rename(&index, uri.as_str(), offset, &params.new_name) {
        Ok(edits) => Ok(edits.map(into_workspace_edit)),
        Err(error) => {
            tracing::info!(%error, "Rename rejected");
            Err(Error::invalid_params(error.to_string()))
        }
    }
}

//! Query handlers: `completion`, `hover`, `definition`, `references`.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CompletionParams,
    CompletionResponse,
    GotoDefinitionParams,
    GotoDefinitionResponse,
    Hover,
    HoverContents,
    HoverParams,
    Location,
    MarkupContent,
    MarkupKind,
    ReferenceParams,
};

use super::super::backend::Backend;
use super::template_offset;
use crate::ide::completion::generate_completions;
use crate::ide::goto_definition::find_definitions;
use crate::ide::hover::{
    hover,
    render_markdown,
};
use crate::ide::references::find_references;

/// `textDocument/completion`
pub async fn handle_completion(
    backend: &Backend,
    params: CompletionParams,
) -> Result<Option<CompletionResponse>> {
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    tracing::debug!(uri = %uri, line = position.line, character = position.character, "Completion request");

    let index = backend.state.index.lock().await;
    let Some(offset) = template_offset(&index, &uri, position) else {
        return Ok(None);
    };
    let Some(items) = generate_completions(&index, uri.as_str(), offset) else {
        tracing::debug!("Not inside a key literal");
        return Ok(None);
    };
    drop(index);

    tracing::debug!(count = items.len(), "Generated completion items");

    if items.is_empty() { Ok(None) } else { Ok(Some(CompletionResponse::Array(items))) }
}

/// `textDocument/hover`
pub async fn handle_hover(backend: &Backend, params: HoverParams) -> Result<Option<Hover>> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    tracing::debug!(uri = %uri, line = position.line, character = position.character, "Hover request");

    let index = backend.state.index.lock().await;
    let Some(offset) = template_offset(&index, &uri, position) else {
        return Ok(None);
    };
    let Some(info) = hover(&index, uri.as_str(), offset) else {
        tracing::debug!("No translation key found at position");
        return Ok(None);
    };
    drop(index);

    tracing::debug!(key = %info.key, "Generated hover content");

    Ok(Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: render_markdown(&info),
        }),
        range: Some(info.range.into()),
    }))
}

/// `textDocument/definition`
pub async fn handle_goto_definition(
    backend: &Backend,
    params: GotoDefinitionParams,
) -> Result<Option<GotoDefinitionResponse>> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    tracing::debug!(uri = %uri, line = position.line, character = position.character, "Goto Definition request");

    let locations = {
        let index = backend.state.index.lock().await;
        let Some(offset) = template_offset(&index, &uri, position) else {
            return Ok(None);
        };
        find_definitions(&index, uri.as_str(), offset)
    };

    tracing::debug!(count = locations.len(), "Found definitions");

    if locations.is_empty() { Ok(None) } else { Ok(Some(GotoDefinitionResponse::Array(locations))) }
}

/// `textDocument/references`
pub async fn handle_references(
    backend: &Backend,
    params: ReferenceParams,
) -> Result<Option<Vec<Location>>> {
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    tracing::debug!(uri = %uri, line = position.line, character = position.character, "References request");

    let locations = {
        let index = backend.state.index.lock().await;
        let Some(offset) = template_offset(&index, &uri, position) else {
            return Ok(None);
        };
        find_references(&index, uri.as_str(), offset)
    };

    tracing::debug!(count = locations.len(), "Found references");

    if locations.is_empty() { Ok(None) } else { Ok(Some(locations)) }
}

//! Document synchronization handlers.

use tower_lsp::lsp_types::{
    DidChangeTextDocumentParams,
    DidCloseTextDocumentParams,
    DidOpenTextDocumentParams,
};

use super::super::backend::Backend;
use crate::input::document::DocumentKind;

pub async fn handle_did_open(backend: &Backend, params: DidOpenTextDocumentParams) {
    let document = params.text_document;
    let Some(kind) = DocumentKind::detect(Some(&document.language_id), document.uri.as_str())
    else {
        tracing::debug!(uri = %document.uri, language_id = %document.language_id, "Ignoring document");
        return;
    };
    tracing::debug!(uri = %document.uri, kind = ?kind, "Document opened");

    backend.state.document_kinds.lock().await.insert(document.uri.clone(), kind);
    backend.update_document(&document.uri, kind, document.text).await;
}

pub async fn handle_did_change(backend: &Backend, params: DidChangeTextDocumentParams) {
    let uri = params.text_document.uri;

    let Some(change) = params.content_changes.into_iter().next_back() else {
        return;
    };
    let Some(kind) = backend.state.document_kind(&uri).await else {
        return;
    };

    backend.update_document(&uri, kind, change.text).await;
}

pub async fn handle_did_close(backend: &Backend, params: DidCloseTextDocumentParams) {
    let uri = params.text_document.uri;
    tracing::debug!(uri = %uri, "Document closed");
    backend.state.document_kinds.lock().await.remove(&uri);
}

//! LSP handler modules (internal to `ide::backend`).

#![allow(unreachable_pub)]

pub mod code_action;
pub mod document_sync;
pub mod execute_command;
pub mod features;
pub mod lifecycle;
pub mod notifications;
pub mod rename;
pub mod workspace;

use tower_lsp::lsp_types::{
    Position,
    Url,
};

use crate::indexer::TranslationIndex;

/// Byte offset of an LSP position in a template known to the index.
fn template_offset(index: &TranslationIndex, uri: &Url, position: Position) -> Option<usize> {
    let offset = index.template_offset(uri.as_str(), position.into());
    if offset.is_none() {
        tracing::debug!(
            uri = %uri,
            line = position.line,
            character = position.character,
            "Position outside a known template"
        );
    }
    offset
}


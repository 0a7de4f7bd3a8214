//! IDE features module.

pub mod backend;
pub mod code_actions;
pub mod completion;
pub mod diagnostics;
pub mod edits;
pub mod entry_builder;
pub mod goto_definition;
mod handlers;
pub mod hover;
pub mod protocol;
pub mod references;
pub mod rename;
pub mod state;
pub mod translation_edits;

//! Command names, custom notifications and their payloads.

use serde::{
    Deserialize,
    Serialize,
};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::{
    Range,
    Url,
};

use crate::input::project::Project;

/// Inserts missing entries; arguments are one or many [`GenerateTranslationArgs`](super::code_actions::GenerateTranslationArgs).
pub const GENERATE_TRANSLATION_COMMAND: &str = "i18n.generateTranslation";
/// Deletes a key from every catalog and template; the argument is the key.
pub const REMOVE_TRANSLATION_COMMAND: &str = "i18n.removeTranslation";
/// Reveals a catalog range; the argument is [`GotoTranslationArgs`].
pub const GOTO_TRANSLATION_COMMAND: &str = "i18n.gotoTranslation";

/// Every command the server executes.
pub const COMMANDS: [&str; 3] =
    [GENERATE_TRANSLATION_COMMAND, REMOVE_TRANSLATION_COMMAND, GOTO_TRANSLATION_COMMAND];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotoTranslationArgs {
    pub uri: Url,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectsDiscoveredParams {
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogTextChangedParams {
    pub uri: Url,
    /// Editor language id; the extension decides when absent.
    #[serde(default)]
    pub language_kind: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateTextChangedParams {
    pub uri: Url,
    pub text: String,
}

/// `i18n/projectsDiscovered`
#[derive(Debug)]
pub enum ProjectsDiscovered {}

impl Notification for ProjectsDiscovered {
    type Params = ProjectsDiscoveredParams;
    const METHOD: &'static str = "i18n/projectsDiscovered";
}

/// `i18n/catalogTextChanged`
#[derive(Debug)]
pub enum CatalogTextChanged {}

impl Notification for CatalogTextChanged {
    type Params = CatalogTextChangedParams;
    const METHOD: &'static str = "i18n/catalogTextChanged";
}

/// `i18n/templateTextChanged`
#[derive(Debug)]
pub enum TemplateTextChanged {}

impl Notification for TemplateTextChanged {
    type Params = TemplateTextChangedParams;
    const METHOD: &'static str = "i18n/templateTextChanged";
}

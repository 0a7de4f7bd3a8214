//! LSP backend: owns the shared state and routes protocol calls to the handlers.

use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CodeActionParams,
    CodeActionResponse,
    CompletionParams,
    CompletionResponse,
    Diagnostic,
    DidChangeConfigurationParams,
    DidChangeTextDocumentParams,
    DidCloseTextDocumentParams,
    DidOpenTextDocumentParams,
    ExecuteCommandParams,
    GotoDefinitionParams,
    GotoDefinitionResponse,
    Hover,
    HoverParams,
    InitializeParams,
    InitializeResult,
    InitializedParams,
    Location,
    MessageType,
    PrepareRenameResponse,
    ReferenceParams,
    RenameParams,
    TextDocumentPositionParams,
    Url,
    WorkspaceEdit,
};
use tower_lsp::{
    Client,
    LanguageServer,
};

use super::diagnostics::generate_diagnostics;
use super::edits::{
    PlannedEdit,
    into_workspace_edit,
};
use super::handlers;
use super::protocol::{
    CatalogTextChangedParams,
    ProjectsDiscoveredParams,
    TemplateTextChangedParams,
};
use super::state::ServerState;
use crate::config::ConfigManager;
use crate::indexer::TranslationIndex;
use crate::input::document::DocumentKind;
use crate::syntax::CatalogKind;

/// LSP Backend
#[derive(Clone)]
pub struct Backend {
    /// LSP client
    pub client: Client,
    /// Active settings
    pub config_manager: Arc<Mutex<ConfigManager>>,
    /// Index and document routing
    pub state: ServerState,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("config_manager", &"<ConfigManager>")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Backend {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            config_manager: Arc::new(Mutex::new(ConfigManager::new())),
            state: ServerState::new(TranslationIndex::default()),
        }
    }

    /// Pushes the active settings into the index and refreshes every template's diagnostics.
    ///
    /// Projects from `i18n/projectsDiscovered` replace the configured ones.
    pub(crate) async fn apply_settings(&self) {
        let settings = self.config_manager.lock().await.get_settings().clone();
        let projects = self.state.effective_projects(settings.projects).await;
        {
            let mut index = self.state.index.lock().await;
            index.set_function_name(settings.translation_function);
            index.set_projects(projects);
        }
        self.publish_all_diagnostics().await;
    }

    /// Routes new document text to the catalog or template side of the index.
    pub(crate) async fn update_document(&self, uri: &Url, kind: DocumentKind, text: String) {
        match kind {
            DocumentKind::Catalog(kind) => self.update_catalog(uri, kind, text).await,
            DocumentKind::Template => self.update_template(uri, text).await,
        }
    }

    /// Re-parses a catalog. Parse failures keep the previous catalog and are reported to the user.
    pub(crate) async fn update_catalog(&self, uri: &Url, kind: CatalogKind, text: String) {
        let result = self.state.index.lock().await.update_catalog(uri.as_str(), kind, text);
        if let Err(error) = result {
            self.client
                .log_message(MessageType::WARNING, format!("Failed to parse {uri}: {error}"))
                .await;
            return;
        }
        self.publish_all_diagnostics().await;
    }

    pub(crate) async fn update_template(&self, uri: &Url, text: String) {
        self.state.index.lock().await.update_template(uri.as_str(), text);
        tracing::debug!(uri = %uri, "Template updated");
        self.publish_diagnostics(vec![uri.clone()]).await;
    }

    /// Publishes diagnostics for every known template.
    pub(crate) async fn publish_all_diagnostics(&self) {
        let uris = {
            let index = self.state.index.lock().await;
            index.template_uris().filter_map(|uri| Url::parse(uri).ok()).collect()
        };
        self.publish_diagnostics(uris).await;
    }

    /// Computes and publishes diagnostics for the given templates.
    pub(crate) async fn publish_diagnostics(&self, uris: Vec<Url>) {
        let config = self.config_manager.lock().await.get_settings().diagnostics;
        let batches: Vec<(Url, Vec<Diagnostic>)> = {
            let index = self.state.index.lock().await;
            uris.into_iter()
                .map(|uri| {
                    let diagnostics = if config.enabled {
                        generate_diagnostics(&index, uri.as_str(), config.missing_in)
                    } else {
                        Vec::new()
                    };
                    (uri, diagnostics)
                })
                .collect()
        };

        for (uri, diagnostics) in batches {
            tracing::debug!(uri = %uri, count = diagnostics.len(), "Publishing diagnostics");
            self.client.publish_diagnostics(uri, diagnostics, None).await;
        }
    }

    /// Sends planned edits to the client as one workspace edit.
    pub(crate) async fn apply_edits(&self, edits: Vec<PlannedEdit>) {
        if edits.is_empty() {
            tracing::debug!("No edits to apply");
            return;
        }
        match self.client.apply_edit(into_workspace_edit(edits)).await {
            Ok(response) if response.applied => tracing::debug!("Workspace edit applied"),
            Ok(response) => {
                tracing::warn!(reason = ?response.failure_reason, "Workspace edit rejected");
            }
            Err(error) => tracing::error!(%error, "Failed to apply workspace edit"),
        }
    }

    /// `i18n/projectsDiscovered`
    pub async fn projects_discovered(&self, params: ProjectsDiscoveredParams) {
        handlers::notifications::handle_projects_discovered(self, params).await;
    }

    /// `i18n/catalogTextChanged`
    pub async fn catalog_text_changed(&self, params: CatalogTextChangedParams) {
        handlers::notifications::handle_catalog_text_changed(self, params).await;
    }

    /// `i18n/templateTextChanged`
    pub async fn template_text_changed(&self, params: TemplateTextChangedParams) {
        handlers::notifications::handle_template_text_changed(self, params).await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handlers::lifecycle::handle_initialize(self, params).await
    }

    async fn initialized(&self, params: InitializedParams) {
        handlers::lifecycle::handle_initialized(self, params).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handlers::lifecycle::handle_shutdown().await
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        handlers::workspace::handle_did_change_configuration(self, params).await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        handlers::document_sync::handle_did_open(self, params).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        handlers::document_sync::handle_did_change(self, params).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        handlers::document_sync::handle_did_close(self, params).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        handlers::features::handle_hover(self, params).await
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        handlers::features::handle_completion(self, params).await
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        handlers::features::handle_goto_definition(self, params).await
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        handlers::features::handle_references(self, params).await
    }

    async fn prepare_rename(
        &self,
        params: TextDocumentPositionParams,
    ) -> Result<Option<PrepareRenameResponse>> {
        handlers::rename::handle_prepare_rename(self, params).await
    }

    async fn rename(&self, params: RenameParams) -> Result<Option<WorkspaceEdit>> {
        handlers::rename::handle_rename(self, params).await
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        handlers::code_action::handle_code_action(self, params).await
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        handlers::execute_command::handle_execute_command(self, params).await
    }
}

//! State shared by every handler.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::lsp_types::Url;

use crate::indexer::TranslationIndex;
use crate::input::document::DocumentKind;
use crate::input::project::Project;

/// Shared server state.
///
/// # Lock order
///
/// When several locks are needed, take `index` first.
#[derive(Clone, Default)]
pub struct ServerState {
    /// Catalogs, templates and projects
    pub index: Arc<Mutex<TranslationIndex>>,
    /// How each open document was routed
    pub document_kinds: Arc<Mutex<HashMap<Url, DocumentKind>>>,
    /// Projects from `i18n/projectsDiscovered`; they take precedence over configured ones.
    pub discovered_projects: Arc<Mutex<Option<Vec<Project>>>>,
}

impl ServerState {
    #[must_use]
    pub fn new(index: TranslationIndex) -> Self {
        Self {
            index: Arc::new(Mutex::new(index)),
            document_kinds: Arc::default(),
            discovered_projects: Arc::default(),
        }
    }

    /// Discovered projects when any arrived, `configured` otherwise.
    pub async fn effective_projects(&self, configured: Vec<Project>) -> Vec<Project> {
        self.discovered_projects.lock().await.clone().unwrap_or(configured)
    }

    /// Kind of a document: as routed when opened, otherwise from its extension.
    pub async fn document_kind(&self, uri: &Url) -> Option<DocumentKind> {
        let known = self.document_kinds.lock().await.get(uri).copied();
        known.or_else(|| DocumentKind::from_uri(uri.as_str()))
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("index", &"<TranslationIndex>")
            .field("document_kinds", &"<HashMap<Url, DocumentKind>>")
            .field("discovered_projects", &"<Option<Vec<Project>>>")
            .finish()
    }
}

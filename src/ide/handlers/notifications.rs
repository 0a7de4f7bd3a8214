//! Custom notifications from the collaborators feeding documents and projects.

use super::super::backend::Backend;
use super::super::protocol::{
    CatalogTextChangedParams,
    ProjectsDiscoveredParams,
    TemplateTextChangedParams,
};
use crate::input::document::DocumentKind;
use crate::syntax::CatalogKind;

pub async fn handle_projects_discovered(backend: &Backend, params: ProjectsDiscoveredParams) {
    tracing::info!(count = params.projects.len(), "Projects discovered");
    *backend.state.discovered_projects.lock().await = Some(params.projects.clone());
    backend.state.index.lock().await.set_projects(params.projects);
    backend.publish_all_diagnostics().await;
}

pub async fn handle_catalog_text_changed(backend: &Backend, params: CatalogTextChangedParams) {
    let kind = params
        .language_kind
        .as_deref()
        .and_then(CatalogKind::from_language_id)
        .or_else(|| CatalogKind::from_uri(params.uri.as_str()));
    let Some(kind) = kind else {
        tracing::warn!(uri = %params.uri, language_kind = ?params.language_kind, "Unsupported catalog kind");
        return;
    };
    backend.update_document(&params.uri, DocumentKind::Catalog(kind), params.text).await;
}

pub async fn handle_template_text_changed(backend: &Backend, params: TemplateTextChangedParams) {
    backend.update_document(&params.uri, DocumentKind::Template, params.text).await;
}

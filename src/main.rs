//! Entry point for the Language Server Protocol implementation.

use hbs_i18n_language_server::Backend;
use hbs_i18n_language_server::ide::protocol::{
    CatalogTextChanged,
    ProjectsDiscovered,
    TemplateTextChanged,
};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::{
    LspService,
    Server,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // stdout carries the protocol, so logs go to stderr.
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let (stdin, stdout) = (tokio::io::stdin(), tokio::io::stdout());
    let (service, socket) = LspService::build(Backend::new)
        .custom_method(ProjectsDiscovered::METHOD, Backend::projects_discovered)
        .custom_method(CatalogTextChanged::METHOD, Backend::catalog_text_changed)
        .custom_method(TemplateTextChanged::METHOD, Backend::template_text_changed)
        .finish();
    Server::new(stdin, stdout, socket).serve(service).await;
}

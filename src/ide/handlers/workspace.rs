//! Workspace-related handlers.

use tower_lsp::lsp_types::{
    DidChangeConfigurationParams,
    MessageType,
};

use super::super::backend::Backend;
use crate::config::I18nSettings;

pub async fn handle_did_change_configuration(
    backend: &Backend,
    params: DidChangeConfigurationParams,
) {
    tracing::info!(settings = %params.settings, "didChangeConfiguration received");

    let new_settings = match I18nSettings::from_change(params.settings) {
        Ok(settings) => settings,
        Err(error) => {
            tracing::error!(%error, "invalid configuration");
            return;
        }
    };

    let mut config_manager = backend.config_manager.lock().await;
    match config_manager.update_settings(new_settings) {
        Ok(()) => {
            drop(config_manager);
            tracing::info!("configuration updated successfully");
            backend.apply_settings().await;
        }
        Err(error) => {
            drop(config_manager);
            tracing::error!(%error, "configuration validation error");
            backend
                .client
                .log_message(MessageType::ERROR, format!("Configuration error: {error}"))
                .await;
        }
    }
}

//! Reads the workspace settings file.

use std::path::Path;

use super::{
    ConfigError,
    I18nSettings,
};

/// Settings file looked up at the workspace root.
pub(super) const CONFIG_FILE_NAME: &str = ".hbs-i18n.json";

/// Loads `.hbs-i18n.json` from the workspace root.
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and parses
/// - `Ok(None)`: no settings file
///
/// # Errors
/// - The file cannot be read
/// - The file is not valid settings JSON
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<I18nSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "Configuration file not found");
        return Ok(None);
    }

    tracing::debug!(path = %config_path.display(), "Loading configuration");

    let content = std::fs::read_to_string(&config_path)?;
    let settings: I18nSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}

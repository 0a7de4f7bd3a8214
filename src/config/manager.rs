//! Owns the active settings.

use std::path::PathBuf;

use super::{
    ConfigError,
    I18nSettings,
    loader,
};

#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// Validated settings in effect
    current_settings: I18nSettings,
    /// Where `.hbs-i18n.json` was looked up
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `.hbs-i18n.json` from `workspace_root`, falling back to defaults.
    ///
    /// On error the previous settings stay active.
    ///
    /// # Errors
    /// - The settings file cannot be read or parsed
    /// - The settings fail validation
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!(workspace_root = ?workspace_root, "Loading settings");

        let settings = match &workspace_root {
            Some(root) => loader::load_from_workspace(root)?.unwrap_or_default(),
            None => I18nSettings::default(),
        };
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        self.workspace_root = workspace_root;
        tracing::debug!(settings = ?self.current_settings, "Settings loaded");

        Ok(())
    }

    /// Replaces the settings after validating them.
    ///
    /// # Errors
    /// The settings fail validation; the previous ones stay active.
    pub fn update_settings(&mut self, new_settings: I18nSettings) -> Result<(), ConfigError> {
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;
        self.current_settings = new_settings;
        tracing::debug!("Settings updated");
        Ok(())
    }

    #[must_use]
    pub const fn get_settings(&self) -> &I18nSettings {
        &self.current_settings
    }

    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::config::MissingTranslationMode;

    #[googletest::test]
    fn test_load_settings_without_workspace() {
        let mut manager = ConfigManager::new();

        expect_that!(manager.load_settings(None), ok(anything()));
        expect_that!(manager.get_settings(), eq(&I18nSettings::default()));
        expect_that!(manager.workspace_root(), none());
    }

    #[googletest::test]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".hbs-i18n.json"),
            r#"{"diagnostics": {"missingIn": "any"}}"#,
        )
        .unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        expect_that!(result, ok(anything()));
        expect_that!(
            manager.get_settings().diagnostics.missing_in,
            eq(MissingTranslationMode::Any)
        );
        expect_that!(manager.workspace_root(), some(anything()));
    }

    #[googletest::test]
    fn test_load_settings_without_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        expect_that!(result, ok(anything()));
        expect_that!(manager.get_settings().translation_function, eq("t"));
    }

    #[googletest::test]
    fn test_invalid_file_keeps_previous_settings() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".hbs-i18n.json"), r#"{"translationFunction": ""}"#)
            .unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        expect_that!(result, err(anything()));
        expect_that!(manager.get_settings().translation_function, eq("t"));
        expect_that!(manager.workspace_root(), none());
    }

    #[googletest::test]
    fn test_update_settings() {
        let mut manager = ConfigManager::new();
        let settings =
            I18nSettings { translation_function: "tr".to_string(), ..I18nSettings::default() };

        expect_that!(manager.update_settings(settings), ok(anything()));
        expect_that!(manager.get_settings().translation_function, eq("tr"));

        let invalid = I18nSettings { translation_function: String::new(), ..I18nSettings::default() };
        expect_that!(manager.update_settings(invalid), err(anything()));
        expect_that!(manager.get_settings().translation_function, eq("tr"));
    }
}

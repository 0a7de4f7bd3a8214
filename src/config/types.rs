use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::indexer::DEFAULT_TRANSLATION_FUNCTION;
use crate::input::project::Project;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "projects[0].label")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered list of validation failures.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings as sent through `workspace/didChangeConfiguration`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    pub hbs_i18n: I18nSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Helper name whose calls carry translation keys.
    pub translation_function: String,
    pub projects: Vec<Project>,
    pub diagnostics: DiagnosticsConfig,
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            translation_function: DEFAULT_TRANSLATION_FUNCTION.to_string(),
            projects: vec![Project::default()],
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsConfig {
    pub enabled: bool,
    pub missing_in: MissingTranslationMode,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { enabled: true, missing_in: MissingTranslationMode::default() }
    }
}

/// When a key counts as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTranslationMode {
    /// No catalog of the project defines the key.
    #[default]
    All,
    /// At least one catalog of the project lacks the key.
    Any,
}

impl I18nSettings {
    /// # Errors
    /// - Empty translation function
    /// - Project without a label or catalog file
    /// - Invalid exclude glob
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.translation_function.trim().is_empty() {
            errors.push(ValidationError::new(
                "translationFunction",
                "The function name cannot be empty. Example: \"t\"",
            ));
        }

        for (index, project) in self.projects.iter().enumerate() {
            if project.label.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("projects[{index}].label"),
                    "The label cannot be empty",
                ));
            }
            if project.translation.file.is_empty() {
                errors.push(ValidationError::new(
                    format!("projects[{index}].translation.file"),
                    "The catalog file cannot be empty. Example: \"en-us.json\"",
                ));
            }
            for (pattern_index, pattern) in project.exclude_patterns.iter().enumerate() {
                if let Err(e) = globset::Glob::new(pattern) {
                    errors.push(ValidationError::new(
                        format!("projects[{index}].excludePatterns[{pattern_index}]"),
                        format!("Invalid glob pattern '{pattern}': {e}"),
                    ));
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Reads `workspace/didChangeConfiguration` settings, bare or wrapped in `hbsI18n`.
    ///
    /// # Errors
    /// The value matches neither shape.
    pub fn from_change(value: serde_json::Value) -> Result<Self, ConfigError> {
        if value.get("hbsI18n").is_some() {
            let wrapped: ServerSettings = serde_json::from_value(value)?;
            return Ok(wrapped.hbs_i18n);
        }
        Ok(serde_json::from_value(value)?)
    }
}

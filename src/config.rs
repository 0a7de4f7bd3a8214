//! Server settings and where they come from.
/// Settings file loader
mod loader;
/// Holds the active settings
mod manager;
/// Settings types and validation
mod types;

pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    DiagnosticsConfig,
    I18nSettings,
    MissingTranslationMode,
    ServerSettings,
    ValidationError,
};

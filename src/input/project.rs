//! Projects group templates with the catalogs that translate them.

use std::path::Path;

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use serde::{
    Deserialize,
    Serialize,
};
use tower_lsp::lsp_types::Url;

/// Describes the catalog that anchors a project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationDescriptor {
    /// File name a catalog path must contain to belong to the project.
    #[serde(alias = "i18nFile")]
    pub file: String,
    #[serde(alias = "i18nFormat", default = "default_format")]
    pub format: String,
    #[serde(alias = "i18nLocale", default)]
    pub locale: String,
}

/// Default catalog format.
fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Directory owning the project's templates. Empty matches every document.
    #[serde(default)]
    pub root_path: String,
    pub label: String,
    #[serde(alias = "exclude", default)]
    pub exclude_patterns: Vec<String>,
    pub translation: TranslationDescriptor,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            root_path: String::new(),
            label: "project".to_string(),
            exclude_patterns: Vec::new(),
            translation: TranslationDescriptor {
                file: "en-us.json".to_string(),
                format: default_format(),
                locale: "en-us".to_string(),
            },
        }
    }
}

impl Project {
    /// Whether a catalog belongs to this project.
    #[must_use]
    pub fn matches_catalog(&self, catalog_uri: &str) -> bool {
        !self.translation.file.is_empty()
            && document_path(catalog_uri).contains(&self.translation.file)
    }
}

/// A project with its exclude patterns compiled.
#[derive(Debug, Clone)]
pub struct ProjectMatcher {
    /// The project as configured.
    project: Project,
    /// Compiled `exclude_patterns`.
    exclude_set: GlobSet,
}

impl ProjectMatcher {
    /// Compiles a project. Invalid exclude patterns are skipped with a warning.
    #[must_use]
    pub fn new(project: Project) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in &project.exclude_patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(error) => {
                    tracing::warn!(
                        %error,
                        pattern = %pattern,
                        label = %project.label,
                        "Skipping invalid exclude pattern"
                    );
                }
            }
        }
        let exclude_set = builder.build().unwrap_or_else(|error| {
            tracing::warn!(%error, label = %project.label, "Failed to build exclude set");
            GlobSet::empty()
        });
        Self { project, exclude_set }
    }

    #[must_use]
    pub const fn project(&self) -> &Project {
        &self.project
    }

    /// Whether a template document is owned by this project.
    #[must_use]
    pub fn contains_document(&self, uri: &str) -> bool {
        let path = document_path(uri);
        let path = Path::new(&path);
        let root = Path::new(&self.project.root_path);
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };
        !self.exclude_set.is_match(relative) && !self.exclude_set.is_match(path)
    }
}

/// File-system path of a document URI, or the URI itself when it is not a file URL.
#[must_use]
pub fn document_path(uri: &str) -> String {
    Url::parse(uri)
        .ok()
        .and_then(|url| url.to_file_path().ok())
        .map_or_else(|| uri.to_string(), |path| path.to_string_lossy().into_owned())
}

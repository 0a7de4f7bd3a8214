//! In-memory index joining catalogs, templates and projects.

use std::collections::BTreeMap;

use salsa::Setter;

use crate::db::I18nDatabaseImpl;
use crate::input::catalog::{
    Catalog,
    display_name,
};
use crate::input::project::{
    Project,
    ProjectMatcher,
};
use crate::input::template::TemplateFile;
use crate::syntax::json_tree::UnitLookup;
use crate::syntax::{
    CatalogKind,
    ParseError,
    ParsedCatalog,
    UsageOccurrence,
    parse_catalog,
    scan_template,
};
use crate::types::{
    LineIndex,
    SourcePosition,
    SourceRange,
    TextSpan,
};

/// Helper name recognized when no setting overrides it.
pub const DEFAULT_TRANSLATION_FUNCTION: &str = "t";

/// Owns every catalog and template the server knows about.
///
/// Catalogs keep insertion order; templates are ordered by URI so that
/// multi-document results are stable.
pub struct TranslationIndex {
    /// Salsa database holding the inputs
    db: I18nDatabaseImpl,
    /// Catalogs in the order they were first seen
    catalogs: Vec<Catalog>,
    /// Templates keyed by URI
    templates: BTreeMap<String, TemplateFile>,
    /// Projects in priority order; the first match wins
    projects: Vec<ProjectMatcher>,
    /// Helper name the scanner looks for
    function_name: String,
}

impl Default for TranslationIndex {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSLATION_FUNCTION)
    }
}

impl std::fmt::Debug for TranslationIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationIndex")
            .field("catalogs", &self.catalogs.len())
            .field("templates", &self.templates.len())
            .field("projects", &self.projects.len())
            .field("function_name", &self.function_name)
            .finish_non_exhaustive()
    }
}

impl TranslationIndex {
    #[must_use]
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            db: I18nDatabaseImpl::default(),
            catalogs: Vec::new(),
            templates: BTreeMap::new(),
            projects: Vec::new(),
            function_name: function_name.into(),
        }
    }

    #[must_use]
    pub const fn db(&self) -> &I18nDatabaseImpl {
        &self.db
    }

    #[must_use]
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Changes the recognized helper. Template scans are recomputed on next access.
    pub fn set_function_name(&mut self, function_name: impl Into<String>) {
        self.function_name = function_name.into();
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().map(ProjectMatcher::project)
    }

    /// Replaces the project list and re-resolves every catalog's owner.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects.into_iter().map(ProjectMatcher::new).collect();

        let assignments: Vec<(Catalog, Option<String>)> = self
            .catalogs
            .iter()
            .map(|catalog| (*catalog, self.project_label_for_catalog(catalog.uri(&self.db))))
            .collect();
        for (catalog, project) in assignments {
            catalog.set_project(&mut self.db).to(project);
        }
    }

    /// Label of the first project claiming a catalog.
    fn project_label_for_catalog(&self, uri: &str) -> Option<String> {
        self.projects
            .iter()
            .map(ProjectMatcher::project)
            .find(|project| project.matches_catalog(uri))
            .map(|project| project.label.clone())
    }

    /// Parses catalog text and stores it.
    ///
    /// On failure the previous state of the catalog is kept and the error is returned.
    pub fn update_catalog(
        &mut self,
        uri: &str,
        kind: CatalogKind,
        text: String,
    ) -> Result<Catalog, ParseError> {
        match parse_catalog(&text, kind) {
            Ok(parsed) => {
                tracing::debug!(uri, units = parsed.units().len(), "Catalog parsed");
                Ok(self.upsert_catalog(uri, kind, text, parsed))
            }
            Err(error) => {
                tracing::warn!(uri, %error, "Failed to parse catalog, keeping previous state");
                Err(error)
            }
        }
    }

    /// Stores an already parsed catalog, replacing any previous entry for `uri`.
    pub fn upsert_catalog(
        &mut self,
        uri: &str,
        kind: CatalogKind,
        text: String,
        parsed: ParsedCatalog,
    ) -> Catalog {
        if let Some(existing) = self.catalog(uri) {
            existing.set_kind(&mut self.db).to(kind);
            existing.set_display_name(&mut self.db).to(display_name(uri, kind));
            existing.set_text(&mut self.db).to(text);
            existing.set_parsed(&mut self.db).to(parsed);
            return existing;
        }

        let project = self.project_label_for_catalog(uri);
        let catalog = Catalog::new(
            &self.db,
            uri.to_string(),
            kind,
            display_name(uri, kind),
            text,
            parsed,
            project,
        );
        self.catalogs.push(catalog);
        catalog
    }

    #[must_use]
    pub fn catalog(&self, uri: &str) -> Option<Catalog> {
        self.catalogs.iter().copied().find(|catalog| catalog.uri(&self.db) == uri)
    }

    #[must_use]
    pub fn catalogs(&self) -> &[Catalog] {
        &self.catalogs
    }

    /// Stores template text, replacing the document's previous occurrences.
    pub fn update_template(&mut self, uri: &str, text: String) -> TemplateFile {
        if let Some(existing) = self.templates.get(uri).copied() {
            existing.set_text(&mut self.db).to(text);
            return existing;
        }
        let template = TemplateFile::new(&self.db, uri.to_string(), text);
        self.templates.insert(uri.to_string(), template);
        template
    }

    #[must_use]
    pub fn template(&self, uri: &str) -> Option<TemplateFile> {
        self.templates.get(uri).copied()
    }

    pub fn template_uris(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Occurrences of a template, in document order.
    #[must_use]
    pub fn usages(&self, uri: &str) -> Vec<UsageOccurrence> {
        self.template(uri).map_or_else(Vec::new, |template| {
            scan_template(&self.db, template, self.function_name.clone())
        })
    }

    /// Occurrences of every template, ordered by URI.
    pub fn all_usages(&self) -> impl Iterator<Item = (&str, Vec<UsageOccurrence>)> {
        self.templates.iter().map(|(uri, template)| {
            (uri.as_str(), scan_template(&self.db, *template, self.function_name.clone()))
        })
    }

    /// The occurrence whose whole call contains `offset`.
    #[must_use]
    pub fn find_occurrence_at(&self, uri: &str, offset: usize) -> Option<UsageOccurrence> {
        self.usages(uri).into_iter().find(|usage| usage.full_span.contains(offset))
    }

    /// The occurrence whose key literal contains `offset`.
    #[must_use]
    pub fn find_key_at(&self, uri: &str, offset: usize) -> Option<UsageOccurrence> {
        self.usages(uri).into_iter().find(|usage| usage.key_span.contains(offset))
    }

    #[must_use]
    pub fn project_for_document(&self, uri: &str) -> Option<&Project> {
        self.projects
            .iter()
            .find(|matcher| matcher.contains_document(uri))
            .map(ProjectMatcher::project)
    }

    /// Catalogs serving a template: those owned by the template's project plus
    /// catalogs no project claims. Empty when no project owns the template.
    #[must_use]
    pub fn catalogs_for_document(&self, uri: &str) -> Vec<Catalog> {
        let Some(project) = self.project_for_document(uri) else {
            tracing::debug!(uri, "No project owns document");
            return Vec::new();
        };
        self.catalogs
            .iter()
            .copied()
            .filter(|catalog| {
                catalog.project(&self.db).as_ref().is_none_or(|label| *label == project.label)
            })
            .collect()
    }

    #[must_use]
    pub fn find_unit(&self, catalog: Catalog, key: &str) -> Option<UnitLookup<'_>> {
        catalog.parsed(&self.db).find_unit(key)
    }

    /// Byte offset of a position in a template.
    #[must_use]
    pub fn template_offset(&self, uri: &str, position: SourcePosition) -> Option<usize> {
        let template = self.template(uri)?;
        LineIndex::new(template.text(&self.db)).offset(position)
    }

    /// Range of a document span in a catalog.
    #[must_use]
    pub fn catalog_range(&self, catalog: Catalog, span: TextSpan) -> SourceRange {
        LineIndex::new(catalog.text(&self.db)).range(span)
    }
}

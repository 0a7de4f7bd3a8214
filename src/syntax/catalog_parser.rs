//! Catalog parsing: strict validation, module unwrapping and key flattening.

use std::collections::HashMap;

use serde::de::IgnoredAny;
use serde::{
    Deserialize,
    Serialize,
};

use super::error::ParseError;
use super::json_tree::{
    self,
    InsertionPoint,
    JsonNode,
    KEY_SEPARATOR,
    UnitLookup,
};
use crate::types::TextSpan;

/// Format of a catalog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// Strict JSON document; comments and trailing commas fail the parse.
    Json,
    /// Script module whose translations live in a single object literal.
    Module,
}

impl CatalogKind {
    #[must_use]
    pub fn from_language_id(language_id: &str) -> Option<Self> {
        match language_id {
            "json" => Some(Self::Json),
            "javascript" => Some(Self::Module),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        let path = uri.split(['?', '#']).next().unwrap_or(uri);
        let extension = path.rsplit_once('.').map(|(_, extension)| extension)?;
        match extension {
            "json" => Some(Self::Json),
            "js" => Some(Self::Module),
            _ => None,
        }
    }
}

/// Offset of the parsed body inside the full document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogTrim {
    /// Lines before the body.
    pub line_offset: u32,
    /// Byte offset of the body's first character.
    pub character_offset: usize,
}

/// A flattened `key → value` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransUnit {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCatalog {
    /// Flattened entries in document order.
    units: Vec<TransUnit>,
    /// Position of each key in `units`.
    unit_index: HashMap<String, usize>,
    /// Tree of the body, with spans relative to the body.
    tree: JsonNode,
    trim: CatalogTrim,
}

impl ParsedCatalog {
    /// Builds a catalog from an already parsed body.
    #[must_use]
    pub fn new(tree: JsonNode, trim: CatalogTrim) -> Self {
        let units = flatten(&tree);
        let unit_index =
            units.iter().enumerate().map(|(position, unit)| (unit.key.clone(), position)).collect();
        Self { units, unit_index, tree, trim }
    }

    #[must_use]
    pub fn units(&self) -> &[TransUnit] {
        &self.units
    }

    #[must_use]
    pub const fn tree(&self) -> &JsonNode {
        &self.tree
    }

    #[must_use]
    pub const fn trim(&self) -> CatalogTrim {
        self.trim
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.unit_index.contains_key(key)
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        let position = *self.unit_index.get(key)?;
        self.units.get(position).map(|unit| unit.value.as_str())
    }

    /// Resolves a key against the tree. Spans in the result are body-relative;
    /// pass them through [`Self::document_span`].
    #[must_use]
    pub fn find_unit(&self, key: &str) -> Option<UnitLookup<'_>> {
        json_tree::find_unit(&self.tree, key)
    }

    /// Document span to delete when removing `key`.
    #[must_use]
    pub fn removal_span(&self, key: &str) -> Option<TextSpan> {
        json_tree::removal_span(&self.tree, key).map(|span| self.document_span(span))
    }

    /// Insertion point for `key`, with the offset already in document coordinates.
    #[must_use]
    pub fn insertion_point(&self, key: &str) -> Option<InsertionPoint> {
        json_tree::insertion_point(&self.tree, key).map(|point| InsertionPoint {
            offset: point.offset + self.trim.character_offset,
            ..point
        })
    }

    /// Converts a body-relative span to document coordinates.
    #[must_use]
    pub const fn document_span(&self, span: TextSpan) -> TextSpan {
        span.shifted(self.trim.character_offset)
    }
}

/// Parses catalog text of the given kind.
pub fn parse_catalog(text: &str, kind: CatalogKind) -> Result<ParsedCatalog, ParseError> {
    let (body, trim) = match kind {
        CatalogKind::Json => (text, CatalogTrim::default()),
        CatalogKind::Module => strip_module_wrapper(text)?,
    };

    serde_json::from_str::<IgnoredAny>(body)?;
    let tree = json_tree::parse_tree(body)?;
    if !tree.is_object() {
        return Err(ParseError::NotAnObject);
    }
    Ok(ParsedCatalog::new(tree, trim))
}

/// Cuts a module down to the object literal between its first `{` and last `}`.
fn strip_module_wrapper(text: &str) -> Result<(&str, CatalogTrim), ParseError> {
    let start = text.find('{').ok_or(ParseError::MissingModuleBody)?;
    let end = text.rfind('}').filter(|&end| end > start).ok_or(ParseError::MissingModuleBody)?;
    let body = text.get(start..=end).ok_or(ParseError::MissingModuleBody)?;

    let prefix = text.get(..start).unwrap_or_default();
    let line_offset = u32::try_from(prefix.matches('\n').count()).unwrap_or(u32::MAX);
    Ok((body, CatalogTrim { line_offset, character_offset: start }))
}

/// Flattens a tree into dotted keys.
///
/// Arrays use `[i]` suffixes, empty arrays and non-root objects become `[]` and `{}`,
/// and a repeated key overwrites the earlier value in place.
#[must_use]
pub fn flatten(tree: &JsonNode) -> Vec<TransUnit> {
    let mut flattener = Flattener::default();
    flattener.visit(tree, "");
    flattener.units
}

/// Accumulator for [`flatten`].
#[derive(Debug, Default)]
struct Flattener {
    /// Emitted units in first-seen order.
    units: Vec<TransUnit>,
    /// Position of each key in `units`.
    positions: HashMap<String, usize>,
}

impl Flattener {
    fn emit(&mut self, key: &str, value: String) {
        if let Some(unit) = self.positions.get(key).and_then(|&position| self.units.get_mut(position))
        {
            unit.value = value;
            return;
        }
        self.positions.insert(key.to_string(), self.units.len());
        self.units.push(TransUnit { key: key.to_string(), value });
    }

    fn visit(&mut self, node: &JsonNode, path: &str) {
        match node {
            JsonNode::Scalar { value, .. } => self.emit(path, value.clone()),
            JsonNode::Array { items, .. } => {
                if items.is_empty() {
                    self.emit(path, "[]".to_string());
                }
                for (index, item) in items.iter().enumerate() {
                    self.visit(item, &format!("{path}[{index}]"));
                }
            }
            JsonNode::Object { properties, .. } => {
                if properties.is_empty() && !path.is_empty() {
                    self.emit(path, "{}".to_string());
                }
                for property in properties {
                    let child = if path.is_empty() {
                        property.key.value.clone()
                    } else {
                        format!("{path}{KEY_SEPARATOR}{}", property.key.value)
                    };
                    self.visit(&property.value, &child);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn units_of(text: &str) -> Vec<(String, String)> {
        parse_catalog(text, CatalogKind::Json)
            .unwrap()
            .units()
            .iter()
            .map(|unit| (unit.key.clone(), unit.value.clone()))
            .collect()
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[googletest::test]
    fn test_flatten_nested_objects() {
        let units = units_of(r#"{"greeting": {"hello": "Hi", "bye": "Bye"}, "title": "T"}"#);

        assert_that!(
            units,
            elements_are![
                eq(&pair("greeting.hello", "Hi")),
                eq(&pair("greeting.bye", "Bye")),
                eq(&pair("title", "T"))
            ]
        );
    }

    #[googletest::test]
    fn test_flatten_arrays_and_scalars() {
        let units = units_of(r#"{"a": [1, {"b": true}], "c": [], "d": {}, "e": null}"#);

        assert_that!(
            units,
            elements_are![
                eq(&pair("a[0]", "1")),
                eq(&pair("a[1].b", "true")),
                eq(&pair("c", "[]")),
                eq(&pair("d", "{}")),
                eq(&pair("e", "null"))
            ]
        );
    }

    #[googletest::test]
    fn test_flatten_repeated_key_overwrites_in_place() {
        let units = units_of(r#"{"a": "first", "b": "B", "a": "second"}"#);

        assert_that!(units, elements_are![eq(&pair("a", "second")), eq(&pair("b", "B"))]);
    }

    #[googletest::test]
    fn test_empty_root_has_no_units() {
        assert_that!(units_of("{}"), is_empty());
    }

    #[rstest]
    #[case::invalid_json(r#"{"a": "#)]
    #[case::trailing_comma(r#"{"a": "A",}"#)]
    #[case::line_comment("{\n  // greeting\n  \"a\": \"A\"\n}")]
    #[case::array_root("[1, 2]")]
    #[case::scalar_root(r#""text""#)]
    fn test_parse_catalog_rejects(#[case] text: &str) {
        assert_that!(parse_catalog(text, CatalogKind::Json), err(anything()));
    }

    #[googletest::test]
    fn test_parse_module_catalog() {
        let text = "// translations\nexport default {\n  \"greeting\": \"Hi\"\n};\n";

        let catalog = parse_catalog(text, CatalogKind::Module).unwrap();

        expect_that!(catalog.value("greeting"), some(eq("Hi")));
        expect_that!(
            catalog.trim(),
            eq(CatalogTrim { line_offset: 1, character_offset: text.find('{').unwrap() })
        );
        let lookup = catalog.find_unit("greeting").unwrap();
        let span = catalog.document_span(lookup.property().key.span);
        expect_that!(&text[span.offset..span.end()], eq("\"greeting\""));
    }

    #[googletest::test]
    fn test_module_without_body_fails() {
        assert_that!(parse_catalog("module.exports = 1;", CatalogKind::Module), err(anything()));
    }

    #[googletest::test]
    fn test_module_removal_and_insertion_use_document_offsets() {
        let text = "export default {\"a\": \"A\", \"b\": \"B\"};";
        let catalog = parse_catalog(text, CatalogKind::Module).unwrap();

        let removal = catalog.removal_span("a").unwrap();
        let insertion = catalog.insertion_point("c").unwrap();

        expect_that!(&text[removal.offset..removal.end()], eq("\"a\": \"A\", "));
        expect_that!(insertion.offset, eq(text.find("\"a\"").unwrap()));
    }

    #[rstest]
    #[case::json_language("json", Some(CatalogKind::Json))]
    #[case::javascript_language("javascript", Some(CatalogKind::Module))]
    #[case::handlebars_language("handlebars", None)]
    #[case::jsonc_language("jsonc", None)]
    fn test_kind_from_language_id(#[case] id: &str, #[case] expected: Option<CatalogKind>) {
        assert_that!(CatalogKind::from_language_id(id), eq(expected));
    }

    #[rstest]
    #[case::json("file:///app/en-us.json", Some(CatalogKind::Json))]
    #[case::module("file:///app/en/translations.js", Some(CatalogKind::Module))]
    #[case::template("file:///app/index.hbs", None)]
    #[case::no_extension("file:///app/Makefile", None)]
    fn test_kind_from_uri(#[case] uri: &str, #[case] expected: Option<CatalogKind>) {
        assert_that!(CatalogKind::from_uri(uri), eq(expected));
    }
}

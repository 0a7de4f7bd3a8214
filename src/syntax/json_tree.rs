//! Offset-annotated JSON tree built from tree-sitter-json.
//!
//! Every node keeps the byte span it occupies in the text it was parsed
//! from, so catalog entries can be located, removed and extended without
//! re-serializing the document.

use tree_sitter::{
    Node,
    Parser,
};

use super::error::ParseError;
use crate::types::TextSpan;

/// Separator between the segments of a nested key.
pub const KEY_SEPARATOR: char = '.';

/// Kind of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    Null,
}

/// The key of an object property. `span` includes the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNode {
    pub span: TextSpan,
    pub value: String,
}

/// A `"key": value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub span: TextSpan,
    pub key: KeyNode,
    pub value: JsonNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonNode {
    /// String values are decoded; other scalars keep their source text.
    Scalar { span: TextSpan, kind: ScalarKind, value: String },
    Array { span: TextSpan, items: Vec<JsonNode> },
    Object { span: TextSpan, properties: Vec<Property> },
}

impl JsonNode {
    #[must_use]
    pub const fn span(&self) -> TextSpan {
        match self {
            Self::Scalar { span, .. } | Self::Array { span, .. } | Self::Object { span, .. } => {
                *span
            }
        }
    }

    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object { .. })
    }

    /// Properties of an object, empty for anything else.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        match self {
            Self::Object { properties, .. } => properties,
            Self::Scalar { .. } | Self::Array { .. } => &[],
        }
    }

    /// Looks up a direct property. With duplicate keys the last one wins.
    #[must_use]
    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.properties().iter().rev().find(|property| property.key.value == name)
    }

    /// Span of the value's content: string scalars exclude their quotes.
    #[must_use]
    pub const fn content_span(&self) -> TextSpan {
        match self {
            Self::Scalar { span, kind: ScalarKind::String, .. } if span.length >= 2 => {
                TextSpan::new(span.offset + 1, span.length - 2)
            }
            _ => self.span(),
        }
    }
}

/// Result of resolving a dotted key against a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitLookup<'a> {
    /// Every segment resolved; the property holds the key's value.
    ExactMatch(&'a Property),
    /// Only a prefix resolved; `ancestor` is the deepest property found.
    PartialMatch { ancestor: &'a Property, matched_segments: usize },
}

impl<'a> UnitLookup<'a> {
    #[must_use]
    pub const fn property(self) -> &'a Property {
        match self {
            Self::ExactMatch(property) | Self::PartialMatch { ancestor: property, .. } => property,
        }
    }

    #[must_use]
    pub const fn is_exact(self) -> bool {
        matches!(self, Self::ExactMatch(_))
    }
}

/// Where a new entry goes and how much of its key already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    /// Byte offset of the insertion, relative to the parsed text.
    pub offset: usize,
    /// Number of leading key segments that already exist as objects.
    pub depth: usize,
    /// The target object already has properties, so the entry needs a trailing separator.
    pub trailing_separator: bool,
}

/// One resolved segment of a key walk.
#[derive(Debug, Clone, Copy)]
struct Step<'a> {
    /// Properties of the object the segment was found in.
    siblings: &'a [Property],
    /// Position of the matched property among `siblings`.
    index: usize,
}

impl<'a> Step<'a> {
    /// The property this step resolved to.
    fn property(self) -> Option<&'a Property> {
        self.siblings.get(self.index)
    }
}

/// Resolves as many segments of `key` as possible, stopping at the first miss.
fn walk<'a>(root: &'a JsonNode, key: &str) -> Vec<Step<'a>> {
    let mut steps = Vec::new();
    let mut current = root;
    for segment in key.split(KEY_SEPARATOR) {
        let siblings = current.properties();
        let Some(index) = siblings.iter().rposition(|property| property.key.value == segment)
        else {
            break;
        };
        let step = Step { siblings, index };
        let Some(property) = step.property() else {
            break;
        };
        steps.push(step);
        current = &property.value;
    }
    steps
}

/// Resolves a dotted key to the property holding it, or to its deepest existing ancestor.
#[must_use]
pub fn find_unit<'a>(root: &'a JsonNode, key: &str) -> Option<UnitLookup<'a>> {
    let steps = walk(root, key);
    let ancestor = steps.last().and_then(|step| step.property())?;
    if steps.len() == key.split(KEY_SEPARATOR).count() {
        Some(UnitLookup::ExactMatch(ancestor))
    } else {
        Some(UnitLookup::PartialMatch { ancestor, matched_segments: steps.len() })
    }
}

/// Span to delete so that removing `key` leaves well-formed JSON.
///
/// Takes the following separator when a next sibling exists, otherwise the
/// preceding one. Only exact matches are removable.
#[must_use]
pub fn removal_span(root: &JsonNode, key: &str) -> Option<TextSpan> {
    let steps = walk(root, key);
    if steps.len() != key.split(KEY_SEPARATOR).count() {
        return None;
    }
    let step = steps.last()?;
    let property = step.property()?;

    if let Some(next) = step.siblings.get(step.index + 1) {
        return Some(TextSpan::between(property.span.offset, next.span.offset));
    }
    if let Some(previous) = step.index.checked_sub(1).and_then(|index| step.siblings.get(index)) {
        return Some(TextSpan::between(previous.span.end(), property.span.end()));
    }
    Some(property.span)
}

/// Finds where an entry for `key` can be inserted.
///
/// Returns `None` when the key already exists or a scalar sits on its path.
#[must_use]
pub fn insertion_point(root: &JsonNode, key: &str) -> Option<InsertionPoint> {
    let segments: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    let (last, parents) = segments.split_last()?;
    if !root.is_object() {
        return None;
    }

    let mut object = root;
    let mut depth = 0;
    for segment in parents {
        match object.find_property(segment) {
            Some(property) if property.value.is_object() => {
                object = &property.value;
                depth += 1;
            }
            Some(_) => return None,
            None => break,
        }
    }
    if depth == parents.len() && object.find_property(last).is_some() {
        return None;
    }

    let properties = object.properties();
    let offset =
        properties.first().map_or(object.span().offset + 1, |first| first.span.offset);
    Some(InsertionPoint { offset, depth, trailing_separator: !properties.is_empty() })
}

/// Parses JSON text into a [`JsonNode`] tree.
pub fn parse_tree(text: &str) -> Result<JsonNode, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_json::LANGUAGE.into())?;
    let tree = parser.parse(text, None).ok_or(ParseError::TreeUnavailable)?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(ParseError::Syntax);
    }

    let value = named_children(root)
        .into_iter()
        .find(|node| node.kind() != "comment")
        .ok_or(ParseError::EmptyDocument)?;
    build_node(value, text)
}

/// Named children of a node, skipping anonymous punctuation.
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn node_span(node: Node<'_>) -> TextSpan {
    TextSpan::between(node.start_byte(), node.end_byte())
}

/// Source text of a node. Out-of-range spans yield an empty string.
fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or_default()
}

/// Decodes a JSON string literal, escapes included.
fn decode_string(node: Node<'_>, source: &str) -> Result<String, ParseError> {
    serde_json::from_str::<String>(node_text(node, source))
        .map_err(|source| ParseError::InvalidString { offset: node.start_byte(), source })
}

fn build_node(node: Node<'_>, source: &str) -> Result<JsonNode, ParseError> {
    let span = node_span(node);
    match node.kind() {
        "object" => {
            let properties = named_children(node)
                .into_iter()
                .filter(|child| child.kind() == "pair")
                .map(|child| build_property(child, source))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(JsonNode::Object { span, properties })
        }
        "array" => {
            let items = named_children(node)
                .into_iter()
                .filter(|child| child.kind() != "comment")
                .map(|child| build_node(child, source))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(JsonNode::Array { span, items })
        }
        "string" => Ok(JsonNode::Scalar {
            span,
            kind: ScalarKind::String,
            value: decode_string(node, source)?,
        }),
        "number" => scalar(node, source, ScalarKind::Number),
        "true" | "false" => scalar(node, source, ScalarKind::Boolean),
        "null" => scalar(node, source, ScalarKind::Null),
        kind => Err(ParseError::UnexpectedNode { kind: kind.to_string(), offset: span.offset }),
    }
}

/// Non-string scalar kept as its source text.
fn scalar(node: Node<'_>, source: &str, kind: ScalarKind) -> Result<JsonNode, ParseError> {
    Ok(JsonNode::Scalar { span: node_span(node), kind, value: node_text(node, source).to_string() })
}

fn build_property(node: Node<'_>, source: &str) -> Result<Property, ParseError> {
    let unexpected = || ParseError::UnexpectedNode {
        kind: node.kind().to_string(),
        offset: node.start_byte(),
    };
    let key_node = node.child_by_field_name("key").ok_or_else(unexpected)?;
    let value_node = node.child_by_field_name("value").ok_or_else(unexpected)?;

    let key_value = if key_node.kind() == "string" {
        decode_string(key_node, source)?
    } else {
        node_text(key_node, source).to_string()
    };

    Ok(Property {
        span: node_span(node),
        key: KeyNode { span: node_span(key_node), value: key_value },
        value: build_node(value_node, source)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn text_of(source: &str, span: TextSpan) -> &str {
        &source[span.offset..span.end()]
    }

    #[googletest::test]
    fn test_parse_tree_records_spans() {
        let source = r#"{"greeting": {"hello": "Hi"}, "count": 3}"#;

        let tree = parse_tree(source).unwrap();

        let greeting = tree.find_property("greeting").unwrap();
        expect_that!(text_of(source, greeting.key.span), eq("\"greeting\""));
        let hello = greeting.value.find_property("hello").unwrap();
        expect_that!(text_of(source, hello.span), eq("\"hello\": \"Hi\""));
        expect_that!(text_of(source, hello.value.content_span()), eq("Hi"));
        let count = tree.find_property("count").unwrap();
        expect_that!(
            matches!(
                &count.value,
                JsonNode::Scalar { kind: ScalarKind::Number, value, .. } if value == "3"
            ),
            eq(true)
        );
    }

    #[googletest::test]
    fn test_parse_tree_decodes_escapes() {
        let tree = parse_tree(r#"{"a\"b": "line\nbreak"}"#).unwrap();

        let property = &tree.properties()[0];
        expect_that!(property.key.value, eq("a\"b"));
        expect_that!(
            matches!(&property.value, JsonNode::Scalar { value, .. } if value == "line\nbreak"),
            eq(true)
        );
    }

    #[googletest::test]
    fn test_parse_tree_rejects_broken_text() {
        expect_that!(parse_tree(r#"{"a": }"#), err(anything()));
        expect_that!(parse_tree(""), err(anything()));
    }

    #[googletest::test]
    fn test_duplicate_keys_resolve_to_last() {
        let source = r#"{"a": "first", "a": "second"}"#;
        let tree = parse_tree(source).unwrap();

        let lookup = find_unit(&tree, "a").unwrap();

        expect_that!(text_of(source, lookup.property().value.content_span()), eq("second"));
    }

    #[rstest]
    #[case::exact("greeting.hello", true, "\"hello\"")]
    #[case::partial("greeting.bye", false, "\"greeting\"")]
    #[case::deep_partial("greeting.hello.more", false, "\"hello\"")]
    fn test_find_unit(#[case] key: &str, #[case] exact: bool, #[case] key_text: &str) {
        let source = r#"{"greeting": {"hello": "Hi"}}"#;
        let tree = parse_tree(source).unwrap();

        let lookup = find_unit(&tree, key).unwrap();

        assert_that!(lookup.is_exact(), eq(exact));
        assert_that!(text_of(source, lookup.property().key.span), eq(key_text));
    }

    #[googletest::test]
    fn test_find_unit_misses_unknown_root() {
        let tree = parse_tree(r#"{"greeting": {"hello": "Hi"}}"#).unwrap();
        expect_that!(find_unit(&tree, "farewell"), none());
    }

    #[rstest]
    #[case::with_next_sibling(r#"{"a": 1, "b": 2}"#, "a", r#"{"b": 2}"#)]
    #[case::with_previous_sibling(r#"{"a": 1, "b": 2}"#, "b", r#"{"a": 1}"#)]
    #[case::nested_only_child(r#"{"a": 1, "c": {"d": 4}}"#, "c.d", r#"{"a": 1, "c": {}}"#)]
    fn test_removal_span(#[case] source: &str, #[case] key: &str, #[case] expected: &str) {
        let tree = parse_tree(source).unwrap();

        let span = removal_span(&tree, key).unwrap();

        let mut edited = source.to_string();
        edited.replace_range(span.offset..span.end(), "");
        assert_that!(edited, eq(expected));
    }

    #[googletest::test]
    fn test_removal_span_requires_exact_match() {
        let tree = parse_tree(r#"{"a": {"b": 1}}"#).unwrap();
        expect_that!(removal_span(&tree, "a.c"), none());
    }

    #[googletest::test]
    fn test_insertion_point_into_existing_parent() {
        let source = r#"{"greeting": {"hello": "Hi"}}"#;
        let tree = parse_tree(source).unwrap();

        let point = insertion_point(&tree, "greeting.bye").unwrap();

        expect_that!(point.depth, eq(1));
        expect_that!(point.trailing_separator, eq(true));
        expect_that!(point.offset, eq(source.find("\"hello\"").unwrap()));
    }

    #[googletest::test]
    fn test_insertion_point_into_empty_object() {
        let tree = parse_tree("{}").unwrap();

        let point = insertion_point(&tree, "a.b").unwrap();

        expect_that!(point, eq(InsertionPoint { offset: 1, depth: 0, trailing_separator: false }));
    }

    #[rstest]
    #[case::already_defined("greeting.hello")]
    #[case::scalar_in_path("greeting.hello.more")]
    fn test_insertion_point_rejects(#[case] key: &str) {
        let tree = parse_tree(r#"{"greeting": {"hello": "Hi"}}"#).unwrap();
        assert_that!(insertion_point(&tree, key), none());
    }
}

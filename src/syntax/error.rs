use thiserror::Error;

/// Errors raised while turning catalog text into a [`ParsedCatalog`](super::catalog_parser::ParsedCatalog).
#[derive(Error, Debug)]
pub enum ParseError {
    /// The parser rejected the tree-sitter-json grammar
    #[error("Failed to set language for parser: {0}")]
    LanguageSetup(#[from] tree_sitter::LanguageError),
    /// Text is not strict JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// tree-sitter produced no tree
    #[error("Failed to parse catalog text")]
    TreeUnavailable,
    /// tree-sitter reported a syntax error that strict validation let through
    #[error("Syntax error in catalog text")]
    Syntax,
    /// The document holds nothing but comments or whitespace
    #[error("Catalog text is empty")]
    EmptyDocument,
    /// The top-level value is an array or a scalar
    #[error("Catalog root must be an object")]
    NotAnObject,
    /// Module catalog without a `{ ... }` body
    #[error("Module catalog has no object literal")]
    MissingModuleBody,
    /// Node kind outside the JSON grammar
    #[error("Unexpected `{kind}` node at offset {offset}")]
    UnexpectedNode { kind: String, offset: usize },
    /// A string literal could not be decoded
    #[error("Invalid string literal at offset {offset}: {source}")]
    InvalidString { offset: usize, source: serde_json::Error },
}

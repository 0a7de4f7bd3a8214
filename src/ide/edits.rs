//! Planned text edits and their conversion to a workspace edit.

use std::collections::HashMap;

use tower_lsp::lsp_types::{
    TextEdit,
    Url,
    WorkspaceEdit,
};

use crate::types::SourceRange;

/// A text replacement in one document, computed but not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEdit {
    pub uri: String,
    pub range: SourceRange,
    pub new_text: String,
}

impl PlannedEdit {
    #[must_use]
    pub fn new(uri: impl Into<String>, range: SourceRange, new_text: impl Into<String>) -> Self {
        Self { uri: uri.into(), range, new_text: new_text.into() }
    }
}

/// Groups edits per document, keeping their relative order.
///
/// Edits whose URI cannot be parsed are dropped with a warning.
#[must_use]
pub fn into_workspace_edit(edits: Vec<PlannedEdit>) -> WorkspaceEdit {
    let mut changes: HashMap<Url, Vec<TextEdit>> = HashMap::new();
    for edit in edits {
        let Ok(uri) = Url::parse(&edit.uri) else {
            tracing::warn!(uri = %edit.uri, "Dropping edit for unparsable URI");
            continue;
        };
        changes
            .entry(uri)
            .or_default()
            .push(TextEdit { range: edit.range.into(), new_text: edit.new_text });
    }
    WorkspaceEdit { changes: Some(changes), ..Default::default() }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::types::SourcePosition;

    #[googletest::test]
    fn test_into_workspace_edit_groups_by_document() {
        let range = SourceRange::new(SourcePosition::new(0, 1), SourcePosition::new(0, 2));
        let edits = vec![
            PlannedEdit::new("file:///a.hbs", range, "x"),
            PlannedEdit::new("file:///b.json", range, ""),
            PlannedEdit::new("file:///a.hbs", range, "y"),
            PlannedEdit::new("not a uri", range, "z"),
        ];

        let changes = into_workspace_edit(edits).changes.unwrap();

        expect_that!(changes, len(eq(2)));
        let a_edits: Vec<&str> = changes[&Url::parse("file:///a.hbs").unwrap()]
            .iter()
            .map(|edit| edit.new_text.as_str())
            .collect();
        expect_that!(a_edits, elements_are![eq(&"x"), eq(&"y")]);
    }
}

//! Core types used throughout the project.

use tower_lsp::lsp_types;

/// A range in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceRange {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl From<lsp_types::Range> for SourceRange {
    fn from(range: lsp_types::Range) -> Self {
        Self { start: range.start.into(), end: range.end.into() }
    }
}

impl From<SourceRange> for lsp_types::Range {
    fn from(range: SourceRange) -> Self {
        Self { start: range.start.into(), end: range.end.into() }
    }
}

/// A position in source code (0-indexed, UTF-16 columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourcePosition {
    pub line: u32,
    pub character: u32,
}

impl SourcePosition {
    #[must_use]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl From<lsp_types::Position> for SourcePosition {
    fn from(position: lsp_types::Position) -> Self {
        Self { line: position.line, character: position.character }
    }
}

impl From<SourcePosition> for lsp_types::Position {
    fn from(position: SourcePosition) -> Self {
        Self { line: position.line, character: position.character }
    }
}

impl SourceRange {
    #[must_use]
    pub const fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }
}

/// A byte span inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextSpan {
    pub offset: usize,
    pub length: usize,
}

impl TextSpan {
    #[must_use]
    pub const fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Span covering `start..end`. An inverted pair yields an empty span at `start`.
    #[must_use]
    pub const fn between(start: usize, end: usize) -> Self {
        Self { offset: start, length: end.saturating_sub(start) }
    }

    #[must_use]
    pub const fn end(self) -> usize {
        self.offset + self.length
    }

    /// Inclusive on both ends, so a cursor right after the span still hits it.
    #[must_use]
    pub const fn contains(self, offset: usize) -> bool {
        offset >= self.offset && offset <= self.end()
    }

    #[must_use]
    pub const fn shifted(self, delta: usize) -> Self {
        Self { offset: self.offset + delta, length: self.length }
    }
}

/// Maps byte offsets of a text to LSP positions and back.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    /// The indexed text.
    text: &'a str,
    /// Byte offset of the first character of every line.
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(index, _)| index + 1));
        Self { text, line_starts }
    }

    /// Position of a byte offset. Offsets past the end clamp to the end of the text.
    #[must_use]
    pub fn position(&self, offset: usize) -> SourcePosition {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset).saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or_default();
        let character =
            self.text.get(line_start..offset).map_or(0, |prefix| prefix.encode_utf16().count());

        SourcePosition {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            character: u32::try_from(character).unwrap_or(u32::MAX),
        }
    }

    /// Byte offset of a position. Columns past the end of a line clamp to the line end.
    #[must_use]
    pub fn offset(&self, position: SourcePosition) -> Option<usize> {
        let line = usize::try_from(position.line).ok()?;
        let line_start = *self.line_starts.get(line)?;
        let line_end = self.line_starts.get(line + 1).copied().unwrap_or(self.text.len());
        let line_text = self.text.get(line_start..line_end)?;
        let content = line_text.strip_suffix('\n').unwrap_or(line_text);
        let content = content.strip_suffix('\r').unwrap_or(content);

        let target = usize::try_from(position.character).ok()?;
        let mut column = 0;
        for (index, ch) in content.char_indices() {
            if column >= target {
                return Some(line_start + index);
            }
            column += ch.len_utf16();
        }
        Some(line_start + content.len())
    }

    #[must_use]
    pub fn range(&self, span: TextSpan) -> SourceRange {
        SourceRange { start: self.position(span.offset), end: self.position(span.end()) }
    }
}

//! Byte-offset ranges and line/column conversion.

pub use text_size::{TextRange, TextSize};

use super::position::{Position, Span};

/// A 0-indexed line/column pair. Columns count chars, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl From<LineCol> for Position {
    fn from(lc: LineCol) -> Self {
        Position::new(lc.line, lc.col)
    }
}

/// Maps byte offsets to line/column positions and back.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<TextSize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(i, _)| TextSize::from(i as u32 + 1)),
        );
        Self { text, line_starts }
    }

    /// Number of lines in the text (an empty text has one line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line/column of a byte offset. Offsets past the end clamp to the end.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(TextSize::of(self.text));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = usize::from(self.line_starts[line]);
        let end = usize::from(offset);
        let col = self
            .text
            .get(start..end)
            .map(|s| s.chars().count())
            .unwrap_or(end - start);
        LineCol {
            line: line as u32,
            col: col as u32,
        }
    }

    /// Line/column span of a byte range.
    pub fn span(&self, range: TextRange) -> Span {
        Span::new(
            self.line_col(range.start()).into(),
            self.line_col(range.end()).into(),
        )
    }

    /// Byte offset of a line/column position, if it lies within the text.
    pub fn offset(&self, position: Position) -> Option<TextSize> {
        let start = *self.line_starts.get(position.line as usize)?;
        let line_end = self
            .line_starts
            .get(position.line as usize + 1)
            .copied()
            .unwrap_or_else(|| TextSize::of(self.text));
        let line_text = &self.text[usize::from(start)..usize::from(line_end)];

        let mut chars = 0u32;
        for (byte, _) in line_text.char_indices() {
            if chars == position.column {
                return Some(start + TextSize::from(byte as u32));
            }
            chars += 1;
        }
        (chars == position.column).then(|| start + TextSize::of(line_text))
    }
}

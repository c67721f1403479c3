//! Byte offsets and their conversion to line/column coordinates.

pub use text_size::{TextRange, TextSize};

use super::constants::TAB_WIDTH;
use super::position::Position;

/// A zero-based line and column pair.
///
/// The column counts characters, with tabs advancing to the next tab stop,
/// so that it can be compared against indentation levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    /// Convert to a 1-based [`Position`].
    pub fn to_position(self) -> Position {
        Position::new(self.line as usize + 1, self.col as usize + 1)
    }
}

/// Maps byte offsets of one source text to line/column coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    text: String,
    /// Byte offset of the first character of every line.
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        // `\n`, `\r\n` and a lone `\r` all end a line, as in the lexer
        let bytes = text.as_bytes();
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, &byte) in bytes.iter().enumerate() {
            let ends_line = match byte {
                b'\n' => true,
                b'\r' => bytes.get(offset + 1) != Some(&b'\n'),
                _ => false,
            };
            if ends_line {
                line_starts.push(TextSize::new(offset as u32 + 1));
            }
        }
        Self {
            text: text.to_string(),
            line_starts,
        }
    }

    /// Convert a byte offset to a zero-based line/column pair.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(TextSize::of(self.text.as_str()));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = usize::from(self.line_starts[line]);
        let end = usize::from(offset);
        let col = self.text[start..end].chars().fold(0usize, |col, c| {
            if c == '\t' {
                (col / TAB_WIDTH + 1) * TAB_WIDTH
            } else {
                col + 1
            }
        });
        LineCol {
            line: line as u32,
            col: col as u32,
        }
    }

    /// Convert a byte offset to a 1-based [`Position`].
    pub fn position(&self, offset: TextSize) -> Position {
        self.line_col(offset).to_position()
    }
}

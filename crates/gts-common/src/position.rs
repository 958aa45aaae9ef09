//! Position and location utilities.
//!
//! The AST stores byte offsets; errors and source maps need line/column
//! positions. `LineMap` converts between the two.

use serde::{Deserialize, Serialize};

/// A line/column position. `line` is 1-based, `column` is a 0-based byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// A start/end pair of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

impl SourceLocation {
    pub fn new(start: Position, end: Position) -> Self {
        SourceLocation { start, end }
    }
}

/// Line map for efficient offset <-> position conversion.
/// Stores the starting offset of each line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMap {
    /// Starting offset of each line (line_starts[0] is always 0)
    line_starts: Vec<u32>,
    len: u32,
}

impl LineMap {
    /// Build a line map from text. Only `\n` terminates a line, matching how
    /// source map consumers split generated code.
    pub fn build(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| (i + 1) as u32));
        LineMap {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Zero-based line and byte column of `offset`.
    pub fn line_and_column(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        (line as u32, offset - line_start)
    }

    /// Convert a byte offset to a `Position` (1-based line).
    pub fn offset_to_position(&self, offset: u32) -> Position {
        let (line, column) = self.line_and_column(offset);
        Position::new(line + 1, column)
    }

    pub fn location(&self, start: u32, end: u32) -> SourceLocation {
        SourceLocation::new(self.offset_to_position(start), self.offset_to_position(end))
    }

    /// Offset of a zero-based line and column, if the line exists.
    pub fn offset_of(&self, line: u32, column: u32) -> Option<u32> {
        let start = *self.line_starts.get(line as usize)?;
        Some(start + column)
    }

    /// Get the number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the starting offset of a zero-based line.
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }

    /// Offset of the end of a zero-based line, excluding its `\n`.
    pub fn line_end(&self, line: usize) -> Option<u32> {
        let start = self.line_start(line)?;
        Some(match self.line_starts.get(line + 1) {
            Some(next) => (*next - 1).max(start),
            None => self.len,
        })
    }

    /// True if a line break occurs in `[start, end)`.
    pub fn has_line_break_between(&self, start: u32, end: u32) -> bool {
        self.line_and_column(start).0 != self.line_and_column(end).0
    }
}

#[cfg(test)]
mod position_tests {
    use super::*;

    #[test]
    fn test_line_map_simple() {
        let source = "line1\nline2\nline3";
        let map = LineMap::build(source);

        assert_eq!(map.line_count(), 3);
        assert_eq!(map.offset_to_position(0), Position::new(1, 0));
        assert_eq!(map.offset_to_position(4), Position::new(1, 4));
        assert_eq!(map.offset_to_position(6), Position::new(2, 0));
        assert_eq!(map.offset_to_position(12), Position::new(3, 0));
    }

    #[test]
    fn test_line_end_excludes_newline() {
        let map = LineMap::build("ab\n\ncd");
        assert_eq!(map.line_end(0), Some(2));
        assert_eq!(map.line_end(1), Some(3));
        assert_eq!(map.line_end(2), Some(6));
        assert_eq!(map.line_end(3), None);
    }

    #[test]
    fn test_offset_of_round_trip() {
        let source = "const x = 1;\nlet y = 2;";
        let map = LineMap::build(source);
        let (line, column) = map.line_and_column(17);
        assert_eq!((line, column), (1, 4));
        assert_eq!(map.offset_of(line, column), Some(17));
        assert!(map.has_line_break_between(3, 15));
        assert!(!map.has_line_break_between(0, 11));
    }
}

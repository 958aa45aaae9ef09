//! LSP positions.
//!
//! Transpile errors carry 1-based lines; LSP wants 0-based lines.

use gts_common::SourceLocation;
use serde::{Deserialize, Serialize};

/// A position in a document (0-indexed line and character).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed byte column
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }

    /// From a 1-based line and 0-based column.
    pub fn from_one_based(position: gts_common::Position) -> Self {
        Position::new(position.line.saturating_sub(1), position.column)
    }
}

/// A range in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }
}

impl From<SourceLocation> for Range {
    fn from(location: SourceLocation) -> Self {
        Range::new(
            Position::from_one_based(location.start),
            Position::from_one_based(location.end),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_location_lines_become_zero_based() {
        let location = SourceLocation::new(
            gts_common::Position::new(3, 4),
            gts_common::Position::new(3, 9),
        );
        let range = Range::from(location);
        assert_eq!(range.start, Position::new(2, 4));
        assert_eq!(range.end, Position::new(2, 9));
    }

    #[test]
    fn line_zero_saturates() {
        let position = Position::from_one_based(gts_common::Position::new(0, 2));
        assert_eq!(position, Position::new(0, 2));
    }
}

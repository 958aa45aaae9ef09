//! Comment ranges.
//!
//! Comments are not part of the AST. The scanner records every comment it
//! skips as a `CommentRange`; loose parsing later attaches them to nodes.

use serde::{Deserialize, Serialize};

/// A range representing a comment in the source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRange {
    /// Start position (byte offset)
    pub pos: u32,
    /// End position (byte offset)
    pub end: u32,
    /// Whether this is a `/* */` comment
    pub is_multi_line: bool,
    /// Whether this comment has a trailing newline
    pub has_trailing_new_line: bool,
}

impl CommentRange {
    pub fn new(pos: u32, end: u32, is_multi_line: bool, has_trailing_new_line: bool) -> Self {
        CommentRange {
            pos,
            end,
            is_multi_line,
            has_trailing_new_line,
        }
    }

    /// Get the comment text (delimiters included) from source.
    pub fn get_text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.pos as usize..self.end as usize).unwrap_or("")
    }

    /// Comment body without its `//` or `/* */` delimiters.
    pub fn value<'a>(&self, source: &'a str) -> &'a str {
        let text = self.get_text(source);
        if self.is_multi_line {
            let body = text.strip_prefix("/*").unwrap_or(text);
            body.strip_suffix("*/").unwrap_or(body)
        } else {
            text.strip_prefix("//").unwrap_or(text)
        }
    }
}

/// Remove the common indentation of continuation lines in a block comment,
/// so a comment re-emitted at a different nesting depth keeps its shape.
pub fn strip_block_comment_indent(value: &str) -> String {
    if !value.contains('\n') {
        return value.to_string();
    }
    let mut lines = value.split('\n');
    let first = lines.next().unwrap_or("");
    let rest: Vec<&str> = lines.collect();
    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    let mut out = String::from(first);
    for line in rest {
        out.push('\n');
        out.push_str(line.get(indent.min(line.len())..).unwrap_or(""));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_strips_delimiters() {
        let source = "// hi\n/* there */";
        let line = CommentRange::new(0, 5, false, true);
        let block = CommentRange::new(6, 17, true, false);
        assert_eq!(line.value(source), " hi");
        assert_eq!(block.value(source), " there ");
    }

    #[test]
    fn strip_indent_keeps_relative_shape() {
        let value = "*\n     * a\n     *   b\n     ";
        assert_eq!(strip_block_comment_indent(value), "*\n* a\n*   b\n");
    }
}

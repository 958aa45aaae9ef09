//! Re-emission of comments attached by loose parsing.

use super::Printer;
use gts_common::CommentRange;
use gts_parser::NodeIndex;

/// Where a comment is printed, which decides how it is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// Own line; line comments stay line comments.
    Statement,
    /// Inside an expression; line comments become block comments.
    Inline,
}

impl<'a> Printer<'a> {
    fn comment_source(&self) -> Option<&'a str> {
        if !self.options.comments {
            return None;
        }
        self.source_text
    }

    /// A comment as a `/* */` block, whatever its source form.
    fn block_form(comment: &CommentRange, source: &str) -> String {
        if comment.is_multi_line {
            comment.get_text(source).to_string()
        } else {
            format!("/*{}*/", comment.value(source).replace("*/", "* /"))
        }
    }

    pub(super) fn emit_leading_comments(&mut self, idx: NodeIndex, style: CommentStyle) {
        let Some(source) = self.comment_source() else {
            return;
        };
        let arena = self.arena;
        let Some(comments) = arena.comments(idx) else {
            return;
        };
        for comment in &comments.leading {
            match style {
                CommentStyle::Statement => {
                    self.write_raw(comment.get_text(source));
                    if !comment.is_multi_line || comment.has_trailing_new_line {
                        self.write_line();
                    } else {
                        self.write_space();
                    }
                }
                CommentStyle::Inline => {
                    self.write_raw(&Self::block_form(comment, source));
                    self.write_space();
                }
            }
        }
    }

    pub(super) fn emit_trailing_comments(&mut self, idx: NodeIndex, style: CommentStyle) {
        let Some(source) = self.comment_source() else {
            return;
        };
        let arena = self.arena;
        let Some(comments) = arena.comments(idx) else {
            return;
        };
        for comment in &comments.trailing {
            self.write_space();
            match style {
                CommentStyle::Statement => {
                    self.write_raw(comment.get_text(source));
                    if !comment.is_multi_line {
                        self.write_line();
                    }
                }
                CommentStyle::Inline => self.write_raw(&Self::block_form(comment, source)),
            }
        }
    }

    /// Comments that sat between a function's signature and its body.
    pub(super) fn emit_dangling_comments(&mut self, idx: NodeIndex) {
        let Some(source) = self.comment_source() else {
            return;
        };
        let arena = self.arena;
        let Some(comments) = arena.comments(idx) else {
            return;
        };
        for comment in &comments.dangling {
            self.write_space();
            self.write_raw(&Self::block_form(comment, source));
        }
    }

    /// Comments inside an empty block, one per line. Returns whether any
    /// were written.
    pub(super) fn emit_inner_comments(&mut self, idx: NodeIndex) -> bool {
        let Some(source) = self.comment_source() else {
            return false;
        };
        let arena = self.arena;
        let Some(comments) = arena.comments(idx) else {
            return false;
        };
        if comments.inner.is_empty() {
            return false;
        }
        for comment in &comments.inner {
            self.ensure_line_break();
            self.write_raw(comment.get_text(source));
        }
        true
    }
}

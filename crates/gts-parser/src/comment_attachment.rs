//! Attach scanned comments to AST nodes after a loose parse.
//!
//! One pre-order pass over the tree consumes the comment queue in source
//! order. Comments before a node become its leading comments; after the
//! node's children are visited, comments that follow it are claimed as
//! trailing comments according to the sibling list the node sits in.

use crate::parser::base::NodeIndex;
use crate::parser::node::NodeData;
use crate::parser::node_arena::NodeArena;
use gts_common::{CommentRange, LineMap};
use std::collections::VecDeque;
use tracing::trace;

/// Which sibling list of the parent a node is considered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Statements,
    SwitchCases,
    Elements,
    Parameters,
    Arguments,
}

struct SiblingList {
    kind: ListKind,
    nodes: Vec<NodeIndex>,
    /// Position of the node in `nodes`; `None` when the node is another
    /// child of the same parent.
    index: Option<usize>,
}

impl SiblingList {
    fn is_last(&self) -> bool {
        match self.index {
            Some(index) => index + 1 == self.nodes.len(),
            // An unlisted child counts as last only when the list is empty.
            None => self.nodes.is_empty(),
        }
    }

    /// The sibling after the node; for an unlisted child, the list's first entry.
    fn next_sibling(&self) -> Option<NodeIndex> {
        let next = self.index.map_or(0, |index| index + 1);
        self.nodes.get(next).copied()
    }
}

pub fn attach_comments(
    arena: &mut NodeArena,
    root: NodeIndex,
    source: &str,
    comments: Vec<CommentRange>,
) {
    if comments.is_empty() {
        return;
    }
    trace!(count = comments.len(), "attaching comments");
    let mut attacher = CommentAttacher {
        source,
        line_map: LineMap::build(source),
        queue: comments.into(),
    };
    attacher.visit(arena, root, None);
}

struct CommentAttacher<'a> {
    source: &'a str,
    line_map: LineMap,
    queue: VecDeque<CommentRange>,
}

impl CommentAttacher<'_> {
    fn line_of(&self, offset: u32) -> u32 {
        self.line_map.line_and_column(offset).0
    }

    fn slice(&self, start: u32, end: u32) -> &str {
        if start >= end {
            return "";
        }
        self.source.get(start as usize..end as usize).unwrap_or("")
    }

    fn visit(&mut self, arena: &mut NodeArena, node: NodeIndex, parent: Option<NodeIndex>) {
        let Some((pos, end)) = arena.get(node).map(|n| (n.pos, n.end)) else {
            return;
        };

        let is_function_body = parent.is_some_and(|parent| {
            matches!(arena.data(node), Some(NodeData::Block(_)))
                && arena
                    .data(parent)
                    .and_then(NodeData::function_data)
                    .is_some_and(|function| function.body == node)
        });
        while let Some(comment) = self.queue.front()
            && comment.pos < pos
        {
            let Some(comment) = self.queue.pop_front() else {
                break;
            };
            match parent {
                Some(parent) if is_function_body => {
                    arena.comments_mut(parent).dangling.push(comment);
                }
                _ => arena.comments_mut(node).leading.push(comment),
            }
        }

        for child in arena.children(node) {
            self.visit(arena, child, Some(node));
        }

        if self.queue.is_empty() {
            return;
        }

        if let Some(NodeData::Block(block)) = arena.data(node)
            && block.statements.is_empty()
        {
            let mut inner = Vec::new();
            while let Some(comment) = self.queue.front()
                && comment.pos < end
                && comment.end < end
            {
                if let Some(comment) = self.queue.pop_front() {
                    inner.push(comment);
                }
            }
            if !inner.is_empty() {
                arena.comments_mut(node).inner.extend(inner);
                return;
            }
        }

        let Some(parent) = parent else {
            return;
        };
        let Some(parent_end) = arena.get(parent).map(|n| n.end) else {
            return;
        };
        if end == parent_end {
            return;
        }
        self.attach_trailing(arena, node, end, parent, parent_end);
    }

    fn attach_trailing(
        &mut self,
        arena: &mut NodeArena,
        node: NodeIndex,
        end: u32,
        parent: NodeIndex,
        parent_end: u32,
    ) {
        let Some(first) = self.queue.front().cloned() else {
            return;
        };
        let siblings = sibling_list(arena, parent, node);
        let is_last = siblings.as_ref().is_some_and(SiblingList::is_last);
        let kind = siblings.as_ref().map(|s| s.kind);

        if is_last {
            if matches!(kind, Some(ListKind::Parameters | ListKind::Arguments)) {
                while let Some(comment) = self.queue.front() {
                    if comment.pos >= parent_end {
                        break;
                    }
                    if next_non_whitespace(self.source, comment.end) != Some(')') {
                        break;
                    }
                    if let Some(comment) = self.queue.pop_front() {
                        arena.comments_mut(node).trailing.push(comment);
                    }
                }
            } else {
                while let Some(comment) = self.queue.front() {
                    if comment.pos >= parent_end {
                        break;
                    }
                    if let Some(comment) = self.queue.pop_front() {
                        arena.comments_mut(node).trailing.push(comment);
                    }
                }
            }
            return;
        }

        if end > first.pos {
            return;
        }

        let slice = self.slice(end, first.pos);
        let only_simple_whitespace = slice.chars().all(|c| matches!(c, ',' | ')' | ' ' | '\t'));
        let only_whitespace = slice.chars().all(char::is_whitespace);
        let blank_line = has_blank_line(slice);
        let node_end_line = self.line_of(end);
        let comment_start_line = self.line_of(first.pos);
        let is_immediate_next_line = comment_start_line == node_end_line + 1;

        if kind == Some(ListKind::SwitchCases) {
            if node_end_line == comment_start_line {
                self.claim_single_trailing(arena, node);
            }
            return;
        }

        if only_simple_whitespace || (only_whitespace && !blank_line && is_immediate_next_line)
        {
            // A block comment ending on the line its next sibling starts is
            // left for that sibling, e.g. `/** @type {T} */ (a) = 5;`.
            if first.is_multi_line
                && let Some(next) = siblings.as_ref().and_then(SiblingList::next_sibling)
                && let Some(next_pos) = arena.get(next).map(|n| n.pos)
                && self.line_of(first.end) == self.line_of(next_pos)
            {
                return;
            }
            if kind == Some(ListKind::Parameters) {
                if node_end_line == comment_start_line {
                    self.claim_single_trailing(arena, node);
                }
            } else {
                self.claim_single_trailing(arena, node);
            }
        } else if blank_line && only_whitespace && let Some(siblings) = siblings {
            let is_statement_context = matches!(
                arena.data(parent),
                Some(NodeData::Block(_) | NodeData::SourceFile(_))
            );
            if !is_statement_context {
                return;
            }
            let Some(next) = siblings.next_sibling() else {
                return;
            };
            let Some(next_pos) = arena.get(next).map(|n| n.pos) else {
                return;
            };

            let mut last_index = 0;
            let mut last_end = first.end;
            while let (Some(current), Some(following)) =
                (self.queue.get(last_index), self.queue.get(last_index + 1))
            {
                if has_blank_line(self.slice(current.end, following.pos)) {
                    break;
                }
                last_index += 1;
                last_end = following.end;
            }

            if has_blank_line(self.slice(last_end, next_pos)) {
                for _ in 0..=last_index {
                    if let Some(comment) = self.queue.pop_front() {
                        arena.comments_mut(node).trailing.push(comment);
                    }
                }
            }
        }
    }

    /// Replace the node's trailing comments with the next queued comment.
    fn claim_single_trailing(&mut self, arena: &mut NodeArena, node: NodeIndex) {
        if let Some(comment) = self.queue.pop_front() {
            arena.comments_mut(node).trailing = vec![comment];
        }
    }
}

fn sibling_list(arena: &NodeArena, parent: NodeIndex, node: NodeIndex) -> Option<SiblingList> {
    let data = arena.data(parent)?;
    let (kind, nodes): (ListKind, Vec<NodeIndex>) = match data {
        NodeData::Block(block) | NodeData::SourceFile(block) => {
            (ListKind::Statements, block.statements.nodes.clone())
        }
        NodeData::ClassDeclaration(class) | NodeData::ClassExpression(class) => {
            // Only members are compared against each other; the class name
            // and heritage clauses have no sibling list.
            if !class.members.nodes.contains(&node) {
                return None;
            }
            (ListKind::Statements, class.members.nodes.clone())
        }
        NodeData::SwitchStatement(switch) => (ListKind::SwitchCases, switch.cases.nodes.clone()),
        NodeData::CaseClause(clause) => (ListKind::Statements, clause.statements.nodes.clone()),
        NodeData::ArrayLiteralExpression(array) => {
            (ListKind::Elements, array.elements.nodes.clone())
        }
        NodeData::ObjectLiteralExpression(object) => {
            (ListKind::Elements, object.properties.nodes.clone())
        }
        NodeData::CallExpression(call) => (ListKind::Arguments, call.arguments.nodes.clone()),
        NodeData::NewExpression(new) => (
            ListKind::Arguments,
            new.arguments
                .as_ref()
                .map(|list| list.nodes.clone())
                .unwrap_or_default(),
        ),
        other => {
            let function = other.function_data()?;
            (ListKind::Parameters, function.parameters.nodes.clone())
        }
    };
    let index = nodes.iter().position(|&n| n == node);
    Some(SiblingList { kind, nodes, index })
}

fn next_non_whitespace(source: &str, from: u32) -> Option<char> {
    source
        .get(from as usize..)?
        .chars()
        .find(|c| !matches!(c, ' ' | '\t' | '\n' | '\r'))
}

/// `\n\s*\n`
fn has_blank_line(text: &str) -> bool {
    let mut seen_newline = false;
    for c in text.chars() {
        if c == '\n' {
            if seen_newline {
                return true;
            }
            seen_newline = true;
        } else if !c.is_whitespace() {
            seen_newline = false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_detection() {
        assert!(has_blank_line("a\n\nb"));
        assert!(has_blank_line("\n  \t\n"));
        assert!(!has_blank_line("a\nb\n"));
        assert!(!has_blank_line("\n x \n"));
    }

    #[test]
    fn next_non_whitespace_skips_line_breaks() {
        assert_eq!(next_non_whitespace("a /* c */\n  )", 9), Some(')'));
        assert_eq!(next_non_whitespace("  ", 0), None);
    }
}

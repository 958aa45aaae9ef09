//! Tree-rewriting traversal shared by the lowering passes.
//!
//! A pass implements `visit` for the node kinds it rewrites and falls back to
//! `visit_children` for everything else. Rewrites never touch an existing
//! node: a node whose children changed is re-derived (keeping its source
//! range and comments) and untouched subtrees are shared with the input tree.

use gts_common::Result;
use gts_parser::parser::node::NodeData;
use gts_parser::{NodeArena, NodeIndex, NodeList};

pub trait Transform {
    fn arena(&mut self) -> &mut NodeArena;

    /// Rewrite `idx`, returning the index of its replacement (or `idx` itself).
    fn visit(&mut self, idx: NodeIndex) -> Result<NodeIndex>;

    /// Visit every child of `idx`; a new node is derived only when a child
    /// was replaced.
    fn visit_children(&mut self, idx: NodeIndex) -> Result<NodeIndex> {
        let Some(data) = self.arena().data(idx).cloned() else {
            return Ok(idx);
        };
        self.rebuild(idx, data, false)
    }

    /// Visit the children of `data`, an edited copy of `idx`'s payload, and
    /// derive a node from it if anything differs from `idx`.
    fn rebuild(&mut self, idx: NodeIndex, mut data: NodeData, mut changed: bool) -> Result<NodeIndex> {
        let mut error = None;
        data.for_each_child_mut(&mut |child| {
            if error.is_some() || child.is_none() {
                return;
            }
            match self.visit(*child) {
                Ok(replacement) => {
                    if replacement != *child {
                        *child = replacement;
                        changed = true;
                    }
                }
                Err(err) => error = Some(err),
            }
        });
        if let Some(err) = error {
            return Err(err);
        }
        Ok(if changed {
            self.arena().derive(idx, data)
        } else {
            idx
        })
    }

    fn visit_list(&mut self, list: &NodeList) -> Result<NodeList> {
        list.iter().map(|idx| self.visit(idx)).collect()
    }
}

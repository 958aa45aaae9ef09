//! Node arena for AST storage.

use super::base::{NodeIndex, NodeList};
use super::node::{IdentifierData, LiteralData, Node, NodeData, NodeFlags};
use gts_common::CommentRange;
use rustc_hash::FxHashMap;

/// Comments attached to a node by loose parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeComments {
    pub leading: Vec<CommentRange>,
    pub trailing: Vec<CommentRange>,
    /// Comments inside an otherwise empty block.
    pub inner: Vec<CommentRange>,
    /// Comments before a function body, owned by the function.
    pub dangling: Vec<CommentRange>,
}

impl NodeComments {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty()
            && self.trailing.is_empty()
            && self.inner.is_empty()
            && self.dangling.is_empty()
    }
}

/// Arena-based storage for AST nodes.
/// Nodes are stored contiguously and referenced by index. Passes never mutate
/// a node in place; they add rewritten nodes and return new indices, so an
/// unchanged subtree is shared between the input and output trees.
#[derive(Debug, Default, Clone)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    comments: FxHashMap<NodeIndex, NodeComments>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            comments: FxHashMap::default(),
        }
    }

    /// Add a node to the arena and return its index
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        NodeIndex(index)
    }

    /// Add a node spanning `[pos, end)` of the source.
    pub fn add_node(&mut self, pos: u32, end: u32, data: NodeData) -> NodeIndex {
        self.add(Node {
            pos,
            end,
            flags: NodeFlags::empty(),
            data,
        })
    }

    /// Add a node with no source position.
    pub fn add_synthetic(&mut self, data: NodeData) -> NodeIndex {
        self.add(Node {
            pos: 0,
            end: 0,
            flags: NodeFlags::SYNTHESIZED,
            data,
        })
    }

    /// Add a node that reuses the source range of `origin`.
    pub fn add_at(&mut self, origin: NodeIndex, data: NodeData) -> NodeIndex {
        match self.get(origin) {
            Some(node) if !node.is_synthesized() => {
                let (pos, end) = (node.pos, node.end);
                self.add_node(pos, end, data)
            }
            _ => self.add_synthetic(data),
        }
    }

    /// Add a copy of `origin` with new data; range, flags and comments carry over.
    pub fn derive(&mut self, origin: NodeIndex, data: NodeData) -> NodeIndex {
        let Some(node) = self.get(origin) else {
            return self.add_synthetic(data);
        };
        let (pos, end, flags) = (node.pos, node.end, node.flags);
        let index = self.add(Node {
            pos,
            end,
            flags,
            data,
        });
        if let Some(comments) = self.comments.get(&origin).cloned() {
            self.comments.insert(index, comments);
        }
        index
    }

    /// Get a node by index
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a mutable node by index
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    pub fn data(&self, index: NodeIndex) -> Option<&NodeData> {
        self.get(index).map(|n| &n.data)
    }

    pub fn kind_name(&self, index: NodeIndex) -> Option<&'static str> {
        self.get(index).map(|n| n.kind_name())
    }

    /// Get the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop nodes added after a speculative parse failed.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        self.data(index)?.identifier_text()
    }

    pub fn string_literal_value(&self, index: NodeIndex) -> Option<&str> {
        match self.data(index)? {
            NodeData::StringLiteral(lit) => Some(&lit.value),
            _ => None,
        }
    }

    pub fn is_dummy(&self, index: NodeIndex) -> bool {
        self.get(index).is_some_and(|n| n.is_dummy())
    }

    pub fn create_identifier(&mut self, text: &str) -> NodeIndex {
        self.add_synthetic(NodeData::Identifier(IdentifierData {
            text: text.to_string(),
        }))
    }

    pub fn create_string_literal(&mut self, value: &str) -> NodeIndex {
        self.add_synthetic(NodeData::StringLiteral(LiteralData {
            value: value.to_string(),
            raw: None,
        }))
    }

    pub fn comments(&self, index: NodeIndex) -> Option<&NodeComments> {
        self.comments.get(&index).filter(|c| !c.is_empty())
    }

    pub fn comments_mut(&mut self, index: NodeIndex) -> &mut NodeComments {
        self.comments.entry(index).or_default()
    }

    pub fn has_comments(&self) -> bool {
        self.comments.values().any(|c| !c.is_empty())
    }

    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.data(index).map(NodeData::children).unwrap_or_default()
    }

    /// Pre-order walk of the subtree rooted at `root`.
    pub fn walk(&self, root: NodeIndex, f: &mut dyn FnMut(NodeIndex, &Node)) {
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            let Some(node) = self.get(index) else {
                continue;
            };
            f(index, node);
            let children = node.data.children();
            stack.extend(children.into_iter().rev());
        }
    }

    /// Indices of the nodes in `list`, skipping absent entries.
    pub fn list_nodes(list: &NodeList) -> impl Iterator<Item = NodeIndex> + '_ {
        list.nodes.iter().copied().filter(|i| i.is_some())
    }
}

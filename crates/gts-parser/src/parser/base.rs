//! Index types for arena-allocated nodes.

/// Index of a node in a `NodeArena`. `NodeIndex::NONE` marks an absent child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

/// An ordered list of child nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    pub fn new() -> Self {
        NodeList { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<NodeIndex> {
        self.nodes.first().copied()
    }

    pub fn last(&self) -> Option<NodeIndex> {
        self.nodes.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.iter().copied()
    }
}

impl From<Vec<NodeIndex>> for NodeList {
    fn from(nodes: Vec<NodeIndex>) -> Self {
        NodeList { nodes }
    }
}

impl FromIterator<NodeIndex> for NodeList {
    fn from_iter<I: IntoIterator<Item = NodeIndex>>(iter: I) -> Self {
        NodeList {
            nodes: iter.into_iter().collect(),
        }
    }
}

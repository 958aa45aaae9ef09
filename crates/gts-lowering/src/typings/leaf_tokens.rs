//! Childless source nodes and the mapping overrides the typings pass records
//! for them.

use gts_parser::{NodeArena, NodeIndex};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// A childless node of the parsed tree. By default it maps its full source
/// range onto the same number of generated characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafToken {
    #[serde(skip)]
    pub node: NodeIndex,
    pub kind: &'static str,
    pub pos: u32,
    pub end: u32,
    /// Overrides `end - pos` as the mapped source length.
    pub source_length: Option<u32>,
    /// Overrides the generated length, e.g. a bare word printed quoted.
    pub generated_length: Option<u32>,
    /// Shift applied to the generated start.
    pub adjustment: i32,
}

impl LeafToken {
    pub fn source_len(&self) -> u32 {
        self.source_length.unwrap_or(self.end - self.pos)
    }

    pub fn generated_len(&self) -> u32 {
        self.generated_length.unwrap_or(self.end - self.pos)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LeafTokens {
    tokens: Vec<LeafToken>,
    by_node: FxHashMap<NodeIndex, usize>,
}

impl LeafTokens {
    /// Collect every non-synthesized childless node under `root`, in source
    /// order. Loose-parse placeholders map zero characters.
    pub fn collect(arena: &NodeArena, root: NodeIndex) -> LeafTokens {
        let mut leaves = LeafTokens::default();
        arena.walk(root, &mut |idx, node| {
            if node.is_synthesized() || node.data.has_children() {
                return;
            }
            let (source_length, generated_length) = if node.is_dummy() {
                (Some(0), Some(0))
            } else {
                (None, None)
            };
            leaves.by_node.insert(idx, leaves.tokens.len());
            leaves.tokens.push(LeafToken {
                node: idx,
                kind: node.kind_name(),
                pos: node.pos,
                end: node.end,
                source_length,
                generated_length,
                adjustment: 0,
            });
        });
        leaves
    }

    pub fn get_mut(&mut self, node: NodeIndex) -> Option<&mut LeafToken> {
        let slot = *self.by_node.get(&node)?;
        self.tokens.get_mut(slot)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn into_vec(self) -> Vec<LeafToken> {
        self.tokens
    }
}

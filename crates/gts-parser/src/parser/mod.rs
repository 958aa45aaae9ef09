//! Recursive-descent parser producing a `NodeArena` tree.

pub mod base;
pub mod identifier_policy;
pub mod node;
pub mod node_arena;
pub mod state;
mod state_expressions;
mod state_gts;
mod state_statements;
mod state_types;

pub use base::{NodeIndex, NodeList};
pub use identifier_policy::{
    DUMMY_PLACEHOLDER, IdentifierPolicy, IdentifierSite, LooseIdentifiers, StrictIdentifiers,
};
pub use node::{Node, NodeData, NodeFlags};
pub use node_arena::{NodeArena, NodeComments};
pub use state::{ParserContext, ParserState};

//! Parser for TypeScript with the GTS `define` extension.
//!
//! Two entry points share one grammar:
//! - [`parse`] rejects any malformed input with the first syntax error.
//! - [`parse_loose`] substitutes zero-width placeholder identifiers where an
//!   identifier is missing (`foo.`, `:` with no name, an empty positional
//!   attribute) and attaches comments to nodes, for editor tooling.

pub mod comment_attachment;
pub mod parser;

pub use parser::{
    DUMMY_PLACEHOLDER, IdentifierPolicy, IdentifierSite, LooseIdentifiers, Node, NodeArena,
    NodeComments, NodeData, NodeFlags, NodeIndex, NodeList, ParserState, StrictIdentifiers,
};

use gts_common::{CommentRange, LineMap, Result};
use tracing::debug_span;

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub arena: NodeArena,
    /// The `SourceFile` node.
    pub root: NodeIndex,
    /// Every comment in the source, in order.
    pub comments: Vec<CommentRange>,
    pub line_map: LineMap,
    pub source: String,
}

impl SyntaxTree {
    pub fn statements(&self) -> Vec<NodeIndex> {
        match self.arena.data(self.root) {
            Some(NodeData::SourceFile(file)) => file.statements.nodes.clone(),
            _ => Vec::new(),
        }
    }
}

/// Strict parse: the first syntax error is returned.
pub fn parse(source: &str) -> Result<SyntaxTree> {
    parse_with_policy(source, Box::new(StrictIdentifiers))
}

/// Error-tolerant parse for tooling: missing identifiers become placeholders
/// and comments are attached to the tree.
pub fn parse_loose(source: &str) -> Result<SyntaxTree> {
    let mut tree = parse_with_policy(source, Box::new(LooseIdentifiers))?;
    let _span = debug_span!("attach_comments").entered();
    comment_attachment::attach_comments(
        &mut tree.arena,
        tree.root,
        &tree.source,
        tree.comments.clone(),
    );
    Ok(tree)
}

pub fn parse_with_policy(source: &str, policy: Box<dyn IdentifierPolicy>) -> Result<SyntaxTree> {
    let _span = debug_span!("parse", len = source.len()).entered();
    let line_map = LineMap::build(source);
    let mut state = ParserState::new(source.to_string(), policy);
    let root = match state.parse_source_file() {
        Ok(root) => root,
        Err(err) => return Err(err.located(&line_map)),
    };
    let comments = state.scanner.take_comments();
    Ok(SyntaxTree {
        arena: state.arena,
        root,
        comments,
        line_map,
        source: source.to_string(),
    })
}

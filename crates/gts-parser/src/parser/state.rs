//! Parser state: token cursor, context flags, speculation and error helpers.
//!
//! The grammar lives in the `state_*` modules as further `impl ParserState`
//! blocks. Every parse method returns `Result`; the first syntax error aborts
//! the parse.

use super::base::NodeIndex;
use super::identifier_policy::{DUMMY_PLACEHOLDER, IdentifierPolicy, IdentifierSite};
use super::node::{IdentifierData, Node, NodeData, NodeFlags};
use super::node_arena::NodeArena;
use bitflags::bitflags;
use gts_common::{GtsError, Result};
use gts_scanner::{ScannerSnapshot, ScannerState, SyntaxKind, token_text};

/// Nesting limit for statements, expressions and types.
pub const MAX_RECURSION_DEPTH: u32 = 256;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ParserContext: u8 {
        /// Inside a shortcut function or direct function body: `:name` and
        /// `query` are legal.
        const SHORTCUT = 1 << 0;
        /// `in` is not a binary operator (for-statement initializers).
        const DISALLOW_IN = 1 << 1;
        /// Inside a generator body: `yield` is an operator.
        const GENERATOR = 1 << 2;
        /// `extends` does not start a conditional type.
        const DISALLOW_CONDITIONAL_TYPES = 1 << 3;
    }
}

/// Everything needed to rewind after a failed speculative parse.
pub(crate) struct ParserSnapshot {
    scanner: ScannerSnapshot,
    arena_len: usize,
    last_token_end: u32,
    depth: u32,
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub arena: NodeArena,
    policy: Box<dyn IdentifierPolicy>,
    pub(crate) context: ParserContext,
    depth: u32,
    /// End of the most recently consumed token.
    last_token_end: u32,
}

impl ParserState {
    pub fn new(source: String, policy: Box<dyn IdentifierPolicy>) -> Self {
        let capacity = source.len() / 4;
        ParserState {
            scanner: ScannerState::new(source),
            arena: NodeArena::with_capacity(capacity),
            policy,
            context: ParserContext::empty(),
            depth: 0,
            last_token_end: 0,
        }
    }

    pub fn source(&self) -> &str {
        self.scanner.text()
    }

    // =========================================================================
    // Token access
    // =========================================================================

    pub(crate) fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.token_pos()
    }

    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end()
    }

    pub(crate) fn last_token_end(&self) -> u32 {
        self.last_token_end
    }

    pub(crate) fn token_value(&self) -> String {
        self.scanner.token_value().to_string()
    }

    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.scanner.token() == kind
    }

    pub(crate) fn is_identifier(&self) -> bool {
        self.is_token(SyntaxKind::Identifier)
    }

    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        self.token().is_identifier_or_keyword()
    }

    /// Is the current token the contextual word `word` (spelled without escapes)?
    pub(crate) fn is_contextual(&self, word: &str) -> bool {
        self.is_identifier() && self.scanner.token_text() == word
    }

    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    /// Advance to the next token. Lexical errors are fatal.
    pub(crate) fn next_token(&mut self) -> Result<()> {
        self.last_token_end = self.scanner.token_end();
        self.scanner.scan();
        self.check_scan_error()
    }

    pub(crate) fn check_scan_error(&self) -> Result<()> {
        match self.scanner.error() {
            Some(err) => Err(GtsError::syntax(err.message.clone(), err.pos, err.end)),
            None => Ok(()),
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> Result<()> {
        if self.is_token(kind) {
            self.next_token()
        } else {
            Err(self.error_at_token(format!("'{}' expected.", token_text(kind))))
        }
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> Result<bool> {
        if self.is_token(kind) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn parse_contextual(&mut self, word: &str) -> Result<bool> {
        if self.is_contextual(word) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn parse_expected_contextual(&mut self, word: &str) -> Result<()> {
        if self.parse_contextual(word)? {
            Ok(())
        } else {
            Err(self.error_at_token(format!("'{word}' expected.")))
        }
    }

    /// Automatic semicolon insertion point: `;`, `}`, end of file, or a line break.
    pub(crate) fn can_insert_semicolon(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) -> Result<()> {
        if self.parse_optional(SyntaxKind::SemicolonToken)? || self.can_insert_semicolon() {
            Ok(())
        } else {
            Err(self.error_at_token("';' expected."))
        }
    }

    // =========================================================================
    // Node construction
    // =========================================================================

    /// Add a node spanning from `pos` to the end of the last consumed token.
    pub(crate) fn finish(&mut self, pos: u32, data: NodeData) -> NodeIndex {
        let end = self.last_token_end.max(pos);
        self.arena.add_node(pos, end, data)
    }

    /// Consume the current token and wrap it in a node.
    pub(crate) fn finish_token(&mut self, data: NodeData) -> Result<NodeIndex> {
        let pos = self.token_pos();
        self.next_token()?;
        Ok(self.finish(pos, data))
    }

    /// A zero-width placeholder identifier at the current token.
    pub(crate) fn create_dummy_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.arena.add(Node {
            pos,
            end: pos,
            flags: NodeFlags::DUMMY,
            data: NodeData::Identifier(IdentifierData {
                text: DUMMY_PLACEHOLDER.to_string(),
            }),
        })
    }

    pub(crate) fn allows_placeholder(&self, site: IdentifierSite) -> bool {
        self.policy.allows_placeholder(site)
    }

    // =========================================================================
    // Context and recursion
    // =========================================================================

    pub(crate) fn in_context(&self, flag: ParserContext) -> bool {
        self.context.contains(flag)
    }

    /// Run `f` with `set` added to and `clear` removed from the context,
    /// restoring the previous context afterwards.
    pub(crate) fn with_context<T>(
        &mut self,
        set: ParserContext,
        clear: ParserContext,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = self.context;
        self.context = (self.context | set) - clear;
        let result = f(self);
        self.context = saved;
        result
    }

    /// Parse inside brackets, where `in` is always an operator.
    pub(crate) fn allow_in<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.with_context(ParserContext::empty(), ParserContext::DISALLOW_IN, f)
    }

    pub(crate) fn guarded<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.depth += 1;
        if self.depth > MAX_RECURSION_DEPTH {
            self.depth -= 1;
            return Err(self.error_at_token("Maximum nesting depth exceeded."));
        }
        let result = f(self);
        self.depth -= 1;
        result
    }

    // =========================================================================
    // Speculation
    // =========================================================================

    pub(crate) fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            scanner: self.scanner.save_state(),
            arena_len: self.arena.len(),
            last_token_end: self.last_token_end,
            depth: self.depth,
        }
    }

    pub(crate) fn rewind(&mut self, snapshot: ParserSnapshot) {
        self.scanner.restore_state(snapshot.scanner);
        self.arena.truncate(snapshot.arena_len);
        self.last_token_end = snapshot.last_token_end;
        self.depth = snapshot.depth;
    }

    /// Run `f` and always rewind. Errors count as `false`.
    pub(crate) fn look_ahead(&mut self, f: impl FnOnce(&mut Self) -> Result<bool>) -> bool {
        let snapshot = self.snapshot();
        let saved_context = self.context;
        let result = f(self).unwrap_or(false);
        self.context = saved_context;
        self.rewind(snapshot);
        result
    }

    /// Run `f`; on error rewind and return `None`.
    pub(crate) fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Option<T> {
        let snapshot = self.snapshot();
        let saved_context = self.context;
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.context = saved_context;
                self.rewind(snapshot);
                None
            }
        }
    }

    /// Peek at the token after the current one.
    pub(crate) fn look_ahead_token(&mut self) -> (SyntaxKind, bool) {
        let snapshot = self.snapshot();
        let result = match self.next_token() {
            Ok(()) => (self.token(), self.has_preceding_line_break()),
            Err(_) => (SyntaxKind::Unknown, false),
        };
        self.rewind(snapshot);
        result
    }

    /// Is the next token on the same line and an identifier or keyword?
    pub(crate) fn next_is_identifier_or_keyword_on_same_line(&mut self) -> bool {
        let (kind, line_break) = self.look_ahead_token();
        !line_break && kind.is_identifier_or_keyword()
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub(crate) fn error_at_token(&self, message: impl Into<String>) -> GtsError {
        let pos = self.token_pos();
        let end = self.token_end().max(pos);
        GtsError::syntax(message, pos, end)
    }

    /// Well-formed syntax used where it has no meaning.
    pub(crate) fn unsupported_at_token(&self, message: impl Into<String>) -> GtsError {
        let pos = self.token_pos();
        let end = self.token_end().max(pos);
        GtsError::unsupported(message, pos, end)
    }

    pub(crate) fn error_unexpected(&self) -> GtsError {
        if self.is_token(SyntaxKind::EndOfFileToken) {
            self.error_at_token("Unexpected end of input.")
        } else {
            self.error_at_token("Unexpected token.")
        }
    }
}

//! Parser state - `define` blocks, shortcut functions and query expressions
//!
//! ```text
//! DefineStatement          : "define" [no LineTerminator here] NamedAttributeDefinition
//! NamedAttributeDefinition : AttributeName AttributeBody AttributeBindingClause? ";"
//! AttributeName            : Identifier | StringLiteral
//! AttributeBody            : PositionalAttributeList? NamedAttributeBlock?
//! AttributeBindingClause   : "as" ("public" | "protected" | "private")? Identifier
//! PositionalAttributeList  : AttributeExpression ("," AttributeExpression)*
//! AttributeExpression      : ":" ShortcutFunction | [lookahead != "{"] PrimaryExpression
//! NamedAttributeBlock      : "{" NamedAttributeDefinition* DirectFunction? "}"
//! DirectFunction           : [lookahead = ":" or reserved word] Statement*
//! ShortcutFunction         : "(" Expression ")" | Block
//! ShortcutArgument         : ":" Identifier
//! QueryExpression          : "query" "*"? UnaryExpression
//! ```

use super::base::{NodeIndex, NodeList};
use super::identifier_policy::IdentifierSite;
use super::node::*;
use super::state::{ParserContext, ParserState};
use gts_common::Result;
use gts_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Define statements
    // =========================================================================

    /// `define` followed on the same line by an attribute name.
    pub(crate) fn is_define_statement(&mut self) -> bool {
        if !self.is_contextual("define") {
            return false;
        }
        let (next, line_break) = self.look_ahead_token();
        !line_break && matches!(next, SyntaxKind::Identifier | SyntaxKind::StringLiteral)
    }

    pub(crate) fn parse_define_statement(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected_contextual("define")?;
        let body = self.parse_named_attribute_definition()?;
        Ok(self.finish(
            start_pos,
            NodeData::GtsDefineStatement(GtsDefineData { body }),
        ))
    }

    fn parse_named_attribute_definition(&mut self) -> Result<NodeIndex> {
        self.guarded(|p| p.parse_named_attribute_definition_worker())
    }

    fn parse_named_attribute_definition_worker(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let name = match self.token() {
            SyntaxKind::StringLiteral => self.parse_string_literal()?,
            SyntaxKind::Identifier => self.parse_identifier()?,
            _ => return Err(self.error_at_token("Expected attribute name")),
        };
        let body = self.parse_attribute_body()?;

        let mut binding_access = None;
        let mut binding_name = NodeIndex::NONE;
        if self.parse_contextual("as")? {
            if self.is_identifier() {
                let word = self.scanner.token_text().to_string();
                if let Some(access) = BindingAccess::from_text(&word) {
                    let (next, _) = self.look_ahead_token();
                    if next == SyntaxKind::Identifier {
                        self.next_token()?;
                        binding_access = Some(access);
                    }
                }
            }
            binding_name = self.parse_identifier()?;
        }
        self.parse_semicolon()?;

        Ok(self.finish(
            start_pos,
            NodeData::GtsNamedAttributeDefinition(GtsNamedAttributeData {
                name,
                body,
                binding_access,
                binding_name,
            }),
        ))
    }

    fn parse_attribute_body(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let positional_attributes = self.parse_positional_attribute_list()?;
        let named_attributes = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_named_attribute_block()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish(
            start_pos,
            NodeData::GtsAttributeBody(GtsAttributeBodyData {
                positional_attributes,
                named_attributes,
            }),
        ))
    }

    /// Comma-separated attribute expressions, ending before `{`, `;`,
    /// an ASI point, or the `as` of a binding clause.
    fn parse_positional_attribute_list(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let mut attributes = Vec::new();
        loop {
            if self.is_token(SyntaxKind::OpenBraceToken)
                || self.can_insert_semicolon()
                || self.is_contextual("as")
            {
                break;
            }
            if !attributes.is_empty() {
                self.parse_expected(SyntaxKind::CommaToken)?;
            }
            attributes.push(self.parse_attribute_expression()?);
        }
        Ok(self.finish(
            start_pos,
            NodeData::GtsPositionalAttributeList(GtsAttributeListData {
                attributes: attributes.into(),
            }),
        ))
    }

    fn parse_attribute_expression(&mut self) -> Result<NodeIndex> {
        match self.token() {
            SyntaxKind::OpenBraceToken => {
                Err(self.error_at_token("Expected attribute expression, got '{'."))
            }
            SyntaxKind::ColonToken => {
                let start_pos = self.token_pos();
                self.next_token()?;
                self.parse_shortcut_function(start_pos)
            }
            _ if self.allows_placeholder(IdentifierSite::PositionalAttribute)
                && (self.is_token(SyntaxKind::CommaToken)
                    || self.can_insert_semicolon()
                    || self.is_contextual("as")) =>
            {
                Ok(self.create_dummy_identifier())
            }
            _ => self.allow_in(|p| p.parse_primary_expression()),
        }
    }

    /// `(expr)` or `{ statements }` after the `:` at `start_pos`.
    fn parse_shortcut_function(&mut self, start_pos: u32) -> Result<NodeIndex> {
        self.with_context(
            ParserContext::SHORTCUT,
            ParserContext::GENERATOR | ParserContext::DISALLOW_IN,
            |p| {
                let (expression, body) = match p.token() {
                    SyntaxKind::OpenParenToken => {
                        p.next_token()?;
                        let body = p.parse_expression()?;
                        p.parse_expected(SyntaxKind::CloseParenToken)?;
                        (true, body)
                    }
                    SyntaxKind::OpenBraceToken => (false, p.parse_block()?),
                    _ => return Err(p.error_at_token("'(' or '{' expected.")),
                };
                Ok(p.finish(
                    start_pos,
                    NodeData::GtsShortcutFunction(GtsShortcutFunctionData { expression, body }),
                ))
            },
        )
    }

    fn parse_named_attribute_block(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut attributes = Vec::new();
        let mut direct_action = NodeIndex::NONE;
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.is_direct_function_start() {
                direct_action = self.parse_direct_function()?;
                break;
            }
            attributes.push(self.parse_named_attribute_definition()?);
        }
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.finish(
            start_pos,
            NodeData::GtsNamedAttributeBlock(GtsNamedBlockData {
                attributes: attributes.into(),
                direct_action,
            }),
        ))
    }

    /// A reserved word (or `let`, `yield`, `await`) or `:` opens a direct function.
    fn is_direct_function_start(&self) -> bool {
        self.token().is_keyword()
            || self.is_token(SyntaxKind::ColonToken)
            || self.is_contextual("let")
            || self.is_contextual("yield")
            || self.is_contextual("await")
    }

    fn parse_direct_function(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let statements = self.with_context(
            ParserContext::SHORTCUT,
            ParserContext::GENERATOR | ParserContext::DISALLOW_IN,
            |p| {
                let mut statements = Vec::new();
                while !p.is_token(SyntaxKind::CloseBraceToken)
                    && !p.is_token(SyntaxKind::EndOfFileToken)
                {
                    if p.is_define_statement() {
                        return Err(p.unsupported_at_token(
                            "DefineStatement is not allowed in direct function.",
                        ));
                    }
                    statements.push(p.parse_statement()?);
                }
                Ok(NodeList::from(statements))
            },
        )?;
        Ok(self.finish(
            start_pos,
            NodeData::GtsDirectFunction(StatementsData { statements }),
        ))
    }

    // =========================================================================
    // Expressions legal inside shortcut bodies
    // =========================================================================

    /// `:name`; the current token is `:`.
    pub(crate) fn parse_shortcut_argument(&mut self) -> Result<NodeIndex> {
        if !self.in_context(ParserContext::SHORTCUT) {
            return Err(self.unsupported_at_token(
                "ShortcutArgumentExpression ':' must be inside ShortcutFunction or DirectShortcutFunction.",
            ));
        }
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::ColonToken)?;
        let property = self.parse_identifier_at(IdentifierSite::ShortcutMember)?;
        Ok(self.finish(
            start_pos,
            NodeData::GtsShortcutArgument(GtsShortcutArgumentData { property }),
        ))
    }

    /// `query expr` or `query* expr`; the current token is `query`.
    pub(crate) fn parse_query_expression(&mut self) -> Result<NodeIndex> {
        if !self.in_context(ParserContext::SHORTCUT) {
            return Err(self.unsupported_at_token(
                "QueryExpression must be inside ShortcutFunction or DirectShortcutFunction.",
            ));
        }
        let start_pos = self.token_pos();
        self.parse_expected_contextual("query")?;
        let star = self.parse_optional(SyntaxKind::AsteriskToken)?;
        let argument = self.guarded(|p| p.parse_unary_expression())?;
        Ok(self.finish(
            start_pos,
            NodeData::GtsQueryExpression(GtsQueryData { star, argument }),
        ))
    }
}

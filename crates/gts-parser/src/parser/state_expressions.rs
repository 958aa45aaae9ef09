//! Parser state - expression parsing methods

use super::base::{NodeIndex, NodeList};
use super::identifier_policy::IdentifierSite;
use super::node::*;
use super::state::{ParserContext, ParserState};
use gts_common::Result;
use gts_scanner::SyntaxKind;

/// Binding power of a binary operator; 0 when `kind` is not one.
pub(crate) fn binary_precedence(kind: SyntaxKind) -> u8 {
    use SyntaxKind::*;
    match kind {
        QuestionQuestionToken => 1,
        BarBarToken => 2,
        AmpersandAmpersandToken => 3,
        BarToken => 4,
        CaretToken => 5,
        AmpersandToken => 6,
        EqualsEqualsToken
        | ExclamationEqualsToken
        | EqualsEqualsEqualsToken
        | ExclamationEqualsEqualsToken => 7,
        LessThanToken
        | GreaterThanToken
        | LessThanEqualsToken
        | GreaterThanEqualsToken
        | InstanceOfKeyword
        | InKeyword => 8,
        LessThanLessThanToken
        | GreaterThanGreaterThanToken
        | GreaterThanGreaterThanGreaterThanToken => 9,
        PlusToken | MinusToken => 10,
        AsteriskToken | SlashToken | PercentToken => 11,
        AsteriskAsteriskToken => 12,
        _ => 0,
    }
}

/// Precedence of `as` and `satisfies`, which sit with the relational operators.
const AS_PRECEDENCE: u8 = 8;

impl ParserState {
    // =========================================================================
    // Parse Methods - Expressions
    // =========================================================================

    /// Parse an expression (including comma operator)
    pub(crate) fn parse_expression(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let mut left = self.parse_assignment_expression()?;
        while self.is_token(SyntaxKind::CommaToken) {
            self.next_token()?;
            let right = self.parse_assignment_expression()?;
            left = self.finish(
                start_pos,
                NodeData::BinaryExpression(BinaryData {
                    left,
                    operator: SyntaxKind::CommaToken,
                    right,
                }),
            );
        }
        Ok(left)
    }

    /// Parse assignment expression
    pub(crate) fn parse_assignment_expression(&mut self) -> Result<NodeIndex> {
        self.guarded(|p| p.parse_assignment_expression_worker())
    }

    fn parse_assignment_expression_worker(&mut self) -> Result<NodeIndex> {
        if let Some(arrow) = self.try_parse_arrow_function()? {
            return Ok(arrow);
        }
        if self.is_contextual("yield") && self.in_context(ParserContext::GENERATOR) {
            return self.parse_yield_expression();
        }

        let start_pos = self.token_pos();
        let expr = self.parse_conditional_expression()?;

        if self.is_token(SyntaxKind::GreaterThanToken) {
            self.scanner.re_scan_greater_token();
        }
        let operator = self.token();
        if operator.is_assignment_operator() {
            self.next_token()?;
            let right = self.parse_assignment_expression()?;
            return Ok(self.finish(
                start_pos,
                NodeData::BinaryExpression(BinaryData {
                    left: expr,
                    operator,
                    right,
                }),
            ));
        }
        Ok(expr)
    }

    fn parse_yield_expression(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.next_token()?;
        let mut delegate = false;
        let mut expression = NodeIndex::NONE;
        if !self.has_preceding_line_break() {
            delegate = self.parse_optional(SyntaxKind::AsteriskToken)?;
            if delegate || self.is_start_of_expression() {
                expression = self.parse_assignment_expression()?;
            }
        }
        Ok(self.finish(
            start_pos,
            NodeData::YieldExpression(YieldData {
                expression,
                delegate,
            }),
        ))
    }

    fn parse_conditional_expression(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let condition = self.parse_binary_expression(0)?;
        if !self.is_token(SyntaxKind::QuestionToken) {
            return Ok(condition);
        }
        self.next_token()?;
        let when_true = self.allow_in(|p| p.parse_assignment_expression())?;
        self.parse_expected(SyntaxKind::ColonToken)?;
        let when_false = self.parse_assignment_expression()?;
        Ok(self.finish(
            start_pos,
            NodeData::ConditionalExpression(ConditionalData {
                condition,
                when_true,
                when_false,
            }),
        ))
    }

    /// Parse binary expression with precedence climbing
    pub(crate) fn parse_binary_expression(&mut self, min_precedence: u8) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let mut left = self.parse_unary_expression()?;

        loop {
            if (self.is_contextual("as") || self.is_contextual("satisfies"))
                && !self.has_preceding_line_break()
                && AS_PRECEDENCE > min_precedence
            {
                left = self.parse_as_or_satisfies_expression(left, start_pos)?;
                continue;
            }

            if self.is_token(SyntaxKind::GreaterThanToken) {
                self.scanner.re_scan_greater_token();
            }
            let operator = self.token();
            if operator == SyntaxKind::InKeyword && self.in_context(ParserContext::DISALLOW_IN) {
                break;
            }
            let precedence = binary_precedence(operator);
            if precedence == 0 || precedence <= min_precedence {
                break;
            }
            self.next_token()?;
            // `**` is right associative.
            let next_min = if operator == SyntaxKind::AsteriskAsteriskToken {
                precedence - 1
            } else {
                precedence
            };
            let right = self.parse_binary_expression(next_min)?;
            left = self.finish(
                start_pos,
                NodeData::BinaryExpression(BinaryData {
                    left,
                    operator,
                    right,
                }),
            );
        }
        Ok(left)
    }

    /// Parse as/satisfies expression: expr as Type, expr satisfies Type
    /// Also handles const assertion: expr as const
    fn parse_as_or_satisfies_expression(
        &mut self,
        expression: NodeIndex,
        start_pos: u32,
    ) -> Result<NodeIndex> {
        let is_satisfies = self.is_contextual("satisfies");
        self.next_token()?;
        let type_node = if !is_satisfies && self.is_token(SyntaxKind::ConstKeyword) {
            let pos = self.token_pos();
            self.next_token()?;
            let name = self.finish(
                pos,
                NodeData::Identifier(IdentifierData {
                    text: "const".to_string(),
                }),
            );
            self.finish(
                pos,
                NodeData::TypeReference(TypeReferenceData {
                    type_name: name,
                    type_arguments: None,
                }),
            )
        } else {
            self.parse_type()?
        };
        let data = TypeAssertionData {
            expression,
            type_node,
        };
        Ok(self.finish(
            start_pos,
            if is_satisfies {
                NodeData::SatisfiesExpression(data)
            } else {
                NodeData::AsExpression(data)
            },
        ))
    }

    /// Parse unary expression
    pub(crate) fn parse_unary_expression(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::ExclamationToken
            | SyntaxKind::TildeToken
            | SyntaxKind::MinusToken
            | SyntaxKind::PlusToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                let operator = self.token();
                self.next_token()?;
                let operand = self.guarded(|p| p.parse_unary_expression())?;
                Ok(self.finish(
                    start_pos,
                    NodeData::PrefixUnaryExpression(UnaryData { operator, operand }),
                ))
            }
            SyntaxKind::LessThanToken => {
                self.next_token()?;
                let type_node = self.parse_type()?;
                self.parse_expected(SyntaxKind::GreaterThanToken)?;
                let expression = self.guarded(|p| p.parse_unary_expression())?;
                Ok(self.finish(
                    start_pos,
                    NodeData::TypeAssertionExpression(TypeAssertionData {
                        expression,
                        type_node,
                    }),
                ))
            }
            SyntaxKind::Identifier if self.is_contextual("await") && self.look_ahead_is_await_operand() => {
                self.next_token()?;
                let expression = self.guarded(|p| p.parse_unary_expression())?;
                Ok(self.finish(
                    start_pos,
                    NodeData::AwaitExpression(ExpressionData { expression }),
                ))
            }
            SyntaxKind::Identifier if self.is_contextual("query") && self.look_ahead_is_query_operand() => {
                let query = self.parse_query_expression()?;
                if self.is_token(SyntaxKind::AsteriskAsteriskToken) {
                    return Err(self.error_unexpected());
                }
                Ok(query)
            }
            _ => self.parse_postfix_expression(),
        }
    }

    /// Modules reserve `await`; it is an operator whenever an operand follows.
    fn look_ahead_is_await_operand(&mut self) -> bool {
        let (kind, _) = self.look_ahead_token();
        self.token_can_start_unary(kind)
    }

    /// `query` is an operator when followed on the same line by an operand or `*`.
    fn look_ahead_is_query_operand(&mut self) -> bool {
        let (kind, line_break) = self.look_ahead_token();
        !line_break && (kind == SyntaxKind::AsteriskToken || self.token_can_start_unary(kind))
    }

    fn token_can_start_unary(&self, kind: SyntaxKind) -> bool {
        use SyntaxKind::*;
        match kind {
            Identifier | PrivateIdentifier | NumericLiteral | BigIntLiteral | StringLiteral
            | NoSubstitutionTemplateLiteral | TemplateHead | OpenParenToken | OpenBracketToken
            | OpenBraceToken | SlashToken | SlashEqualsToken | ExclamationToken | TildeToken
            | MinusToken | PlusToken | PlusPlusToken | MinusMinusToken | LessThanToken
            | ColonToken | AtToken => true,
            ThisKeyword | SuperKeyword | NullKeyword | TrueKeyword | FalseKeyword
            | FunctionKeyword | ClassKeyword | NewKeyword | ImportKeyword | TypeOfKeyword
            | VoidKeyword | DeleteKeyword => true,
            _ => false,
        }
    }

    /// Can the current token begin an expression?
    pub(crate) fn is_start_of_expression(&self) -> bool {
        self.token_can_start_unary(self.token())
    }

    /// Parse postfix expression (x++, x--)
    fn parse_postfix_expression(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let operand = self.parse_left_hand_side_expression()?;
        if matches!(
            self.token(),
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
        ) && !self.has_preceding_line_break()
        {
            let operator = self.token();
            self.next_token()?;
            return Ok(self.finish(
                start_pos,
                NodeData::PostfixUnaryExpression(UnaryData { operator, operand }),
            ));
        }
        Ok(operand)
    }

    /// Parse left-hand side expression (member access, call, etc.)
    pub(crate) fn parse_left_hand_side_expression(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        self.parse_call_or_member_rest(start_pos, expression, true)
    }

    /// Member accesses, calls, non-null assertions and tagged templates after `base`.
    fn parse_call_or_member_rest(
        &mut self,
        start_pos: u32,
        mut expression: NodeIndex,
        allow_calls: bool,
    ) -> Result<NodeIndex> {
        loop {
            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token()?;
                    let name = self.parse_member_name()?;
                    expression = self.finish(
                        start_pos,
                        NodeData::PropertyAccessExpression(PropertyAccessData {
                            expression,
                            name,
                            optional: false,
                        }),
                    );
                }
                SyntaxKind::QuestionDotToken if allow_calls => {
                    self.next_token()?;
                    expression = match self.token() {
                        SyntaxKind::OpenParenToken => {
                            let arguments = self.parse_argument_list()?;
                            self.finish(
                                start_pos,
                                NodeData::CallExpression(CallData {
                                    callee: expression,
                                    type_arguments: None,
                                    arguments,
                                    optional: true,
                                }),
                            )
                        }
                        SyntaxKind::OpenBracketToken => {
                            self.next_token()?;
                            let argument = self.allow_in(|p| p.parse_expression())?;
                            self.parse_expected(SyntaxKind::CloseBracketToken)?;
                            self.finish(
                                start_pos,
                                NodeData::ElementAccessExpression(ElementAccessData {
                                    expression,
                                    argument,
                                    optional: true,
                                }),
                            )
                        }
                        SyntaxKind::LessThanToken => {
                            let type_arguments = self.parse_type_arguments()?;
                            let arguments = self.parse_argument_list()?;
                            self.finish(
                                start_pos,
                                NodeData::CallExpression(CallData {
                                    callee: expression,
                                    type_arguments: Some(type_arguments),
                                    arguments,
                                    optional: true,
                                }),
                            )
                        }
                        _ => {
                            let name = self.parse_member_name()?;
                            self.finish(
                                start_pos,
                                NodeData::PropertyAccessExpression(PropertyAccessData {
                                    expression,
                                    name,
                                    optional: true,
                                }),
                            )
                        }
                    };
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token()?;
                    let argument = self.allow_in(|p| p.parse_expression())?;
                    self.parse_expected(SyntaxKind::CloseBracketToken)?;
                    expression = self.finish(
                        start_pos,
                        NodeData::ElementAccessExpression(ElementAccessData {
                            expression,
                            argument,
                            optional: false,
                        }),
                    );
                }
                SyntaxKind::ExclamationToken if !self.has_preceding_line_break() => {
                    self.next_token()?;
                    expression = self.finish(
                        start_pos,
                        NodeData::NonNullExpression(ExpressionData { expression }),
                    );
                }
                SyntaxKind::OpenParenToken if allow_calls => {
                    let arguments = self.parse_argument_list()?;
                    expression = self.finish(
                        start_pos,
                        NodeData::CallExpression(CallData {
                            callee: expression,
                            type_arguments: None,
                            arguments,
                            optional: false,
                        }),
                    );
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    let quasi = self.parse_template_expression()?;
                    expression = self.finish(
                        start_pos,
                        NodeData::TaggedTemplateExpression(TaggedTemplateData {
                            tag: expression,
                            type_arguments: None,
                            quasi,
                        }),
                    );
                }
                SyntaxKind::LessThanToken => {
                    match self.try_parse(|p| p.parse_type_arguments_in_expression()) {
                        Some(type_arguments) => {
                            expression = self.finish_type_argument_suffix(
                                start_pos,
                                expression,
                                type_arguments,
                                allow_calls,
                            )?;
                        }
                        None => break,
                    }
                }
                _ => break,
            }
        }
        Ok(expression)
    }

    /// `f<T>(x)`, ``f<T>`x` `` or the instantiation expression `f<T>`.
    fn finish_type_argument_suffix(
        &mut self,
        start_pos: u32,
        expression: NodeIndex,
        type_arguments: NodeList,
        allow_calls: bool,
    ) -> Result<NodeIndex> {
        match self.token() {
            SyntaxKind::OpenParenToken if allow_calls => {
                let arguments = self.parse_argument_list()?;
                Ok(self.finish(
                    start_pos,
                    NodeData::CallExpression(CallData {
                        callee: expression,
                        type_arguments: Some(type_arguments),
                        arguments,
                        optional: false,
                    }),
                ))
            }
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                let quasi = self.parse_template_expression()?;
                Ok(self.finish(
                    start_pos,
                    NodeData::TaggedTemplateExpression(TaggedTemplateData {
                        tag: expression,
                        type_arguments: Some(type_arguments),
                        quasi,
                    }),
                ))
            }
            _ => Ok(self.finish(
                start_pos,
                NodeData::ExpressionWithTypeArguments(ExpressionWithTypeArgumentsData {
                    expression,
                    type_arguments: Some(type_arguments),
                }),
            )),
        }
    }

    /// Type arguments in expression position. Fails (for rewinding) unless what
    /// follows the closing `>` makes the `<` unambiguously a type argument list.
    fn parse_type_arguments_in_expression(&mut self) -> Result<NodeList> {
        let list = self.parse_type_arguments()?;
        // `a < b >= c`, `a < b >> c`: the `>` belongs to a longer operator.
        if matches!(
            self.token(),
            SyntaxKind::EqualsToken
                | SyntaxKind::EqualsEqualsToken
                | SyntaxKind::EqualsEqualsEqualsToken
                | SyntaxKind::EqualsGreaterThanToken
                | SyntaxKind::GreaterThanToken
                | SyntaxKind::GreaterThanEqualsToken
        ) && self.token_pos() == self.last_token_end()
        {
            return Err(self.error_unexpected());
        }
        let follows = match self.token() {
            SyntaxKind::OpenParenToken
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateHead => true,
            _ => !self.is_start_of_expression() || self.has_preceding_line_break(),
        };
        let binary_follows = binary_precedence(self.token()) > 0
            && !matches!(self.token(), SyntaxKind::LessThanToken);
        if follows && !binary_follows {
            Ok(list)
        } else {
            Err(self.error_unexpected())
        }
    }

    /// Property name after `.` or `?.`.
    fn parse_member_name(&mut self) -> Result<NodeIndex> {
        if self.is_token(SyntaxKind::PrivateIdentifier) {
            return self.parse_private_identifier();
        }
        if self.is_identifier_or_keyword() {
            return self.parse_identifier_name();
        }
        self.parse_identifier_at(IdentifierSite::MemberName)
    }

    fn parse_new_expression(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::NewKeyword)?;
        if self.is_token(SyntaxKind::DotToken) {
            self.next_token()?;
            let name = self.parse_identifier_name()?;
            return Ok(self.finish(
                start_pos,
                NodeData::MetaProperty(MetaPropertyData {
                    keyword: SyntaxKind::NewKeyword,
                    name,
                }),
            ));
        }
        let callee_pos = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        let mut callee = self.parse_call_or_member_rest(callee_pos, callee, false)?;
        let mut type_arguments = None;
        if let Some(NodeData::ExpressionWithTypeArguments(data)) = self.arena.data(callee) {
            type_arguments = data.type_arguments.clone();
            callee = data.expression;
        }
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_argument_list()?)
        } else {
            None
        };
        Ok(self.finish(
            start_pos,
            NodeData::NewExpression(NewData {
                callee,
                type_arguments,
                arguments,
            }),
        ))
    }

    /// Parse argument list: `(a, b, ...c)`
    pub(crate) fn parse_argument_list(&mut self) -> Result<NodeList> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let mut arguments = Vec::new();
        self.allow_in(|p| {
            while !p.is_token(SyntaxKind::CloseParenToken) {
                arguments.push(p.parse_spread_or_assignment()?);
                if !p.parse_optional(SyntaxKind::CommaToken)? {
                    break;
                }
            }
            Ok(())
        })?;
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(NodeList::from(arguments))
    }

    fn parse_spread_or_assignment(&mut self) -> Result<NodeIndex> {
        if self.is_token(SyntaxKind::DotDotDotToken) {
            let start_pos = self.token_pos();
            self.next_token()?;
            let expression = self.parse_assignment_expression()?;
            return Ok(self.finish(
                start_pos,
                NodeData::SpreadElement(ExpressionData { expression }),
            ));
        }
        self.parse_assignment_expression()
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    /// Parse primary expression
    pub(crate) fn parse_primary_expression(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::Identifier => {
                if self.is_contextual("async") && self.look_ahead_is_async_function() {
                    return self.parse_function_expression();
                }
                self.parse_identifier()
            }
            SyntaxKind::ThisKeyword => self.finish_token(NodeData::ThisExpression),
            SyntaxKind::SuperKeyword => self.finish_token(NodeData::SuperExpression),
            SyntaxKind::NullKeyword => self.finish_token(NodeData::NullLiteral),
            SyntaxKind::TrueKeyword => self.finish_token(NodeData::BooleanLiteral(true)),
            SyntaxKind::FalseKeyword => self.finish_token(NodeData::BooleanLiteral(false)),
            SyntaxKind::NumericLiteral => {
                let data = self.literal_data();
                self.finish_token(NodeData::NumericLiteral(data))
            }
            SyntaxKind::BigIntLiteral => {
                let data = self.literal_data();
                self.finish_token(NodeData::BigIntLiteral(data))
            }
            SyntaxKind::StringLiteral => self.parse_string_literal(),
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                self.parse_template_expression()
            }
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.scanner.re_scan_slash_token();
                self.check_scan_error()?;
                let data = self.literal_data();
                self.finish_token(NodeData::RegularExpressionLiteral(data))
            }
            SyntaxKind::OpenParenToken => {
                self.next_token()?;
                let expression = self.allow_in(|p| p.parse_expression())?;
                self.parse_expected(SyntaxKind::CloseParenToken)?;
                Ok(self.finish(
                    start_pos,
                    NodeData::ParenthesizedExpression(ExpressionData { expression }),
                ))
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(),
            SyntaxKind::ClassKeyword => self.parse_class(start_pos, NodeList::new(), false, false, true),
            SyntaxKind::AtToken => {
                let decorators = self.parse_decorators()?;
                if !self.is_token(SyntaxKind::ClassKeyword) {
                    return Err(self.error_at_token("'class' expected."));
                }
                self.parse_class(start_pos, decorators, false, false, true)
            }
            SyntaxKind::ImportKeyword => {
                self.next_token()?;
                if self.is_token(SyntaxKind::DotToken) {
                    self.next_token()?;
                    let name = self.parse_identifier_name()?;
                    return Ok(self.finish(
                        start_pos,
                        NodeData::MetaProperty(MetaPropertyData {
                            keyword: SyntaxKind::ImportKeyword,
                            name,
                        }),
                    ));
                }
                if !self.is_token(SyntaxKind::OpenParenToken) {
                    return Err(self.error_at_token("'(' expected."));
                }
                Ok(self.finish(start_pos, NodeData::ImportKeyword))
            }
            SyntaxKind::ColonToken => self.parse_shortcut_argument(),
            _ => Err(self.error_at_token("Expression expected.")),
        }
    }

    pub(crate) fn literal_data(&self) -> LiteralData {
        LiteralData {
            value: self.token_value(),
            raw: Some(self.scanner.token_text().to_string()),
        }
    }

    pub(crate) fn parse_string_literal(&mut self) -> Result<NodeIndex> {
        if !self.is_token(SyntaxKind::StringLiteral) {
            return Err(self.error_at_token("String literal expected."));
        }
        let data = self.literal_data();
        self.finish_token(NodeData::StringLiteral(data))
    }

    /// Identifier; reserved words are rejected.
    pub(crate) fn parse_identifier(&mut self) -> Result<NodeIndex> {
        if !self.is_identifier() {
            return Err(if self.token().is_keyword() {
                self.error_at_token(format!(
                    "Identifier expected. '{}' is a reserved word.",
                    self.scanner.token_text()
                ))
            } else {
                self.error_at_token("Identifier expected.")
            });
        }
        let text = self.token_value();
        self.finish_token(NodeData::Identifier(IdentifierData { text }))
    }

    /// Identifier name; reserved words are allowed (`a.default`, `{ if: 1 }`).
    pub(crate) fn parse_identifier_name(&mut self) -> Result<NodeIndex> {
        if !self.is_identifier_or_keyword() {
            return Err(self.error_at_token("Identifier expected."));
        }
        let text = self.token_value();
        self.finish_token(NodeData::Identifier(IdentifierData { text }))
    }

    /// Identifier at a site governed by the identifier policy.
    pub(crate) fn parse_identifier_at(&mut self, site: IdentifierSite) -> Result<NodeIndex> {
        if self.is_identifier() {
            return self.parse_identifier();
        }
        if self.allows_placeholder(site) {
            return Ok(self.create_dummy_identifier());
        }
        self.parse_identifier()
    }

    pub(crate) fn parse_private_identifier(&mut self) -> Result<NodeIndex> {
        let text = self.token_value();
        self.finish_token(NodeData::PrivateIdentifier(IdentifierData { text }))
    }

    /// Template literal; a no-substitution template has one quasi.
    pub(crate) fn parse_template_expression(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let (quasis, expressions) = self.parse_template_parts(|p| p.parse_expression())?;
        Ok(self.finish(
            start_pos,
            NodeData::TemplateExpression(TemplateData {
                quasis,
                expressions,
            }),
        ))
    }

    /// Template chunks with `part` parsed between them (expressions or types).
    pub(crate) fn parse_template_parts(
        &mut self,
        mut part: impl FnMut(&mut Self) -> Result<NodeIndex>,
    ) -> Result<(NodeList, NodeList)> {
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        if self.is_token(SyntaxKind::NoSubstitutionTemplateLiteral) {
            quasis.push(self.parse_template_element(true)?);
            return Ok((quasis.into(), expressions.into()));
        }
        if !self.is_token(SyntaxKind::TemplateHead) {
            return Err(self.error_at_token("Template literal expected."));
        }
        quasis.push(self.parse_template_element(false)?);
        loop {
            expressions.push(self.allow_in(&mut part)?);
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                return Err(self.error_at_token("'}' expected."));
            }
            let kind = self.scanner.re_scan_template_token();
            self.check_scan_error()?;
            let tail = kind == SyntaxKind::TemplateTail;
            quasis.push(self.parse_template_element(tail)?);
            if tail {
                break;
            }
        }
        Ok((quasis.into(), expressions.into()))
    }

    fn parse_template_element(&mut self, tail: bool) -> Result<NodeIndex> {
        let raw = self.token_value();
        self.finish_token(NodeData::TemplateElement(TemplateElementData { raw, tail }))
    }

    fn parse_array_literal(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        self.allow_in(|p| {
            while !p.is_token(SyntaxKind::CloseBracketToken) {
                if p.is_token(SyntaxKind::CommaToken) {
                    let pos = p.token_pos();
                    elements.push(p.arena.add_node(pos, pos, NodeData::OmittedExpression));
                    p.next_token()?;
                    continue;
                }
                elements.push(p.parse_spread_or_assignment()?);
                if !p.parse_optional(SyntaxKind::CommaToken)? {
                    break;
                }
            }
            Ok(())
        })?;
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        Ok(self.finish(
            start_pos,
            NodeData::ArrayLiteralExpression(ElementsData {
                elements: elements.into(),
            }),
        ))
    }

    fn parse_object_literal(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut properties = Vec::new();
        self.allow_in(|p| {
            while !p.is_token(SyntaxKind::CloseBraceToken) {
                properties.push(p.parse_object_literal_member()?);
                if !p.parse_optional(SyntaxKind::CommaToken)? {
                    break;
                }
            }
            Ok(())
        })?;
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.finish(
            start_pos,
            NodeData::ObjectLiteralExpression(PropertiesData {
                properties: properties.into(),
            }),
        ))
    }

    fn parse_object_literal_member(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        if self.is_token(SyntaxKind::DotDotDotToken) {
            self.next_token()?;
            let expression = self.parse_assignment_expression()?;
            return Ok(self.finish(
                start_pos,
                NodeData::SpreadElement(ExpressionData { expression }),
            ));
        }

        let mut is_async = false;
        let mut kind = MethodKind::Method;
        if self.is_contextual("async") && self.look_ahead_is_member_modifier() {
            self.next_token()?;
            is_async = true;
        } else if (self.is_contextual("get") || self.is_contextual("set"))
            && self.look_ahead_is_member_modifier()
        {
            kind = if self.is_contextual("get") {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            self.next_token()?;
        }
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken)?;

        let name_is_identifier = self.is_identifier();
        let name = self.parse_property_name()?;

        if is_generator
            || kind != MethodKind::Method
            || is_async
            || matches!(
                self.token(),
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
            )
        {
            let function = self.parse_function_signature_and_body(is_generator, is_async, false)?;
            return Ok(self.finish(
                start_pos,
                NodeData::MethodDeclaration(MethodData {
                    decorators: NodeList::new(),
                    kind,
                    modifiers: ModifierFlags::empty(),
                    name,
                    question: false,
                    function,
                }),
            ));
        }

        if self.parse_optional(SyntaxKind::ColonToken)? {
            let initializer = self.parse_assignment_expression()?;
            return Ok(self.finish(
                start_pos,
                NodeData::PropertyAssignment(PropertyAssignmentData { name, initializer }),
            ));
        }

        if !name_is_identifier {
            return Err(self.error_at_token("':' expected."));
        }
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken)? {
            self.parse_assignment_expression()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish(
            start_pos,
            NodeData::ShorthandPropertyAssignment(ShorthandPropertyData { name, initializer }),
        ))
    }

    /// Is the current word (`get`, `set`, `async`, `static`, ...) a modifier,
    /// i.e. followed by something that can name a member?
    pub(crate) fn look_ahead_is_member_modifier(&mut self) -> bool {
        let (kind, line_break) = self.look_ahead_token();
        if self.is_contextual("async") && line_break {
            return false;
        }
        kind.is_identifier_or_keyword()
            || matches!(
                kind,
                SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::BigIntLiteral
                    | SyntaxKind::OpenBracketToken
                    | SyntaxKind::AsteriskToken
                    | SyntaxKind::PrivateIdentifier
            )
    }

    /// Property name: identifier name, string, number, `[computed]` or `#private`.
    pub(crate) fn parse_property_name(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::StringLiteral => self.parse_string_literal(),
            SyntaxKind::NumericLiteral => {
                let data = self.literal_data();
                self.finish_token(NodeData::NumericLiteral(data))
            }
            SyntaxKind::BigIntLiteral => {
                let data = self.literal_data();
                self.finish_token(NodeData::BigIntLiteral(data))
            }
            SyntaxKind::PrivateIdentifier => self.parse_private_identifier(),
            SyntaxKind::OpenBracketToken => {
                self.next_token()?;
                let expression = self.allow_in(|p| p.parse_assignment_expression())?;
                self.parse_expected(SyntaxKind::CloseBracketToken)?;
                Ok(self.finish(
                    start_pos,
                    NodeData::ComputedPropertyName(ExpressionData { expression }),
                ))
            }
            _ => self.parse_identifier_name(),
        }
    }

    // =========================================================================
    // Functions
    // =========================================================================

    pub(crate) fn look_ahead_is_async_function(&mut self) -> bool {
        let (kind, line_break) = self.look_ahead_token();
        kind == SyntaxKind::FunctionKeyword && !line_break
    }

    fn parse_function_expression(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let is_async = self.parse_contextual("async")?;
        self.parse_expected(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken)?;
        let name = if self.is_identifier() {
            self.parse_identifier()?
        } else {
            NodeIndex::NONE
        };
        let mut function = self.parse_function_signature_and_body(is_generator, is_async, false)?;
        function.name = name;
        Ok(self.finish(start_pos, NodeData::FunctionExpression(function)))
    }

    /// `<T>(params): R { body }`. Without a body only when `body_optional`
    /// (overloads, ambient and abstract declarations).
    pub(crate) fn parse_function_signature_and_body(
        &mut self,
        is_generator: bool,
        is_async: bool,
        body_optional: bool,
    ) -> Result<FunctionData> {
        let type_parameters = if self.is_token(SyntaxKind::LessThanToken) {
            Some(self.parse_type_parameters()?)
        } else {
            None
        };
        let parameters = self.parse_parameter_list()?;
        let return_type = if self.parse_optional(SyntaxKind::ColonToken)? {
            self.parse_return_type()?
        } else {
            NodeIndex::NONE
        };
        let body = if body_optional && !self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_semicolon()?;
            NodeIndex::NONE
        } else {
            self.parse_function_body(is_generator)?
        };
        Ok(FunctionData {
            name: NodeIndex::NONE,
            type_parameters,
            parameters,
            return_type,
            body,
            is_async,
            is_generator,
            declare: false,
        })
    }

    /// Function body block. `yield` is an operator only in generator bodies.
    pub(crate) fn parse_function_body(&mut self, is_generator: bool) -> Result<NodeIndex> {
        let (set, clear) = if is_generator {
            (ParserContext::GENERATOR, ParserContext::DISALLOW_IN)
        } else {
            (
                ParserContext::empty(),
                ParserContext::GENERATOR | ParserContext::DISALLOW_IN,
            )
        };
        self.with_context(set, clear, |p| p.parse_block())
    }

    /// Parse `( parameters )`.
    pub(crate) fn parse_parameter_list(&mut self) -> Result<NodeList> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let mut parameters = Vec::new();
        self.allow_in(|p| {
            while !p.is_token(SyntaxKind::CloseParenToken) {
                parameters.push(p.parse_parameter()?);
                if !p.parse_optional(SyntaxKind::CommaToken)? {
                    break;
                }
            }
            Ok(())
        })?;
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(parameters.into())
    }

    fn parse_parameter(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let decorators = if self.is_token(SyntaxKind::AtToken) {
            self.parse_decorators()?
        } else {
            NodeList::new()
        };
        let mut modifiers = ModifierFlags::empty();
        while self.is_identifier()
            && matches!(
                self.scanner.token_text(),
                "public" | "private" | "protected" | "readonly" | "override"
            )
            && self.look_ahead_is_parameter_modifier()
        {
            if let Some(flag) = ModifierFlags::from_text(self.scanner.token_text()) {
                modifiers |= flag;
            }
            self.next_token()?;
        }
        let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken)?;
        let name = if self.is_token(SyntaxKind::ThisKeyword) {
            self.finish_token(NodeData::Identifier(IdentifierData {
                text: "this".to_string(),
            }))?
        } else {
            self.parse_binding_name()?
        };
        let question = self.parse_optional(SyntaxKind::QuestionToken)?;
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken)? {
            self.parse_type()?
        } else {
            NodeIndex::NONE
        };
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken)? {
            self.parse_assignment_expression()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish(
            start_pos,
            NodeData::Parameter(ParameterData {
                decorators,
                modifiers,
                dot_dot_dot,
                name,
                question,
                type_annotation,
                initializer,
            }),
        ))
    }

    fn look_ahead_is_parameter_modifier(&mut self) -> bool {
        let (kind, _) = self.look_ahead_token();
        kind.is_identifier_or_keyword()
            || matches!(
                kind,
                SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken | SyntaxKind::DotDotDotToken
            )
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    /// Parse an arrow function if one starts here; rewinds otherwise.
    fn try_parse_arrow_function(&mut self) -> Result<Option<NodeIndex>> {
        match self.token() {
            SyntaxKind::Identifier => {
                let (next, next_line_break) = self.look_ahead_token();
                if next == SyntaxKind::EqualsGreaterThanToken && !next_line_break {
                    return self.parse_simple_arrow_function(false).map(Some);
                }
                if self.is_contextual("async") && !next_line_break {
                    if next == SyntaxKind::Identifier {
                        let simple = self.look_ahead(|p| {
                            p.next_token()?;
                            p.next_token()?;
                            Ok(p.is_token(SyntaxKind::EqualsGreaterThanToken)
                                && !p.has_preceding_line_break())
                        });
                        if simple {
                            return self.parse_simple_arrow_function(true).map(Some);
                        }
                    } else if matches!(
                        next,
                        SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                    ) {
                        return Ok(self.try_parse(|p| p.parse_parenthesized_arrow_function(true)));
                    }
                }
                Ok(None)
            }
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => {
                Ok(self.try_parse(|p| p.parse_parenthesized_arrow_function(false)))
            }
            _ => Ok(None),
        }
    }

    fn parse_simple_arrow_function(&mut self, is_async: bool) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        if is_async {
            self.next_token()?;
        }
        let param_pos = self.token_pos();
        let name = self.parse_identifier()?;
        let parameter = self.finish(param_pos, NodeData::Parameter(ParameterData::new(name)));
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken)?;
        let body = self.parse_arrow_body()?;
        let mut function = FunctionData::new(NodeList::from(vec![parameter]), body);
        function.is_async = is_async;
        Ok(self.finish(start_pos, NodeData::ArrowFunction(function)))
    }

    fn parse_parenthesized_arrow_function(&mut self, is_async: bool) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        if is_async {
            self.next_token()?;
        }
        let type_parameters = if self.is_token(SyntaxKind::LessThanToken) {
            Some(self.parse_type_parameters()?)
        } else {
            None
        };
        let parameters = self.parse_parameter_list()?;
        let return_type = if self.parse_optional(SyntaxKind::ColonToken)? {
            self.with_context(
                ParserContext::DISALLOW_CONDITIONAL_TYPES,
                ParserContext::empty(),
                |p| p.parse_return_type(),
            )?
        } else {
            NodeIndex::NONE
        };
        if !self.is_token(SyntaxKind::EqualsGreaterThanToken) || self.has_preceding_line_break() {
            return Err(self.error_at_token("'=>' expected."));
        }
        self.next_token()?;
        let body = self.parse_arrow_body()?;
        Ok(self.finish(
            start_pos,
            NodeData::ArrowFunction(FunctionData {
                name: NodeIndex::NONE,
                type_parameters,
                parameters,
                return_type,
                body,
                is_async,
                is_generator: false,
                declare: false,
            }),
        ))
    }

    fn parse_arrow_body(&mut self) -> Result<NodeIndex> {
        if self.is_token(SyntaxKind::OpenBraceToken) {
            return self.parse_function_body(false);
        }
        self.with_context(ParserContext::empty(), ParserContext::GENERATOR, |p| {
            p.parse_assignment_expression()
        })
    }

    // =========================================================================
    // Binding patterns
    // =========================================================================

    /// Identifier or destructuring pattern.
    pub(crate) fn parse_binding_name(&mut self) -> Result<NodeIndex> {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            _ => self.parse_identifier(),
        }
    }

    fn parse_object_binding_pattern(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            let element_pos = self.token_pos();
            let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken)?;
            let (property_name, name) = if dot_dot_dot {
                (NodeIndex::NONE, self.parse_identifier()?)
            } else {
                let is_plain = self.is_identifier();
                let key = self.parse_property_name()?;
                if self.parse_optional(SyntaxKind::ColonToken)? {
                    (key, self.parse_binding_name()?)
                } else if is_plain {
                    (NodeIndex::NONE, key)
                } else {
                    return Err(self.error_at_token("':' expected."));
                }
            };
            let initializer = if !dot_dot_dot && self.parse_optional(SyntaxKind::EqualsToken)? {
                self.allow_in(|p| p.parse_assignment_expression())?
            } else {
                NodeIndex::NONE
            };
            elements.push(self.finish(
                element_pos,
                NodeData::BindingElement(BindingElementData {
                    dot_dot_dot,
                    property_name,
                    name,
                    initializer,
                }),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.finish(
            start_pos,
            NodeData::ObjectBindingPattern(ElementsData {
                elements: elements.into(),
            }),
        ))
    }

    fn parse_array_binding_pattern(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken) {
            if self.is_token(SyntaxKind::CommaToken) {
                let pos = self.token_pos();
                elements.push(self.arena.add_node(pos, pos, NodeData::OmittedExpression));
                self.next_token()?;
                continue;
            }
            let element_pos = self.token_pos();
            let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken)?;
            let name = self.parse_binding_name()?;
            let initializer = if !dot_dot_dot && self.parse_optional(SyntaxKind::EqualsToken)? {
                self.allow_in(|p| p.parse_assignment_expression())?
            } else {
                NodeIndex::NONE
            };
            elements.push(self.finish(
                element_pos,
                NodeData::BindingElement(BindingElementData {
                    dot_dot_dot,
                    property_name: NodeIndex::NONE,
                    name,
                    initializer,
                }),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        Ok(self.finish(
            start_pos,
            NodeData::ArrayBindingPattern(ElementsData {
                elements: elements.into(),
            }),
        ))
    }

    /// `@expr` decorators.
    pub(crate) fn parse_decorators(&mut self) -> Result<NodeList> {
        let mut decorators = Vec::new();
        while self.is_token(SyntaxKind::AtToken) {
            let start_pos = self.token_pos();
            self.next_token()?;
            let expression = self.parse_left_hand_side_expression()?;
            decorators.push(self.finish(
                start_pos,
                NodeData::Decorator(ExpressionData { expression }),
            ));
        }
        Ok(decorators.into())
    }
}

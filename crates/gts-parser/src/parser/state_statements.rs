//! Parser state - statement and declaration parsing methods

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::{ParserContext, ParserState};
use gts_common::Result;
use gts_scanner::SyntaxKind;
use tracing::trace;

impl ParserState {
    // =========================================================================
    // Parse Methods - Source file and statement lists
    // =========================================================================

    /// Parse the whole input. `define` statements are recognized here only.
    pub fn parse_source_file(&mut self) -> Result<NodeIndex> {
        self.next_token()?;
        let mut statements = Vec::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            let statement = if self.is_define_statement() {
                self.parse_define_statement()?
            } else {
                self.parse_statement()?
            };
            statements.push(statement);
        }
        let end = self.source().len() as u32;
        trace!(statements = statements.len(), "parsed source file");
        Ok(self.arena.add_node(
            0,
            end,
            NodeData::SourceFile(StatementsData {
                statements: statements.into(),
            }),
        ))
    }

    /// Statements up to the closing `}` of the enclosing block.
    pub(crate) fn parse_statements(&mut self) -> Result<NodeList> {
        let mut statements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            statements.push(self.parse_statement()?);
        }
        Ok(statements.into())
    }

    pub(crate) fn parse_block(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let statements = self.parse_statements()?;
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.finish(start_pos, NodeData::Block(StatementsData { statements })))
    }

    pub(crate) fn parse_statement(&mut self) -> Result<NodeIndex> {
        self.guarded(|p| p.parse_statement_worker())
    }

    fn parse_statement_worker(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => self.finish_token(NodeData::EmptyStatement),
            SyntaxKind::VarKeyword => self.parse_variable_statement(start_pos, false),
            SyntaxKind::ConstKeyword => {
                let (next, _) = self.look_ahead_token();
                if next == SyntaxKind::EnumKeyword {
                    self.parse_enum_declaration(start_pos, false)
                } else {
                    self.parse_variable_statement(start_pos, false)
                }
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(start_pos, false),
            SyntaxKind::ClassKeyword => {
                self.parse_class(start_pos, NodeList::new(), false, false, false)
            }
            SyntaxKind::EnumKeyword => self.parse_enum_declaration(start_pos, false),
            SyntaxKind::AtToken => self.parse_decorated_declaration(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_or_throw(true),
            SyntaxKind::ThrowKeyword => self.parse_return_or_throw(false),
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => self.parse_jump_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::DebuggerKeyword => {
                self.next_token()?;
                self.parse_semicolon()?;
                Ok(self.finish(start_pos, NodeData::DebuggerStatement))
            }
            SyntaxKind::WithKeyword => Err(self.error_at_token(
                "'with' statements are not allowed in strict mode.",
            )),
            SyntaxKind::ImportKeyword => {
                let (next, _) = self.look_ahead_token();
                if matches!(next, SyntaxKind::OpenParenToken | SyntaxKind::DotToken) {
                    self.parse_expression_statement()
                } else {
                    self.parse_import_declaration()
                }
            }
            SyntaxKind::ExportKeyword => self.parse_export_declaration(NodeList::new()),
            SyntaxKind::Identifier => self.parse_statement_identifier_start(start_pos),
            _ => self.parse_expression_statement(),
        }
    }

    /// Statements led by a contextual word: `let`, `async`, `interface`,
    /// `type`, `namespace`, `declare`, `abstract`, labels.
    fn parse_statement_identifier_start(&mut self, start_pos: u32) -> Result<NodeIndex> {
        let word = self.scanner.token_text().to_string();
        match word.as_str() {
            "let" if self.look_ahead_is_let_declaration() => {
                return self.parse_variable_statement(start_pos, false);
            }
            "async" if self.look_ahead_is_async_function() => {
                return self.parse_function_declaration(start_pos, false);
            }
            "interface" | "type" | "namespace" | "module" | "abstract" | "declare" | "global"
                if self.look_ahead_is_declaration_keyword(&word) =>
            {
                return self.parse_declaration_after_word(start_pos, &word, false);
            }
            _ => {}
        }
        let (next, _) = self.look_ahead_token();
        if next == SyntaxKind::ColonToken {
            let label = self.parse_identifier()?;
            self.parse_expected(SyntaxKind::ColonToken)?;
            let statement = self.parse_statement()?;
            return Ok(self.finish(
                start_pos,
                NodeData::LabeledStatement(LabeledData { label, statement }),
            ));
        }
        self.parse_expression_statement()
    }

    fn look_ahead_is_let_declaration(&mut self) -> bool {
        let (next, _) = self.look_ahead_token();
        matches!(
            next,
            SyntaxKind::Identifier | SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken
        ) || (next.is_keyword() && next != SyntaxKind::InKeyword && next != SyntaxKind::InstanceOfKeyword)
    }

    /// Does `word` start a declaration rather than an expression?
    fn look_ahead_is_declaration_keyword(&mut self, word: &str) -> bool {
        let (next, line_break) = self.look_ahead_token();
        if line_break {
            return false;
        }
        match word {
            "interface" | "type" => next == SyntaxKind::Identifier,
            "namespace" => next == SyntaxKind::Identifier,
            "module" => matches!(next, SyntaxKind::Identifier | SyntaxKind::StringLiteral),
            "global" => next == SyntaxKind::OpenBraceToken,
            "abstract" => next == SyntaxKind::ClassKeyword,
            "declare" => {
                next.is_identifier_or_keyword()
                    && !matches!(next, SyntaxKind::InKeyword | SyntaxKind::InstanceOfKeyword)
            }
            _ => false,
        }
    }

    /// Parse the declaration introduced by the contextual `word` at the current token.
    fn parse_declaration_after_word(
        &mut self,
        start_pos: u32,
        word: &str,
        declare: bool,
    ) -> Result<NodeIndex> {
        match word {
            "interface" => self.parse_interface_declaration(start_pos, declare),
            "type" => self.parse_type_alias_declaration(start_pos, declare),
            "namespace" | "module" | "global" => self.parse_module_declaration(start_pos, declare),
            "abstract" => {
                self.next_token()?;
                self.parse_class(start_pos, NodeList::new(), true, declare, false)
            }
            "declare" => {
                self.next_token()?;
                self.parse_ambient_declaration(start_pos)
            }
            _ => Err(self.error_unexpected()),
        }
    }

    /// The declaration after `declare`.
    fn parse_ambient_declaration(&mut self, start_pos: u32) -> Result<NodeIndex> {
        match self.token() {
            SyntaxKind::VarKeyword => self.parse_variable_statement(start_pos, true),
            SyntaxKind::ConstKeyword => {
                let (next, _) = self.look_ahead_token();
                if next == SyntaxKind::EnumKeyword {
                    self.parse_enum_declaration(start_pos, true)
                } else {
                    self.parse_variable_statement(start_pos, true)
                }
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(start_pos, true),
            SyntaxKind::ClassKeyword => {
                self.parse_class(start_pos, NodeList::new(), false, true, false)
            }
            SyntaxKind::EnumKeyword => self.parse_enum_declaration(start_pos, true),
            SyntaxKind::Identifier => {
                let word = self.scanner.token_text().to_string();
                if word == "let" {
                    return self.parse_variable_statement(start_pos, true);
                }
                if word == "async" && self.look_ahead_is_async_function() {
                    return self.parse_function_declaration(start_pos, true);
                }
                if word != "declare" && self.look_ahead_is_declaration_keyword(&word) {
                    return self.parse_declaration_after_word(start_pos, &word, true);
                }
                Err(self.error_unexpected())
            }
            _ => Err(self.error_unexpected()),
        }
    }

    pub(crate) fn parse_expression_statement(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let expression = self.allow_in(|p| p.parse_expression())?;
        self.parse_semicolon()?;
        Ok(self.finish(
            start_pos,
            NodeData::ExpressionStatement(ExpressionData { expression }),
        ))
    }

    // =========================================================================
    // Variables
    // =========================================================================

    fn parse_variable_statement(&mut self, start_pos: u32, declare: bool) -> Result<NodeIndex> {
        let (kind, declarations) = self.parse_variable_declaration_list()?;
        self.parse_semicolon()?;
        Ok(self.finish(
            start_pos,
            NodeData::VariableStatement(VariableStatementData {
                kind,
                declarations,
                declare,
            }),
        ))
    }

    /// `var|let|const a = 1, b` without the terminating semicolon.
    fn parse_variable_declaration_list(&mut self) -> Result<(VariableKind, NodeList)> {
        let kind = match self.token() {
            SyntaxKind::VarKeyword => VariableKind::Var,
            SyntaxKind::ConstKeyword => VariableKind::Const,
            _ if self.is_contextual("let") => VariableKind::Let,
            _ => return Err(self.error_at_token("Variable declaration expected.")),
        };
        self.next_token()?;
        let mut declarations = vec![self.parse_variable_declaration()?];
        while self.parse_optional(SyntaxKind::CommaToken)? {
            declarations.push(self.parse_variable_declaration()?);
        }
        Ok((kind, declarations.into()))
    }

    fn parse_variable_declaration(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let name = self.parse_binding_name()?;
        let exclamation = !self.has_preceding_line_break()
            && self.parse_optional(SyntaxKind::ExclamationToken)?;
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
            NodeData::VariableDeclaration(VariableDeclarationData {
                name,
                exclamation,
                type_annotation,
                initializer,
            }),
        ))
    }

    // =========================================================================
    // Functions and classes
    // =========================================================================

    fn parse_function_declaration(&mut self, start_pos: u32, declare: bool) -> Result<NodeIndex> {
        let is_async = self.parse_contextual("async")?;
        self.parse_expected(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken)?;
        let name = if self.is_identifier() {
            self.parse_identifier()?
        } else {
            NodeIndex::NONE
        };
        let mut function = self.parse_function_signature_and_body(is_generator, is_async, true)?;
        function.name = name;
        function.declare = declare;
        Ok(self.finish(start_pos, NodeData::FunctionDeclaration(function)))
    }

    /// `@dec class A {}` or `@dec export [default] class A {}`.
    fn parse_decorated_declaration(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let decorators = self.parse_decorators()?;
        if self.is_token(SyntaxKind::ExportKeyword) {
            return self.parse_export_declaration(decorators);
        }
        let is_abstract = self.parse_contextual("abstract")?;
        if !self.is_token(SyntaxKind::ClassKeyword) {
            return Err(self.error_at_token("Decorators are not valid here."));
        }
        self.parse_class(start_pos, decorators, is_abstract, false, false)
    }

    /// Class declaration or expression; the current token is `class`.
    pub(crate) fn parse_class(
        &mut self,
        start_pos: u32,
        decorators: NodeList,
        is_abstract: bool,
        declare: bool,
        is_expression: bool,
    ) -> Result<NodeIndex> {
        self.parse_expected(SyntaxKind::ClassKeyword)?;
        let name = if self.is_identifier() && !self.is_contextual("implements") {
            self.parse_identifier()?
        } else {
            NodeIndex::NONE
        };
        let type_parameters = if self.is_token(SyntaxKind::LessThanToken) {
            Some(self.parse_type_parameters()?)
        } else {
            None
        };
        let (extends, extends_type_arguments) =
            if self.parse_optional(SyntaxKind::ExtendsKeyword)? {
                let expression = self.parse_left_hand_side_expression()?;
                let type_arguments = if self.is_token(SyntaxKind::LessThanToken) {
                    Some(self.parse_type_arguments()?)
                } else {
                    None
                };
                (expression, type_arguments)
            } else {
                (NodeIndex::NONE, None)
            };
        let mut implements = Vec::new();
        if self.parse_contextual("implements")? {
            implements.push(self.parse_heritage_type_reference()?);
            while self.parse_optional(SyntaxKind::CommaToken)? {
                implements.push(self.parse_heritage_type_reference()?);
            }
        }
        let members = self.parse_class_members()?;
        let data = ClassData {
            decorators,
            name,
            type_parameters,
            extends,
            extends_type_arguments,
            implements: implements.into(),
            members,
            is_abstract,
            declare,
        };
        Ok(self.finish(
            start_pos,
            if is_expression {
                NodeData::ClassExpression(data)
            } else {
                NodeData::ClassDeclaration(data)
            },
        ))
    }

    /// `A.B<T>` in `implements` and interface `extends` clauses.
    fn parse_heritage_type_reference(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let type_name = self.parse_entity_name(false)?;
        let type_arguments = if self.is_token(SyntaxKind::LessThanToken) {
            Some(self.parse_type_arguments()?)
        } else {
            None
        };
        Ok(self.finish(
            start_pos,
            NodeData::TypeReference(TypeReferenceData {
                type_name,
                type_arguments,
            }),
        ))
    }

    fn parse_class_members(&mut self) -> Result<NodeList> {
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            if self.is_token(SyntaxKind::EndOfFileToken) {
                return Err(self.error_at_token("'}' expected."));
            }
            if self.parse_optional(SyntaxKind::SemicolonToken)? {
                continue;
            }
            members.push(self.guarded(|p| p.parse_class_member())?);
        }
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(members.into())
    }

    fn parse_class_member(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        if self.is_contextual("static") {
            let (next, _) = self.look_ahead_token();
            if next == SyntaxKind::OpenBraceToken {
                self.next_token()?;
                self.parse_expected(SyntaxKind::OpenBraceToken)?;
                let statements = self.with_context(
                    ParserContext::empty(),
                    ParserContext::GENERATOR | ParserContext::DISALLOW_IN,
                    |p| p.parse_statements(),
                )?;
                self.parse_expected(SyntaxKind::CloseBraceToken)?;
                return Ok(self.finish(
                    start_pos,
                    NodeData::ClassStaticBlock(StatementsData { statements }),
                ));
            }
        }

        let decorators = if self.is_token(SyntaxKind::AtToken) {
            self.parse_decorators()?
        } else {
            NodeList::new()
        };
        let modifiers = self.parse_class_member_modifiers()?;
        let is_async = modifiers.contains(ModifierFlags::ASYNC);
        let modifiers = modifiers - ModifierFlags::ASYNC;

        if self.is_index_signature() {
            return self.parse_index_signature(start_pos, modifiers);
        }

        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken)?;
        let mut kind = MethodKind::Method;
        if !is_generator
            && (self.is_contextual("get") || self.is_contextual("set"))
            && self.look_ahead_is_member_modifier()
        {
            kind = if self.is_contextual("get") {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            self.next_token()?;
        } else if self.is_contextual("constructor") {
            let (next, _) = self.look_ahead_token();
            if next == SyntaxKind::OpenParenToken {
                kind = MethodKind::Constructor;
            }
        }

        let name = self.parse_property_name()?;
        let question = self.parse_optional(SyntaxKind::QuestionToken)?;
        if kind != MethodKind::Method
            || is_generator
            || matches!(
                self.token(),
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
            )
        {
            let function = self.parse_function_signature_and_body(is_generator, is_async, true)?;
            return Ok(self.finish(
                start_pos,
                NodeData::MethodDeclaration(MethodData {
                    decorators,
                    kind,
                    modifiers,
                    name,
                    question,
                    function,
                }),
            ));
        }

        let exclamation = !question && self.parse_optional(SyntaxKind::ExclamationToken)?;
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken)? {
            self.parse_type()?
        } else {
            NodeIndex::NONE
        };
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken)? {
            self.with_context(
                ParserContext::empty(),
                ParserContext::GENERATOR | ParserContext::DISALLOW_IN,
                |p| p.parse_assignment_expression(),
            )?
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon()?;
        Ok(self.finish(
            start_pos,
            NodeData::PropertyDeclaration(PropertyDeclarationData {
                decorators,
                modifiers,
                name,
                question,
                exclamation,
                type_annotation,
                initializer,
            }),
        ))
    }

    fn parse_class_member_modifiers(&mut self) -> Result<ModifierFlags> {
        let mut modifiers = ModifierFlags::empty();
        while self.is_identifier() {
            let Some(flag) = ModifierFlags::from_text(self.scanner.token_text()) else {
                break;
            };
            if matches!(flag, ModifierFlags::IN | ModifierFlags::OUT | ModifierFlags::CONST) {
                break;
            }
            if !self.look_ahead_is_member_modifier() {
                break;
            }
            if flag == ModifierFlags::ASYNC && self.next_token_is_on_new_line() {
                break;
            }
            modifiers |= flag;
            self.next_token()?;
        }
        Ok(modifiers)
    }

    fn next_token_is_on_new_line(&mut self) -> bool {
        let (_, line_break) = self.look_ahead_token();
        line_break
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_if_statement(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::IfKeyword)?;
        let condition = self.parse_parenthesized_condition()?;
        let then_statement = self.parse_statement()?;
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword)? {
            self.parse_statement()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish(
            start_pos,
            NodeData::IfStatement(IfData {
                condition,
                then_statement,
                else_statement,
            }),
        ))
    }

    fn parse_parenthesized_condition(&mut self) -> Result<NodeIndex> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let condition = self.allow_in(|p| p.parse_expression())?;
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(condition)
    }

    fn parse_do_statement(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::DoKeyword)?;
        let statement = self.parse_statement()?;
        self.parse_expected(SyntaxKind::WhileKeyword)?;
        let condition = self.parse_parenthesized_condition()?;
        // ASI after `do ... while (x)` applies even without a line break.
        self.parse_optional(SyntaxKind::SemicolonToken)?;
        Ok(self.finish(
            start_pos,
            NodeData::DoStatement(LoopData {
                condition,
                statement,
            }),
        ))
    }

    fn parse_while_statement(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::WhileKeyword)?;
        let condition = self.parse_parenthesized_condition()?;
        let statement = self.parse_statement()?;
        Ok(self.finish(
            start_pos,
            NodeData::WhileStatement(LoopData {
                condition,
                statement,
            }),
        ))
    }

    fn parse_for_statement(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::ForKeyword)?;
        let is_await = self.parse_contextual("await")?;
        self.parse_expected(SyntaxKind::OpenParenToken)?;

        let initializer = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.with_context(ParserContext::DISALLOW_IN, ParserContext::empty(), |p| {
                let is_declaration = p.is_token(SyntaxKind::VarKeyword)
                    || p.is_token(SyntaxKind::ConstKeyword)
                    || (p.is_contextual("let") && p.look_ahead_is_let_declaration());
                if is_declaration {
                    let list_pos = p.token_pos();
                    let (kind, declarations) = p.parse_variable_declaration_list()?;
                    Ok(p.finish(
                        list_pos,
                        NodeData::VariableStatement(VariableStatementData {
                            kind,
                            declarations,
                            declare: false,
                        }),
                    ))
                } else {
                    p.parse_expression()
                }
            })?
        };

        if initializer.is_some() && (self.is_contextual("of") || self.is_token(SyntaxKind::InKeyword))
        {
            let is_of = self.is_contextual("of");
            self.next_token()?;
            let expression = if is_of {
                self.allow_in(|p| p.parse_assignment_expression())?
            } else {
                self.allow_in(|p| p.parse_expression())?
            };
            self.parse_expected(SyntaxKind::CloseParenToken)?;
            let statement = self.parse_statement()?;
            let data = ForInOfData {
                is_await,
                initializer,
                expression,
                statement,
            };
            return Ok(self.finish(
                start_pos,
                if is_of {
                    NodeData::ForOfStatement(data)
                } else {
                    NodeData::ForInStatement(data)
                },
            ));
        }

        self.parse_expected(SyntaxKind::SemicolonToken)?;
        let condition = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.allow_in(|p| p.parse_expression())?
        };
        self.parse_expected(SyntaxKind::SemicolonToken)?;
        let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.allow_in(|p| p.parse_expression())?
        };
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        let statement = self.parse_statement()?;
        Ok(self.finish(
            start_pos,
            NodeData::ForStatement(ForData {
                initializer,
                condition,
                incrementor,
                statement,
            }),
        ))
    }

    fn parse_return_or_throw(&mut self, is_return: bool) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.next_token()?;
        let expression = if is_return && self.can_insert_semicolon() {
            NodeIndex::NONE
        } else {
            if !is_return && self.has_preceding_line_break() {
                return Err(self.error_at_token("Line break not permitted here."));
            }
            self.allow_in(|p| p.parse_expression())?
        };
        self.parse_semicolon()?;
        let data = ExpressionData { expression };
        Ok(self.finish(
            start_pos,
            if is_return {
                NodeData::ReturnStatement(data)
            } else {
                NodeData::ThrowStatement(data)
            },
        ))
    }

    fn parse_jump_statement(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let is_break = self.is_token(SyntaxKind::BreakKeyword);
        self.next_token()?;
        let label = if self.is_identifier() && !self.has_preceding_line_break() {
            self.parse_identifier()?
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon()?;
        let data = JumpData { label };
        Ok(self.finish(
            start_pos,
            if is_break {
                NodeData::BreakStatement(data)
            } else {
                NodeData::ContinueStatement(data)
            },
        ))
    }

    fn parse_try_statement(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::TryKeyword)?;
        let block = self.parse_block()?;
        let catch_clause = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_pos = self.token_pos();
            self.next_token()?;
            let (variable, type_annotation) = if self.parse_optional(SyntaxKind::OpenParenToken)? {
                let variable = self.parse_binding_name()?;
                let type_annotation = if self.parse_optional(SyntaxKind::ColonToken)? {
                    self.parse_type()?
                } else {
                    NodeIndex::NONE
                };
                self.parse_expected(SyntaxKind::CloseParenToken)?;
                (variable, type_annotation)
            } else {
                (NodeIndex::NONE, NodeIndex::NONE)
            };
            let block = self.parse_block()?;
            self.finish(
                catch_pos,
                NodeData::CatchClause(CatchClauseData {
                    variable,
                    type_annotation,
                    block,
                }),
            )
        } else {
            NodeIndex::NONE
        };
        let finally_block = if self.parse_optional(SyntaxKind::FinallyKeyword)? {
            self.parse_block()?
        } else {
            NodeIndex::NONE
        };
        if catch_clause.is_none() && finally_block.is_none() {
            return Err(self.error_at_token("'catch' or 'finally' expected."));
        }
        Ok(self.finish(
            start_pos,
            NodeData::TryStatement(TryData {
                block,
                catch_clause,
                finally_block,
            }),
        ))
    }

    fn parse_switch_statement(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::SwitchKeyword)?;
        let expression = self.parse_parenthesized_condition()?;
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut cases = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            let case_pos = self.token_pos();
            let test = if self.parse_optional(SyntaxKind::CaseKeyword)? {
                self.allow_in(|p| p.parse_expression())?
            } else if self.parse_optional(SyntaxKind::DefaultKeyword)? {
                NodeIndex::NONE
            } else {
                return Err(self.error_at_token("'case' or 'default' expected."));
            };
            self.parse_expected(SyntaxKind::ColonToken)?;
            let mut statements = Vec::new();
            while !matches!(
                self.token(),
                SyntaxKind::CaseKeyword
                    | SyntaxKind::DefaultKeyword
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::EndOfFileToken
            ) {
                statements.push(self.parse_statement()?);
            }
            cases.push(self.finish(
                case_pos,
                NodeData::CaseClause(CaseClauseData {
                    test,
                    statements: statements.into(),
                }),
            ));
        }
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.finish(
            start_pos,
            NodeData::SwitchStatement(SwitchData {
                expression,
                cases: cases.into(),
            }),
        ))
    }

    // =========================================================================
    // Type-level declarations
    // =========================================================================

    fn parse_interface_declaration(&mut self, start_pos: u32, declare: bool) -> Result<NodeIndex> {
        self.parse_expected_contextual("interface")?;
        let name = self.parse_identifier()?;
        let type_parameters = if self.is_token(SyntaxKind::LessThanToken) {
            Some(self.parse_type_parameters()?)
        } else {
            None
        };
        let mut extends = Vec::new();
        if self.parse_optional(SyntaxKind::ExtendsKeyword)? {
            extends.push(self.parse_heritage_type_reference()?);
            while self.parse_optional(SyntaxKind::CommaToken)? {
                extends.push(self.parse_heritage_type_reference()?);
            }
        }
        let members = self.parse_type_member_block()?;
        Ok(self.finish(
            start_pos,
            NodeData::InterfaceDeclaration(InterfaceData {
                declare,
                name,
                type_parameters,
                extends: extends.into(),
                members,
            }),
        ))
    }

    fn parse_type_alias_declaration(&mut self, start_pos: u32, declare: bool) -> Result<NodeIndex> {
        self.parse_expected_contextual("type")?;
        let name = self.parse_identifier()?;
        let type_parameters = if self.is_token(SyntaxKind::LessThanToken) {
            Some(self.parse_type_parameters()?)
        } else {
            None
        };
        self.parse_expected(SyntaxKind::EqualsToken)?;
        let type_node = self.parse_type()?;
        self.parse_semicolon()?;
        Ok(self.finish(
            start_pos,
            NodeData::TypeAliasDeclaration(TypeAliasData {
                declare,
                name,
                type_parameters,
                type_node,
            }),
        ))
    }

    fn parse_enum_declaration(&mut self, start_pos: u32, declare: bool) -> Result<NodeIndex> {
        let is_const = self.parse_optional(SyntaxKind::ConstKeyword)?;
        self.parse_expected(SyntaxKind::EnumKeyword)?;
        let name = self.parse_identifier()?;
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            let member_pos = self.token_pos();
            let member_name = self.parse_property_name()?;
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken)? {
                self.allow_in(|p| p.parse_assignment_expression())?
            } else {
                NodeIndex::NONE
            };
            members.push(self.finish(
                member_pos,
                NodeData::EnumMember(EnumMemberData {
                    name: member_name,
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
            NodeData::EnumDeclaration(EnumData {
                declare,
                is_const,
                name,
                members: members.into(),
            }),
        ))
    }

    /// `namespace A.B {}`, `module "m" {}`, `declare module "m";`, `declare global {}`.
    fn parse_module_declaration(&mut self, start_pos: u32, declare: bool) -> Result<NodeIndex> {
        let keyword = if self.parse_contextual("namespace")? {
            ModuleKeyword::Namespace
        } else if self.parse_contextual("module")? {
            ModuleKeyword::Module
        } else if self.is_contextual("global") {
            ModuleKeyword::Global
        } else {
            return Err(self.error_unexpected());
        };

        let name = if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_string_literal()?
        } else {
            self.parse_identifier()?
        };
        if keyword != ModuleKeyword::Global
            && self.arena.identifier_text(name).is_some()
            && self.is_token(SyntaxKind::DotToken)
        {
            let inner_pos = self.token_pos();
            self.next_token()?;
            let inner = self.parse_nested_namespace(inner_pos, keyword, declare)?;
            return Ok(self.finish(
                start_pos,
                NodeData::ModuleDeclaration(ModuleData {
                    declare,
                    keyword,
                    name,
                    body: inner,
                }),
            ));
        }
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_module_block()?
        } else {
            self.parse_semicolon()?;
            NodeIndex::NONE
        };
        Ok(self.finish(
            start_pos,
            NodeData::ModuleDeclaration(ModuleData {
                declare,
                keyword,
                name,
                body,
            }),
        ))
    }

    /// The `B.C { }` part of `namespace A.B.C { }`.
    fn parse_nested_namespace(
        &mut self,
        start_pos: u32,
        keyword: ModuleKeyword,
        declare: bool,
    ) -> Result<NodeIndex> {
        let name = self.parse_identifier()?;
        let body = if self.is_token(SyntaxKind::DotToken) {
            let inner_pos = self.token_pos();
            self.next_token()?;
            self.parse_nested_namespace(inner_pos, keyword, declare)?
        } else {
            self.parse_module_block()?
        };
        Ok(self.finish(
            start_pos,
            NodeData::ModuleDeclaration(ModuleData {
                declare,
                keyword,
                name,
                body,
            }),
        ))
    }

    fn parse_module_block(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let statements = self.parse_statements()?;
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.finish(start_pos, NodeData::ModuleBlock(StatementsData { statements })))
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn parse_import_declaration(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::ImportKeyword)?;
        if self.is_token(SyntaxKind::StringLiteral) {
            let source = self.parse_string_literal()?;
            self.parse_semicolon()?;
            return Ok(self.finish(
                start_pos,
                NodeData::ImportDeclaration(ImportDeclarationData {
                    type_only: false,
                    specifiers: NodeList::new(),
                    source,
                }),
            ));
        }

        let type_only = self.is_contextual("type")
            && self.look_ahead(|p| {
                p.next_token()?;
                Ok(p.is_token(SyntaxKind::OpenBraceToken)
                    || p.is_token(SyntaxKind::AsteriskToken)
                    || (p.is_identifier() && !p.is_contextual("from"))
                    || (p.is_contextual("from") && {
                        p.next_token()?;
                        p.is_contextual("from")
                    }))
            });
        if type_only {
            self.next_token()?;
        }

        let mut specifiers = Vec::new();
        if self.is_identifier() {
            let local_pos = self.token_pos();
            let local = self.parse_identifier()?;
            if self.is_token(SyntaxKind::EqualsToken) {
                return Err(self.error_at_token(
                    "Import assignments are not supported.",
                ));
            }
            specifiers.push(self.finish(
                local_pos,
                NodeData::ImportDefaultSpecifier(LocalSpecifierData { local }),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                return self.finish_import(start_pos, type_only, specifiers);
            }
        }
        if self.is_token(SyntaxKind::AsteriskToken) {
            let namespace_pos = self.token_pos();
            self.next_token()?;
            self.parse_expected_contextual("as")?;
            let local = self.parse_identifier()?;
            specifiers.push(self.finish(
                namespace_pos,
                NodeData::ImportNamespaceSpecifier(LocalSpecifierData { local }),
            ));
        } else if self.is_token(SyntaxKind::OpenBraceToken) {
            self.next_token()?;
            while !self.is_token(SyntaxKind::CloseBraceToken) {
                specifiers.push(self.parse_import_specifier()?);
                if !self.parse_optional(SyntaxKind::CommaToken)? {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::CloseBraceToken)?;
        } else {
            return Err(self.error_at_token("'{' expected."));
        }
        self.finish_import(start_pos, type_only, specifiers)
    }

    fn finish_import(
        &mut self,
        start_pos: u32,
        type_only: bool,
        specifiers: Vec<NodeIndex>,
    ) -> Result<NodeIndex> {
        self.parse_expected_contextual("from")?;
        let source = self.parse_string_literal()?;
        self.parse_semicolon()?;
        Ok(self.finish(
            start_pos,
            NodeData::ImportDeclaration(ImportDeclarationData {
                type_only,
                specifiers: specifiers.into(),
                source,
            }),
        ))
    }

    /// Is this `type` an inline type-only marker (`{ type A }`, `{ type A as B }`)
    /// rather than a specifier named `type`?
    fn look_ahead_is_inline_type_marker(&mut self) -> bool {
        self.is_contextual("type")
            && self.look_ahead(|p| {
                p.next_token()?;
                if p.is_token(SyntaxKind::CommaToken) || p.is_token(SyntaxKind::CloseBraceToken) {
                    return Ok(false);
                }
                if p.is_contextual("as") {
                    // `type as as B` or `type as B`: only the former marks type-only.
                    p.next_token()?;
                    if p.is_contextual("as") {
                        return Ok(true);
                    }
                    return Ok(false);
                }
                Ok(p.is_identifier_or_keyword() || p.is_token(SyntaxKind::StringLiteral))
            })
    }

    fn parse_module_export_name(&mut self) -> Result<NodeIndex> {
        if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_string_literal()
        } else {
            self.parse_identifier_name()
        }
    }

    fn parse_import_specifier(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let type_only = self.look_ahead_is_inline_type_marker();
        if type_only {
            self.next_token()?;
        }
        let imported = self.parse_module_export_name()?;
        let local = if self.parse_contextual("as")? {
            self.parse_identifier()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish(
            start_pos,
            NodeData::ImportSpecifier(ImportSpecifierData {
                type_only,
                imported,
                local,
            }),
        ))
    }

    /// Any `export ...` form; `decorators` precede `export` in `@dec export class`.
    fn parse_export_declaration(&mut self, decorators: NodeList) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::ExportKeyword)?;

        if self.parse_optional(SyntaxKind::DefaultKeyword)? {
            let declaration = self.parse_export_default_body(decorators)?;
            return Ok(self.finish(
                start_pos,
                NodeData::ExportDefaultDeclaration(ExportDefaultData { declaration }),
            ));
        }
        if !decorators.is_empty() {
            let decl_pos = self.token_pos();
            let is_abstract = self.parse_contextual("abstract")?;
            let declaration = self.parse_class(decl_pos, decorators, is_abstract, false, false)?;
            return self.finish_export_named(start_pos, false, declaration, NodeList::new(), NodeIndex::NONE);
        }
        if self.is_token(SyntaxKind::EqualsToken) {
            return Err(self.error_at_token("Export assignments are not supported."));
        }

        let type_only = self.is_contextual("type")
            && self.look_ahead(|p| {
                p.next_token()?;
                Ok(p.is_token(SyntaxKind::OpenBraceToken) || p.is_token(SyntaxKind::AsteriskToken))
            });
        if type_only {
            self.next_token()?;
        }

        if self.is_token(SyntaxKind::AsteriskToken) {
            self.next_token()?;
            let exported = if self.parse_contextual("as")? {
                self.parse_module_export_name()?
            } else {
                NodeIndex::NONE
            };
            self.parse_expected_contextual("from")?;
            let source = self.parse_string_literal()?;
            self.parse_semicolon()?;
            return Ok(self.finish(
                start_pos,
                NodeData::ExportAllDeclaration(ExportAllData {
                    type_only,
                    exported,
                    source,
                }),
            ));
        }

        if self.is_token(SyntaxKind::OpenBraceToken) {
            self.next_token()?;
            let mut specifiers = Vec::new();
            while !self.is_token(SyntaxKind::CloseBraceToken) {
                specifiers.push(self.parse_export_specifier()?);
                if !self.parse_optional(SyntaxKind::CommaToken)? {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::CloseBraceToken)?;
            let source = if self.parse_contextual("from")? {
                self.parse_string_literal()?
            } else {
                NodeIndex::NONE
            };
            self.parse_semicolon()?;
            return self.finish_export_named(
                start_pos,
                type_only,
                NodeIndex::NONE,
                specifiers.into(),
                source,
            );
        }

        let declaration = self.parse_statement()?;
        let is_declaration = matches!(
            self.arena.data(declaration),
            Some(
                NodeData::VariableStatement(_)
                    | NodeData::FunctionDeclaration(_)
                    | NodeData::ClassDeclaration(_)
                    | NodeData::InterfaceDeclaration(_)
                    | NodeData::TypeAliasDeclaration(_)
                    | NodeData::EnumDeclaration(_)
                    | NodeData::ModuleDeclaration(_)
            )
        );
        if !is_declaration {
            return Err(self.error_at_token("Declaration expected."));
        }
        self.finish_export_named(start_pos, false, declaration, NodeList::new(), NodeIndex::NONE)
    }

    fn finish_export_named(
        &mut self,
        start_pos: u32,
        type_only: bool,
        declaration: NodeIndex,
        specifiers: NodeList,
        source: NodeIndex,
    ) -> Result<NodeIndex> {
        Ok(self.finish(
            start_pos,
            NodeData::ExportNamedDeclaration(ExportNamedData {
                type_only,
                declaration,
                specifiers,
                source,
            }),
        ))
    }

    fn parse_export_default_body(&mut self, decorators: NodeList) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        if !decorators.is_empty() || self.is_token(SyntaxKind::ClassKeyword) {
            let is_abstract = self.parse_contextual("abstract")?;
            return self.parse_class(start_pos, decorators, is_abstract, false, false);
        }
        if self.is_contextual("abstract") {
            let (next, line_break) = self.look_ahead_token();
            if next == SyntaxKind::ClassKeyword && !line_break {
                self.next_token()?;
                return self.parse_class(start_pos, NodeList::new(), true, false, false);
            }
        }
        if self.is_token(SyntaxKind::FunctionKeyword)
            || (self.is_contextual("async") && self.look_ahead_is_async_function())
        {
            return self.parse_function_declaration(start_pos, false);
        }
        if self.is_contextual("interface") && self.look_ahead_is_declaration_keyword("interface") {
            return self.parse_interface_declaration(start_pos, false);
        }
        let expression = self.allow_in(|p| p.parse_assignment_expression())?;
        self.parse_semicolon()?;
        Ok(expression)
    }

    fn parse_export_specifier(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let type_only = self.look_ahead_is_inline_type_marker();
        if type_only {
            self.next_token()?;
        }
        let local = self.parse_module_export_name()?;
        let exported = if self.parse_contextual("as")? {
            self.parse_module_export_name()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish(
            start_pos,
            NodeData::ExportSpecifier(ExportSpecifierData {
                type_only,
                local,
                exported,
            }),
        ))
    }
}

//! Parser state - type annotations, type parameters and type members

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::{ParserContext, ParserState};
use gts_common::Result;
use gts_scanner::SyntaxKind;

/// Identifiers that name a keyword type when not followed by `.`.
const KEYWORD_TYPES: &[&str] = &[
    "any",
    "unknown",
    "string",
    "number",
    "boolean",
    "bigint",
    "symbol",
    "object",
    "never",
    "undefined",
    "intrinsic",
];

impl ParserState {
    // =========================================================================
    // Parse Methods - Types
    // =========================================================================

    pub(crate) fn parse_type(&mut self) -> Result<NodeIndex> {
        self.guarded(|p| p.parse_type_worker())
    }

    fn parse_type_worker(&mut self) -> Result<NodeIndex> {
        if self.is_start_of_function_type() {
            return self.parse_function_type();
        }
        let start_pos = self.token_pos();
        let check_type = self.parse_union_type()?;
        if !self.in_context(ParserContext::DISALLOW_CONDITIONAL_TYPES)
            && self.is_token(SyntaxKind::ExtendsKeyword)
            && !self.has_preceding_line_break()
        {
            self.next_token()?;
            let extends_type = self.with_context(
                ParserContext::DISALLOW_CONDITIONAL_TYPES,
                ParserContext::empty(),
                |p| p.parse_type(),
            )?;
            self.parse_expected(SyntaxKind::QuestionToken)?;
            let true_type = self.with_context(
                ParserContext::empty(),
                ParserContext::DISALLOW_CONDITIONAL_TYPES,
                |p| p.parse_type(),
            )?;
            self.parse_expected(SyntaxKind::ColonToken)?;
            let false_type = self.with_context(
                ParserContext::empty(),
                ParserContext::DISALLOW_CONDITIONAL_TYPES,
                |p| p.parse_type(),
            )?;
            return Ok(self.finish(
                start_pos,
                NodeData::ConditionalType(ConditionalTypeData {
                    check_type,
                    extends_type,
                    true_type,
                    false_type,
                }),
            ));
        }
        Ok(check_type)
    }

    /// Type in a fresh context: inside brackets conditional types are allowed again.
    fn parse_nested_type(&mut self) -> Result<NodeIndex> {
        self.with_context(
            ParserContext::empty(),
            ParserContext::DISALLOW_CONDITIONAL_TYPES,
            |p| p.parse_type(),
        )
    }

    fn is_start_of_function_type(&mut self) -> bool {
        match self.token() {
            SyntaxKind::LessThanToken => true,
            SyntaxKind::NewKeyword => true,
            SyntaxKind::Identifier if self.is_contextual("abstract") => {
                let (next, _) = self.look_ahead_token();
                next == SyntaxKind::NewKeyword
            }
            SyntaxKind::OpenParenToken => self.look_ahead(|p| {
                p.parse_parameter_list()?;
                Ok(p.is_token(SyntaxKind::EqualsGreaterThanToken))
            }),
            _ => false,
        }
    }

    fn parse_function_type(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let is_abstract = self.parse_contextual("abstract")?;
        let is_constructor = self.parse_optional(SyntaxKind::NewKeyword)?;
        let type_parameters = if self.is_token(SyntaxKind::LessThanToken) {
            Some(self.parse_type_parameters()?)
        } else {
            None
        };
        let parameters = self.parse_parameter_list()?;
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken)?;
        let return_type = self.parse_return_type()?;
        Ok(self.finish(
            start_pos,
            NodeData::FunctionType(FunctionTypeData {
                is_constructor,
                is_abstract,
                type_parameters,
                parameters,
                return_type,
            }),
        ))
    }

    /// Return type position: a type or a type predicate (`x is T`, `asserts x`).
    pub(crate) fn parse_return_type(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        if self.is_contextual("asserts") {
            let asserts_target = self.look_ahead(|p| {
                p.next_token()?;
                Ok(!p.has_preceding_line_break()
                    && (p.is_identifier() || p.is_token(SyntaxKind::ThisKeyword)))
            });
            if asserts_target {
                self.next_token()?;
                let parameter_name = self.parse_predicate_subject()?;
                let type_node = if self.is_contextual("is") && !self.has_preceding_line_break() {
                    self.next_token()?;
                    self.parse_type()?
                } else {
                    NodeIndex::NONE
                };
                return Ok(self.finish(
                    start_pos,
                    NodeData::TypePredicate(TypePredicateData {
                        asserts: true,
                        parameter_name,
                        type_node,
                    }),
                ));
            }
        }
        if self.is_identifier() || self.is_token(SyntaxKind::ThisKeyword) {
            let is_predicate = self.look_ahead(|p| {
                p.next_token()?;
                Ok(p.is_contextual("is") && !p.has_preceding_line_break())
            });
            if is_predicate {
                let parameter_name = self.parse_predicate_subject()?;
                self.next_token()?;
                let type_node = self.parse_type()?;
                return Ok(self.finish(
                    start_pos,
                    NodeData::TypePredicate(TypePredicateData {
                        asserts: false,
                        parameter_name,
                        type_node,
                    }),
                ));
            }
        }
        self.parse_type()
    }

    fn parse_predicate_subject(&mut self) -> Result<NodeIndex> {
        if self.is_token(SyntaxKind::ThisKeyword) {
            return self.finish_token(NodeData::ThisType);
        }
        self.parse_identifier()
    }

    fn parse_union_type(&mut self) -> Result<NodeIndex> {
        self.parse_union_or_intersection(SyntaxKind::BarToken)
    }

    fn parse_union_or_intersection(&mut self, separator: SyntaxKind) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let has_leading = self.parse_optional(separator)?;
        let mut types = vec![self.parse_union_or_intersection_member(separator)?];
        while self.parse_optional(separator)? {
            types.push(self.parse_union_or_intersection_member(separator)?);
        }
        if types.len() == 1 && !has_leading {
            return Ok(types[0]);
        }
        let list = NodeList::from(types);
        Ok(self.finish(
            start_pos,
            if separator == SyntaxKind::BarToken {
                NodeData::UnionType(TypesData { types: list })
            } else {
                NodeData::IntersectionType(TypesData { types: list })
            },
        ))
    }

    fn parse_union_or_intersection_member(&mut self, separator: SyntaxKind) -> Result<NodeIndex> {
        if separator == SyntaxKind::BarToken {
            return self.parse_union_or_intersection(SyntaxKind::AmpersandToken);
        }
        if self.is_start_of_function_type() {
            return self.parse_function_type();
        }
        self.parse_type_operator()
    }

    fn parse_type_operator(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        if self.is_identifier() {
            let word = self.scanner.token_text().to_string();
            if matches!(word.as_str(), "keyof" | "unique" | "readonly")
                && self.look_ahead(|p| {
                    p.next_token()?;
                    Ok(p.is_start_of_type())
                })
            {
                self.next_token()?;
                let type_node = self.parse_type_operator()?;
                return Ok(self.finish(
                    start_pos,
                    NodeData::TypeOperator(TypeOperatorData {
                        operator: word,
                        type_node,
                    }),
                ));
            }
            if word == "infer" && self.next_is_identifier_or_keyword_on_same_line() {
                self.next_token()?;
                let param_pos = self.token_pos();
                let name = self.parse_identifier()?;
                let constraint = if self.is_token(SyntaxKind::ExtendsKeyword) {
                    let has_constraint = self.look_ahead(|p| {
                        p.next_token()?;
                        p.with_context(
                            ParserContext::DISALLOW_CONDITIONAL_TYPES,
                            ParserContext::empty(),
                            |p| p.parse_type(),
                        )?;
                        Ok(!p.is_token(SyntaxKind::QuestionToken)
                            || p.in_context(ParserContext::DISALLOW_CONDITIONAL_TYPES))
                    });
                    if has_constraint {
                        self.next_token()?;
                        self.with_context(
                            ParserContext::DISALLOW_CONDITIONAL_TYPES,
                            ParserContext::empty(),
                            |p| p.parse_type(),
                        )?
                    } else {
                        NodeIndex::NONE
                    }
                } else {
                    NodeIndex::NONE
                };
                let type_parameter = self.finish(
                    param_pos,
                    NodeData::TypeParameter(TypeParameterData {
                        modifiers: ModifierFlags::empty(),
                        name,
                        constraint,
                        default: NodeIndex::NONE,
                    }),
                );
                return Ok(self.finish(
                    start_pos,
                    NodeData::InferType(TypeData {
                        type_node: type_parameter,
                    }),
                ));
            }
        }
        self.parse_postfix_type()
    }

    fn is_start_of_type(&self) -> bool {
        use SyntaxKind::*;
        matches!(
            self.token(),
            Identifier
                | StringLiteral
                | NumericLiteral
                | BigIntLiteral
                | NoSubstitutionTemplateLiteral
                | TemplateHead
                | OpenParenToken
                | OpenBracketToken
                | OpenBraceToken
                | LessThanToken
                | BarToken
                | AmpersandToken
                | MinusToken
                | NewKeyword
                | TypeOfKeyword
                | VoidKeyword
                | NullKeyword
                | ThisKeyword
                | TrueKeyword
                | FalseKeyword
                | ImportKeyword
        )
    }

    fn parse_postfix_type(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let mut type_node = self.parse_non_array_type()?;
        while self.is_token(SyntaxKind::OpenBracketToken) && !self.has_preceding_line_break() {
            self.next_token()?;
            if self.parse_optional(SyntaxKind::CloseBracketToken)? {
                type_node = self.finish(start_pos, NodeData::ArrayType(TypeData { type_node }));
            } else {
                let index_type = self.parse_nested_type()?;
                self.parse_expected(SyntaxKind::CloseBracketToken)?;
                type_node = self.finish(
                    start_pos,
                    NodeData::IndexedAccessType(IndexedAccessTypeData {
                        object_type: type_node,
                        index_type,
                    }),
                );
            }
        }
        Ok(type_node)
    }

    fn parse_non_array_type(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::Identifier => {
                let word = self.scanner.token_text().to_string();
                if KEYWORD_TYPES.contains(&word.as_str()) {
                    let (next, _) = self.look_ahead_token();
                    if next != SyntaxKind::DotToken {
                        return self.finish_token(NodeData::KeywordType(KeywordTypeData {
                            keyword: word,
                        }));
                    }
                }
                self.parse_type_reference()
            }
            SyntaxKind::VoidKeyword | SyntaxKind::NullKeyword => {
                let keyword = self.scanner.token_text().to_string();
                self.finish_token(NodeData::KeywordType(KeywordTypeData { keyword }))
            }
            SyntaxKind::ThisKeyword => self.finish_token(NodeData::ThisType),
            SyntaxKind::TypeOfKeyword => {
                let (next, _) = self.look_ahead_token();
                if next == SyntaxKind::ImportKeyword {
                    return self.parse_import_type();
                }
                self.next_token()?;
                let expr_name = self.parse_entity_name(true)?;
                let type_arguments = if self.is_token(SyntaxKind::LessThanToken)
                    && !self.has_preceding_line_break()
                {
                    Some(self.parse_type_arguments()?)
                } else {
                    None
                };
                Ok(self.finish(
                    start_pos,
                    NodeData::TypeQuery(TypeQueryData {
                        expr_name,
                        type_arguments,
                    }),
                ))
            }
            SyntaxKind::ImportKeyword => self.parse_import_type(),
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => {
                let literal = self.parse_primary_expression()?;
                Ok(self.finish(start_pos, NodeData::LiteralType(TypeData { type_node: literal })))
            }
            SyntaxKind::MinusToken => {
                self.next_token()?;
                if !matches!(
                    self.token(),
                    SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral
                ) {
                    return Err(self.error_at_token("Numeric literal expected."));
                }
                let operand = self.parse_primary_expression()?;
                let literal = self.finish(
                    start_pos,
                    NodeData::PrefixUnaryExpression(UnaryData {
                        operator: SyntaxKind::MinusToken,
                        operand,
                    }),
                );
                Ok(self.finish(start_pos, NodeData::LiteralType(TypeData { type_node: literal })))
            }
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                let (quasis, expressions) = self.parse_template_parts(|p| p.parse_type())?;
                Ok(self.finish(
                    start_pos,
                    NodeData::TemplateLiteralType(TemplateData {
                        quasis,
                        expressions,
                    }),
                ))
            }
            SyntaxKind::OpenBraceToken => {
                if self.look_ahead_is_mapped_type() {
                    self.parse_mapped_type()
                } else {
                    self.parse_type_literal()
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::OpenParenToken => {
                self.next_token()?;
                let type_node = self.parse_nested_type()?;
                self.parse_expected(SyntaxKind::CloseParenToken)?;
                Ok(self.finish(
                    start_pos,
                    NodeData::ParenthesizedType(TypeData { type_node }),
                ))
            }
            _ => Err(self.error_at_token("Type expected.")),
        }
    }

    /// `A`, `A.B.C`, `A<T>`.
    fn parse_type_reference(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let type_name = self.parse_entity_name(false)?;
        let type_arguments =
            if self.is_token(SyntaxKind::LessThanToken) && !self.has_preceding_line_break() {
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

    /// Dotted name; `allow_this` admits a leading `this` (in `typeof this.x`).
    pub(crate) fn parse_entity_name(&mut self, allow_this: bool) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let mut entity = if allow_this && self.is_token(SyntaxKind::ThisKeyword) {
            self.finish_token(NodeData::Identifier(IdentifierData {
                text: "this".to_string(),
            }))?
        } else {
            self.parse_identifier()?
        };
        while self.is_token(SyntaxKind::DotToken) {
            self.next_token()?;
            let right = if self.is_token(SyntaxKind::PrivateIdentifier) {
                self.parse_private_identifier()?
            } else {
                self.parse_identifier_name()?
            };
            entity = self.finish(
                start_pos,
                NodeData::QualifiedName(QualifiedNameData {
                    left: entity,
                    right,
                }),
            );
        }
        Ok(entity)
    }

    /// `import("mod").A.B<T>` and `typeof import("mod")`.
    fn parse_import_type(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let is_typeof = self.parse_optional(SyntaxKind::TypeOfKeyword)?;
        self.parse_expected(SyntaxKind::ImportKeyword)?;
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let argument_pos = self.token_pos();
        let literal = self.parse_string_literal()?;
        let argument = self.finish(
            argument_pos,
            NodeData::LiteralType(TypeData { type_node: literal }),
        );
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        let qualifier = if self.parse_optional(SyntaxKind::DotToken)? {
            self.parse_entity_name(false)?
        } else {
            NodeIndex::NONE
        };
        let type_arguments = if self.is_token(SyntaxKind::LessThanToken) {
            Some(self.parse_type_arguments()?)
        } else {
            None
        };
        Ok(self.finish(
            start_pos,
            NodeData::ImportType(ImportTypeData {
                is_typeof,
                argument,
                qualifier,
                type_arguments,
            }),
        ))
    }

    fn parse_tuple_type(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken) {
            elements.push(self.parse_tuple_element()?);
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        Ok(self.finish(
            start_pos,
            NodeData::TupleType(ElementsData {
                elements: elements.into(),
            }),
        ))
    }

    fn parse_tuple_element(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let is_named = self.look_ahead(|p| {
            p.parse_optional(SyntaxKind::DotDotDotToken)?;
            if !p.is_identifier_or_keyword() {
                return Ok(false);
            }
            p.next_token()?;
            p.parse_optional(SyntaxKind::QuestionToken)?;
            Ok(p.is_token(SyntaxKind::ColonToken))
        });
        if is_named {
            let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken)?;
            let name = self.parse_identifier_name()?;
            let question = self.parse_optional(SyntaxKind::QuestionToken)?;
            self.parse_expected(SyntaxKind::ColonToken)?;
            let type_node = self.parse_nested_type()?;
            return Ok(self.finish(
                start_pos,
                NodeData::NamedTupleMember(NamedTupleMemberData {
                    dot_dot_dot,
                    name,
                    question,
                    type_node,
                }),
            ));
        }
        if self.parse_optional(SyntaxKind::DotDotDotToken)? {
            let type_node = self.parse_nested_type()?;
            return Ok(self.finish(start_pos, NodeData::RestType(TypeData { type_node })));
        }
        let type_node = self.parse_nested_type()?;
        if self.parse_optional(SyntaxKind::QuestionToken)? {
            return Ok(self.finish(start_pos, NodeData::OptionalType(TypeData { type_node })));
        }
        Ok(type_node)
    }

    fn look_ahead_is_mapped_type(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token()?;
            if p.is_token(SyntaxKind::PlusToken) || p.is_token(SyntaxKind::MinusToken) {
                p.next_token()?;
                return Ok(p.is_contextual("readonly"));
            }
            if p.is_contextual("readonly") {
                p.next_token()?;
            }
            if !p.is_token(SyntaxKind::OpenBracketToken) {
                return Ok(false);
            }
            p.next_token()?;
            if !p.is_identifier_or_keyword() {
                return Ok(false);
            }
            p.next_token()?;
            Ok(p.is_token(SyntaxKind::InKeyword))
        })
    }

    fn parse_mapped_modifier(&mut self, word: &str) -> Result<Option<MappedModifier>> {
        let modifier = match self.token() {
            SyntaxKind::PlusToken => MappedModifier::Plus,
            SyntaxKind::MinusToken => MappedModifier::Minus,
            _ if word == "?" && self.is_token(SyntaxKind::QuestionToken) => {
                self.next_token()?;
                return Ok(Some(MappedModifier::Present));
            }
            _ if self.is_contextual(word) => {
                self.next_token()?;
                return Ok(Some(MappedModifier::Present));
            }
            _ => return Ok(None),
        };
        self.next_token()?;
        if word == "?" {
            self.parse_expected(SyntaxKind::QuestionToken)?;
        } else {
            self.parse_expected_contextual(word)?;
        }
        Ok(Some(modifier))
    }

    fn parse_mapped_type(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let readonly_modifier = self.parse_mapped_modifier("readonly")?;
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let param_pos = self.token_pos();
        let name = self.parse_identifier_name()?;
        self.parse_expected(SyntaxKind::InKeyword)?;
        let constraint = self.parse_nested_type()?;
        let type_parameter = self.finish(
            param_pos,
            NodeData::TypeParameter(TypeParameterData {
                modifiers: ModifierFlags::empty(),
                name,
                constraint,
                default: NodeIndex::NONE,
            }),
        );
        let name_type = if self.parse_contextual("as")? {
            self.parse_nested_type()?
        } else {
            NodeIndex::NONE
        };
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        let question_modifier = self.parse_mapped_modifier("?")?;
        let type_node = if self.parse_optional(SyntaxKind::ColonToken)? {
            self.parse_nested_type()?
        } else {
            NodeIndex::NONE
        };
        self.parse_optional(SyntaxKind::SemicolonToken)?;
        self.parse_optional(SyntaxKind::CommaToken)?;
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.finish(
            start_pos,
            NodeData::MappedType(MappedTypeData {
                readonly_modifier,
                type_parameter,
                name_type,
                question_modifier,
                type_node,
            }),
        ))
    }

    fn parse_type_literal(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let members = self.parse_type_member_block()?;
        Ok(self.finish(start_pos, NodeData::TypeLiteral(MembersData { members })))
    }

    /// `{ member; member, ... }` of type literals and interfaces.
    pub(crate) fn parse_type_member_block(&mut self) -> Result<NodeList> {
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut members = Vec::new();
        self.with_context(
            ParserContext::empty(),
            ParserContext::DISALLOW_CONDITIONAL_TYPES,
            |p| {
                while !p.is_token(SyntaxKind::CloseBraceToken)
                    && !p.is_token(SyntaxKind::EndOfFileToken)
                {
                    members.push(p.parse_type_member()?);
                    if !p.parse_optional(SyntaxKind::SemicolonToken)?
                        && !p.parse_optional(SyntaxKind::CommaToken)?
                        && !p.can_insert_semicolon()
                    {
                        return Err(p.error_at_token("';' expected."));
                    }
                }
                Ok(())
            },
        )?;
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(members.into())
    }

    fn parse_type_member(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        if matches!(
            self.token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let (type_parameters, parameters, return_type) = self.parse_signature_parts()?;
            return Ok(self.finish(
                start_pos,
                NodeData::CallSignature(SignatureData {
                    type_parameters,
                    parameters,
                    return_type,
                }),
            ));
        }
        if self.is_token(SyntaxKind::NewKeyword) {
            let (next, _) = self.look_ahead_token();
            if matches!(
                next,
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
            ) {
                self.next_token()?;
                let (type_parameters, parameters, return_type) = self.parse_signature_parts()?;
                return Ok(self.finish(
                    start_pos,
                    NodeData::ConstructSignature(SignatureData {
                        type_parameters,
                        parameters,
                        return_type,
                    }),
                ));
            }
        }

        let mut readonly = false;
        if self.is_contextual("readonly") && self.look_ahead_is_member_modifier() {
            self.next_token()?;
            readonly = true;
        }
        if self.is_index_signature() {
            let modifiers = if readonly {
                ModifierFlags::READONLY
            } else {
                ModifierFlags::empty()
            };
            return self.parse_index_signature(start_pos, modifiers);
        }

        let mut kind = MethodKind::Method;
        if (self.is_contextual("get") || self.is_contextual("set"))
            && self.look_ahead_is_member_modifier()
        {
            kind = if self.is_contextual("get") {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            self.next_token()?;
        }
        let name = self.parse_property_name()?;
        let question = self.parse_optional(SyntaxKind::QuestionToken)?;
        if kind != MethodKind::Method
            || matches!(
                self.token(),
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
            )
        {
            let (type_parameters, parameters, return_type) = self.parse_signature_parts()?;
            return Ok(self.finish(
                start_pos,
                NodeData::MethodSignature(MethodSignatureData {
                    kind,
                    name,
                    question,
                    type_parameters,
                    parameters,
                    return_type,
                }),
            ));
        }
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken)? {
            self.parse_type()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish(
            start_pos,
            NodeData::PropertySignature(PropertySignatureData {
                readonly,
                name,
                question,
                type_annotation,
            }),
        ))
    }

    fn parse_signature_parts(&mut self) -> Result<(Option<NodeList>, NodeList, NodeIndex)> {
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
        Ok((type_parameters, parameters, return_type))
    }

    /// `[key: K]` opens an index signature rather than a computed name.
    pub(crate) fn is_index_signature(&mut self) -> bool {
        if !self.is_token(SyntaxKind::OpenBracketToken) {
            return false;
        }
        self.look_ahead(|p| {
            p.next_token()?;
            if !p.is_identifier_or_keyword() {
                return Ok(false);
            }
            p.next_token()?;
            Ok(p.is_token(SyntaxKind::ColonToken))
        })
    }

    pub(crate) fn parse_index_signature(
        &mut self,
        start_pos: u32,
        modifiers: ModifierFlags,
    ) -> Result<NodeIndex> {
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let param_pos = self.token_pos();
        let name = self.parse_identifier_name()?;
        self.parse_expected(SyntaxKind::ColonToken)?;
        let key_type = self.parse_type()?;
        let mut parameter = ParameterData::new(name);
        parameter.type_annotation = key_type;
        let parameter = self.finish(param_pos, NodeData::Parameter(parameter));
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken)? {
            self.parse_type()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish(
            start_pos,
            NodeData::IndexSignature(IndexSignatureData {
                modifiers,
                parameters: NodeList::from(vec![parameter]),
                type_annotation,
            }),
        ))
    }

    // =========================================================================
    // Type parameters and arguments
    // =========================================================================

    /// Parse `<T, U extends X = Y>`.
    pub(crate) fn parse_type_parameters(&mut self) -> Result<NodeList> {
        self.parse_expected(SyntaxKind::LessThanToken)?;
        let mut parameters = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken) {
            parameters.push(self.parse_type_parameter()?);
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken)?;
        Ok(parameters.into())
    }

    fn parse_type_parameter(&mut self) -> Result<NodeIndex> {
        let start_pos = self.token_pos();
        let mut modifiers = ModifierFlags::empty();
        loop {
            let flag = match self.token() {
                SyntaxKind::ConstKeyword => ModifierFlags::CONST,
                SyntaxKind::InKeyword => ModifierFlags::IN,
                SyntaxKind::Identifier if self.is_contextual("out") => {
                    let (next, _) = self.look_ahead_token();
                    if next != SyntaxKind::Identifier {
                        break;
                    }
                    ModifierFlags::OUT
                }
                _ => break,
            };
            modifiers |= flag;
            self.next_token()?;
        }
        let name = self.parse_identifier()?;
        let constraint = if self.parse_optional(SyntaxKind::ExtendsKeyword)? {
            self.parse_type()?
        } else {
            NodeIndex::NONE
        };
        let default = if self.parse_optional(SyntaxKind::EqualsToken)? {
            self.parse_type()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish(
            start_pos,
            NodeData::TypeParameter(TypeParameterData {
                modifiers,
                name,
                constraint,
                default,
            }),
        ))
    }

    /// Parse `<A, B>`.
    pub(crate) fn parse_type_arguments(&mut self) -> Result<NodeList> {
        self.parse_expected(SyntaxKind::LessThanToken)?;
        let mut arguments = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken) {
            arguments.push(self.parse_nested_type()?);
            if !self.parse_optional(SyntaxKind::CommaToken)? {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken)?;
        Ok(arguments.into())
    }
}

//! Constructors for the synthesized nodes the lowering passes emit.
//!
//! Everything built here is `SYNTHESIZED`: it has no source range and the
//! printer writes no mappings for it. Passes that want a rewritten node to
//! keep its origin's range use `NodeArena::derive` instead.

use gts_parser::parser::node::*;
use gts_parser::{NodeArena, NodeIndex, NodeList};

pub trait NodeFactory {
    fn identifier(&mut self, text: &str) -> NodeIndex;
    fn string(&mut self, value: &str) -> NodeIndex;
    fn numeric(&mut self, text: &str) -> NodeIndex;
    fn null(&mut self) -> NodeIndex;
    fn boolean(&mut self, value: bool) -> NodeIndex;

    /// `name: value`
    fn property(&mut self, name: &str, value: NodeIndex) -> NodeIndex;
    fn object(&mut self, properties: Vec<NodeIndex>) -> NodeIndex;
    fn array(&mut self, elements: Vec<NodeIndex>) -> NodeIndex;
    fn arrow(&mut self, parameters: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex;
    fn call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex;
    /// `object.name`
    fn member(&mut self, object: NodeIndex, name: NodeIndex) -> NodeIndex;
    /// `object[argument]`
    fn element(&mut self, object: NodeIndex, argument: NodeIndex) -> NodeIndex;
    fn block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex;
    fn expression_statement(&mut self, expression: NodeIndex) -> NodeIndex;

    /// `{ a, b }` as a binding pattern.
    fn object_binding(&mut self, names: &[String]) -> NodeIndex;
    fn parameter(&mut self, name: NodeIndex, initializer: NodeIndex) -> NodeIndex;

    /// `<kind> name[: type] = init;`
    fn variable(
        &mut self,
        kind: VariableKind,
        name: NodeIndex,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex;
    fn export(&mut self, declaration: NodeIndex) -> NodeIndex;
    /// `import { imported as local, ... } from "source";`
    fn import_named(&mut self, specifiers: &[(&str, &str)], source: &str) -> NodeIndex;
    /// `import local from "source";`
    fn import_default(&mut self, local: &str, source: &str) -> NodeIndex;

    fn keyword_type(&mut self, keyword: &str) -> NodeIndex;
    fn type_reference(&mut self, name: &str) -> NodeIndex;
    fn type_alias(&mut self, name: &str, type_node: NodeIndex) -> NodeIndex;
    /// `typeof a.b.c` for a dotted path.
    fn type_query(&mut self, path: &[&str]) -> NodeIndex;
    /// `0 as any`
    fn zero_as_any(&mut self) -> NodeIndex;
}

impl NodeFactory for NodeArena {
    fn identifier(&mut self, text: &str) -> NodeIndex {
        self.create_identifier(text)
    }

    fn string(&mut self, value: &str) -> NodeIndex {
        self.create_string_literal(value)
    }

    fn numeric(&mut self, text: &str) -> NodeIndex {
        self.add_synthetic(NodeData::NumericLiteral(LiteralData {
            value: text.to_string(),
            raw: None,
        }))
    }

    fn null(&mut self) -> NodeIndex {
        self.add_synthetic(NodeData::NullLiteral)
    }

    fn boolean(&mut self, value: bool) -> NodeIndex {
        self.add_synthetic(NodeData::BooleanLiteral(value))
    }

    fn property(&mut self, name: &str, value: NodeIndex) -> NodeIndex {
        let name = self.identifier(name);
        self.add_synthetic(NodeData::PropertyAssignment(PropertyAssignmentData {
            name,
            initializer: value,
        }))
    }

    fn object(&mut self, properties: Vec<NodeIndex>) -> NodeIndex {
        self.add_synthetic(NodeData::ObjectLiteralExpression(PropertiesData {
            properties: NodeList::from(properties),
        }))
    }

    fn array(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.add_synthetic(NodeData::ArrayLiteralExpression(ElementsData {
            elements: NodeList::from(elements),
        }))
    }

    fn arrow(&mut self, parameters: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::ArrowFunction(FunctionData::new(
            NodeList::from(parameters),
            body,
        )))
    }

    fn call(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.add_synthetic(NodeData::CallExpression(CallData {
            callee,
            type_arguments: None,
            arguments: NodeList::from(arguments),
            optional: false,
        }))
    }

    fn member(&mut self, object: NodeIndex, name: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::PropertyAccessExpression(PropertyAccessData {
            expression: object,
            name,
            optional: false,
        }))
    }

    fn element(&mut self, object: NodeIndex, argument: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::ElementAccessExpression(ElementAccessData {
            expression: object,
            argument,
            optional: false,
        }))
    }

    fn block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add_synthetic(NodeData::Block(StatementsData {
            statements: NodeList::from(statements),
        }))
    }

    fn expression_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::ExpressionStatement(ExpressionData { expression }))
    }

    fn object_binding(&mut self, names: &[String]) -> NodeIndex {
        let elements = names
            .iter()
            .map(|name| {
                let name = self.identifier(name);
                self.add_synthetic(NodeData::BindingElement(BindingElementData {
                    dot_dot_dot: false,
                    property_name: NodeIndex::NONE,
                    name,
                    initializer: NodeIndex::NONE,
                }))
            })
            .collect::<Vec<_>>();
        self.add_synthetic(NodeData::ObjectBindingPattern(ElementsData {
            elements: NodeList::from(elements),
        }))
    }

    fn parameter(&mut self, name: NodeIndex, initializer: NodeIndex) -> NodeIndex {
        let mut data = ParameterData::new(name);
        data.initializer = initializer;
        self.add_synthetic(NodeData::Parameter(data))
    }

    fn variable(
        &mut self,
        kind: VariableKind,
        name: NodeIndex,
        type_annotation: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let declaration = self.add_synthetic(NodeData::VariableDeclaration(
            VariableDeclarationData {
                name,
                exclamation: false,
                type_annotation,
                initializer,
            },
        ));
        self.add_synthetic(NodeData::VariableStatement(VariableStatementData {
            kind,
            declarations: NodeList::from(vec![declaration]),
            declare: false,
        }))
    }

    fn export(&mut self, declaration: NodeIndex) -> NodeIndex {
        self.add_synthetic(NodeData::ExportNamedDeclaration(ExportNamedData {
            type_only: false,
            declaration,
            specifiers: NodeList::new(),
            source: NodeIndex::NONE,
        }))
    }

    fn import_named(&mut self, specifiers: &[(&str, &str)], source: &str) -> NodeIndex {
        let specifiers = specifiers
            .iter()
            .map(|(imported, local)| {
                let imported = self.identifier(imported);
                let local = self.identifier(local);
                self.add_synthetic(NodeData::ImportSpecifier(ImportSpecifierData {
                    type_only: false,
                    imported,
                    local,
                }))
            })
            .collect::<Vec<_>>();
        let source = self.string(source);
        self.add_synthetic(NodeData::ImportDeclaration(ImportDeclarationData {
            type_only: false,
            specifiers: NodeList::from(specifiers),
            source,
        }))
    }

    fn import_default(&mut self, local: &str, source: &str) -> NodeIndex {
        let local = self.identifier(local);
        let specifier =
            self.add_synthetic(NodeData::ImportDefaultSpecifier(LocalSpecifierData { local }));
        let source = self.string(source);
        self.add_synthetic(NodeData::ImportDeclaration(ImportDeclarationData {
            type_only: false,
            specifiers: NodeList::from(vec![specifier]),
            source,
        }))
    }

    fn keyword_type(&mut self, keyword: &str) -> NodeIndex {
        self.add_synthetic(NodeData::KeywordType(KeywordTypeData {
            keyword: keyword.to_string(),
        }))
    }

    fn type_reference(&mut self, name: &str) -> NodeIndex {
        let type_name = self.identifier(name);
        self.add_synthetic(NodeData::TypeReference(TypeReferenceData {
            type_name,
            type_arguments: None,
        }))
    }

    fn type_alias(&mut self, name: &str, type_node: NodeIndex) -> NodeIndex {
        let name = self.identifier(name);
        self.add_synthetic(NodeData::TypeAliasDeclaration(TypeAliasData {
            declare: false,
            name,
            type_parameters: None,
            type_node,
        }))
    }

    fn type_query(&mut self, path: &[&str]) -> NodeIndex {
        let mut segments = path.iter();
        let mut expr_name = match segments.next() {
            Some(first) => self.identifier(first),
            None => NodeIndex::NONE,
        };
        for segment in segments {
            let right = self.identifier(segment);
            expr_name = self.add_synthetic(NodeData::QualifiedName(QualifiedNameData {
                left: expr_name,
                right,
            }));
        }
        self.add_synthetic(NodeData::TypeQuery(TypeQueryData {
            expr_name,
            type_arguments: None,
        }))
    }

    fn zero_as_any(&mut self) -> NodeIndex {
        let zero = self.numeric("0");
        let any = self.keyword_type("any");
        self.add_synthetic(NodeData::AsExpression(TypeAssertionData {
            expression: zero,
            type_node: any,
        }))
    }
}

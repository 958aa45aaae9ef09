use super::Printer;
use gts_parser::NodeList;
use gts_parser::parser::node::*;

impl<'a> Printer<'a> {
    pub(super) fn emit_type_node(&mut self, node: &Node) {
        use NodeData as D;
        match &node.data {
            D::KeywordType(keyword) => self.write(&keyword.keyword),
            D::ThisType => self.write("this"),
            D::TypeReference(reference) => {
                self.emit(reference.type_name);
                self.emit_type_arguments(reference.type_arguments.as_ref());
            }
            D::QualifiedName(name) => {
                self.emit(name.left);
                self.write(".");
                self.emit(name.right);
            }
            D::ArrayType(array) => {
                self.emit(array.type_node);
                self.write("[]");
            }
            D::TupleType(tuple) => {
                self.write("[");
                self.emit_comma_list(&tuple.elements);
                self.write("]");
            }
            D::NamedTupleMember(member) => {
                if member.dot_dot_dot {
                    self.write("...");
                }
                self.emit(member.name);
                if member.question {
                    self.write("?");
                }
                self.write(": ");
                self.emit(member.type_node);
            }
            D::OptionalType(optional) => {
                self.emit(optional.type_node);
                self.write("?");
            }
            D::RestType(rest) => {
                self.write("...");
                self.emit(rest.type_node);
            }
            D::UnionType(union) => self.emit_separated(&union.types, " | "),
            D::IntersectionType(intersection) => self.emit_separated(&intersection.types, " & "),
            D::FunctionType(function) => self.emit_function_type(function),
            D::TypeLiteral(literal) => self.emit_type_members(node, &literal.members),
            D::PropertySignature(prop) => {
                if prop.readonly {
                    self.write("readonly ");
                }
                self.emit(prop.name);
                if prop.question {
                    self.write("?");
                }
                self.emit_type_annotation(prop.type_annotation);
            }
            D::MethodSignature(method) => {
                match method.kind {
                    MethodKind::Get => self.write("get "),
                    MethodKind::Set => self.write("set "),
                    MethodKind::Method | MethodKind::Constructor => {}
                }
                self.emit(method.name);
                if method.question {
                    self.write("?");
                }
                self.emit_type_parameters(method.type_parameters.as_ref());
                self.emit_parameter_list(&method.parameters);
                self.emit_type_annotation(method.return_type);
            }
            D::CallSignature(sig) => self.emit_signature(sig),
            D::ConstructSignature(sig) => {
                self.write("new ");
                self.emit_signature(sig);
            }
            D::TypeQuery(query) => {
                self.write("typeof ");
                self.emit(query.expr_name);
                self.emit_type_arguments(query.type_arguments.as_ref());
            }
            D::TypeOperator(operator) => {
                self.write(&operator.operator);
                self.write_space();
                self.emit(operator.type_node);
            }
            D::IndexedAccessType(access) => {
                self.emit(access.object_type);
                self.write("[");
                self.emit(access.index_type);
                self.write("]");
            }
            D::ConditionalType(cond) => {
                self.emit(cond.check_type);
                self.write(" extends ");
                self.emit(cond.extends_type);
                self.write(" ? ");
                self.emit(cond.true_type);
                self.write(" : ");
                self.emit(cond.false_type);
            }
            D::InferType(infer) => {
                self.write("infer ");
                self.emit(infer.type_node);
            }
            D::MappedType(mapped) => self.emit_mapped_type(mapped),
            D::LiteralType(literal) => self.emit(literal.type_node),
            D::ParenthesizedType(paren) => {
                self.write("(");
                self.emit(paren.type_node);
                self.write(")");
            }
            D::TypePredicate(predicate) => {
                if predicate.asserts {
                    self.write("asserts ");
                }
                self.emit(predicate.parameter_name);
                if predicate.type_node.is_some() {
                    self.write(" is ");
                    self.emit(predicate.type_node);
                }
            }
            D::TemplateLiteralType(template) => self.emit_template(template),
            D::TypeParameter(param) => {
                self.emit_modifiers(param.modifiers);
                self.emit(param.name);
                if param.constraint.is_some() {
                    self.write(" extends ");
                    self.emit(param.constraint);
                }
                if param.default.is_some() {
                    self.write(" = ");
                    self.emit(param.default);
                }
            }
            D::ImportType(import) => {
                if import.is_typeof {
                    self.write("typeof ");
                }
                self.write("import(");
                self.emit(import.argument);
                self.write(")");
                if import.qualifier.is_some() {
                    self.write(".");
                    self.emit(import.qualifier);
                }
                self.emit_type_arguments(import.type_arguments.as_ref());
            }
            _ => {}
        }
    }

    fn emit_function_type(&mut self, function: &FunctionTypeData) {
        if function.is_abstract {
            self.write("abstract ");
        }
        if function.is_constructor {
            self.write("new ");
        }
        self.emit_type_parameters(function.type_parameters.as_ref());
        self.emit_parameter_list(&function.parameters);
        self.write(" => ");
        self.emit(function.return_type);
    }

    fn emit_signature(&mut self, sig: &SignatureData) {
        self.emit_type_parameters(sig.type_parameters.as_ref());
        self.emit_parameter_list(&sig.parameters);
        self.emit_type_annotation(sig.return_type);
    }

    /// `{ [K in T as N]?: V }`
    fn emit_mapped_type(&mut self, mapped: &MappedTypeData) {
        self.write("{ ");
        if let Some(modifier) = mapped.readonly_modifier {
            self.write(modifier.prefix());
            self.write("readonly ");
        }
        self.write("[");
        if let Some(NodeData::TypeParameter(param)) = self.arena.data(mapped.type_parameter) {
            self.emit(param.name);
            self.write(" in ");
            self.emit(param.constraint);
        }
        if mapped.name_type.is_some() {
            self.write(" as ");
            self.emit(mapped.name_type);
        }
        self.write("]");
        if let Some(modifier) = mapped.question_modifier {
            self.write(modifier.prefix());
            self.write("?");
        }
        self.emit_type_annotation(mapped.type_node);
        self.write(" }");
    }

    /// Interface bodies and type literals; members end in `;`.
    pub(super) fn emit_type_members(&mut self, node: &Node, members: &NodeList) {
        if members.is_empty() {
            self.write("{}");
            return;
        }
        if !self.spans_lines(node) {
            self.write("{ ");
            self.emit_separated(members, "; ");
            self.write(" }");
            return;
        }
        self.write("{");
        self.increase_indent();
        for member in members.iter() {
            self.ensure_line_break();
            self.emit_statement_with_suffix(member, ";");
        }
        self.decrease_indent();
        self.ensure_line_break();
        self.write("}");
    }
}

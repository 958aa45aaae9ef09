use super::Printer;
use gts_parser::parser::node::*;
use gts_parser::{NodeIndex, NodeList};
use gts_scanner::{SyntaxKind, token_text};

impl<'a> Printer<'a> {
    // =========================================================================
    // Literals
    // =========================================================================

    /// Source spelling when known, otherwise a double-quoted JSON string.
    pub(super) fn emit_string_literal(&mut self, lit: &LiteralData) {
        match &lit.raw {
            Some(raw) => self.write(raw),
            None => {
                let quoted = serde_json::to_string(&lit.value).unwrap_or_default();
                self.write(&quoted);
            }
        }
    }

    pub(super) fn emit_template(&mut self, template: &TemplateData) {
        self.write("`");
        for (i, quasi) in template.quasis.iter().enumerate() {
            self.emit_node(quasi);
            if let Some(expr) = template.expressions.nodes.get(i) {
                self.write("${");
                self.emit(*expr);
                self.write("}");
            }
        }
        self.write("`");
    }

    pub(super) fn emit_tagged_template(&mut self, tagged: &TaggedTemplateData) {
        self.emit_operand(tagged.tag);
        self.emit_type_arguments(tagged.type_arguments.as_ref());
        self.emit(tagged.quasi);
    }

    // =========================================================================
    // Array / Object literals
    // =========================================================================

    /// `[a, , b]`; a trailing hole keeps its comma.
    pub(super) fn emit_array_literal(&mut self, elements: &NodeList) {
        self.write("[");
        self.emit_comma_list(elements);
        if let Some(last) = elements.last()
            && matches!(self.arena.data(last), Some(NodeData::OmittedExpression))
        {
            self.write(",");
        }
        self.write("]");
    }

    pub(super) fn emit_object_literal(&mut self, node: &Node, object: &PropertiesData) {
        if object.properties.is_empty() {
            self.write("{}");
            return;
        }
        if !self.spans_lines(node) {
            self.write("{ ");
            self.emit_comma_list(&object.properties);
            self.write(" }");
            return;
        }
        self.write("{");
        self.increase_indent();
        for property in object.properties.iter() {
            self.write_line();
            self.emit(property);
            self.write(",");
        }
        self.decrease_indent();
        self.write_line();
        self.write("}");
    }

    pub(super) fn emit_property_assignment(&mut self, prop: &PropertyAssignmentData) {
        self.emit(prop.name);
        self.write(": ");
        self.emit(prop.initializer);
    }

    pub(super) fn emit_shorthand_property(&mut self, prop: &ShorthandPropertyData) {
        self.emit(prop.name);
        self.emit_initializer(prop.initializer);
    }

    pub(super) fn emit_object_binding_pattern(&mut self, elements: &NodeList) {
        if elements.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{ ");
        self.emit_comma_list(elements);
        self.write(" }");
    }

    pub(super) fn emit_binding_element(&mut self, element: &BindingElementData) {
        if element.dot_dot_dot {
            self.write("...");
        }
        if element.property_name.is_some() {
            self.emit(element.property_name);
            self.write(": ");
        }
        self.emit(element.name);
        self.emit_initializer(element.initializer);
    }

    // =========================================================================
    // Member access and calls
    // =========================================================================

    /// Synthesized low-precedence expressions need parentheses as the object
    /// of a member access or call; parsed ones keep their own.
    fn needs_operand_parens(&self, idx: NodeIndex) -> bool {
        let Some(node) = self.arena.get(idx) else {
            return false;
        };
        node.is_synthesized()
            && matches!(
                node.data,
                NodeData::ArrowFunction(_)
                    | NodeData::FunctionExpression(_)
                    | NodeData::BinaryExpression(_)
                    | NodeData::ConditionalExpression(_)
                    | NodeData::YieldExpression(_)
                    | NodeData::AwaitExpression(_)
                    | NodeData::PrefixUnaryExpression(_)
                    | NodeData::AsExpression(_)
                    | NodeData::SatisfiesExpression(_)
            )
    }

    pub(super) fn emit_operand(&mut self, idx: NodeIndex) {
        if self.needs_operand_parens(idx) {
            self.write("(");
            self.emit(idx);
            self.write(")");
        } else {
            self.emit(idx);
        }
    }

    pub(super) fn emit_property_access(&mut self, access: &PropertyAccessData) {
        self.emit_operand(access.expression);
        self.write(if access.optional { "?." } else { "." });
        self.emit(access.name);
    }

    pub(super) fn emit_element_access(&mut self, access: &ElementAccessData) {
        self.emit_operand(access.expression);
        self.write(if access.optional { "?.[" } else { "[" });
        self.emit(access.argument);
        self.write("]");
    }

    pub(super) fn emit_call_expression(&mut self, call: &CallData) {
        self.emit_operand(call.callee);
        if call.optional {
            self.write("?.");
        }
        self.emit_type_arguments(call.type_arguments.as_ref());
        self.write("(");
        self.emit_comma_list(&call.arguments);
        self.write(")");
    }

    pub(super) fn emit_new_expression(&mut self, new: &NewData) {
        self.write("new ");
        self.emit_operand(new.callee);
        self.emit_type_arguments(new.type_arguments.as_ref());
        if let Some(arguments) = &new.arguments {
            self.write("(");
            self.emit_comma_list(arguments);
            self.write(")");
        }
    }

    // =========================================================================
    // Functions
    // =========================================================================

    pub(super) fn emit_function(
        &mut self,
        idx: NodeIndex,
        function: &FunctionData,
        is_declaration: bool,
    ) {
        if is_declaration && function.declare {
            self.write("declare ");
        }
        if function.is_async {
            self.write("async ");
        }
        self.write("function");
        if function.is_generator {
            self.write("*");
        }
        if function.name.is_some() {
            self.write_space();
            self.emit(function.name);
        }
        self.emit_signature_and_body(idx, function);
    }

    /// Type parameters, parameters, return type and body (or `;`).
    pub(super) fn emit_signature_and_body(&mut self, idx: NodeIndex, function: &FunctionData) {
        self.emit_type_parameters(function.type_parameters.as_ref());
        self.emit_parameter_list(&function.parameters);
        self.emit_type_annotation(function.return_type);
        if function.body.is_none() {
            self.write(";");
            return;
        }
        self.emit_dangling_comments(idx);
        self.write_space();
        self.emit(function.body);
    }

    pub(super) fn emit_arrow_function(&mut self, idx: NodeIndex, function: &FunctionData) {
        if function.is_async {
            self.write("async ");
        }
        self.emit_type_parameters(function.type_parameters.as_ref());
        self.emit_parameter_list(&function.parameters);
        self.emit_type_annotation(function.return_type);
        self.emit_dangling_comments(idx);
        self.write(" => ");
        match self.arena.data(function.body) {
            Some(NodeData::ObjectLiteralExpression(_)) => {
                self.write("(");
                self.emit(function.body);
                self.write(")");
            }
            _ => self.emit(function.body),
        }
    }

    // =========================================================================
    // Operators
    // =========================================================================

    pub(super) fn emit_prefix_unary(&mut self, unary: &UnaryData) {
        let operator = token_text(unary.operator);
        self.write(operator);
        if self.needs_space_after_prefix(unary.operator, unary.operand) {
            self.write_space();
        }
        self.emit(unary.operand);
    }

    /// `typeof x`, `- -x`, `+ ++x`.
    fn needs_space_after_prefix(&self, operator: SyntaxKind, operand: NodeIndex) -> bool {
        if operator.is_keyword() {
            return true;
        }
        let Some(NodeData::PrefixUnaryExpression(inner)) = self.arena.data(operand) else {
            return false;
        };
        matches!(
            (operator, inner.operator),
            (SyntaxKind::PlusToken, SyntaxKind::PlusToken | SyntaxKind::PlusPlusToken)
                | (
                    SyntaxKind::MinusToken,
                    SyntaxKind::MinusToken | SyntaxKind::MinusMinusToken
                )
        )
    }

    pub(super) fn emit_postfix_unary(&mut self, unary: &UnaryData) {
        self.emit(unary.operand);
        self.write(token_text(unary.operator));
    }

    pub(super) fn emit_yield(&mut self, expr: &YieldData) {
        self.write("yield");
        if expr.delegate {
            self.write("*");
        }
        if expr.expression.is_some() {
            self.write_space();
            self.emit(expr.expression);
        }
    }

    pub(super) fn emit_binary_expression(&mut self, binary: &BinaryData) {
        self.emit(binary.left);
        if binary.operator == SyntaxKind::CommaToken {
            self.write(", ");
        } else {
            self.write_space();
            self.write(token_text(binary.operator));
            self.write_space();
        }
        self.emit(binary.right);
    }

    pub(super) fn emit_conditional(&mut self, cond: &ConditionalData) {
        self.emit(cond.condition);
        self.write(" ? ");
        self.emit(cond.when_true);
        self.write(" : ");
        self.emit(cond.when_false);
    }

    pub(super) fn emit_type_assertion(&mut self, assertion: &TypeAssertionData, keyword: &str) {
        self.emit(assertion.expression);
        self.write_space();
        self.write(keyword);
        self.write_space();
        self.emit(assertion.type_node);
    }
}

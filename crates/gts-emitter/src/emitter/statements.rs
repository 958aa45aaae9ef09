use super::Printer;
use gts_parser::parser::node::*;
use gts_parser::{NodeIndex, NodeList};

impl<'a> Printer<'a> {
    // =========================================================================
    // Statement lists
    // =========================================================================

    fn is_empty_statement(&self, idx: NodeIndex) -> bool {
        matches!(self.arena.data(idx), Some(NodeData::EmptyStatement) | None)
    }

    /// Statements one per line. Empty statements are dropped, which is how
    /// erased declarations disappear from the output.
    pub(super) fn emit_statement_list(&mut self, statements: &NodeList) {
        for statement in statements.iter() {
            if self.is_empty_statement(statement) {
                continue;
            }
            self.ensure_line_break();
            self.emit_statement(statement);
        }
    }

    pub(super) fn emit_source_file(&mut self, statements: &NodeList) {
        self.emit_statement_list(statements);
    }

    pub(super) fn emit_block(&mut self, idx: NodeIndex, statements: &NodeList) {
        self.write("{");
        let has_statements = statements.iter().any(|s| !self.is_empty_statement(s));
        if !has_statements {
            self.increase_indent();
            let wrote_comments = self.emit_inner_comments(idx);
            self.decrease_indent();
            if wrote_comments {
                self.write_line();
            }
            self.write("}");
            return;
        }
        self.increase_indent();
        self.emit_statement_list(statements);
        self.decrease_indent();
        self.ensure_line_break();
        self.write("}");
    }

    /// The body of `if`/`for`/`while`: a block stays on the same line, any
    /// other statement goes on its own indented line.
    pub(super) fn emit_embedded_statement(&mut self, idx: NodeIndex) {
        if matches!(self.arena.data(idx), Some(NodeData::Block(_))) {
            self.write_space();
            self.emit_statement(idx);
            return;
        }
        if self.is_empty_statement(idx) {
            self.write(";");
            return;
        }
        self.increase_indent();
        self.write_line();
        self.emit_statement(idx);
        self.decrease_indent();
    }

    // =========================================================================
    // Simple statements
    // =========================================================================

    /// Leftmost expression of `idx`, the one whose first token starts the
    /// printed expression.
    fn leftmost_expression(&self, mut idx: NodeIndex) -> NodeIndex {
        loop {
            let next = match self.arena.data(idx) {
                Some(NodeData::CallExpression(call)) => call.callee,
                Some(NodeData::PropertyAccessExpression(access)) => access.expression,
                Some(NodeData::ElementAccessExpression(access)) => access.expression,
                Some(NodeData::TaggedTemplateExpression(tagged)) => tagged.tag,
                Some(NodeData::BinaryExpression(binary)) => binary.left,
                Some(NodeData::ConditionalExpression(cond)) => cond.condition,
                Some(NodeData::PostfixUnaryExpression(unary)) => unary.operand,
                Some(NodeData::NonNullExpression(expr)) => expr.expression,
                Some(NodeData::AsExpression(assertion) | NodeData::SatisfiesExpression(assertion)) => {
                    assertion.expression
                }
                _ => return idx,
            };
            idx = next;
        }
    }

    pub(super) fn emit_expression_statement(&mut self, stmt: &ExpressionData) {
        let leftmost = self.leftmost_expression(stmt.expression);
        let needs_parens = matches!(
            self.arena.data(leftmost),
            Some(
                NodeData::ObjectLiteralExpression(_)
                    | NodeData::FunctionExpression(_)
                    | NodeData::ClassExpression(_)
            )
        );
        if needs_parens {
            self.write("(");
            self.emit(stmt.expression);
            self.write(")");
        } else {
            self.emit(stmt.expression);
        }
        self.write(";");
    }

    fn emit_variable_declaration_list(&mut self, stmt: &VariableStatementData) {
        if stmt.declare {
            self.write("declare ");
        }
        self.write(stmt.kind.keyword());
        self.write_space();
        self.emit_comma_list(&stmt.declarations);
    }

    pub(super) fn emit_variable_statement(&mut self, stmt: &VariableStatementData) {
        self.emit_variable_declaration_list(stmt);
        self.write(";");
    }

    pub(super) fn emit_variable_declaration(&mut self, decl: &VariableDeclarationData) {
        self.emit(decl.name);
        if decl.exclamation {
            self.write("!");
        }
        self.emit_type_annotation(decl.type_annotation);
        self.emit_initializer(decl.initializer);
    }

    /// `for` heads hold a declaration list without its semicolon.
    fn emit_for_initializer(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        match arena.data(idx) {
            Some(NodeData::VariableStatement(list)) => {
                if let Some(node) = arena.get(idx) {
                    self.queue_source_mapping(node);
                }
                self.emit_variable_declaration_list(list);
            }
            _ => self.emit(idx),
        }
    }

    pub(super) fn emit_keyword_statement(&mut self, keyword: &str, expression: NodeIndex) {
        self.write(keyword);
        if expression.is_some() {
            self.write_space();
            self.emit(expression);
        }
        self.write(";");
    }

    pub(super) fn emit_jump(&mut self, keyword: &str, label: NodeIndex) {
        self.write(keyword);
        if label.is_some() {
            self.write_space();
            self.emit(label);
        }
        self.write(";");
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    pub(super) fn emit_if_statement(&mut self, stmt: &IfData) {
        self.write("if (");
        self.emit(stmt.condition);
        self.write(")");
        self.emit_embedded_statement(stmt.then_statement);
        if stmt.else_statement.is_none() {
            return;
        }
        if self.writer.is_at_line_start() {
            self.write("else");
        } else if matches!(self.arena.data(stmt.then_statement), Some(NodeData::Block(_))) {
            self.write(" else");
        } else {
            self.write_line();
            self.write("else");
        }
        if matches!(self.arena.data(stmt.else_statement), Some(NodeData::IfStatement(_))) {
            self.write_space();
            self.emit_statement(stmt.else_statement);
        } else {
            self.emit_embedded_statement(stmt.else_statement);
        }
    }

    pub(super) fn emit_for_statement(&mut self, stmt: &ForData) {
        self.write("for (");
        if stmt.initializer.is_some() {
            self.emit_for_initializer(stmt.initializer);
        }
        self.write(";");
        if stmt.condition.is_some() {
            self.write_space();
            self.emit(stmt.condition);
        }
        self.write(";");
        if stmt.incrementor.is_some() {
            self.write_space();
            self.emit(stmt.incrementor);
        }
        self.write(")");
        self.emit_embedded_statement(stmt.statement);
    }

    pub(super) fn emit_for_in_of(&mut self, stmt: &ForInOfData, keyword: &str) {
        self.write("for ");
        if stmt.is_await {
            self.write("await ");
        }
        self.write("(");
        self.emit_for_initializer(stmt.initializer);
        self.write_space();
        self.write(keyword);
        self.write_space();
        self.emit(stmt.expression);
        self.write(")");
        self.emit_embedded_statement(stmt.statement);
    }

    pub(super) fn emit_do_statement(&mut self, stmt: &LoopData) {
        self.write("do");
        self.emit_embedded_statement(stmt.statement);
        if self.writer.is_at_line_start() {
            self.write("while (");
        } else if matches!(self.arena.data(stmt.statement), Some(NodeData::Block(_))) {
            self.write(" while (");
        } else {
            self.write_line();
            self.write("while (");
        }
        self.emit(stmt.condition);
        self.write(");");
    }

    pub(super) fn emit_try_statement(&mut self, stmt: &TryData) {
        self.write("try ");
        self.emit(stmt.block);
        if stmt.catch_clause.is_some() {
            self.write_space();
            self.emit(stmt.catch_clause);
        }
        if stmt.finally_block.is_some() {
            self.write(" finally ");
            self.emit(stmt.finally_block);
        }
    }

    pub(super) fn emit_catch_clause(&mut self, clause: &CatchClauseData) {
        self.write("catch");
        if clause.variable.is_some() {
            self.write(" (");
            self.emit(clause.variable);
            self.emit_type_annotation(clause.type_annotation);
            self.write(")");
        }
        self.write_space();
        self.emit(clause.block);
    }

    pub(super) fn emit_switch_statement(&mut self, stmt: &SwitchData) {
        self.write("switch (");
        self.emit(stmt.expression);
        self.write(") {");
        self.increase_indent();
        for case in stmt.cases.iter() {
            self.ensure_line_break();
            self.emit_statement(case);
        }
        self.decrease_indent();
        self.ensure_line_break();
        self.write("}");
    }

    pub(super) fn emit_case_clause(&mut self, clause: &CaseClauseData) {
        if clause.test.is_some() {
            self.write("case ");
            self.emit(clause.test);
            self.write(":");
        } else {
            self.write("default:");
        }
        let single_block = clause.statements.len() == 1
            && clause
                .statements
                .first()
                .is_some_and(|s| matches!(self.arena.data(s), Some(NodeData::Block(_))));
        if single_block {
            if let Some(block) = clause.statements.first() {
                self.write_space();
                self.emit_statement(block);
            }
            return;
        }
        self.increase_indent();
        self.emit_statement_list(&clause.statements);
        self.decrease_indent();
    }

    // =========================================================================
    // Modules
    // =========================================================================

    pub(super) fn emit_import_declaration(&mut self, decl: &ImportDeclarationData) {
        self.write("import ");
        if decl.type_only {
            self.write("type ");
        }
        let mut named = Vec::new();
        let mut wrote_clause = false;
        for specifier in decl.specifiers.iter() {
            match self.arena.data(specifier) {
                Some(NodeData::ImportSpecifier(_)) => named.push(specifier),
                Some(_) => {
                    if wrote_clause {
                        self.write(", ");
                    }
                    self.emit(specifier);
                    wrote_clause = true;
                }
                None => {}
            }
        }
        if !named.is_empty() {
            if wrote_clause {
                self.write(", ");
            }
            self.write("{ ");
            self.emit_comma_list(&NodeList::from(named));
            self.write(" }");
            wrote_clause = true;
        }
        if wrote_clause {
            self.write(" from ");
        }
        self.emit(decl.source);
        self.write(";");
    }

    pub(super) fn emit_import_specifier(&mut self, spec: &ImportSpecifierData) {
        if spec.type_only {
            self.write("type ");
        }
        self.emit(spec.imported);
        if spec.local.is_some() {
            self.write(" as ");
            self.emit(spec.local);
        }
    }

    pub(super) fn emit_export_named(&mut self, decl: &ExportNamedData) {
        if decl.declaration.is_some() {
            self.write("export ");
            self.emit_node(decl.declaration);
            return;
        }
        self.write("export ");
        if decl.type_only {
            self.write("type ");
        }
        if decl.specifiers.is_empty() {
            self.write("{}");
        } else {
            self.write("{ ");
            self.emit_comma_list(&decl.specifiers);
            self.write(" }");
        }
        if decl.source.is_some() {
            self.write(" from ");
            self.emit(decl.source);
        }
        self.write(";");
    }

    pub(super) fn emit_export_specifier(&mut self, spec: &ExportSpecifierData) {
        if spec.type_only {
            self.write("type ");
        }
        self.emit(spec.local);
        if spec.exported.is_some() {
            self.write(" as ");
            self.emit(spec.exported);
        }
    }

    pub(super) fn emit_export_default(&mut self, decl: &ExportDefaultData) {
        self.write("export default ");
        let is_declaration = matches!(
            self.arena.data(decl.declaration),
            Some(
                NodeData::FunctionDeclaration(_)
                    | NodeData::ClassDeclaration(_)
                    | NodeData::InterfaceDeclaration(_)
            )
        );
        self.emit(decl.declaration);
        if !is_declaration {
            self.write(";");
        }
    }

    pub(super) fn emit_export_all(&mut self, decl: &ExportAllData) {
        self.write("export ");
        if decl.type_only {
            self.write("type ");
        }
        self.write("*");
        if decl.exported.is_some() {
            self.write(" as ");
            self.emit(decl.exported);
        }
        self.write(" from ");
        self.emit(decl.source);
        self.write(";");
    }
}

//! Syntax tree printer.
//!
//! `Printer` walks a `NodeArena` and writes source text through a
//! `SourceWriter`. Every node with a source range queues a mapping to its
//! start; the next token written for that node consumes it. Leaves also map
//! their end, so a consumer can recover both edges of every token.
//!
//! Printing is customizable per node through `PrintHook`s: the first hook
//! that returns text replaces the default rendering of that node.

mod comments;
mod declarations;
mod expressions;
mod gts;
mod helpers;
mod statements;
mod types;

use crate::source_writer::{SourcePosition, SourceWriter, source_position_from_offset};
use gts_common::{LineMap, SourceMap};
use gts_parser::parser::node::{Node, NodeData};
use gts_parser::{NodeArena, NodeIndex};
use tracing::debug_span;

pub use comments::CommentStyle;

/// Output configuration.
#[derive(Debug, Clone)]
pub struct PrinterOptions {
    /// One level of indentation.
    pub indent: String,
    /// Re-emit comments attached to nodes.
    pub comments: bool,
    /// Generate a source map.
    pub source_map: bool,
    /// Name of the source in the source map's `sources`.
    pub source_file_name: Option<String>,
    /// The map's `file` field.
    pub output_file_name: Option<String>,
    /// Embed the source text as `sourcesContent`.
    pub include_source_content: bool,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        PrinterOptions {
            indent: "\t".to_string(),
            comments: true,
            source_map: true,
            source_file_name: None,
            output_file_name: None,
            include_source_content: true,
        }
    }
}

/// Per-node override of the default rendering.
pub trait PrintHook {
    /// Text to print in place of `node`, or `None` to print it normally.
    /// The returned text is mapped to the node's start when the node has a
    /// source range, even when it is empty.
    fn print(&self, arena: &NodeArena, idx: NodeIndex, node: &Node) -> Option<String>;
}

/// Prints loose-parse placeholder identifiers as nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummySuppression;

impl PrintHook for DummySuppression {
    fn print(&self, _arena: &NodeArena, _idx: NodeIndex, node: &Node) -> Option<String> {
        (node.is_dummy() && matches!(node.data, NodeData::Identifier(_))).then(String::new)
    }
}

#[derive(Debug, Clone)]
pub struct PrintResult {
    pub code: String,
    pub source_map: Option<SourceMap>,
}

pub struct Printer<'a> {
    pub(super) arena: &'a NodeArena,
    pub(super) source_text: Option<&'a str>,
    line_map: Option<LineMap>,
    pub(super) writer: SourceWriter,
    pub(super) options: PrinterOptions,
    hooks: Vec<Box<dyn PrintHook + 'a>>,
    /// Source position the next written token maps to.
    pub(super) pending_source_pos: Option<SourcePosition>,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena, options: PrinterOptions) -> Self {
        let mut writer = SourceWriter::with_capacity(4096);
        writer.set_indent_unit(&options.indent);
        Printer {
            arena,
            source_text: None,
            line_map: None,
            writer,
            options,
            hooks: Vec::new(),
            pending_source_pos: None,
        }
    }

    /// The text node ranges refer to. Required for source maps and comments.
    pub fn set_source(&mut self, source: &'a str) {
        self.source_text = Some(source);
        self.line_map = Some(LineMap::build(source));
        if self.options.source_map {
            self.writer
                .enable_source_map(self.options.output_file_name.clone());
            let name = self
                .options
                .source_file_name
                .clone()
                .unwrap_or_else(|| "input".to_string());
            let content = self
                .options
                .include_source_content
                .then(|| source.to_string());
            self.writer.add_source(&name, content);
        }
    }

    pub fn add_hook(&mut self, hook: Box<dyn PrintHook + 'a>) {
        self.hooks.push(hook);
    }

    /// Print `root` and everything under it.
    pub fn print(mut self, root: NodeIndex) -> PrintResult {
        let _span = debug_span!("print", nodes = self.arena.len()).entered();
        match self.arena.data(root) {
            Some(NodeData::SourceFile(_)) => self.emit_node(root),
            Some(_) => self.emit_statement(root),
            None => {}
        }
        let source_map = self.writer.generate_source_map();
        PrintResult {
            code: self.writer.take_output(),
            source_map,
        }
    }

    // =========================================================================
    // Source positions
    // =========================================================================

    pub(super) fn source_position(&self, offset: u32) -> Option<SourcePosition> {
        self.line_map
            .as_ref()
            .map(|map| source_position_from_offset(map, offset))
    }

    /// Queue the node's start as the mapping for the next token. Synthesized
    /// nodes clear the queue so their text is not attributed to an ancestor.
    pub(super) fn queue_source_mapping(&mut self, node: &Node) {
        if !self.writer.has_source_map() {
            return;
        }
        self.pending_source_pos = if node.is_synthesized() {
            None
        } else {
            self.source_position(node.pos)
        };
    }

    /// A zero-width node is mapped by its start alone.
    fn map_node_end(&mut self, node: &Node) {
        if node.is_synthesized() || node.pos == node.end || !self.writer.has_source_map() {
            return;
        }
        if let Some(pos) = self.source_position(node.end) {
            self.writer.add_mapping(pos, None);
        }
    }

    /// True when the node's source range crosses a line break.
    pub(super) fn spans_lines(&self, node: &Node) -> bool {
        !node.is_synthesized()
            && self
                .line_map
                .as_ref()
                .is_some_and(|map| map.has_line_break_between(node.pos, node.end))
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Print an expression-position node with inline comments.
    pub fn emit(&mut self, idx: NodeIndex) {
        if self.arena.get(idx).is_none() {
            return;
        }
        self.emit_leading_comments(idx, CommentStyle::Inline);
        self.emit_node(idx);
        self.emit_trailing_comments(idx, CommentStyle::Inline);
    }

    /// Print a statement-position node; comments get their own lines.
    pub fn emit_statement(&mut self, idx: NodeIndex) {
        if self.arena.get(idx).is_none() {
            return;
        }
        self.emit_leading_comments(idx, CommentStyle::Statement);
        self.emit_node(idx);
        self.emit_trailing_comments(idx, CommentStyle::Statement);
    }

    /// `emit_statement` with `suffix` written before any trailing comment.
    pub(super) fn emit_statement_with_suffix(&mut self, idx: NodeIndex, suffix: &str) {
        if self.arena.get(idx).is_none() {
            return;
        }
        self.emit_leading_comments(idx, CommentStyle::Statement);
        self.emit_node(idx);
        self.write(suffix);
        self.emit_trailing_comments(idx, CommentStyle::Statement);
    }

    fn run_hooks(&self, idx: NodeIndex, node: &Node) -> Option<String> {
        self.hooks
            .iter()
            .find_map(|hook| hook.print(self.arena, idx, node))
    }

    pub(super) fn emit_node(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };

        if let Some(text) = self.run_hooks(idx, node) {
            self.queue_source_mapping(node);
            self.write(&text);
            self.pending_source_pos = None;
            self.map_node_end(node);
            return;
        }

        self.queue_source_mapping(node);
        let is_leaf = !node.data.has_children();
        self.emit_node_data(idx, node);
        if is_leaf {
            self.pending_source_pos = None;
            self.map_node_end(node);
        }
    }

    fn emit_node_data(&mut self, idx: NodeIndex, node: &'a Node) {
        use NodeData as D;
        match &node.data {
            // Names and literals
            D::Identifier(ident) | D::PrivateIdentifier(ident) => {
                self.write_identifier(&ident.text)
            }
            D::StringLiteral(lit) => self.emit_string_literal(lit),
            D::NumericLiteral(lit) | D::BigIntLiteral(lit) | D::RegularExpressionLiteral(lit) => {
                let text = lit.raw.as_deref().unwrap_or(&lit.value);
                self.write(text);
            }
            D::BooleanLiteral(value) => self.write(if *value { "true" } else { "false" }),
            D::NullLiteral => self.write("null"),
            D::ThisExpression => self.write("this"),
            D::SuperExpression => self.write("super"),
            D::ImportKeyword => self.write("import"),
            D::TemplateElement(element) => self.write(&element.raw),
            D::TemplateExpression(template) => self.emit_template(template),
            D::TaggedTemplateExpression(tagged) => self.emit_tagged_template(tagged),

            // Expressions
            D::ArrayLiteralExpression(array) => self.emit_array_literal(&array.elements),
            D::ObjectLiteralExpression(object) => self.emit_object_literal(node, object),
            D::PropertyAssignment(prop) => self.emit_property_assignment(prop),
            D::ShorthandPropertyAssignment(prop) => self.emit_shorthand_property(prop),
            D::ComputedPropertyName(computed) => {
                self.write("[");
                self.emit(computed.expression);
                self.write("]");
            }
            D::SpreadElement(spread) => {
                self.write("...");
                self.emit(spread.expression);
            }
            D::OmittedExpression => {}
            D::PropertyAccessExpression(access) => self.emit_property_access(access),
            D::ElementAccessExpression(access) => self.emit_element_access(access),
            D::CallExpression(call) => self.emit_call_expression(call),
            D::NewExpression(new) => self.emit_new_expression(new),
            D::ParenthesizedExpression(paren) => {
                self.write("(");
                self.emit(paren.expression);
                self.write(")");
            }
            D::FunctionExpression(function) => self.emit_function(idx, function, false),
            D::FunctionDeclaration(function) => self.emit_function(idx, function, true),
            D::ArrowFunction(function) => self.emit_arrow_function(idx, function),
            D::ClassExpression(class) | D::ClassDeclaration(class) => self.emit_class(class),
            D::PrefixUnaryExpression(unary) => self.emit_prefix_unary(unary),
            D::PostfixUnaryExpression(unary) => self.emit_postfix_unary(unary),
            D::AwaitExpression(expr) => {
                self.write("await ");
                self.emit(expr.expression);
            }
            D::YieldExpression(expr) => self.emit_yield(expr),
            D::BinaryExpression(binary) => self.emit_binary_expression(binary),
            D::ConditionalExpression(cond) => self.emit_conditional(cond),
            D::AsExpression(assertion) => self.emit_type_assertion(assertion, "as"),
            D::SatisfiesExpression(assertion) => self.emit_type_assertion(assertion, "satisfies"),
            D::TypeAssertionExpression(assertion) => {
                self.write("<");
                self.emit(assertion.type_node);
                self.write(">");
                self.emit(assertion.expression);
            }
            D::NonNullExpression(expr) => {
                self.emit(expr.expression);
                self.write("!");
            }
            D::ExpressionWithTypeArguments(expr) => {
                self.emit(expr.expression);
                self.emit_type_arguments(expr.type_arguments.as_ref());
            }
            D::MetaProperty(meta) => {
                self.write(gts_scanner::token_text(meta.keyword));
                self.write(".");
                self.emit(meta.name);
            }

            // Binding patterns
            D::ObjectBindingPattern(pattern) => self.emit_object_binding_pattern(&pattern.elements),
            D::ArrayBindingPattern(pattern) => self.emit_array_literal(&pattern.elements),
            D::BindingElement(element) => self.emit_binding_element(element),

            // Statements
            D::SourceFile(file) => self.emit_source_file(&file.statements),
            D::Block(block) => self.emit_block(idx, &block.statements),
            D::EmptyStatement => self.write(";"),
            D::DebuggerStatement => self.write("debugger;"),
            D::ExpressionStatement(stmt) => self.emit_expression_statement(stmt),
            D::VariableStatement(stmt) => self.emit_variable_statement(stmt),
            D::VariableDeclaration(decl) => self.emit_variable_declaration(decl),
            D::IfStatement(stmt) => self.emit_if_statement(stmt),
            D::ForStatement(stmt) => self.emit_for_statement(stmt),
            D::ForInStatement(stmt) => self.emit_for_in_of(stmt, "in"),
            D::ForOfStatement(stmt) => self.emit_for_in_of(stmt, "of"),
            D::WhileStatement(stmt) => {
                self.write("while (");
                self.emit(stmt.condition);
                self.write(")");
                self.emit_embedded_statement(stmt.statement);
            }
            D::DoStatement(stmt) => self.emit_do_statement(stmt),
            D::ReturnStatement(stmt) => self.emit_keyword_statement("return", stmt.expression),
            D::ThrowStatement(stmt) => self.emit_keyword_statement("throw", stmt.expression),
            D::BreakStatement(stmt) => self.emit_jump("break", stmt.label),
            D::ContinueStatement(stmt) => self.emit_jump("continue", stmt.label),
            D::TryStatement(stmt) => self.emit_try_statement(stmt),
            D::CatchClause(clause) => self.emit_catch_clause(clause),
            D::SwitchStatement(stmt) => self.emit_switch_statement(stmt),
            D::CaseClause(clause) => self.emit_case_clause(clause),
            D::LabeledStatement(stmt) => {
                self.emit(stmt.label);
                self.write(": ");
                self.emit_statement(stmt.statement);
            }
            D::ImportDeclaration(decl) => self.emit_import_declaration(decl),
            D::ImportDefaultSpecifier(spec) => self.emit(spec.local),
            D::ImportNamespaceSpecifier(spec) => {
                self.write("* as ");
                self.emit(spec.local);
            }
            D::ImportSpecifier(spec) => self.emit_import_specifier(spec),
            D::ExportNamedDeclaration(decl) => self.emit_export_named(decl),
            D::ExportSpecifier(spec) => self.emit_export_specifier(spec),
            D::ExportDefaultDeclaration(decl) => self.emit_export_default(decl),
            D::ExportAllDeclaration(decl) => self.emit_export_all(decl),

            // Declarations
            D::MethodDeclaration(method) => self.emit_method(idx, method),
            D::PropertyDeclaration(prop) => self.emit_property_declaration(prop),
            D::ClassStaticBlock(block) => {
                self.write("static ");
                self.emit_block(idx, &block.statements);
            }
            D::IndexSignature(sig) => self.emit_index_signature(sig),
            D::Parameter(param) => self.emit_parameter(param),
            D::Decorator(decorator) => {
                self.write("@");
                self.emit(decorator.expression);
            }
            D::InterfaceDeclaration(decl) => self.emit_interface(node, decl),
            D::TypeAliasDeclaration(decl) => self.emit_type_alias(decl),
            D::EnumDeclaration(decl) => self.emit_enum(decl),
            D::EnumMember(member) => {
                self.emit(member.name);
                if member.initializer.is_some() {
                    self.write(" = ");
                    self.emit(member.initializer);
                }
            }
            D::ModuleDeclaration(decl) => self.emit_module_declaration(decl),
            D::ModuleBlock(block) => self.emit_block(idx, &block.statements),

            // Types
            D::KeywordType(_)
            | D::ThisType
            | D::TypeReference(_)
            | D::QualifiedName(_)
            | D::ArrayType(_)
            | D::TupleType(_)
            | D::NamedTupleMember(_)
            | D::OptionalType(_)
            | D::RestType(_)
            | D::UnionType(_)
            | D::IntersectionType(_)
            | D::FunctionType(_)
            | D::TypeLiteral(_)
            | D::PropertySignature(_)
            | D::MethodSignature(_)
            | D::CallSignature(_)
            | D::ConstructSignature(_)
            | D::TypeQuery(_)
            | D::TypeOperator(_)
            | D::IndexedAccessType(_)
            | D::ConditionalType(_)
            | D::InferType(_)
            | D::MappedType(_)
            | D::LiteralType(_)
            | D::ParenthesizedType(_)
            | D::TypePredicate(_)
            | D::TemplateLiteralType(_)
            | D::TypeParameter(_)
            | D::ImportType(_) => self.emit_type_node(node),

            // GTS extension
            D::GtsDefineStatement(_)
            | D::GtsNamedAttributeDefinition(_)
            | D::GtsAttributeBody(_)
            | D::GtsPositionalAttributeList(_)
            | D::GtsNamedAttributeBlock(_)
            | D::GtsDirectFunction(_)
            | D::GtsShortcutFunction(_)
            | D::GtsShortcutArgument(_)
            | D::GtsQueryExpression(_) => self.emit_gts_node(node),

            // Rendered only by a hook.
            D::DeferredDeclaration(_) => {}
        }
    }
}

/// Print a tree with the given options. `source` is the text node ranges
/// refer to; without it no source map is produced.
pub fn print(
    arena: &NodeArena,
    root: NodeIndex,
    source: Option<&str>,
    options: PrinterOptions,
) -> PrintResult {
    let mut printer = Printer::new(arena, options);
    if let Some(source) = source {
        printer.set_source(source);
    }
    printer.print(root)
}

use super::Printer;
use gts_parser::NodeIndex;
use gts_parser::parser::node::*;

impl<'a> Printer<'a> {
    // =========================================================================
    // Classes
    // =========================================================================

    pub(super) fn emit_class(&mut self, class: &ClassData) {
        self.emit_decorators(&class.decorators);
        if class.declare {
            self.write("declare ");
        }
        if class.is_abstract {
            self.write("abstract ");
        }
        self.write("class");
        if class.name.is_some() {
            self.write_space();
            self.emit(class.name);
        }
        self.emit_type_parameters(class.type_parameters.as_ref());
        if class.extends.is_some() {
            self.write(" extends ");
            self.emit(class.extends);
            self.emit_type_arguments(class.extends_type_arguments.as_ref());
        }
        if !class.implements.is_empty() {
            self.write(" implements ");
            self.emit_comma_list(&class.implements);
        }
        if class.members.is_empty() {
            self.write(" {}");
            return;
        }
        self.write(" {");
        self.increase_indent();
        for member in class.members.iter() {
            self.ensure_line_break();
            if matches!(self.arena.data(member), Some(NodeData::IndexSignature(_))) {
                self.emit_statement_with_suffix(member, ";");
            } else {
                self.emit_statement(member);
            }
        }
        self.decrease_indent();
        self.ensure_line_break();
        self.write("}");
    }

    pub(super) fn emit_method(&mut self, idx: NodeIndex, method: &MethodData) {
        self.emit_decorators(&method.decorators);
        self.emit_modifiers(method.modifiers);
        if method.function.is_async {
            self.write("async ");
        }
        match method.kind {
            MethodKind::Get => self.write("get "),
            MethodKind::Set => self.write("set "),
            MethodKind::Method | MethodKind::Constructor => {}
        }
        if method.function.is_generator {
            self.write("*");
        }
        self.emit(method.name);
        if method.question {
            self.write("?");
        }
        self.emit_signature_and_body(idx, &method.function);
    }

    pub(super) fn emit_property_declaration(&mut self, prop: &PropertyDeclarationData) {
        self.emit_decorators(&prop.decorators);
        self.emit_modifiers(prop.modifiers);
        self.emit(prop.name);
        if prop.question {
            self.write("?");
        }
        if prop.exclamation {
            self.write("!");
        }
        self.emit_type_annotation(prop.type_annotation);
        self.emit_initializer(prop.initializer);
        self.write(";");
    }

    /// `[key: string]: T` without a separator; the container writes it.
    pub(super) fn emit_index_signature(&mut self, sig: &IndexSignatureData) {
        self.emit_modifiers(sig.modifiers);
        self.write("[");
        self.emit_comma_list(&sig.parameters);
        self.write("]");
        self.emit_type_annotation(sig.type_annotation);
    }

    pub(super) fn emit_parameter(&mut self, param: &ParameterData) {
        self.emit_decorators(&param.decorators);
        self.emit_modifiers(param.modifiers);
        if param.dot_dot_dot {
            self.write("...");
        }
        self.emit(param.name);
        if param.question {
            self.write("?");
        }
        self.emit_type_annotation(param.type_annotation);
        self.emit_initializer(param.initializer);
    }

    // =========================================================================
    // Type-level declarations
    // =========================================================================

    pub(super) fn emit_interface(&mut self, node: &Node, decl: &InterfaceData) {
        if decl.declare {
            self.write("declare ");
        }
        self.write("interface ");
        self.emit(decl.name);
        self.emit_type_parameters(decl.type_parameters.as_ref());
        if !decl.extends.is_empty() {
            self.write(" extends ");
            self.emit_comma_list(&decl.extends);
        }
        self.write_space();
        self.emit_type_members(node, &decl.members);
    }

    pub(super) fn emit_type_alias(&mut self, decl: &TypeAliasData) {
        if decl.declare {
            self.write("declare ");
        }
        self.write("type ");
        self.emit(decl.name);
        self.emit_type_parameters(decl.type_parameters.as_ref());
        self.write(" = ");
        self.emit(decl.type_node);
        self.write(";");
    }

    pub(super) fn emit_enum(&mut self, decl: &EnumData) {
        if decl.declare {
            self.write("declare ");
        }
        if decl.is_const {
            self.write("const ");
        }
        self.write("enum ");
        self.emit(decl.name);
        if decl.members.is_empty() {
            self.write(" {}");
            return;
        }
        self.write(" {");
        self.increase_indent();
        for member in decl.members.iter() {
            self.write_line();
            self.emit(member);
            self.write(",");
        }
        self.decrease_indent();
        self.write_line();
        self.write("}");
    }

    pub(super) fn emit_module_declaration(&mut self, decl: &ModuleData) {
        if decl.declare {
            self.write("declare ");
        }
        match decl.keyword {
            ModuleKeyword::Namespace => self.write("namespace "),
            ModuleKeyword::Module => self.write("module "),
            ModuleKeyword::Global => {}
        }
        self.emit(decl.name);
        // `namespace A.B.C`: each dotted segment is a nested declaration.
        let mut body = decl.body;
        while let Some(NodeData::ModuleDeclaration(inner)) = self.arena.data(body) {
            self.write(".");
            self.emit(inner.name);
            body = inner.body;
        }
        if body.is_none() {
            self.write(";");
            return;
        }
        self.write_space();
        self.emit(body);
    }
}

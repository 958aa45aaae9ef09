//! `define` syntax printed back in source form. Lowered trees never contain
//! these nodes; this is for printing parsed trees as they are.

use super::Printer;
use gts_parser::parser::node::*;

impl<'a> Printer<'a> {
    pub(super) fn emit_gts_node(&mut self, node: &Node) {
        use NodeData as D;
        match &node.data {
            D::GtsDefineStatement(define) => {
                self.write("define ");
                self.emit_node(define.body);
            }
            D::GtsNamedAttributeDefinition(attribute) => self.emit_named_attribute(attribute),
            D::GtsAttributeBody(body) => {
                let has_positionals = matches!(
                    self.arena.data(body.positional_attributes),
                    Some(D::GtsPositionalAttributeList(list)) if !list.attributes.is_empty()
                );
                if has_positionals {
                    self.write_space();
                    self.emit(body.positional_attributes);
                }
                if body.named_attributes.is_some() {
                    self.write_space();
                    self.emit(body.named_attributes);
                }
            }
            D::GtsPositionalAttributeList(list) => self.emit_comma_list(&list.attributes),
            D::GtsNamedAttributeBlock(block) => {
                if block.attributes.is_empty() && block.direct_action.is_none() {
                    self.write("{}");
                    return;
                }
                self.write("{");
                self.increase_indent();
                for attribute in block.attributes.iter() {
                    self.ensure_line_break();
                    self.emit_statement(attribute);
                }
                if block.direct_action.is_some() {
                    self.ensure_line_break();
                    self.emit_node(block.direct_action);
                }
                self.decrease_indent();
                self.ensure_line_break();
                self.write("}");
            }
            D::GtsDirectFunction(direct) => self.emit_statement_list(&direct.statements),
            D::GtsShortcutFunction(shortcut) => {
                self.write(":");
                if shortcut.expression {
                    self.write("(");
                    self.emit(shortcut.body);
                    self.write(")");
                } else {
                    self.emit(shortcut.body);
                }
            }
            D::GtsShortcutArgument(argument) => {
                self.write(":");
                self.emit(argument.property);
            }
            D::GtsQueryExpression(query) => {
                self.write(if query.star { "query* " } else { "query " });
                self.emit(query.argument);
            }
            _ => {}
        }
    }

    fn emit_named_attribute(&mut self, attribute: &GtsNamedAttributeData) {
        self.emit(attribute.name);
        self.emit_node(attribute.body);
        if attribute.binding_name.is_some() {
            self.write(" as ");
            match attribute.binding_access {
                Some(BindingAccess::Public) => self.write("public "),
                Some(BindingAccess::Protected) => self.write("protected "),
                Some(BindingAccess::Private) => self.write("private "),
                None => {}
            }
            self.emit(attribute.binding_name);
        }
        self.write(";");
    }
}

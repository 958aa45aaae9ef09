use super::Printer;
use crate::source_writer::SourcePosition;
use gts_parser::parser::node::ModifierFlags;
use gts_parser::{NodeIndex, NodeList};

impl<'a> Printer<'a> {
    fn take_pending_source_pos(&mut self) -> Option<SourcePosition> {
        self.pending_source_pos.take()
    }

    // =========================================================================
    // Output Helpers (delegate to SourceWriter)
    // =========================================================================

    /// Write text to output, consuming the queued source mapping.
    pub(super) fn write(&mut self, text: &str) {
        if let Some(source_pos) = self.take_pending_source_pos() {
            self.writer.write_node(text, source_pos);
        } else {
            self.writer.write(text);
        }
    }

    /// Write identifier text with a name mapping.
    pub(super) fn write_identifier(&mut self, text: &str) {
        if let Some(source_pos) = self.take_pending_source_pos() {
            self.writer.write_node_with_name(text, source_pos, text);
        } else {
            self.writer.write(text);
        }
    }

    /// Write text that never carries a mapping (comments).
    pub(super) fn write_raw(&mut self, text: &str) {
        self.writer.write(text);
    }

    pub(super) fn write_line(&mut self) {
        self.writer.write_line();
    }

    pub(super) fn ensure_line_break(&mut self) {
        self.writer.ensure_line_break();
    }

    pub(super) fn write_space(&mut self) {
        self.writer.write_space();
    }

    pub(super) fn increase_indent(&mut self) {
        self.writer.increase_indent();
    }

    pub(super) fn decrease_indent(&mut self) {
        self.writer.decrease_indent();
    }

    // =========================================================================
    // Lists
    // =========================================================================

    /// Emit `nodes` separated by `separator`.
    pub(super) fn emit_separated(&mut self, nodes: &NodeList, separator: &str) {
        for (i, idx) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(separator);
            }
            self.emit(idx);
        }
    }

    pub(super) fn emit_comma_list(&mut self, nodes: &NodeList) {
        self.emit_separated(nodes, ", ");
    }

    /// `<A, B>`; nothing when absent.
    pub(super) fn emit_type_arguments(&mut self, list: Option<&NodeList>) {
        let Some(list) = list else {
            return;
        };
        self.write("<");
        self.emit_comma_list(list);
        self.write(">");
    }

    pub(super) fn emit_type_parameters(&mut self, list: Option<&NodeList>) {
        self.emit_type_arguments(list);
    }

    /// `(a, b)`
    pub(super) fn emit_parameter_list(&mut self, parameters: &NodeList) {
        self.write("(");
        self.emit_comma_list(parameters);
        self.write(")");
    }

    /// `: T`; nothing when absent.
    pub(super) fn emit_type_annotation(&mut self, type_node: NodeIndex) {
        if type_node.is_some() {
            self.write(": ");
            self.emit(type_node);
        }
    }

    /// ` = value`; nothing when absent.
    pub(super) fn emit_initializer(&mut self, initializer: NodeIndex) {
        if initializer.is_some() {
            self.write(" = ");
            self.emit(initializer);
        }
    }

    /// Modifier keywords, each followed by a space.
    pub(super) fn emit_modifiers(&mut self, modifiers: ModifierFlags) {
        for keyword in modifiers.keywords() {
            self.write(keyword);
            self.write_space();
        }
    }

    pub(super) fn emit_decorators(&mut self, decorators: &NodeList) {
        for decorator in decorators.iter() {
            self.emit(decorator);
            self.write_space();
        }
    }
}

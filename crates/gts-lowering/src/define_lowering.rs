//! Lowering of `define` blocks to runtime calls.
//!
//! ```text
//! define character { id 1; skill :(x) as public Skill; };
//! ```
//! becomes a `__gts_createDefine(__gts_rootVm, { attributes: [...] })` call
//! whose attributes are thunks of `{ name, positionals, named }` objects.
//! Attributes with an `as` clause are hoisted into top-level constants and
//! wrapped by the provider's binder. The result still carries TypeScript
//! syntax; `erase` removes it.

use crate::builders::NodeFactory;
use crate::shortcut::ShortcutLowering;
use crate::state::{ExternalizedBinding, TransformState, ids};
use crate::transform::Transform;
use gts_common::{GtsError, Result, TranspileOptions};
use gts_parser::parser::node::*;
use gts_parser::{NodeArena, NodeIndex, NodeList};
use tracing::{debug, debug_span};

/// Lower every GTS construct under `root`. Returns the new `SourceFile`.
pub fn lower(arena: &mut NodeArena, root: NodeIndex, options: &TranspileOptions) -> Result<NodeIndex> {
    let _span = debug_span!("lower_defines").entered();
    let mut pass = DefineLowering {
        arena,
        state: TransformState::new(options.clone()),
    };
    let lowered = pass.visit(root)?;
    debug!(
        defines = pass.state.defines_lowered,
        bindings = pass.state.externalized_bindings.len(),
        "lowered defines"
    );
    Ok(lowered)
}

/// Lowercase-initial bare identifiers in positional position are keywords
/// of the attribute (`skill normal`), not references.
pub(crate) fn is_bare_word(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_lowercase() || c == '_')
}

/// The attribute name as written: identifier text or string value.
pub(crate) fn attribute_name(arena: &NodeArena, name: NodeIndex) -> String {
    arena
        .identifier_text(name)
        .or_else(|| arena.string_literal_value(name))
        .unwrap_or_default()
        .to_string()
}

struct DefineLowering<'a> {
    arena: &'a mut NodeArena,
    state: TransformState,
}

impl Transform for DefineLowering<'_> {
    fn arena(&mut self) -> &mut NodeArena {
        self.arena
    }

    fn visit(&mut self, idx: NodeIndex) -> Result<NodeIndex> {
        let data = match self.arena.data(idx) {
            Some(data) if data.is_gts() || matches!(data, NodeData::SourceFile(_)) => data.clone(),
            Some(_) => return self.visit_children(idx),
            None => return Ok(idx),
        };
        match data {
            NodeData::SourceFile(file) => self.lower_source_file(idx, &file),
            NodeData::GtsDefineStatement(define) => self.lower_define(idx, &define),
            NodeData::GtsNamedAttributeDefinition(attr) => self.lower_attribute(idx, &attr),
            NodeData::GtsAttributeBody(body) => self.lower_attribute_body(idx, &body),
            NodeData::GtsPositionalAttributeList(list) => self.lower_positionals(idx, &list),
            NodeData::GtsNamedAttributeBlock(block) => self.lower_named_block(idx, &block),
            NodeData::GtsDirectFunction(direct) => {
                self.lower_direct_function(idx, &direct.statements)
            }
            NodeData::GtsShortcutFunction(shortcut) => self.lower_shortcut_function(idx, &shortcut),
            NodeData::GtsShortcutArgument(argument) => {
                self.lower_shortcut_argument(idx, &argument, true)
            }
            NodeData::GtsQueryExpression(query) => self.lower_query(idx, &query),
            _ => self.visit_children(idx),
        }
    }
}

impl ShortcutLowering for DefineLowering<'_> {
    fn state(&mut self) -> &mut TransformState {
        &mut self.state
    }
}

impl DefineLowering<'_> {
    /// Body statements preceded by the runtime imports and hoisted bindings.
    fn lower_source_file(&mut self, idx: NodeIndex, file: &StatementsData) -> Result<NodeIndex> {
        let body = self.visit_list(&file.statements)?;

        let mut statements = Vec::new();
        if self.state.defines_lowered > 0 {
            let runtime = self.state.options.runtime_import_source.clone();
            statements.push(self.arena.import_named(
                &[
                    ("createDefine", ids::CREATE_DEFINE),
                    ("Action", ids::ACTION),
                    ("Prelude", ids::PRELUDE),
                ],
                &runtime,
            ));
            let vm = self.state.vm_import_source();
            statements.push(self.arena.import_default(ids::ROOT_VM, &vm));
        }
        if self.state.has_query_expressions {
            let query = self.state.query_import_source();
            statements.push(self.arena.import_default(ids::QUERY, &query));
        }
        if !self.state.externalized_bindings.is_empty() {
            let binder = self.state.binder_import_source();
            statements.push(self.arena.import_default(ids::BINDER, &binder));
            let bindings = std::mem::take(&mut self.state.externalized_bindings);
            for binding in &bindings {
                self.emit_binding(binding, &mut statements);
            }
        }
        statements.extend(body.nodes);

        Ok(self.arena.derive(
            idx,
            NodeData::SourceFile(StatementsData {
                statements: NodeList::from(statements),
            }),
        ))
    }

    /// ```text
    /// const __gts_internal_binding_0 = () => ({ ... });
    /// export const Skill = __gts_Binder(__gts_internal_binding_0, { path: ["character"] });
    /// ```
    fn emit_binding(&mut self, binding: &ExternalizedBinding, statements: &mut Vec<NodeIndex>) {
        let arena = &mut *self.arena;
        let internal = arena.identifier(&binding.internal_id);
        statements.push(arena.variable(
            VariableKind::Const,
            internal,
            NodeIndex::NONE,
            binding.value,
        ));

        let path = binding
            .path
            .iter()
            .map(|segment| arena.string(segment))
            .collect();
        let path = arena.array(path);
        let path = arena.property("path", path);
        let options = arena.object(vec![path]);
        let binder = arena.identifier(ids::BINDER);
        let reference = arena.identifier(&binding.internal_id);
        let wrapped = arena.call(binder, vec![reference, options]);
        let declaration = arena.variable(
            VariableKind::Const,
            binding.binding_name,
            NodeIndex::NONE,
            wrapped,
        );
        statements.push(if binding.export {
            arena.export(declaration)
        } else {
            declaration
        });
    }

    /// `__gts_createDefine(__gts_rootVm, { attributes: [<attribute>] });`
    fn lower_define(&mut self, idx: NodeIndex, define: &GtsDefineData) -> Result<NodeIndex> {
        self.state.defines_lowered += 1;
        let attribute = self.visit(define.body)?;
        let arena = &mut *self.arena;
        let attributes = arena.array(vec![attribute]);
        let attributes = arena.property("attributes", attributes);
        let wrapper = arena.object(vec![attributes]);
        // The callee carries the define's range so the statement start maps.
        let callee = arena.add_at(
            idx,
            NodeData::Identifier(IdentifierData {
                text: ids::CREATE_DEFINE.to_string(),
            }),
        );
        let root_vm = arena.identifier(ids::ROOT_VM);
        let call = arena.call(callee, vec![root_vm, wrapper]);
        Ok(arena.derive(idx, NodeData::ExpressionStatement(ExpressionData { expression: call })))
    }

    /// `() => ({ name: "<name>", positionals: () => [...], named: ... })`, or a
    /// reference to the hoisted binding when the attribute has an `as` clause.
    fn lower_attribute(&mut self, idx: NodeIndex, attr: &GtsNamedAttributeData) -> Result<NodeIndex> {
        let name = attribute_name(self.arena, attr.name);
        self.state.attribute_names.push(name.clone());
        let body = self.visit(attr.body);
        self.state.attribute_names.pop();
        let body = body?;

        let arena = &mut *self.arena;
        let name_value = match arena.data(attr.name) {
            Some(NodeData::StringLiteral(_)) => attr.name,
            _ => arena.derive(
                attr.name,
                NodeData::StringLiteral(LiteralData {
                    value: name.clone(),
                    raw: None,
                }),
            ),
        };
        let name_property = arena.property("name", name_value);
        let mut properties = match arena.data(body) {
            Some(NodeData::ObjectLiteralExpression(object)) => object.properties.nodes.clone(),
            _ => Vec::new(),
        };
        properties.insert(0, name_property);
        let object = arena.derive(
            body,
            NodeData::ObjectLiteralExpression(PropertiesData {
                properties: NodeList::from(properties),
            }),
        );
        let thunk = arena.derive(
            idx,
            NodeData::ArrowFunction(FunctionData::new(NodeList::new(), object)),
        );

        if attr.binding_name.is_none() {
            return Ok(thunk);
        }
        let access = attr.binding_access.unwrap_or(BindingAccess::Public);
        if access == BindingAccess::Protected {
            let (start, end) = arena.get(idx).map(|n| (n.pos, n.end)).unwrap_or_default();
            return Err(GtsError::unsupported(
                "Protected bindings are not supported in this context.",
                start,
                end,
            ));
        }
        let internal_id = ids::internal_binding(self.state.externalized_bindings.len());
        debug!(attribute = %name, binding = %internal_id, "externalized binding");
        self.state.externalized_bindings.push(ExternalizedBinding {
            binding_name: attr.binding_name,
            export: access != BindingAccess::Private,
            internal_id: internal_id.clone(),
            value: thunk,
            path: self.state.attribute_names.clone(),
            typing_id: None,
            define: NodeIndex::NONE,
        });
        Ok(self.arena.identifier(&internal_id))
    }

    /// `{ positionals: () => [...], named: <block> | null }`
    fn lower_attribute_body(&mut self, idx: NodeIndex, body: &GtsAttributeBodyData) -> Result<NodeIndex> {
        let positionals = if body.positional_attributes.is_some() {
            self.visit(body.positional_attributes)?
        } else {
            self.arena.array(Vec::new())
        };
        let named = if body.named_attributes.is_some() {
            self.visit(body.named_attributes)?
        } else {
            self.arena.null()
        };
        let arena = &mut *self.arena;
        let positionals = arena.arrow(Vec::new(), positionals);
        let positionals = arena.property("positionals", positionals);
        let named = arena.property("named", named);
        Ok(arena.derive(
            idx,
            NodeData::ObjectLiteralExpression(PropertiesData {
                properties: NodeList::from(vec![positionals, named]),
            }),
        ))
    }

    fn lower_positionals(&mut self, idx: NodeIndex, list: &GtsAttributeListData) -> Result<NodeIndex> {
        let mut elements = Vec::with_capacity(list.attributes.len());
        for attribute in list.attributes.iter() {
            let word = self
                .arena
                .identifier_text(attribute)
                .filter(|text| is_bare_word(text))
                .map(str::to_string);
            elements.push(match word {
                Some(value) => self.arena.derive(
                    attribute,
                    NodeData::StringLiteral(LiteralData { value, raw: None }),
                ),
                None => self.visit(attribute)?,
            });
        }
        Ok(self.arena.derive(
            idx,
            NodeData::ArrayLiteralExpression(ElementsData {
                elements: NodeList::from(elements),
            }),
        ))
    }

    /// `{ attributes: [...] }`, the direct action last.
    fn lower_named_block(&mut self, idx: NodeIndex, block: &GtsNamedBlockData) -> Result<NodeIndex> {
        let mut attributes = self.visit_list(&block.attributes)?.nodes;
        if block.direct_action.is_some() {
            attributes.push(self.visit(block.direct_action)?);
        }
        let arena = &mut *self.arena;
        let attributes = arena.array(attributes);
        let attributes = arena.property("attributes", attributes);
        Ok(arena.derive(
            idx,
            NodeData::ObjectLiteralExpression(PropertiesData {
                properties: NodeList::from(vec![attributes]),
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_words() {
        assert!(is_bare_word("normal"));
        assert!(is_bare_word("_hidden"));
        assert!(!is_bare_word("Skill"));
        assert!(!is_bare_word("$x"));
        assert!(!is_bare_word(""));
    }
}

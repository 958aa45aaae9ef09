//! Lowering of `define` blocks for type checking.
//!
//! The output is not meant to run. Each `define` is unrolled into a
//! straight-line sequence of declarations a type checker can follow: every
//! attribute becomes a method call on a stand-in object typed from the
//! enclosing VM's definition, and each scope ends with a check that all
//! required attributes were written. The type-level bookkeeping is emitted
//! as `DeferredDeclaration` nodes rendered by [`DeferredDeclarations`] at
//! print time.
//!
//! Positions are carried by [`LeafToken`]s collected from the tree before
//! lowering, plus `additional_mappings` that tie a synthetic snippet of the
//! output back to a source offset.

mod leaf_tokens;
mod payload;

pub use leaf_tokens::{LeafToken, LeafTokens};
pub use payload::{DeferredDeclarations, DeferredPayload, META, NAMED_DEFINITION};

use crate::builders::NodeFactory;
use crate::define_lowering::{attribute_name, is_bare_word};
use crate::shortcut::ShortcutLowering;
use crate::state::{ExternalizedBinding, TransformState, ids};
use crate::transform::Transform;
use gts_common::{Result, TranspileOptions};
use gts_emitter::{DummySuppression, PrintResult, Printer, PrinterOptions};
use gts_parser::parser::node::*;
use gts_parser::{NodeArena, NodeIndex, NodeList};
use indexmap::IndexMap;
use tracing::{debug, debug_span, trace};

/// The value the root VM is imported as in the virtual document.
pub const ROOT_VM: &str = "__root_vm";

/// Symbols of the root VM re-exposed as local type/value pairs.
const PREFACE_SYMBOLS: [(&str, &str); 4] = [
    ("Meta", META),
    ("Action", ids::ACTION),
    ("NamedDefinition", NAMED_DEFINITION),
    ("Prelude", ids::PRELUDE),
];

#[derive(Debug, Clone)]
pub struct TypingsOutput {
    /// The lowered `SourceFile`.
    pub root: NodeIndex,
    /// Childless nodes of the input tree, in source order.
    pub leaf_tokens: Vec<LeafToken>,
    /// Source offset -> generated snippet anchored there.
    pub additional_mappings: IndexMap<u32, String>,
}

/// Lower the tree under `root` into a type-checkable program.
pub fn lower_for_typings(
    arena: &mut NodeArena,
    root: NodeIndex,
    options: &TranspileOptions,
) -> Result<TypingsOutput> {
    let _span = debug_span!("lower_for_typings").entered();
    let leaf_tokens = LeafTokens::collect(arena, root);
    let mut walker = TypingsWalker {
        arena,
        state: TransformState::new(options.clone()),
        leaf_tokens,
        scopes: Vec::new(),
        id_counter: 0,
        preface_inserted: false,
        pending: Vec::new(),
        additional_mappings: IndexMap::new(),
        current_define: NodeIndex::NONE,
    };
    let root = walker.visit(root)?;
    debug!(
        leaf_tokens = walker.leaf_tokens.len(),
        synthetic_ids = walker.id_counter,
        "lowered for typings"
    );
    Ok(TypingsOutput {
        root,
        leaf_tokens: walker.leaf_tokens.into_vec(),
        additional_mappings: walker.additional_mappings,
    })
}

/// Print a typings tree: two-space indentation, placeholders suppressed and
/// deferred declarations rendered.
pub fn print_typings(
    arena: &NodeArena,
    root: NodeIndex,
    source: &str,
    source_file_name: Option<String>,
) -> PrintResult {
    let mut printer = Printer::new(
        arena,
        PrinterOptions {
            indent: "  ".to_string(),
            source_file_name,
            ..PrinterOptions::default()
        },
    );
    printer.set_source(source);
    printer.add_hook(Box::new(DummySuppression));
    printer.add_hook(Box::new(DeferredDeclarations));
    printer.print(root)
}

/// Type names of one VM scope: a `define` or a named-attribute block.
#[derive(Debug)]
struct VmScope {
    def_type: String,
    /// Rewritten by every attribute call in the scope.
    meta_type: String,
    final_meta_type: String,
    /// JSON-quoted names of the attributes written in the scope.
    collected: Vec<String>,
}

struct TypingsWalker<'a> {
    arena: &'a mut NodeArena,
    state: TransformState,
    leaf_tokens: LeafTokens,
    scopes: Vec<VmScope>,
    id_counter: usize,
    preface_inserted: bool,
    /// Statements produced by the `define` being lowered.
    pending: Vec<NodeIndex>,
    additional_mappings: IndexMap<u32, String>,
    /// The top-level `define` being lowered.
    current_define: NodeIndex,
}

impl Transform for TypingsWalker<'_> {
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
            NodeData::GtsDefineStatement(define) => {
                self.enter_vm_from_root();
                self.visit(define.body)?;
                self.exit_vm(None);
                Ok(self.arena.add_at(idx, NodeData::EmptyStatement))
            }
            NodeData::GtsNamedAttributeDefinition(attr) => {
                self.lower_attribute(&attr)?;
                Ok(self.arena.add_at(idx, NodeData::EmptyStatement))
            }
            NodeData::GtsNamedAttributeBlock(block) => {
                for attribute in block.attributes.iter() {
                    self.visit(attribute)?;
                }
                if block.direct_action.is_some() {
                    self.visit(block.direct_action)?;
                }
                Ok(self.arena.add_at(idx, NodeData::EmptyStatement))
            }
            NodeData::GtsDirectFunction(direct) => {
                self.lower_direct_action(&direct.statements)?;
                Ok(self.arena.add_at(idx, NodeData::EmptyStatement))
            }
            NodeData::GtsShortcutFunction(shortcut) => self.lower_shortcut_function(idx, &shortcut),
            NodeData::GtsShortcutArgument(argument) => {
                self.lower_shortcut_argument(idx, &argument, false)
            }
            NodeData::GtsQueryExpression(query) => self.lower_query(idx, &query),
            _ => self.visit_children(idx),
        }
    }
}

impl ShortcutLowering for TypingsWalker<'_> {
    fn state(&mut self) -> &mut TransformState {
        &mut self.state
    }
}

impl TypingsWalker<'_> {
    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}{}", self.id_counter);
        self.id_counter += 1;
        id
    }

    fn defer(&mut self, payload: DeferredPayload) {
        trace!(?payload, "deferred declaration");
        let node = self.arena.add_synthetic(NodeData::DeferredDeclaration(DeferredData {
            payload: payload.to_json(),
        }));
        self.pending.push(node);
    }

    /// Splice each `define`'s statements (and binding declarations) in place
    /// of it, then prepend the imports the output needs.
    fn lower_source_file(&mut self, idx: NodeIndex, file: &StatementsData) -> Result<NodeIndex> {
        let mut body = Vec::with_capacity(file.statements.len());
        for statement in file.statements.iter() {
            if !matches!(self.arena.data(statement), Some(NodeData::GtsDefineStatement(_))) {
                body.push(self.visit(statement)?);
                continue;
            }
            let first_binding = self.state.externalized_bindings.len();
            self.current_define = statement;
            self.visit(statement)?;
            body.append(&mut self.pending);
            let bindings = self.state.externalized_bindings[first_binding..].to_vec();
            for binding in &bindings {
                body.push(self.binding_declaration(binding));
            }
        }

        let mut statements = Vec::new();
        if self.state.has_query_expressions {
            let query = self.state.query_import_source();
            statements.push(self.arena.import_default(ids::QUERY, &query));
        }
        if self.preface_inserted {
            let vm = self.state.vm_import_source();
            statements.push(self.arena.import_default(ROOT_VM, &vm));
        }
        statements.extend(body);
        Ok(self.arena.derive(
            idx,
            NodeData::SourceFile(StatementsData {
                statements: NodeList::from(statements),
            }),
        ))
    }

    /// `[export] const <name>: gts_binding_type_<n> = 0 as any;`
    fn binding_declaration(&mut self, binding: &ExternalizedBinding) -> NodeIndex {
        let typing_id = binding.typing_id.as_deref().unwrap_or("unknown");
        let arena = &mut *self.arena;
        let type_annotation = arena.type_reference(typing_id);
        let initializer = arena.zero_as_any();
        let declaration = arena.variable(
            VariableKind::Const,
            binding.binding_name,
            type_annotation,
            initializer,
        );
        let statement = if binding.export {
            arena.export(declaration)
        } else {
            declaration
        };
        let leading = arena
            .comments(binding.define)
            .map(|comments| comments.leading.clone())
            .unwrap_or_default();
        if !leading.is_empty() {
            arena.comments_mut(statement).leading = leading;
        }
        statement
    }

    /// `type X = typeof __root_vm._symbols.Name; const X: X = 0 as any;` for
    /// each runtime symbol, once per file.
    fn emit_preface(&mut self) {
        if self.preface_inserted {
            return;
        }
        self.preface_inserted = true;
        for (symbol, local) in PREFACE_SYMBOLS {
            let arena = &mut *self.arena;
            let query = arena.type_query(&[ROOT_VM, "_symbols", symbol]);
            let alias = arena.type_alias(local, query);
            let name = arena.identifier(local);
            let type_annotation = arena.type_reference(local);
            let initializer = arena.zero_as_any();
            let constant = arena.variable(VariableKind::Const, name, type_annotation, initializer);
            self.pending.push(alias);
            self.pending.push(constant);
        }
    }

    fn enter_vm_from_root(&mut self) {
        self.emit_preface();
        let def_type = self.next_id("__gts_rootVmDefType_");
        let meta_type = self.next_id("__gts_rootVmInitMetaType_");
        let final_meta_type = self.next_id("__gts_rootVmFinalMetaType_");
        self.defer(DeferredPayload::EnterVmFromRoot {
            vm: ROOT_VM.to_string(),
            def_type: def_type.clone(),
            meta_type: meta_type.clone(),
        });
        self.scopes.push(VmScope {
            def_type,
            meta_type,
            final_meta_type,
            collected: Vec::new(),
        });
    }

    /// A named block's VM is described by the `namedDefinition` of the value
    /// the attribute call returned.
    fn enter_vm_from_attr(&mut self, return_value: &str) {
        let def_type = self.next_id("__gts_nestedVm_");
        let meta_type = self.next_id("__gts_nestedVmInitMetaType_");
        let final_meta_type = self.next_id("__gts_nestedVmFinalMetaType_");
        self.defer(DeferredPayload::EnterVmFromAttr {
            return_type: return_value.to_string(),
            def_type: def_type.clone(),
            meta_type: meta_type.clone(),
        });
        self.scopes.push(VmScope {
            def_type,
            meta_type,
            final_meta_type,
            collected: Vec::new(),
        });
    }

    /// Close the innermost scope. `error_loc` anchors the required-attribute
    /// check to a source offset.
    fn exit_vm(&mut self, error_loc: Option<u32>) {
        let Some(scope) = self.scopes.pop() else {
            return;
        };
        if let Some(offset) = error_loc {
            self.additional_mappings.insert(
                offset,
                DeferredPayload::required_attributes_needle(&scope.final_meta_type),
            );
        }
        self.defer(DeferredPayload::ExitVm {
            meta_type: scope.meta_type,
            def_type: scope.def_type,
            collected_attrs: scope.collected,
            final_meta_type: scope.final_meta_type,
            error_loc,
        });
    }

    /// Declare the object the next attribute is called on; returns its name.
    fn enter_attr(&mut self, attr_name: String) -> String {
        let Some(scope) = self.scopes.last_mut() else {
            return "__invalid_attr_obj".to_string();
        };
        scope.collected.push(attr_name);
        let (def_type, meta_type) = (scope.def_type.clone(), scope.meta_type.clone());
        let lhs = self.next_id("__gts_attr_obj_");
        self.defer(DeferredPayload::EnterAttr {
            def_type,
            meta_type,
            lhs: lhs.clone(),
        });
        lhs
    }

    /// Fold the attribute's `rewriteMeta` into the scope's meta type.
    fn exit_attr(&mut self, return_value: &str) {
        if self.scopes.is_empty() {
            return;
        }
        let new_meta_type = self.next_id("__gts_newMeta__");
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        let old_meta_type = std::mem::replace(&mut scope.meta_type, new_meta_type.clone());
        let def_type = scope.def_type.clone();
        self.defer(DeferredPayload::ExitAttr {
            return_type: return_value.to_string(),
            def_type,
            old_meta_type,
            new_meta_type,
        });
    }

    fn binding_typing(&mut self, attr_name: &str, typing_id: &str) {
        let Some(scope) = self.scopes.last() else {
            return;
        };
        let payload = DeferredPayload::CreateBindingTyping {
            final_meta_type: scope.final_meta_type.clone(),
            def_type: scope.def_type.clone(),
            attr_name: attr_name.to_string(),
            typing_id: typing_id.to_string(),
        };
        self.defer(payload);
    }

    /// ```text
    /// const __gts_attrRet_3 = __gts_attr_obj_2.name(positionals...);
    /// ```
    /// followed by the nested block's scope, if any.
    fn lower_attribute(&mut self, attr: &GtsNamedAttributeData) -> Result<()> {
        let name = attribute_name(self.arena, attr.name);
        let attr_name = serde_json::Value::String(name).to_string();
        let lhs = self.enter_attr(attr_name.clone());

        let (positional_list, named_block) = match self.arena.data(attr.body) {
            Some(NodeData::GtsAttributeBody(body)) => {
                (body.positional_attributes, body.named_attributes)
            }
            _ => (NodeIndex::NONE, NodeIndex::NONE),
        };
        let arguments = self.lower_positional_arguments(positional_list)?;

        let return_value = self.next_id("__gts_attrRet_");
        let arena = &mut *self.arena;
        let receiver = arena.identifier(&lhs);
        let callee = match arena.data(attr.name) {
            Some(NodeData::StringLiteral(_)) => arena.element(receiver, attr.name),
            _ => arena.member(receiver, attr.name),
        };
        let call = arena.call(callee, arguments);
        let name = arena.identifier(&return_value);
        let statement = arena.variable(VariableKind::Const, name, NodeIndex::NONE, call);
        self.pending.push(statement);

        if named_block.is_some() {
            let block_start = self.arena.get(named_block).map(|n| n.pos);
            self.enter_vm_from_attr(&return_value);
            self.visit(named_block)?;
            self.exit_vm(block_start);
        }

        if attr.binding_name.is_some() {
            let typing_id = format!(
                "gts_binding_type_{}",
                self.state.externalized_bindings.len()
            );
            self.binding_typing(&attr_name, &typing_id);
            let define = self.current_define;
            self.state.externalized_bindings.push(ExternalizedBinding {
                binding_name: attr.binding_name,
                export: attr.binding_access != Some(BindingAccess::Private),
                internal_id: String::new(),
                value: NodeIndex::NONE,
                path: Vec::new(),
                typing_id: Some(typing_id),
                define,
            });
        }

        self.exit_attr(&return_value);
        Ok(())
    }

    /// Bare words become string literals; their leaf tokens widen by the two
    /// quotes so the mapping covers the printed literal. An empty argument
    /// prints as `undefined` to keep the call well-formed.
    fn lower_positional_arguments(&mut self, list: NodeIndex) -> Result<Vec<NodeIndex>> {
        let attributes = match self.arena.data(list) {
            Some(NodeData::GtsPositionalAttributeList(list)) => list.attributes.clone(),
            _ => return Ok(Vec::new()),
        };
        let mut arguments = Vec::with_capacity(attributes.len());
        for attribute in attributes.iter() {
            if let Some(&Node { pos, end, flags, .. }) =
                self.arena.get(attribute).filter(|node| node.is_dummy())
            {
                arguments.push(self.arena.add(Node {
                    pos,
                    end,
                    flags: flags - NodeFlags::DUMMY,
                    data: NodeData::Identifier(IdentifierData {
                        text: "undefined".to_string(),
                    }),
                }));
                continue;
            }
            let word = self
                .arena
                .identifier_text(attribute)
                .filter(|text| is_bare_word(text))
                .map(str::to_string);
            let Some(value) = word else {
                arguments.push(self.visit(attribute)?);
                continue;
            };
            if let Some(token) = self.leaf_tokens.get_mut(attribute) {
                token.generated_length = Some(value.len() as u32 + 2);
                token.adjustment = 0;
            }
            arguments.push(
                self.arena
                    .derive(attribute, NodeData::StringLiteral(LiteralData { value, raw: None })),
            );
        }
        Ok(arguments)
    }

    /// `const ret = __gts_attr_obj_N[__gts_Action]((__gts_fnArg, ...) => { ... });`
    fn lower_direct_action(&mut self, statements: &NodeList) -> Result<()> {
        let lhs = self.enter_attr(ids::ACTION.to_string());
        let function = self.direct_action_function(statements)?;
        let return_value = self.next_id("__gts_attrRet_");
        let arena = &mut *self.arena;
        let receiver = arena.identifier(&lhs);
        let key = arena.identifier(ids::ACTION);
        let callee = arena.element(receiver, key);
        let call = arena.call(callee, vec![function]);
        let name = arena.identifier(&return_value);
        let statement = arena.variable(VariableKind::Const, name, NodeIndex::NONE, call);
        self.pending.push(statement);
        Ok(())
    }
}

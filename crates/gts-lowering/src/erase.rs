//! Removal of TypeScript-only syntax.
//!
//! Type annotations, type parameters and arguments, assertion wrappers and
//! type-only declarations are dropped; features that would need code
//! generation (enums, decorators, parameter properties, value namespaces) are
//! rejected with an unsupported-feature error. Running the pass on its own
//! output changes nothing.

use crate::transform::Transform;
use gts_common::{GtsError, Result};
use gts_parser::parser::node::*;
use gts_parser::{NodeArena, NodeIndex, NodeList};
use tracing::debug_span;

const DECORATORS: &str = "decorators (related TSC proposal is not stage 4 yet)";
const ACCESSOR_FIELDS: &str = "accessor fields (related TSC proposal is not stage 4 yet)";
const ENUMS: &str = "enums";
const PARAMETER_PROPERTIES: &str = "accessibility modifiers on constructor parameters";
const VALUE_NAMESPACES: &str = "namespaces with non-type nodes";

/// Strip TypeScript syntax from the tree under `root`.
pub fn erase_types(arena: &mut NodeArena, root: NodeIndex) -> Result<NodeIndex> {
    let _span = debug_span!("erase_types").entered();
    TypeEraser { arena }.visit(root)
}

struct TypeEraser<'a> {
    arena: &'a mut NodeArena,
}

impl Transform for TypeEraser<'_> {
    fn arena(&mut self) -> &mut NodeArena {
        self.arena
    }

    fn visit(&mut self, idx: NodeIndex) -> Result<NodeIndex> {
        let Some(data) = self.arena.data(idx).cloned() else {
            return Ok(idx);
        };
        use NodeData as D;
        match data {
            D::Decorator(_) => Err(self.unsupported(idx, DECORATORS)),
            D::EnumDeclaration(_) => Err(self.unsupported(idx, ENUMS)),

            D::AsExpression(assertion)
            | D::SatisfiesExpression(assertion)
            | D::TypeAssertionExpression(assertion) => self.visit(assertion.expression),
            D::NonNullExpression(inner) => self.visit(inner.expression),
            D::ExpressionWithTypeArguments(inner) => self.visit(inner.expression),

            D::InterfaceDeclaration(_) | D::TypeAliasDeclaration(_) => Ok(self.empty(idx)),
            D::ModuleDeclaration(module) => self.erase_module(idx, &module),

            D::ImportDeclaration(import) => self.erase_import(idx, import),
            D::ExportNamedDeclaration(export) => self.erase_export(idx, export),
            D::ExportDefaultDeclaration(export) => {
                let declaration = self.visit(export.declaration)?;
                if self.is_empty_statement(declaration) {
                    return Ok(self.empty(idx));
                }
                self.replace_if_changed(
                    idx,
                    declaration != export.declaration,
                    D::ExportDefaultDeclaration(ExportDefaultData { declaration }),
                )
            }
            D::ExportAllDeclaration(export) if export.type_only => Ok(self.empty(idx)),

            D::VariableStatement(statement) if statement.declare => Ok(self.empty(idx)),
            D::VariableDeclaration(mut declaration) => {
                let changed = declaration.type_annotation.is_some() || declaration.exclamation;
                declaration.type_annotation = NodeIndex::NONE;
                declaration.exclamation = false;
                self.rebuild(idx, D::VariableDeclaration(declaration), changed)
            }

            D::FunctionDeclaration(function) if function.declare || function.body.is_none() => {
                Ok(self.empty(idx))
            }
            D::FunctionDeclaration(function) => {
                let (function, changed) = self.strip_function(function, true);
                self.rebuild(idx, D::FunctionDeclaration(function), changed)
            }
            D::FunctionExpression(function) => {
                let (function, changed) = self.strip_function(function, true);
                self.rebuild(idx, D::FunctionExpression(function), changed)
            }
            D::ArrowFunction(function) => {
                let (function, changed) = self.strip_function(function, false);
                self.rebuild(idx, D::ArrowFunction(function), changed)
            }
            D::Parameter(parameter) => self.erase_parameter(idx, parameter),

            D::ClassDeclaration(class) if class.declare => Ok(self.empty(idx)),
            D::ClassDeclaration(class) => {
                let class = self.erase_class(class)?;
                self.finish_class(idx, class, D::ClassDeclaration)
            }
            D::ClassExpression(class) => {
                let class = self.erase_class(class)?;
                self.finish_class(idx, class, D::ClassExpression)
            }
            D::MethodDeclaration(method) => self.erase_method(idx, method),
            D::PropertyDeclaration(property) => self.erase_property(idx, property),

            D::CallExpression(mut call) => {
                let changed = call.type_arguments.take().is_some();
                self.rebuild(idx, D::CallExpression(call), changed)
            }
            D::NewExpression(mut new) => {
                let changed = new.type_arguments.take().is_some();
                self.rebuild(idx, D::NewExpression(new), changed)
            }
            D::TaggedTemplateExpression(mut tagged) => {
                let changed = tagged.type_arguments.take().is_some();
                self.rebuild(idx, D::TaggedTemplateExpression(tagged), changed)
            }
            D::CatchClause(mut clause) => {
                let changed = clause.type_annotation.is_some();
                clause.type_annotation = NodeIndex::NONE;
                self.rebuild(idx, D::CatchClause(clause), changed)
            }

            other => self.rebuild(idx, other, false),
        }
    }
}

impl TypeEraser<'_> {
    fn empty(&mut self, origin: NodeIndex) -> NodeIndex {
        self.arena.add_at(origin, NodeData::EmptyStatement)
    }

    fn is_empty_statement(&self, idx: NodeIndex) -> bool {
        matches!(self.arena.data(idx), Some(NodeData::EmptyStatement))
    }

    fn unsupported(&self, idx: NodeIndex, feature: &str) -> GtsError {
        let (start, end) = self
            .arena
            .get(idx)
            .map(|node| (node.pos, node.end))
            .unwrap_or_default();
        GtsError::unsupported_feature(feature, start, end)
    }

    fn reject_decorators(&self, decorators: &NodeList) -> Result<()> {
        match decorators.first() {
            Some(first) => Err(self.unsupported(first, DECORATORS)),
            None => Ok(()),
        }
    }

    fn replace_if_changed(&mut self, idx: NodeIndex, changed: bool, data: NodeData) -> Result<NodeIndex> {
        Ok(if changed { self.arena.derive(idx, data) } else { idx })
    }

    /// Drop type parameters, the return type and a leading `this` parameter.
    fn strip_function(&self, mut function: FunctionData, allows_this: bool) -> (FunctionData, bool) {
        let mut changed = function.type_parameters.take().is_some();
        if function.return_type.is_some() {
            function.return_type = NodeIndex::NONE;
            changed = true;
        }
        if allows_this && self.is_this_parameter(function.parameters.first()) {
            function.parameters.nodes.remove(0);
            changed = true;
        }
        (function, changed)
    }

    fn is_this_parameter(&self, parameter: Option<NodeIndex>) -> bool {
        let Some(NodeData::Parameter(parameter)) = parameter.and_then(|p| self.arena.data(p)) else {
            return false;
        };
        self.arena.identifier_text(parameter.name) == Some("this")
    }

    fn erase_parameter(&mut self, idx: NodeIndex, mut parameter: ParameterData) -> Result<NodeIndex> {
        self.reject_decorators(&parameter.decorators)?;
        let changed = parameter.type_annotation.is_some()
            || parameter.question
            || !parameter.modifiers.is_empty();
        parameter.type_annotation = NodeIndex::NONE;
        parameter.question = false;
        parameter.modifiers = ModifierFlags::empty();
        self.rebuild(idx, NodeData::Parameter(parameter), changed)
    }

    /// Strip the class header and erase each member, dropping members that
    /// have no runtime presence.
    fn erase_class(&mut self, mut class: ClassData) -> Result<(ClassData, bool)> {
        self.reject_decorators(&class.decorators)?;
        let mut changed = class.type_parameters.take().is_some()
            | class.extends_type_arguments.take().is_some()
            | !class.implements.is_empty()
            | class.is_abstract;
        class.implements = NodeList::new();
        class.is_abstract = false;

        if class.extends.is_some() {
            let extends = self.visit(class.extends)?;
            changed |= extends != class.extends;
            class.extends = extends;
        }

        let mut members = Vec::with_capacity(class.members.len());
        for member in class.members.iter() {
            if matches!(self.arena.data(member), Some(NodeData::IndexSignature(_))) {
                changed = true;
                continue;
            }
            let erased = self.visit(member)?;
            if self.is_empty_statement(erased) {
                changed = true;
                continue;
            }
            changed |= erased != member;
            members.push(erased);
        }
        class.members = NodeList::from(members);
        Ok((class, changed))
    }

    fn finish_class(
        &mut self,
        idx: NodeIndex,
        (class, changed): (ClassData, bool),
        wrap: fn(ClassData) -> NodeData,
    ) -> Result<NodeIndex> {
        self.replace_if_changed(idx, changed, wrap(class))
    }

    fn erase_method(&mut self, idx: NodeIndex, mut method: MethodData) -> Result<NodeIndex> {
        self.reject_decorators(&method.decorators)?;
        if method.modifiers.contains(ModifierFlags::ABSTRACT) || method.function.body.is_none() {
            return Ok(self.empty(idx));
        }
        if method.kind == MethodKind::Constructor {
            for parameter in method.function.parameters.iter() {
                if let Some(NodeData::Parameter(p)) = self.arena.data(parameter)
                    && p.modifiers
                        .intersects(ModifierFlags::ACCESSIBILITY | ModifierFlags::READONLY)
                {
                    return Err(self.unsupported(parameter, PARAMETER_PROPERTIES));
                }
            }
        }
        let (function, mut changed) = self.strip_function(method.function, true);
        method.function = function;
        if method.modifiers.intersects(ModifierFlags::TYPE_ONLY) || method.question {
            method.modifiers.remove(ModifierFlags::TYPE_ONLY);
            method.question = false;
            changed = true;
        }
        self.rebuild(idx, NodeData::MethodDeclaration(method), changed)
    }

    fn erase_property(&mut self, idx: NodeIndex, mut property: PropertyDeclarationData) -> Result<NodeIndex> {
        self.reject_decorators(&property.decorators)?;
        if property.modifiers.contains(ModifierFlags::ACCESSOR) {
            return Err(self.unsupported(idx, ACCESSOR_FIELDS));
        }
        if property
            .modifiers
            .intersects(ModifierFlags::DECLARE | ModifierFlags::ABSTRACT)
        {
            return Ok(self.empty(idx));
        }
        let changed = property.type_annotation.is_some()
            || property.question
            || property.exclamation
            || property.modifiers.intersects(ModifierFlags::TYPE_ONLY);
        property.type_annotation = NodeIndex::NONE;
        property.question = false;
        property.exclamation = false;
        property.modifiers.remove(ModifierFlags::TYPE_ONLY);
        self.rebuild(idx, NodeData::PropertyDeclaration(property), changed)
    }

    /// Namespaces survive only when everything inside them erases away, in
    /// which case the whole declaration does too.
    fn erase_module(&mut self, idx: NodeIndex, module: &ModuleData) -> Result<NodeIndex> {
        if module.declare || module.body.is_none() {
            return Ok(self.empty(idx));
        }
        let entries = match self.arena.data(module.body) {
            Some(NodeData::ModuleBlock(block)) => block.statements.nodes.clone(),
            _ => vec![module.body],
        };
        for entry in entries {
            let erased = self.visit(entry)?;
            if !self.is_empty_statement(erased) {
                return Err(self.unsupported(idx, VALUE_NAMESPACES));
            }
        }
        Ok(self.empty(idx))
    }

    fn erase_import(&mut self, idx: NodeIndex, import: ImportDeclarationData) -> Result<NodeIndex> {
        if import.type_only {
            return Ok(self.empty(idx));
        }
        if import.specifiers.is_empty() {
            // Side-effect import.
            return Ok(idx);
        }
        let kept = self.value_specifiers(&import.specifiers);
        if kept.is_empty() {
            return Ok(self.empty(idx));
        }
        let changed = kept.len() != import.specifiers.len();
        self.replace_if_changed(
            idx,
            changed,
            NodeData::ImportDeclaration(ImportDeclarationData {
                specifiers: kept,
                ..import
            }),
        )
    }

    fn erase_export(&mut self, idx: NodeIndex, export: ExportNamedData) -> Result<NodeIndex> {
        if export.type_only {
            return Ok(self.empty(idx));
        }
        if export.declaration.is_some() {
            let declaration = self.visit(export.declaration)?;
            if self.is_empty_statement(declaration) {
                return Ok(self.empty(idx));
            }
            let changed = declaration != export.declaration;
            return self.replace_if_changed(
                idx,
                changed,
                NodeData::ExportNamedDeclaration(ExportNamedData {
                    declaration,
                    ..export
                }),
            );
        }
        let kept = self.value_specifiers(&export.specifiers);
        if kept.is_empty() {
            return Ok(self.empty(idx));
        }
        let changed = kept.len() != export.specifiers.len();
        self.replace_if_changed(
            idx,
            changed,
            NodeData::ExportNamedDeclaration(ExportNamedData {
                specifiers: kept,
                ..export
            }),
        )
    }

    /// Import/export specifiers without a `type` marker.
    fn value_specifiers(&self, specifiers: &NodeList) -> NodeList {
        specifiers
            .iter()
            .filter(|&specifier| {
                !matches!(
                    self.arena.data(specifier),
                    Some(NodeData::ImportSpecifier(ImportSpecifierData { type_only: true, .. }))
                        | Some(NodeData::ExportSpecifier(ExportSpecifierData { type_only: true, .. }))
                )
            })
            .collect()
    }
}

//! Declarations whose text is produced at print time.
//!
//! The typings walker leaves `DeferredDeclaration` nodes holding a JSON
//! `DeferredPayload`; `DeferredDeclarations` renders each one as a single
//! line of TypeScript when the tree is printed.

use gts_emitter::PrintHook;
use gts_parser::parser::node::{Node, NodeData};
use gts_parser::{NodeArena, NodeIndex};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const META: &str = "__gts_symbols_meta";
pub const NAMED_DEFINITION: &str = "__gts_symbols_namedDef";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeferredPayload {
    /// Open the root VM scope of a `define`.
    #[serde(rename = "enterVMFromRoot", rename_all = "camelCase")]
    EnterVmFromRoot {
        vm: String,
        def_type: String,
        meta_type: String,
    },
    /// Open the VM scope of a named-attribute block, typed by the attribute
    /// call's return value.
    #[serde(rename = "enterVMFromAttr", rename_all = "camelCase")]
    EnterVmFromAttr {
        return_type: String,
        def_type: String,
        meta_type: String,
    },
    /// Close a VM scope and check that every required attribute was given.
    #[serde(rename = "exitVM", rename_all = "camelCase")]
    ExitVm {
        meta_type: String,
        def_type: String,
        collected_attrs: Vec<String>,
        final_meta_type: String,
        /// Source offset of the named block the check reports against.
        error_loc: Option<u32>,
    },
    #[serde(rename = "enterAttr", rename_all = "camelCase")]
    EnterAttr {
        def_type: String,
        meta_type: String,
        lhs: String,
    },
    #[serde(rename = "exitAttr", rename_all = "camelCase")]
    ExitAttr {
        return_type: String,
        def_type: String,
        old_meta_type: String,
        new_meta_type: String,
    },
    #[serde(rename = "createBindingTyping", rename_all = "camelCase")]
    CreateBindingTyping {
        final_meta_type: String,
        def_type: String,
        attr_name: String,
        typing_id: String,
    },
}

impl DeferredPayload {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The needle a required-attribute error is reported on.
    pub fn required_attributes_needle(final_meta_type: &str) -> String {
        format!("null! as {final_meta_type}_rans.RequiredAttributes")
    }

    pub fn render(&self) -> String {
        match self {
            DeferredPayload::EnterVmFromRoot {
                vm,
                def_type,
                meta_type,
            } => format!(
                "type {def_type} = (typeof {vm})[{NAMED_DEFINITION}]; \
                 type {meta_type} = {def_type}[{META}];"
            ),
            DeferredPayload::EnterVmFromAttr {
                return_type,
                def_type,
                meta_type,
            } => format!(
                "type {def_type} = {return_type} extends {{ namedDefinition: infer Def }} \
                 ? Def : {{ [{META}]: unknown }}; \
                 type {meta_type} = {def_type}[{META}];"
            ),
            DeferredPayload::ExitVm {
                meta_type,
                def_type,
                collected_attrs,
                final_meta_type,
                error_loc: _,
            } => {
                let collected = if collected_attrs.is_empty() {
                    "never".to_string()
                } else {
                    collected_attrs.join(" | ")
                };
                let needle = Self::required_attributes_needle(final_meta_type);
                format!(
                    "type {final_meta_type} = {meta_type}; \
                     const {final_meta_type}_lhs: {{ [{META}]: {meta_type} }} & Omit<{def_type}, {META}> = 0 as any; \
                     type {final_meta_type}_lhs = typeof {final_meta_type}_lhs; \
                     namespace {final_meta_type}_rans {{ \
                     export type CollectedAttributes = {collected}; \
                     export type RequiredAttributes = {{ [K in keyof {def_type}]: {final_meta_type}_lhs[K] extends {{ required(this: {final_meta_type}_lhs): true }} ? K : never }}[keyof {def_type}]; \
                     }}; \
                     ((_: {final_meta_type}_rans.CollectedAttributes) => 0)({needle});"
                )
            }
            DeferredPayload::EnterAttr {
                def_type,
                meta_type,
                lhs,
            } => format!(
                "const {lhs}: {{ [{META}]: {meta_type} }} & Omit<{def_type}, {META}> = 0 as any;"
            ),
            DeferredPayload::ExitAttr {
                return_type,
                def_type: _,
                old_meta_type,
                new_meta_type,
            } => format!(
                "type {return_type} = typeof {return_type}; \
                 type {new_meta_type} = {return_type} extends {{ rewriteMeta: infer NewMeta extends {{}} }} \
                 ? NewMeta : {old_meta_type};"
            ),
            DeferredPayload::CreateBindingTyping {
                final_meta_type,
                def_type,
                attr_name,
                typing_id,
            } => format!(
                "type {typing_id}_lhs = {{ [{META}]: {final_meta_type}; \
                 as: {def_type}[{attr_name}] extends {{ as: infer As }} ? As : unknown }}; \
                 let {typing_id}_lhs!: {typing_id}_lhs; \
                 let {typing_id} = {typing_id}_lhs.as(); \
                 type {typing_id} = typeof {typing_id};"
            ),
        }
    }
}

/// Print hook rendering `DeferredDeclaration` nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredDeclarations;

impl PrintHook for DeferredDeclarations {
    fn print(&self, _arena: &NodeArena, idx: NodeIndex, node: &Node) -> Option<String> {
        let NodeData::DeferredDeclaration(deferred) = &node.data else {
            return None;
        };
        match DeferredPayload::from_json(&deferred.payload) {
            Ok(payload) => Some(payload.render()),
            Err(err) => {
                warn!(node = idx.0, error = %err, "malformed deferred payload");
                Some(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_json_uses_walker_field_names() {
        let payload = DeferredPayload::EnterAttr {
            def_type: "D".into(),
            meta_type: "M".into(),
            lhs: "L".into(),
        };
        assert_eq!(
            payload.to_json(),
            r#"{"type":"enterAttr","defType":"D","metaType":"M","lhs":"L"}"#
        );
        assert_eq!(DeferredPayload::from_json(&payload.to_json()).unwrap(), payload);
    }

    #[test]
    fn empty_collected_attributes_render_as_never() {
        let text = DeferredPayload::ExitVm {
            meta_type: "M".into(),
            def_type: "D".into(),
            collected_attrs: Vec::new(),
            final_meta_type: "F".into(),
            error_loc: None,
        }
        .render();
        assert!(text.contains("export type CollectedAttributes = never;"));
        assert!(text.ends_with("((_: F_rans.CollectedAttributes) => 0)(null! as F_rans.RequiredAttributes);"));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn binding_typing_reads_the_as_member() {
        let text = DeferredPayload::CreateBindingTyping {
            final_meta_type: "F".into(),
            def_type: "D".into(),
            attr_name: "\"skill\"".into(),
            typing_id: "gts_binding_type_0".into(),
        }
        .render();
        assert!(text.starts_with("type gts_binding_type_0_lhs = { [__gts_symbols_meta]: F; as: D[\"skill\"]"));
        assert!(text.ends_with("type gts_binding_type_0 = typeof gts_binding_type_0;"));
    }
}

//! Per-compile context threaded through the lowering passes.

use gts_common::TranspileOptions;
use gts_parser::NodeIndex;

/// Local names bound to the runtime entry points in lowered output.
pub mod ids {
    pub const CREATE_DEFINE: &str = "__gts_createDefine";
    pub const ACTION: &str = "__gts_Action";
    pub const PRELUDE: &str = "__gts_Prelude";
    pub const FN_ARG: &str = "__gts_fnArg";
    pub const ROOT_VM: &str = "__gts_rootVm";
    pub const BINDER: &str = "__gts_Binder";
    pub const QUERY: &str = "__gts_query";

    pub fn internal_binding(n: usize) -> String {
        format!("__gts_internal_binding_{n}")
    }
}

/// An attribute value hoisted to the top level because of an `as` clause.
#[derive(Debug, Clone)]
pub struct ExternalizedBinding {
    /// The user's binding identifier.
    pub binding_name: NodeIndex,
    /// `false` only for `as private`.
    pub export: bool,
    /// `__gts_internal_binding_<n>`
    pub internal_id: String,
    /// The lowered attribute arrow.
    pub value: NodeIndex,
    /// Names of the enclosing attributes, outermost first.
    pub path: Vec<String>,
    /// Typings only: name of the type alias describing the bound handle.
    pub typing_id: Option<String>,
    /// Typings only: the `define` statement the binding came from, whose
    /// leading comments the binding declaration carries.
    pub define: NodeIndex,
}

/// Mutable state of one lowering run. Created per call, never shared.
#[derive(Debug, Clone)]
pub struct TransformState {
    pub options: TranspileOptions,
    /// Names of the attribute definitions enclosing the current node.
    pub attribute_names: Vec<String>,
    pub externalized_bindings: Vec<ExternalizedBinding>,
    pub has_query_expressions: bool,
    pub defines_lowered: usize,
}

impl TransformState {
    pub fn new(options: TranspileOptions) -> Self {
        TransformState {
            options,
            attribute_names: Vec::new(),
            externalized_bindings: Vec::new(),
            has_query_expressions: false,
            defines_lowered: 0,
        }
    }

    pub fn vm_import_source(&self) -> String {
        format!("{}/vm", self.options.provider_import_source)
    }

    pub fn query_import_source(&self) -> String {
        format!("{}/query", self.options.provider_import_source)
    }

    pub fn binder_import_source(&self) -> String {
        format!("{}/binder", self.options.provider_import_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_submodules() {
        let state = TransformState::new(TranspileOptions::default());
        assert_eq!(state.vm_import_source(), "@gi-tcg/core/gts/vm");
        assert_eq!(state.query_import_source(), "@gi-tcg/core/gts/query");
        assert_eq!(state.binder_import_source(), "@gi-tcg/core/gts/binder");
        assert_eq!(ids::internal_binding(2), "__gts_internal_binding_2");
    }
}

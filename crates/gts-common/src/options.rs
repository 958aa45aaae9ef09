//! Transpile options shared by every pipeline stage.

use serde::{Deserialize, Serialize};

pub const DEFAULT_RUNTIME_IMPORT_SOURCE: &str = "@gi-tcg/gts-runtime";
pub const DEFAULT_PROVIDER_IMPORT_SOURCE: &str = "@gi-tcg/core/gts";
pub const DEFAULT_SHORTCUT_FUNCTION_PRELUDES: [&str; 8] = [
    "cryo", "hydro", "pyro", "electro", "anemo", "geo", "dendro", "omni",
];
pub const DEFAULT_QUERY_BINDINGS: [&str; 2] = ["my", "opp"];

/// Fully resolved options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranspileOptions {
    /// Module the lowering entry points are imported from.
    pub runtime_import_source: String,
    /// Base module for provider submodules (`/vm`, `/query`, `/binder`).
    pub provider_import_source: String,
    /// Names destructured into every shortcut function's scope.
    pub shortcut_function_preludes: Vec<String>,
    /// Names destructured into every query lambda's scope.
    pub query_bindings: Vec<String>,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        TranspileOptions {
            runtime_import_source: DEFAULT_RUNTIME_IMPORT_SOURCE.to_string(),
            provider_import_source: DEFAULT_PROVIDER_IMPORT_SOURCE.to_string(),
            shortcut_function_preludes: DEFAULT_SHORTCUT_FUNCTION_PRELUDES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            query_bindings: DEFAULT_QUERY_BINDINGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TranspileOptions {
    /// Overlay every field set in `partial`.
    #[must_use]
    pub fn merged_with(mut self, partial: &PartialTranspileOptions) -> Self {
        if let Some(value) = &partial.runtime_import_source {
            self.runtime_import_source = value.clone();
        }
        if let Some(value) = &partial.provider_import_source {
            self.provider_import_source = value.clone();
        }
        if let Some(value) = &partial.shortcut_function_preludes {
            self.shortcut_function_preludes = value.clone();
        }
        if let Some(value) = &partial.query_bindings {
            self.query_bindings = value.clone();
        }
        self
    }
}

/// Options as written in a project settings block or passed inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialTranspileOptions {
    pub runtime_import_source: Option<String>,
    pub provider_import_source: Option<String>,
    pub shortcut_function_preludes: Option<Vec<String>>,
    pub query_bindings: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overrides_only_present_fields() {
        let partial: PartialTranspileOptions =
            serde_json::from_str(r#"{ "queryBindings": ["self"] }"#).unwrap();
        let merged = TranspileOptions::default().merged_with(&partial);
        assert_eq!(merged.query_bindings, vec!["self".to_string()]);
        assert_eq!(merged.runtime_import_source, DEFAULT_RUNTIME_IMPORT_SOURCE);
        assert_eq!(merged.shortcut_function_preludes.len(), 8);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(TranspileOptions::default()).unwrap();
        assert_eq!(json["providerImportSource"], "@gi-tcg/core/gts");
    }
}

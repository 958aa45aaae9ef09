//! The virtual TypeScript document an editor type-checks in place of a
//! `.gts` file.

use gts_common::{GtsError, Result, TranspileOptions};
use gts_lowering::{lower_for_typings, print_typings};
use gts_parser::parse_loose;
use serde::Serialize;
use tracing::{debug_span, warn};

use crate::diagnostics::{LspDiagnostic, convert_error};
use crate::mappings::{CodeInformation, CodeMapping, build_mappings};

/// Language id of `.gts` documents. The virtual code is served to the
/// TypeScript service as a `.ts` script.
pub const GTS_LANGUAGE_ID: &str = "gaming-ts";

/// Language id for a document path, if it is a GTS source.
pub fn language_id_for(path: &str) -> Option<&'static str> {
    path.ends_with(".gts").then_some(GTS_LANGUAGE_ID)
}

/// Output of the tooling pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct VolarTranspileResult {
    pub code: String,
    pub mappings: Vec<CodeMapping>,
}

/// Loose-parse `source`, lower it for typings, print it and map it back.
pub fn transpile_for_volar(
    source: &str,
    file_name: &str,
    options: &TranspileOptions,
) -> Result<VolarTranspileResult> {
    let _span = debug_span!("transpile_for_volar", file = file_name).entered();
    let mut tree = parse_loose(source)?;
    let output = lower_for_typings(&mut tree.arena, tree.root, options)
        .map_err(|err| err.located(&tree.line_map))?;
    let printed = print_typings(
        &tree.arena,
        output.root,
        source,
        Some(file_name.to_string()),
    );
    let mappings = match &printed.source_map {
        Some(source_map) => build_mappings(
            &printed.code,
            source,
            source_map,
            &output.leaf_tokens,
            &output.additional_mappings,
        ),
        None => Vec::new(),
    };
    Ok(VolarTranspileResult {
        code: printed.code,
        mappings,
    })
}

/// A `.gts` file as seen by TypeScript tooling.
///
/// When the source cannot be transpiled the document is the source with
/// every character blanked out, so positions stay valid and the error is
/// reported through [`GtsVirtualCode::diagnostics`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GtsVirtualCode {
    pub id: &'static str,
    pub language_id: &'static str,
    pub code: String,
    pub mappings: Vec<CodeMapping>,
    #[serde(skip)]
    pub errors: Vec<GtsError>,
}

impl GtsVirtualCode {
    pub fn new(file_name: &str, source: &str, options: &TranspileOptions) -> Self {
        match transpile_for_volar(source, file_name, options) {
            Ok(result) => GtsVirtualCode {
                id: "root",
                language_id: GTS_LANGUAGE_ID,
                code: result.code,
                mappings: result.mappings,
                errors: Vec::new(),
            },
            Err(error) => {
                warn!(file = file_name, %error, "serving blank virtual code");
                let code = blank_document(source);
                let mapping = CodeMapping::new(
                    0,
                    0,
                    code.len() as u32,
                    code.len() as u32,
                    CodeInformation::VERIFICATION_ONLY,
                );
                GtsVirtualCode {
                    id: "root",
                    language_id: GTS_LANGUAGE_ID,
                    code,
                    mappings: vec![mapping],
                    errors: vec![error],
                }
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn diagnostics(&self) -> Vec<LspDiagnostic> {
        self.errors.iter().map(convert_error).collect()
    }
}

/// Every line of `source` as spaces of the same byte length.
fn blank_document(source: &str) -> String {
    source
        .split('\n')
        .map(|line| " ".repeat(line.len()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_document_keeps_line_breaks() {
        assert_eq!(blank_document("ab\n\ncd é"), "  \n\n     ");
        assert_eq!(blank_document(""), "");
    }

    #[test]
    fn language_id_by_extension() {
        assert_eq!(language_id_for("/cards/hero.gts"), Some("gaming-ts"));
        assert_eq!(language_id_for("/cards/hero.ts"), None);
    }
}

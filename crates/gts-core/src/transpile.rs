use gts_common::{Result, SourceMap, TranspileOptions};
use gts_emitter::{PrinterOptions, print};
use gts_lowering::{erase_types, lower};
use gts_lsp::VolarTranspileResult;
use gts_parser::parse;
use tracing::{debug, debug_span};

/// JavaScript output of [`transpile`].
#[derive(Debug, Clone)]
pub struct TranspileResult {
    pub code: String,
    /// Maps `code` back to the input, which is embedded as the only source.
    pub source_map: Option<SourceMap>,
}

/// Compile a GTS source to JavaScript.
///
/// `file_name` names the source in the source map. Errors carry the
/// line/column location of the offending range.
pub fn transpile(
    source: &str,
    file_name: &str,
    options: &TranspileOptions,
) -> Result<TranspileResult> {
    let _span = debug_span!("transpile", file = file_name).entered();
    let mut tree = parse(source)?;
    let lowered = lower(&mut tree.arena, tree.root, options)
        .map_err(|err| err.located(&tree.line_map))?;
    let erased =
        erase_types(&mut tree.arena, lowered).map_err(|err| err.located(&tree.line_map))?;
    let printed = print(
        &tree.arena,
        erased,
        Some(source),
        PrinterOptions {
            source_file_name: Some(file_name.to_string()),
            ..PrinterOptions::default()
        },
    );
    debug!(bytes = printed.code.len(), "transpiled");
    Ok(TranspileResult {
        code: printed.code,
        source_map: printed.source_map,
    })
}

/// Compile a GTS source to the virtual TypeScript document editor tooling
/// type-checks, with range mappings back to the source.
pub fn transpile_for_volar(
    source: &str,
    file_name: &str,
    options: &TranspileOptions,
) -> Result<VolarTranspileResult> {
    gts_lsp::transpile_for_volar(source, file_name, options)
}

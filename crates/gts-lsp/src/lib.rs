//! Editor tooling support for GTS sources.
//!
//! An editor does not type-check `.gts` text directly. It checks a virtual
//! TypeScript document produced by the typings lowering and translates
//! positions back and forth through range mappings:
//! - `mappings` - range mappings built from the printer's source map
//! - `virtual_code` - the virtual document, with a blank fallback on error
//! - `diagnostics` - transpile errors as LSP diagnostics
//! - `position` - LSP line/character positions

pub mod diagnostics;
pub mod mappings;
pub mod position;
pub mod virtual_code;

pub use diagnostics::{DiagnosticSeverity, LspDiagnostic, convert_error};
pub use mappings::{CodeInformation, CodeMapping, build_mappings};
pub use position::{Position, Range};
pub use virtual_code::{
    GTS_LANGUAGE_ID, GtsVirtualCode, VolarTranspileResult, language_id_for, transpile_for_volar,
};

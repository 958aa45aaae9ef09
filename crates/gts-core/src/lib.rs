//! GTS transpiler.
//!
//! GTS is TypeScript with `define` blocks, a declarative syntax for card
//! definitions. This crate ties the pipeline together:
//!
//! - [`transpile`] - strict parse, lower `define` blocks, erase types, print
//!   JavaScript with a source map (build tools)
//! - [`transpile_for_volar`] - loose parse, lower for typings, print a
//!   virtual TypeScript document with range mappings (editor tooling)
//! - [`config`] - project options from the nearest `package.json`
//! - [`tracing_config`] - opt-in tracing output

pub mod config;
pub mod tracing_config;
mod transpile;

pub use config::{
    ResolveConfigOptions, resolve_config, resolve_config_async, resolve_config_from_fs,
    resolve_config_from_fs_async,
};
pub use gts_common::{
    GtsError, GtsErrorKind, PartialTranspileOptions, Position, Result, SourceLocation, SourceMap,
    TranspileOptions,
};
pub use gts_lsp::{CodeInformation, CodeMapping, GtsVirtualCode, VolarTranspileResult};
pub use gts_parser::{SyntaxTree, parse, parse_loose};
pub use transpile::{TranspileResult, transpile, transpile_for_volar};

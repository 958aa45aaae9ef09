//! Printer for GTS syntax trees.
//!
//! Turns a `NodeArena` tree back into source text and a v3 source map:
//! - `source_writer` - output buffer tracking generated line/column and mappings
//! - `emitter` - the `Printer`, its options and per-node print hooks

pub mod emitter;
pub mod source_writer;

pub use emitter::{
    CommentStyle, DummySuppression, PrintHook, PrintResult, Printer, PrinterOptions, print,
};
pub use source_writer::{SourcePosition, SourceWriter, source_position_from_offset};

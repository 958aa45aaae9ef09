//! Common types and utilities for the GTS transpiler.
//!
//! This crate provides foundational types used across all gts crates:
//! - Position/line-map types for converting byte offsets to line/column locations
//! - Source map model, VLQ codec, generator and decoder
//! - Comment ranges captured by the scanner
//! - The shared error type
//! - Transpile options and their defaults

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position, SourceLocation};

// Source Map generation and decoding
pub mod source_map;
pub use source_map::{SourceMap, SourceMapGenerator};

// Comment ranges
pub mod comments;
pub use comments::CommentRange;

// Errors shared by the parser and the lowering passes
pub mod error;
pub use error::{GtsError, GtsErrorKind, Result};

// Transpile options
pub mod options;
pub use options::{PartialTranspileOptions, TranspileOptions};

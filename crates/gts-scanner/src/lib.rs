//! Scanner for TypeScript source with the GTS `define` extensions.
//!
//! GTS adds no new punctuation: `define`, `query` and the attribute binding
//! words are contextual identifiers, and shortcut syntax reuses `:`.

pub mod char_codes;
pub mod scanner;
pub mod syntax_kind;

pub use scanner::{ScanError, ScannerSnapshot, ScannerState, TokenFlags};
pub use syntax_kind::{SyntaxKind, text_to_keyword, token_text};

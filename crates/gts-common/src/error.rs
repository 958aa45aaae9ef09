//! The error type shared by the parser and the lowering passes.

use crate::position::{LineMap, SourceLocation};
use serde::Serialize;

pub type Result<T> = std::result::Result<T, GtsError>;

/// Broad classification of a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GtsErrorKind {
    /// Malformed input rejected by the parser.
    Syntax,
    /// Well-formed input using a construct that has no lowering.
    Unsupported,
}

/// A fatal transpile error with the byte range it applies to.
///
/// `location` is filled in once a `LineMap` for the source is available:
/// the parser does it immediately, lowering errors get located by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}{}", location_suffix(.location))]
pub struct GtsError {
    pub kind: GtsErrorKind,
    pub message: String,
    pub start: u32,
    pub end: u32,
    pub location: Option<SourceLocation>,
}

fn location_suffix(location: &Option<SourceLocation>) -> String {
    match location {
        Some(loc) => format!(" ({}:{})", loc.start.line, loc.start.column),
        None => String::new(),
    }
}

impl GtsError {
    pub fn syntax(message: impl Into<String>, start: u32, end: u32) -> Self {
        GtsError {
            kind: GtsErrorKind::Syntax,
            message: message.into(),
            start,
            end,
            location: None,
        }
    }

    pub fn unsupported(message: impl Into<String>, start: u32, end: u32) -> Self {
        GtsError {
            kind: GtsErrorKind::Unsupported,
            message: message.into(),
            start,
            end,
            location: None,
        }
    }

    /// `TypeScript feature not supported: <feature>`
    pub fn unsupported_feature(feature: &str, start: u32, end: u32) -> Self {
        Self::unsupported(
            format!("TypeScript feature not supported: {feature}"),
            start,
            end,
        )
    }

    /// Resolve the line/column location against the source's line map.
    #[must_use]
    pub fn located(mut self, line_map: &LineMap) -> Self {
        if self.location.is_none() {
            self.location = Some(line_map.location(self.start, self.end));
        }
        self
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == GtsErrorKind::Syntax
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_location_once_resolved() {
        let map = LineMap::build("a\nbc");
        let err = GtsError::syntax("Unexpected token", 3, 4);
        assert_eq!(err.to_string(), "Unexpected token");
        let err = err.located(&map);
        assert_eq!(err.to_string(), "Unexpected token (2:1)");
    }

    #[test]
    fn unsupported_feature_message() {
        let err = GtsError::unsupported_feature("enums", 0, 4);
        assert_eq!(err.message, "TypeScript feature not supported: enums");
        assert_eq!(err.kind, GtsErrorKind::Unsupported);
    }
}

//! LSP diagnostics for transpile errors.

use gts_common::{GtsError, Position as SourcePosition, SourceLocation};
use serde::{Deserialize, Serialize};

use crate::position::Range;

const DIAGNOSTIC_SOURCE: &str = "gts-transpiler";
const DIAGNOSTIC_CODE: &str = "gts-transpiler-error";

/// Diagnostic severity level (matches LSP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum DiagnosticSeverity {
    Error = 1,
    Warning = 2,
    Information = 3,
    Hint = 4,
}

impl From<DiagnosticSeverity> for u8 {
    fn from(severity: DiagnosticSeverity) -> u8 {
        severity as u8
    }
}

impl TryFrom<u8> for DiagnosticSeverity {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, <DiagnosticSeverity as TryFrom<u8>>::Error> {
        match value {
            1 => Ok(Self::Error),
            2 => Ok(Self::Warning),
            3 => Ok(Self::Information),
            4 => Ok(Self::Hint),
            _ => Err("invalid diagnostic severity"),
        }
    }
}

/// LSP diagnostic payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LspDiagnostic {
    pub range: Range,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<DiagnosticSeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub message: String,
}

/// Convert a transpile error to an LSP diagnostic. An error without a
/// location is reported on the first character of the file.
pub fn convert_error(error: &GtsError) -> LspDiagnostic {
    let location = error.location.unwrap_or_else(|| {
        SourceLocation::new(SourcePosition::new(1, 0), SourcePosition::new(1, 1))
    });
    LspDiagnostic {
        range: Range::from(location),
        severity: Some(DiagnosticSeverity::Error),
        code: Some(DIAGNOSTIC_CODE.to_string()),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: error.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use gts_common::LineMap;

    #[test]
    fn located_error_uses_zero_based_lines() {
        let map = LineMap::build("define foo {\n  bar as protected Baz;\n}");
        let error = GtsError::unsupported("Protected bindings are not supported in this context.", 15, 35)
            .located(&map);
        let diagnostic = convert_error(&error);
        assert_eq!(diagnostic.range.start, Position::new(1, 2));
        assert_eq!(diagnostic.range.end, Position::new(1, 22));
        assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::Error));
        assert_eq!(diagnostic.source.as_deref(), Some("gts-transpiler"));
        assert_eq!(diagnostic.code.as_deref(), Some("gts-transpiler-error"));
    }

    #[test]
    fn unlocated_error_defaults_to_first_character() {
        let diagnostic = convert_error(&GtsError::syntax("Unexpected token", 4, 5));
        assert_eq!(diagnostic.range.start, Position::new(0, 0));
        assert_eq!(diagnostic.range.end, Position::new(0, 1));
        assert_eq!(diagnostic.message, "Unexpected token");
    }

    #[test]
    fn diagnostic_serializes_like_lsp() {
        let diagnostic = convert_error(&GtsError::syntax("Unexpected token", 0, 1));
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["severity"], 1);
        assert_eq!(json["range"]["start"]["line"], 0);
        assert_eq!(json["range"]["end"]["character"], 1);
        assert_eq!(json["code"], "gts-transpiler-error");
    }
}

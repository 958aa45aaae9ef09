//! Range mappings between a `.gts` source and its virtual document.
//!
//! The printer's source map only records points. Editor tooling works with
//! ranges, so each leaf token of the parsed tree becomes one range: its source
//! start is looked up among the decoded points and its length comes from the
//! token itself or from the override the typings pass recorded for it.
//!
//! Offsets are UTF-8 byte offsets into the respective texts.

use gts_common::{LineMap, SourceMap};
use gts_lowering::LeafToken;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace};

/// Which language features a mapping carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeInformation {
    #[serde(default)]
    pub verification: bool,
    #[serde(default)]
    pub completion: bool,
    #[serde(default)]
    pub semantic: bool,
    #[serde(default)]
    pub navigation: bool,
    #[serde(default)]
    pub structure: bool,
    #[serde(default)]
    pub format: bool,
}

impl CodeInformation {
    pub const ALL: CodeInformation = CodeInformation {
        verification: true,
        completion: true,
        semantic: true,
        navigation: true,
        structure: true,
        format: true,
    };

    /// Diagnostics only.
    pub const VERIFICATION_ONLY: CodeInformation = CodeInformation {
        verification: true,
        completion: false,
        semantic: false,
        navigation: false,
        structure: false,
        format: false,
    };
}

/// One source range mapped onto one generated range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeMapping {
    pub source_offsets: Vec<u32>,
    pub generated_offsets: Vec<u32>,
    pub lengths: Vec<u32>,
    /// Present only when a generated length differs from its source length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_lengths: Option<Vec<u32>>,
    pub data: CodeInformation,
}

impl CodeMapping {
    pub fn new(
        source_offset: u32,
        generated_offset: u32,
        length: u32,
        generated_length: u32,
        data: CodeInformation,
    ) -> Self {
        CodeMapping {
            source_offsets: vec![source_offset],
            generated_offsets: vec![generated_offset],
            lengths: vec![length],
            generated_lengths: (generated_length != length).then(|| vec![generated_length]),
            data,
        }
    }

    pub fn source_offset(&self) -> u32 {
        self.source_offsets.first().copied().unwrap_or(0)
    }

    pub fn generated_offset(&self) -> u32 {
        self.generated_offsets.first().copied().unwrap_or(0)
    }

    pub fn length(&self) -> u32 {
        self.lengths.first().copied().unwrap_or(0)
    }

    pub fn generated_length(&self) -> u32 {
        self.generated_lengths
            .as_ref()
            .and_then(|lengths| lengths.first().copied())
            .unwrap_or_else(|| self.length())
    }
}

/// Build the range mappings of a printed virtual document.
///
/// `additional_mappings` maps a source offset to a snippet of synthetic
/// generated text; each snippet found in `generated` yields a zero-length,
/// verification-only mapping so errors inside it surface at that offset.
pub fn build_mappings(
    generated: &str,
    source: &str,
    source_map: &SourceMap,
    leaf_tokens: &[LeafToken],
    additional_mappings: &IndexMap<u32, String>,
) -> Vec<CodeMapping> {
    let _span = debug_span!("build_mappings", tokens = leaf_tokens.len()).entered();
    let points = decode_points(generated, source, source_map);

    let mut mappings = Vec::with_capacity(leaf_tokens.len() + additional_mappings.len());
    for token in leaf_tokens {
        match leaf_mapping(token, &points, generated, source) {
            Some(mapping) => mappings.push(mapping),
            None => trace!(kind = token.kind, pos = token.pos, "unmapped leaf token"),
        }
    }

    for (&source_offset, snippet) in additional_mappings {
        let Some(found) = generated.find(snippet.as_str()) else {
            trace!(source_offset, snippet = %snippet, "additional mapping target not found");
            continue;
        };
        mappings.push(CodeMapping::new(
            source_offset,
            found as u32,
            0,
            0,
            CodeInformation::VERIFICATION_ONLY,
        ));
    }

    mappings.sort_by_key(CodeMapping::source_offset);
    debug!(mappings = mappings.len(), "built mappings");
    mappings
}

/// Source offset -> generated offset for every decoded source map segment.
/// When several segments share a source position the last one wins, which is
/// the innermost node printed at that position.
fn decode_points(generated: &str, source: &str, source_map: &SourceMap) -> FxHashMap<u32, u32> {
    let source_lines = LineMap::build(source);
    let generated_lines = LineMap::build(generated);
    let mut points = FxHashMap::default();
    for segment in source_map.decode() {
        if segment.source_index != 0 {
            continue;
        }
        let source_offset = source_lines.offset_of(segment.original_line, segment.original_column);
        let generated_offset =
            generated_lines.offset_of(segment.generated_line, segment.generated_column);
        let (Some(source_offset), Some(generated_offset)) = (source_offset, generated_offset)
        else {
            continue;
        };
        if source_offset as usize > source.len() || generated_offset as usize > generated.len() {
            continue;
        }
        points.insert(source_offset, generated_offset);
    }
    points
}

fn leaf_mapping(
    token: &LeafToken,
    points: &FxHashMap<u32, u32>,
    generated: &str,
    source: &str,
) -> Option<CodeMapping> {
    let mapped = *points.get(&token.pos)?;
    let generated_start = u32::try_from(i64::from(mapped) + i64::from(token.adjustment)).ok()?;

    if token.source_len() == 0 {
        return Some(placeholder_mapping(
            token.pos,
            generated_start,
            source,
            generated,
        ));
    }
    Some(CodeMapping::new(
        token.pos,
        generated_start,
        token.source_len(),
        token.generated_len(),
        CodeInformation::ALL,
    ))
}

/// A placeholder has no text of its own. Its range is widened backward over
/// the whitespace before it on both sides, so a cursor right after `foo.`
/// still falls inside a mapping.
fn placeholder_mapping(
    source_pos: u32,
    generated_pos: u32,
    source: &str,
    generated: &str,
) -> CodeMapping {
    let source_start = whitespace_start(source, source_pos);
    let generated_start = whitespace_start(generated, generated_pos);
    CodeMapping::new(
        source_start,
        generated_start,
        source_pos - source_start,
        generated_pos - generated_start,
        CodeInformation::ALL,
    )
}

fn whitespace_start(text: &str, offset: u32) -> u32 {
    let bytes = text.as_bytes();
    let mut start = (offset as usize).min(bytes.len());
    while start > 0 && bytes[start - 1].is_ascii_whitespace() {
        start -= 1;
    }
    start as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_start_stops_at_text() {
        assert_eq!(whitespace_start("a.  \n b", 6), 2);
        assert_eq!(whitespace_start("ab", 2), 2);
        assert_eq!(whitespace_start("   ", 3), 0);
        assert_eq!(whitespace_start("ab", 10), 2);
    }

    #[test]
    fn generated_lengths_only_when_different() {
        let same = CodeMapping::new(1, 2, 3, 3, CodeInformation::ALL);
        assert!(same.generated_lengths.is_none());
        assert_eq!(same.generated_length(), 3);
        let widened = CodeMapping::new(1, 2, 3, 5, CodeInformation::ALL);
        assert_eq!(widened.generated_lengths, Some(vec![5]));
        assert_eq!(widened.generated_length(), 5);
    }

    #[test]
    fn mapping_serializes_camel_case() {
        let mapping = CodeMapping::new(0, 4, 3, 3, CodeInformation::VERIFICATION_ONLY);
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json["sourceOffsets"], serde_json::json!([0]));
        assert_eq!(json["generatedOffsets"], serde_json::json!([4]));
        assert!(json.get("generatedLengths").is_none());
        assert_eq!(json["data"]["verification"], true);
        assert_eq!(json["data"]["completion"], false);
    }
}

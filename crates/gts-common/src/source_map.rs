//! Source map (v3) model, generation and decoding.

use serde::{Deserialize, Serialize};

/// Base64 VLQ codec used by the `mappings` field.
pub mod vlq {
    const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    fn base64_value(byte: u8) -> Option<u32> {
        match byte {
            b'A'..=b'Z' => Some((byte - b'A') as u32),
            b'a'..=b'z' => Some((byte - b'a') as u32 + 26),
            b'0'..=b'9' => Some((byte - b'0') as u32 + 52),
            b'+' => Some(62),
            b'/' => Some(63),
            _ => None,
        }
    }

    /// Append the VLQ encoding of `value` to `out`.
    pub fn encode(value: i64, out: &mut String) {
        let mut vlq = if value < 0 {
            ((-value) << 1) | 1
        } else {
            value << 1
        } as u64;
        loop {
            let mut digit = (vlq & 0b11111) as usize;
            vlq >>= 5;
            if vlq > 0 {
                digit |= 0b100000;
            }
            out.push(BASE64[digit] as char);
            if vlq == 0 {
                break;
            }
        }
    }

    /// Decode one VLQ value; returns the value and the number of bytes consumed.
    pub fn decode(input: &[u8]) -> Option<(i64, usize)> {
        let mut result: u64 = 0;
        let mut shift = 0u32;
        for (i, &byte) in input.iter().enumerate() {
            let digit = base64_value(byte)? as u64;
            result |= (digit & 0b11111) << shift;
            if digit & 0b100000 == 0 {
                let negative = result & 1 == 1;
                let magnitude = (result >> 1) as i64;
                return Some((if negative { -magnitude } else { magnitude }, i + 1));
            }
            shift += 5;
            if shift > 60 {
                return None;
            }
        }
        None
    }
}

/// A serialized v3 source map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode the `mappings` field.
    pub fn decode(&self) -> Vec<DecodedMapping> {
        decode_mappings(&self.mappings)
    }
}

/// One decoded segment with absolute values. Lines and columns are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedMapping {
    pub generated_line: u32,
    pub generated_column: u32,
    pub source_index: u32,
    pub original_line: u32,
    pub original_column: u32,
    pub name_index: Option<u32>,
}

/// Decode a `mappings` string. Segments without a source (1-field) are skipped;
/// malformed segments end decoding of their line.
pub fn decode_mappings(mappings: &str) -> Vec<DecodedMapping> {
    let mut out = Vec::new();
    let (mut source_index, mut original_line, mut original_column, mut name_index) =
        (0i64, 0i64, 0i64, 0i64);

    for (generated_line, line) in mappings.split(';').enumerate() {
        let mut generated_column = 0i64;
        for segment in line.split(',').filter(|s| !s.is_empty()) {
            let bytes = segment.as_bytes();
            let mut fields = [0i64; 5];
            let mut count = 0;
            let mut cursor = 0;
            while cursor < bytes.len() && count < 5 {
                let Some((value, used)) = vlq::decode(&bytes[cursor..]) else {
                    break;
                };
                fields[count] = value;
                count += 1;
                cursor += used;
            }
            if count == 0 {
                break;
            }
            generated_column += fields[0];
            if count < 4 {
                continue;
            }
            source_index += fields[1];
            original_line += fields[2];
            original_column += fields[3];
            let name = if count == 5 {
                name_index += fields[4];
                Some(name_index as u32)
            } else {
                None
            };
            out.push(DecodedMapping {
                generated_line: generated_line as u32,
                generated_column: generated_column as u32,
                source_index: source_index as u32,
                original_line: original_line as u32,
                original_column: original_column as u32,
                name_index: name,
            });
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
struct RawMapping {
    generated_line: u32,
    generated_column: u32,
    source_index: u32,
    original_line: u32,
    original_column: u32,
    name_index: Option<u32>,
}

/// Accumulates mappings in generated order and encodes them.
#[derive(Debug, Default)]
pub struct SourceMapGenerator {
    file: Option<String>,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    mappings: Vec<RawMapping>,
}

impl SourceMapGenerator {
    pub fn new(file: Option<String>) -> Self {
        SourceMapGenerator {
            file,
            ..Default::default()
        }
    }

    /// Register a source, returning its index.
    pub fn add_source(&mut self, name: &str, content: Option<String>) -> u32 {
        if let Some(i) = self.sources.iter().position(|s| s == name) {
            return i as u32;
        }
        self.sources.push(name.to_string());
        self.sources_content.push(content);
        (self.sources.len() - 1) as u32
    }

    pub fn add_name(&mut self, name: &str) -> u32 {
        if let Some(i) = self.names.iter().position(|n| n == name) {
            return i as u32;
        }
        self.names.push(name.to_string());
        (self.names.len() - 1) as u32
    }

    /// Add a mapping. Mappings must arrive in non-decreasing generated order;
    /// an exact duplicate of the previous mapping is dropped.
    pub fn add_mapping(
        &mut self,
        generated_line: u32,
        generated_column: u32,
        source_index: u32,
        original_line: u32,
        original_column: u32,
        name_index: Option<u32>,
    ) {
        if let Some(last) = self.mappings.last()
            && last.generated_line == generated_line
            && last.generated_column == generated_column
            && last.source_index == source_index
            && last.original_line == original_line
            && last.original_column == original_column
        {
            return;
        }
        self.mappings.push(RawMapping {
            generated_line,
            generated_column,
            source_index,
            original_line,
            original_column,
            name_index,
        });
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    fn encode_mappings(&self) -> String {
        let mut out = String::new();
        let mut line = 0u32;
        let mut prev_column = 0i64;
        let (mut prev_source, mut prev_orig_line, mut prev_orig_column, mut prev_name) =
            (0i64, 0i64, 0i64, 0i64);
        let mut first_in_line = true;

        for m in &self.mappings {
            while line < m.generated_line {
                out.push(';');
                line += 1;
                prev_column = 0;
                first_in_line = true;
            }
            if !first_in_line {
                out.push(',');
            }
            first_in_line = false;

            vlq::encode(m.generated_column as i64 - prev_column, &mut out);
            prev_column = m.generated_column as i64;
            vlq::encode(m.source_index as i64 - prev_source, &mut out);
            prev_source = m.source_index as i64;
            vlq::encode(m.original_line as i64 - prev_orig_line, &mut out);
            prev_orig_line = m.original_line as i64;
            vlq::encode(m.original_column as i64 - prev_orig_column, &mut out);
            prev_orig_column = m.original_column as i64;
            if let Some(name) = m.name_index {
                vlq::encode(name as i64 - prev_name, &mut out);
                prev_name = name as i64;
            }
        }
        out
    }

    pub fn generate(&self) -> SourceMap {
        let has_content = self.sources_content.iter().any(Option::is_some);
        SourceMap {
            version: 3,
            file: self.file.clone(),
            sources: self.sources.clone(),
            sources_content: has_content.then(|| self.sources_content.clone()),
            names: self.names.clone(),
            mappings: self.encode_mappings(),
        }
    }
}

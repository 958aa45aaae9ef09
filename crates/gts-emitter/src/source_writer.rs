//! Output buffer with indentation and source-map bookkeeping.
//!
//! The writer tracks the generated line and byte column of everything it
//! appends. `write_node` records a mapping from the current generated
//! position to a source position before writing, so the printer only has to
//! say which source position the next piece of text came from.

use gts_common::{LineMap, SourceMap, SourceMapGenerator};

/// Zero-based line and byte column in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

pub fn source_position_from_offset(line_map: &LineMap, offset: u32) -> SourcePosition {
    let (line, column) = line_map.line_and_column(offset);
    SourcePosition { line, column }
}

#[derive(Debug)]
pub struct SourceWriter {
    output: String,
    line: u32,
    column: u32,
    indent_level: u32,
    indent_unit: String,
    /// Set after a newline; indentation is written lazily on the next text.
    at_line_start: bool,
    source_map: Option<SourceMapGenerator>,
    source_index: u32,
}

impl SourceWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        SourceWriter {
            output: String::with_capacity(capacity),
            line: 0,
            column: 0,
            indent_level: 0,
            indent_unit: "\t".to_string(),
            at_line_start: true,
            source_map: None,
            source_index: 0,
        }
    }

    pub fn set_indent_unit(&mut self, unit: &str) {
        self.indent_unit = unit.to_string();
    }

    pub fn enable_source_map(&mut self, output_name: Option<String>) {
        self.source_map = Some(SourceMapGenerator::new(output_name));
    }

    pub fn add_source(&mut self, name: &str, content: Option<String>) {
        if let Some(generator) = &mut self.source_map {
            self.source_index = generator.add_source(name, content);
        }
    }

    pub fn has_source_map(&self) -> bool {
        self.source_map.is_some()
    }

    fn flush_indent(&mut self) {
        if !self.at_line_start {
            return;
        }
        self.at_line_start = false;
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent_unit);
            self.column += self.indent_unit.len() as u32;
        }
    }

    /// Append text; embedded newlines advance the line counter.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.flush_indent();
        self.output.push_str(text);
        match text.rfind('\n') {
            Some(last) => {
                self.line += text.matches('\n').count() as u32;
                self.column = (text.len() - last - 1) as u32;
            }
            None => self.column += text.len() as u32,
        }
    }

    /// Map the current generated position to `source_pos`, then append `text`.
    /// The mapping is recorded even when `text` is empty.
    pub fn write_node(&mut self, text: &str, source_pos: SourcePosition) {
        self.flush_indent();
        self.add_mapping(source_pos, None);
        self.write(text);
    }

    pub fn write_node_with_name(&mut self, text: &str, source_pos: SourcePosition, name: &str) {
        self.flush_indent();
        let name_index = self.source_map.as_mut().map(|g| g.add_name(name));
        self.add_mapping(source_pos, name_index);
        self.write(text);
    }

    /// Record a mapping at the current generated position without writing.
    pub fn add_mapping(&mut self, source_pos: SourcePosition, name_index: Option<u32>) {
        if let Some(generator) = &mut self.source_map {
            generator.add_mapping(
                self.line,
                self.column,
                self.source_index,
                source_pos.line,
                source_pos.column,
                name_index,
            );
        }
    }

    pub fn write_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.write(ch.encode_utf8(&mut buf));
    }

    pub fn write_space(&mut self) {
        self.write(" ");
    }

    pub fn write_line(&mut self) {
        self.output.push('\n');
        self.line += 1;
        self.column = 0;
        self.at_line_start = true;
    }

    /// Start a new line unless the output already sits at one.
    pub fn ensure_line_break(&mut self) {
        if !self.at_line_start {
            self.write_line();
        }
    }

    pub fn is_at_line_start(&self) -> bool {
        self.at_line_start
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn get_output(&self) -> &str {
        &self.output
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn generate_source_map(&self) -> Option<SourceMap> {
        self.source_map.as_ref().map(SourceMapGenerator::generate)
    }

    pub fn generate_source_map_json(&self) -> Option<String> {
        self.generate_source_map().map(|map| map.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gts_common::source_map::decode_mappings;

    #[test]
    fn indentation_is_written_lazily() {
        let mut writer = SourceWriter::with_capacity(16);
        writer.set_indent_unit("  ");
        writer.write("{");
        writer.increase_indent();
        writer.write_line();
        writer.write("a;");
        writer.decrease_indent();
        writer.write_line();
        writer.write("}");
        assert_eq!(writer.get_output(), "{\n  a;\n}");
    }

    #[test]
    fn write_node_maps_after_indent() {
        let mut writer = SourceWriter::with_capacity(16);
        writer.enable_source_map(None);
        writer.add_source("a.gts", None);
        writer.increase_indent();
        writer.write_node("x", SourcePosition { line: 3, column: 7 });
        writer.write_line();
        writer.write_node("", SourcePosition { line: 4, column: 0 });
        let map = writer.generate_source_map().expect("source map enabled");
        let decoded = decode_mappings(&map.mappings);
        assert_eq!(decoded.len(), 2);
        assert_eq!((decoded[0].generated_line, decoded[0].generated_column), (0, 1));
        assert_eq!((decoded[0].original_line, decoded[0].original_column), (3, 7));
        assert_eq!((decoded[1].generated_line, decoded[1].generated_column), (1, 1));
    }

    #[test]
    fn multi_line_text_tracks_column() {
        let mut writer = SourceWriter::with_capacity(16);
        writer.write("/* a\n   b */");
        writer.enable_source_map(None);
        writer.write_node("c", SourcePosition { line: 0, column: 0 });
        let map = writer.generate_source_map().expect("source map enabled");
        let decoded = decode_mappings(&map.mappings);
        assert_eq!((decoded[0].generated_line, decoded[0].generated_column), (1, 7));
    }
}

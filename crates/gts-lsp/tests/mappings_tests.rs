//! Tests for building range mappings from a printer source map.

use gts_common::{SourceMap, SourceMapGenerator};
use gts_lowering::LeafToken;
use gts_lsp::{CodeInformation, CodeMapping, build_mappings};
use gts_parser::NodeIndex;
use indexmap::IndexMap;

fn leaf(kind: &'static str, pos: u32, end: u32) -> LeafToken {
    LeafToken {
        node: NodeIndex::NONE,
        kind,
        pos,
        end,
        source_length: None,
        generated_length: None,
        adjustment: 0,
    }
}

/// `points` are (generated line, generated column, source line, source column).
fn source_map(points: &[(u32, u32, u32, u32)]) -> SourceMap {
    let mut generator = SourceMapGenerator::new(None);
    let source = generator.add_source("a.gts", None);
    for &(generated_line, generated_column, line, column) in points {
        generator.add_mapping(generated_line, generated_column, source, line, column, None);
    }
    generator.generate()
}

fn spans(mappings: &[CodeMapping]) -> Vec<(u32, u32, u32, u32)> {
    mappings
        .iter()
        .map(|m| {
            (
                m.source_offset(),
                m.generated_offset(),
                m.length(),
                m.generated_length(),
            )
        })
        .collect()
}

#[test]
fn leaves_map_their_full_range() {
    let source = "foo(bar);";
    let generated = "x.foo(bar);";
    let map = source_map(&[(0, 0, 0, 0), (0, 2, 0, 0), (0, 5, 0, 3), (0, 6, 0, 4)]);
    let tokens = [leaf("Identifier", 0, 3), leaf("Identifier", 4, 7)];
    let mappings = build_mappings(generated, source, &map, &tokens, &IndexMap::new());
    assert_eq!(spans(&mappings), vec![(0, 2, 3, 3), (4, 6, 3, 3)]);
    assert!(mappings.iter().all(|m| m.data == CodeInformation::ALL));
    assert_eq!(&generated[2..5], "foo");
}

#[test]
fn last_segment_for_a_source_position_wins() {
    let source = "a";
    let generated = "f(g(a))";
    let map = source_map(&[(0, 0, 0, 0), (0, 2, 0, 0), (0, 4, 0, 0)]);
    let mappings = build_mappings(
        generated,
        source,
        &map,
        &[leaf("Identifier", 0, 1)],
        &IndexMap::new(),
    );
    assert_eq!(spans(&mappings), vec![(0, 4, 1, 1)]);
}

#[test]
fn positions_on_later_lines_use_line_offsets() {
    let source = "a\nbb";
    let generated = "x;\n\n  bb";
    let map = source_map(&[(2, 2, 1, 0)]);
    let mappings = build_mappings(
        generated,
        source,
        &map,
        &[leaf("Identifier", 2, 4)],
        &IndexMap::new(),
    );
    assert_eq!(spans(&mappings), vec![(2, 6, 2, 2)]);
    assert_eq!(&generated[6..8], "bb");
}

#[test]
fn overrides_and_adjustment_apply() {
    let source = "foo bar;";
    let generated = "o.foo(\"bar\");";
    let map = source_map(&[(0, 2, 0, 0), (0, 7, 0, 4)]);
    let mut word = leaf("Identifier", 4, 7);
    word.generated_length = Some(5);
    word.adjustment = -1;
    let mappings = build_mappings(generated, source, &map, &[word], &IndexMap::new());
    assert_eq!(spans(&mappings), vec![(4, 6, 3, 5)]);
    assert_eq!(mappings[0].generated_lengths, Some(vec![5]));
    assert_eq!(&generated[6..11], "\"bar\"");
}

#[test]
fn unmapped_leaves_are_skipped() {
    let map = source_map(&[(0, 0, 0, 0)]);
    let tokens = [leaf("Identifier", 0, 1), leaf("NumericLiteral", 4, 5)];
    let mappings = build_mappings("a = 1;", "a = 1;", &map, &tokens, &IndexMap::new());
    assert_eq!(spans(&mappings), vec![(0, 0, 1, 1)]);
}

#[test]
fn placeholders_widen_over_preceding_whitespace() {
    let source = "f(1, )";
    let generated = "g(1,)";
    let map = source_map(&[(0, 4, 0, 5)]);
    let mut placeholder = leaf("Identifier", 5, 5);
    placeholder.source_length = Some(0);
    placeholder.generated_length = Some(0);
    let mappings = build_mappings(generated, source, &map, &[placeholder], &IndexMap::new());
    assert_eq!(
        mappings,
        vec![CodeMapping {
            source_offsets: vec![4],
            generated_offsets: vec![4],
            lengths: vec![1],
            generated_lengths: Some(vec![0]),
            data: CodeInformation::ALL,
        }]
    );
}

#[test]
fn placeholder_after_line_break_reaches_back_to_the_dot() {
    let source = "{ foo.\n}";
    let generated = "({ foo.\n  })";
    let map = source_map(&[(1, 2, 1, 0)]);
    let mut placeholder = leaf("Identifier", 7, 7);
    placeholder.source_length = Some(0);
    placeholder.generated_length = Some(0);
    let mappings = build_mappings(generated, source, &map, &[placeholder], &IndexMap::new());
    assert_eq!(spans(&mappings), vec![(6, 7, 1, 3)]);
}

#[test]
fn additional_mappings_are_verification_only_points() {
    let source = "define foo { bar 1; }";
    let generated = "type A = 1;\nf(null! as X_rans.RequiredAttributes);";
    let map = source_map(&[]);
    let mut additional = IndexMap::new();
    additional.insert(11, "null! as X_rans.RequiredAttributes".to_string());
    additional.insert(3, "not in the output".to_string());
    let mappings = build_mappings(generated, source, &map, &[], &additional);
    assert_eq!(
        mappings,
        vec![CodeMapping::new(
            11,
            14,
            0,
            0,
            CodeInformation::VERIFICATION_ONLY
        )]
    );
}

#[test]
fn mappings_are_sorted_by_source_offset() {
    let source = "ab cd";
    let generated = "cd; ab;";
    let map = source_map(&[(0, 0, 0, 3), (0, 4, 0, 0)]);
    let tokens = [leaf("Identifier", 3, 5), leaf("Identifier", 0, 2)];
    let mut additional = IndexMap::new();
    additional.insert(1, "ab;".to_string());
    let mappings = build_mappings(generated, source, &map, &tokens, &additional);
    let offsets: Vec<_> = mappings.iter().map(CodeMapping::source_offset).collect();
    assert_eq!(offsets, vec![0, 1, 3]);
}

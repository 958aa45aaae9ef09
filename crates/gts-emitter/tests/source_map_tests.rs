//! Tests for source maps produced while printing.

use gts_common::source_map::DecodedMapping;
use gts_emitter::{DummySuppression, Printer, PrinterOptions, print};
use gts_parser::parser::node::*;
use gts_parser::{NodeArena, parse, parse_loose};

fn options(name: &str) -> PrinterOptions {
    PrinterOptions {
        source_file_name: Some(name.to_string()),
        ..PrinterOptions::default()
    }
}

fn generated_for(mappings: &[DecodedMapping], line: u32, column: u32) -> Option<(u32, u32)> {
    mappings
        .iter()
        .find(|m| m.original_line == line && m.original_column == column)
        .map(|m| (m.generated_line, m.generated_column))
}

#[test]
fn unchanged_layout_maps_every_token_to_itself() {
    let source = "let abc = foo;\nbar(abc);";
    let tree = parse(source).expect("source should parse");
    let result = print(&tree.arena, tree.root, Some(source), options("a.gts"));
    assert_eq!(result.code, source);

    let map = result.source_map.expect("source map");
    assert_eq!(map.sources, vec!["a.gts".to_string()]);
    assert_eq!(map.sources_content, Some(vec![Some(source.to_string())]));

    let mappings = map.decode();
    assert!(!mappings.is_empty());
    for mapping in &mappings {
        assert_eq!(
            (mapping.generated_line, mapping.generated_column),
            (mapping.original_line, mapping.original_column)
        );
    }
    // Both edges of `abc` on the first line.
    assert_eq!(generated_for(&mappings, 0, 4), Some((0, 4)));
    assert_eq!(generated_for(&mappings, 0, 7), Some((0, 7)));
    assert_eq!(generated_for(&mappings, 1, 0), Some((1, 0)));
}

#[test]
fn identifiers_are_recorded_as_names() {
    let source = "let abc = foo;";
    let tree = parse(source).expect("source should parse");
    let map = print(&tree.arena, tree.root, Some(source), options("a.gts"))
        .source_map
        .expect("source map");
    assert!(map.names.contains(&"abc".to_string()));
    assert!(map.names.contains(&"foo".to_string()));
}

#[test]
fn reindented_tokens_map_to_their_source_columns() {
    let source = "if (a) {\n    b();\n}";
    let tree = parse(source).expect("source should parse");
    let result = print(&tree.arena, tree.root, Some(source), options("a.gts"));
    assert_eq!(result.code, "if (a) {\n\tb();\n}");

    let mappings = result.source_map.expect("source map").decode();
    assert_eq!(generated_for(&mappings, 1, 4), Some((1, 1)));
    assert_eq!(generated_for(&mappings, 0, 4), Some((0, 4)));
}

#[test]
fn suppressed_placeholders_still_map() {
    let source = "{ foo. }";
    let tree = parse_loose(source).expect("source should parse loosely");
    let mut printer = Printer::new(&tree.arena, options("a.gts"));
    printer.set_source(source);
    printer.add_hook(Box::new(DummySuppression));
    let result = printer.print(tree.root);
    assert_eq!(result.code, "{\n\tfoo.;\n}");

    let mappings = result.source_map.expect("source map").decode();
    assert_eq!(generated_for(&mappings, 0, 7), Some((1, 5)));
}

#[test]
fn synthesized_nodes_are_not_mapped() {
    let mut arena = NodeArena::new();
    let expression = arena.create_identifier("x");
    let statement = arena.add_synthetic(NodeData::ExpressionStatement(ExpressionData {
        expression,
    }));
    let result = print(&arena, statement, Some(""), PrinterOptions::default());
    assert_eq!(result.code, "x;");

    let map = result.source_map.expect("source map");
    assert_eq!(map.sources, vec!["input".to_string()]);
    assert!(map.mappings.is_empty());
}

#[test]
fn source_map_json_is_version_three() {
    let source = "a;";
    let tree = parse(source).expect("source should parse");
    let json = print(&tree.arena, tree.root, Some(source), options("a.gts"))
        .source_map
        .expect("source map")
        .to_json();
    assert!(json.contains("\"version\":3"));
    assert!(json.contains("\"sources\":[\"a.gts\"]"));
    assert!(json.contains("\"sourcesContent\":[\"a;\"]"));
}

#[test]
fn disabled_source_map_yields_none() {
    let source = "a;";
    let tree = parse(source).expect("source should parse");
    let options = PrinterOptions {
        source_map: false,
        ..PrinterOptions::default()
    };
    let result = print(&tree.arena, tree.root, Some(source), options);
    assert_eq!(result.code, "a;");
    assert!(result.source_map.is_none());
}

//! Tests for the virtual document served to TypeScript tooling.

use gts_common::TranspileOptions;
use gts_lsp::{CodeInformation, CodeMapping, GtsVirtualCode, transpile_for_volar};

fn mapping_at(mappings: &[CodeMapping], source_offset: u32) -> &CodeMapping {
    mappings
        .iter()
        .find(|m| m.source_offset() == source_offset && m.data == CodeInformation::ALL)
        .unwrap_or_else(|| panic!("no mapping at {source_offset}"))
}

fn generated_text<'a>(code: &'a str, mapping: &CodeMapping) -> &'a str {
    let start = mapping.generated_offset() as usize;
    &code[start..start + mapping.generated_length() as usize]
}

#[test]
fn attribute_name_and_argument_map_onto_the_call() {
    let result = transpile_for_volar("define foo 1;", "a.gts", &TranspileOptions::default())
        .expect("tooling pipeline succeeds");
    let name = mapping_at(&result.mappings, 7);
    assert_eq!(name.length(), 3);
    assert_eq!(generated_text(&result.code, name), "foo");
    let argument = mapping_at(&result.mappings, 11);
    assert_eq!(generated_text(&result.code, argument), "1");
}

#[test]
fn bare_word_maps_onto_quoted_literal() {
    let result = transpile_for_volar("define foo bar;", "a.gts", &TranspileOptions::default())
        .expect("tooling pipeline succeeds");
    let word = mapping_at(&result.mappings, 11);
    assert_eq!(word.length(), 3);
    assert_eq!(word.generated_length(), 5);
    assert_eq!(generated_text(&result.code, word), "\"bar\"");
}

#[test]
fn empty_argument_maps_onto_undefined() {
    let result = transpile_for_volar("define foo , 2;", "a.gts", &TranspileOptions::default())
        .expect("tooling pipeline succeeds");
    let call = result.code.find("foo(undefined, 2)").expect("well-formed call");
    let empty = mapping_at(&result.mappings, 10);
    assert_eq!(empty.length(), 1);
    assert_eq!(empty.generated_length(), 0);
    assert_eq!(empty.generated_offset() as usize, call + "foo(".len());
}

#[test]
fn plain_typescript_maps_identically() {
    let source = "const answer: number = 42;";
    let result = transpile_for_volar(source, "a.gts", &TranspileOptions::default())
        .expect("tooling pipeline succeeds");
    assert_eq!(result.code, source);
    let answer = mapping_at(&result.mappings, 6);
    assert_eq!(answer.generated_offset(), 6);
    assert_eq!(generated_text(&result.code, answer), "answer");
}

#[test]
fn named_block_gets_a_verification_anchor() {
    let result = transpile_for_volar("define foo { bar 1; }", "a.gts", &TranspileOptions::default())
        .expect("tooling pipeline succeeds");
    let anchor = result
        .mappings
        .iter()
        .find(|m| m.data == CodeInformation::VERIFICATION_ONLY)
        .expect("required-attribute anchor");
    assert_eq!(anchor.source_offset(), 11);
    assert_eq!(anchor.length(), 0);
    let start = anchor.generated_offset() as usize;
    assert!(result.code[start..].starts_with("null! as __gts_nestedVmFinalMetaType_7_rans.RequiredAttributes"));
}

#[test]
fn mappings_are_sorted() {
    let result = transpile_for_volar(
        "define foo { bar 1, baz; qux \"x\"; }",
        "a.gts",
        &TranspileOptions::default(),
    )
    .expect("tooling pipeline succeeds");
    let offsets: Vec<_> = result.mappings.iter().map(CodeMapping::source_offset).collect();
    let mut sorted = offsets.clone();
    sorted.sort_unstable();
    assert_eq!(offsets, sorted);
}

#[test]
fn virtual_code_for_valid_source() {
    let code = GtsVirtualCode::new("a.gts", "define foo 1;", &TranspileOptions::default());
    assert!(!code.has_errors());
    assert_eq!(code.language_id, "gaming-ts");
    assert!(code.code.contains("__gts_attr_obj_3.foo(1)"));
    assert!(code.diagnostics().is_empty());
}

#[test]
fn failed_transpile_serves_blank_document() {
    let source = "let a = 1;\nfoo[var];";
    let code = GtsVirtualCode::new("a.gts", source, &TranspileOptions::default());
    assert!(code.has_errors());
    assert_eq!(code.code, "          \n         ");
    assert_eq!(code.code.len(), source.len());
    assert_eq!(
        code.mappings,
        vec![CodeMapping::new(
            0,
            0,
            source.len() as u32,
            source.len() as u32,
            CodeInformation::VERIFICATION_ONLY
        )]
    );

    let diagnostics = code.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].range.start.line, 1);
    assert_eq!(diagnostics[0].source.as_deref(), Some("gts-transpiler"));
}

#[test]
fn virtual_code_serializes_for_the_editor() {
    let code = GtsVirtualCode::new("a.gts", "let x = 1;", &TranspileOptions::default());
    let json = serde_json::to_value(&code).unwrap();
    assert_eq!(json["id"], "root");
    assert_eq!(json["languageId"], "gaming-ts");
    assert_eq!(json["code"], "let x = 1;");
    assert!(json.get("errors").is_none());
}

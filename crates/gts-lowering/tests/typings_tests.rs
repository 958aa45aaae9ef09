//! Tests for the typings lowering and its printed virtual document.

use gts_common::TranspileOptions;
use gts_lowering::{TypingsOutput, lower_for_typings, print_typings};
use gts_parser::parse_loose;

struct Typings {
    code: String,
    output: TypingsOutput,
}

fn typings(source: &str) -> Typings {
    let mut tree = parse_loose(source).expect("source should parse loosely");
    let output = lower_for_typings(&mut tree.arena, tree.root, &TranspileOptions::default())
        .expect("typings lowering should succeed");
    let code = print_typings(&tree.arena, output.root, source, Some("a.gts".to_string())).code;
    Typings { code, output }
}

#[test]
fn root_vm_is_imported_once_with_preface() {
    let result = typings("define a 1;\ndefine b 2;");
    assert!(
        result
            .code
            .starts_with("import __root_vm from \"@gi-tcg/core/gts/vm\";\n")
    );
    assert_eq!(result.code.matches("import __root_vm").count(), 1);
    assert_eq!(
        result
            .code
            .matches("type __gts_symbols_meta = typeof __root_vm._symbols.Meta;")
            .count(),
        1
    );
    assert!(
        result
            .code
            .contains("const __gts_Prelude: __gts_Prelude = 0 as any;")
    );
    assert!(
        result
            .code
            .contains("type __gts_symbols_namedDef = typeof __root_vm._symbols.NamedDefinition;")
    );
}

#[test]
fn attribute_becomes_call_on_stand_in_object() {
    let code = typings("define foo 1;").code;
    assert!(code.contains(
        "type __gts_rootVmDefType_0 = (typeof __root_vm)[__gts_symbols_namedDef]; type __gts_rootVmInitMetaType_1 = __gts_rootVmDefType_0[__gts_symbols_meta];"
    ));
    assert!(code.contains(
        "const __gts_attr_obj_3: { [__gts_symbols_meta]: __gts_rootVmInitMetaType_1 } & Omit<__gts_rootVmDefType_0, __gts_symbols_meta> = 0 as any;"
    ));
    assert!(code.contains("const __gts_attrRet_4 = __gts_attr_obj_3.foo(1);"));
    assert!(code.contains(
        "type __gts_attrRet_4 = typeof __gts_attrRet_4; type __gts_newMeta__5 = __gts_attrRet_4 extends { rewriteMeta: infer NewMeta extends {} } ? NewMeta : __gts_rootVmInitMetaType_1;"
    ));
    assert!(code.contains("type __gts_rootVmFinalMetaType_2 = __gts_newMeta__5;"));
    assert!(code.contains("export type CollectedAttributes = \"foo\";"));
}

#[test]
fn deferred_declarations_follow_walk_order() {
    let code = typings("define foo 1;").code;
    let enter_root = code.find("type __gts_rootVmDefType_0").unwrap();
    let enter_attr = code.find("const __gts_attr_obj_3").unwrap();
    let call = code.find("const __gts_attrRet_4 =").unwrap();
    let exit_attr = code.find("type __gts_newMeta__5").unwrap();
    let exit_vm = code.find("type __gts_rootVmFinalMetaType_2").unwrap();
    assert!(enter_root < enter_attr);
    assert!(enter_attr < call);
    assert!(call < exit_attr);
    assert!(exit_attr < exit_vm);
}

#[test]
fn string_names_use_element_access() {
    let code = typings("define \"foo bar\" 1;").code;
    assert!(code.contains("__gts_attr_obj_3[\"foo bar\"](1)"));
    assert!(code.contains("CollectedAttributes = \"foo bar\";"));
}

#[test]
fn bare_words_are_quoted_and_widen_their_leaf_token() {
    let result = typings("define foo bar;");
    assert!(result.code.contains("__gts_attr_obj_3.foo(\"bar\")"));
    let bar = result
        .output
        .leaf_tokens
        .iter()
        .find(|token| token.pos == 11)
        .expect("leaf token for `bar`");
    assert_eq!(bar.end, 14);
    assert_eq!(bar.generated_length, Some(5));
    assert_eq!(bar.adjustment, 0);
}

#[test]
fn leaf_tokens_are_collected_in_source_order() {
    let result = typings("define foo 1;");
    let leaves: Vec<_> = result
        .output
        .leaf_tokens
        .iter()
        .map(|token| (token.kind, token.pos, token.end))
        .collect();
    assert_eq!(
        leaves,
        vec![("Identifier", 7, 10), ("NumericLiteral", 11, 12)]
    );
}

#[test]
fn named_block_opens_nested_scope_with_required_check() {
    let result = typings("define foo { bar 1; }");
    let code = &result.code;
    assert!(code.contains(
        "type __gts_nestedVm_5 = __gts_attrRet_4 extends { namedDefinition: infer Def } ? Def : { [__gts_symbols_meta]: unknown };"
    ));
    assert!(code.contains("const __gts_attrRet_9 = __gts_attr_obj_8.bar(1);"));
    let needle = "null! as __gts_nestedVmFinalMetaType_7_rans.RequiredAttributes";
    assert!(code.contains(needle));
    assert_eq!(
        result.output.additional_mappings.get(&11).map(String::as_str),
        Some(needle)
    );
    // The root scope's check has no source anchor.
    assert_eq!(result.output.additional_mappings.len(), 1);
}

#[test]
fn bound_attribute_gets_binding_declaration() {
    let code = typings("define foo { bar as Baz; }").code;
    assert!(code.contains(
        "type gts_binding_type_0_lhs = { [__gts_symbols_meta]: __gts_nestedVmFinalMetaType_7; as: __gts_nestedVm_5[\"bar\"] extends { as: infer As } ? As : unknown };"
    ));
    assert!(code.contains("let gts_binding_type_0 = gts_binding_type_0_lhs.as();"));
    assert!(code.ends_with("export const Baz: gts_binding_type_0 = 0 as any;"));

    let code = typings("define foo { bar as private Baz; }").code;
    assert!(code.ends_with("\nconst Baz: gts_binding_type_0 = 0 as any;"));
}

#[test]
fn binding_declaration_carries_define_comments() {
    let code = typings("// the foo card\ndefine foo { bar as Baz; }").code;
    let comment = code.find("// the foo card").expect("comment is kept");
    let declaration = code.find("export const Baz").unwrap();
    assert!(comment < declaration);
    assert_eq!(code.matches("// the foo card").count(), 1);
}

#[test]
fn direct_action_is_called_with_action_symbol() {
    let code = typings("define foo { :bar(); }").code;
    assert!(code.contains(
        "[__gts_Action]((__gts_fnArg, { cryo, hydro, pyro, electro, anemo, geo, dendro, omni } = __gts_fnArg[__gts_Prelude]) => {\n  __gts_fnArg.bar();\n});"
    ));
    assert!(code.contains("export type CollectedAttributes = __gts_Action;"));
}

#[test]
fn query_import_precedes_vm_import() {
    let code = typings("define foo :( query my.hp );").code;
    assert!(code.starts_with(
        "import __gts_query from \"@gi-tcg/core/gts/query\";\nimport __root_vm from \"@gi-tcg/core/gts/vm\";"
    ));
    assert!(code.contains("__gts_query(({ my, opp }) => my.hp, { star: false })"));
}

#[test]
fn plain_code_keeps_its_types() {
    let code = typings("const a: number = 1;\ndefine foo a;").code;
    assert!(code.contains("const a: number = 1;"));
    assert!(code.contains(".foo(\"a\")"));
}

#[test]
fn placeholder_arguments_print_undefined() {
    let result = typings("define foo 1, ;");
    assert!(result.code.contains("__gts_attr_obj_3.foo(1, undefined)"), "{}", result.code);
    let placeholder = result
        .output
        .leaf_tokens
        .iter()
        .find(|token| token.source_length == Some(0))
        .expect("placeholder leaf token");
    assert_eq!(placeholder.kind, "Identifier");
    assert_eq!(placeholder.generated_length, Some(0));
}

#[test]
fn leading_empty_argument_keeps_call_well_formed() {
    let result = typings("define foo , 2;");
    assert!(
        result.code.contains("__gts_attr_obj_3.foo(undefined, 2)"),
        "{}",
        result.code
    );
    assert!(!result.code.contains("(, "));
}

#[test]
fn source_without_define_is_unchanged() {
    let result = typings("let x = 1;");
    assert_eq!(result.code, "let x = 1;");
    assert!(result.output.additional_mappings.is_empty());
}

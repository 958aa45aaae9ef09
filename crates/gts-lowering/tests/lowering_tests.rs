//! Tests for lowering `define` blocks to runtime calls.

use gts_common::{GtsErrorKind, TranspileOptions};
use gts_emitter::{PrinterOptions, print};
use gts_lowering::{erase_types, lower};
use gts_parser::parse;

const RUNTIME_IMPORT: &str = "import { createDefine as __gts_createDefine, Action as __gts_Action, Prelude as __gts_Prelude } from \"@gi-tcg/gts-runtime\";";
const VM_IMPORT: &str = "import __gts_rootVm from \"@gi-tcg/core/gts/vm\";";
const PRELUDE_PARAMS: &str = "(__gts_fnArg, { cryo, hydro, pyro, electro, anemo, geo, dendro, omni } = __gts_fnArg[__gts_Prelude])";

fn lower_with(source: &str, options: &TranspileOptions) -> String {
    let mut tree = parse(source).expect("source should parse");
    let root = lower(&mut tree.arena, tree.root, options).expect("lowering should succeed");
    print(&tree.arena, root, Some(&tree.source), PrinterOptions::default()).code
}

fn lower_source(source: &str) -> String {
    lower_with(source, &TranspileOptions::default())
}

#[test]
fn define_becomes_create_define_call() {
    let output = lower_source("define foo 1, bar;");
    let expected = [
        RUNTIME_IMPORT,
        VM_IMPORT,
        "__gts_createDefine(__gts_rootVm, { attributes: [() => ({ name: \"foo\", positionals: () => [1, \"bar\"], named: null })] });",
    ]
    .join("\n");
    assert_eq!(output, expected);
}

#[test]
fn source_without_define_gets_no_imports() {
    assert_eq!(lower_source("const a = 1;"), "const a = 1;");
}

#[test]
fn capitalized_positionals_stay_references() {
    let output = lower_source("define foo Bar, baz.qux;");
    assert!(output.contains("positionals: () => [Bar, baz.qux]"));
}

#[test]
fn string_attribute_names_keep_their_text() {
    let output = lower_source("define \"foo bar\" 1;");
    assert!(output.contains("name: \"foo bar\""));
}

#[test]
fn bound_attribute_is_hoisted_and_wrapped() {
    let output = lower_source("define foo { bar 1 as Baz; }");
    let expected = [
        RUNTIME_IMPORT,
        VM_IMPORT,
        "import __gts_Binder from \"@gi-tcg/core/gts/binder\";",
        "const __gts_internal_binding_0 = () => ({ name: \"bar\", positionals: () => [1], named: null });",
        "export const Baz = __gts_Binder(__gts_internal_binding_0, { path: [\"foo\"] });",
        "__gts_createDefine(__gts_rootVm, { attributes: [() => ({ name: \"foo\", positionals: () => [], named: { attributes: [__gts_internal_binding_0] } })] });",
    ]
    .join("\n");
    assert_eq!(output, expected);
}

#[test]
fn private_binding_is_not_exported() {
    let output = lower_source("define foo { bar as private Baz; }");
    assert!(output.contains("\nconst Baz = __gts_Binder(__gts_internal_binding_0"));
    assert!(!output.contains("export const Baz"));
}

#[test]
fn binding_path_lists_enclosing_attributes() {
    let output = lower_source("define outer { middle { inner as Inner; } }");
    assert!(output.contains("{ path: [\"outer\", \"middle\"] }"));
}

#[test]
fn bindings_are_numbered_in_order() {
    let output = lower_source("define foo { a as A; b as B; }");
    assert!(output.contains("export const A = __gts_Binder(__gts_internal_binding_0,"));
    assert!(output.contains("export const B = __gts_Binder(__gts_internal_binding_1,"));
    assert!(output.contains("attributes: [__gts_internal_binding_0, __gts_internal_binding_1]"));
}

#[test]
fn protected_binding_is_rejected() {
    let mut tree = parse("define foo { bar as protected Baz; }").expect("source should parse");
    let err = lower(&mut tree.arena, tree.root, &TranspileOptions::default())
        .expect_err("protected bindings are rejected");
    assert_eq!(err.kind, GtsErrorKind::Unsupported);
    assert_eq!(
        err.message,
        "Protected bindings are not supported in this context."
    );
}

#[test]
fn shortcut_function_receives_preludes() {
    let output = lower_source("define foo :( :x > 1 );");
    let expected = format!("positionals: () => [{PRELUDE_PARAMS} => __gts_fnArg.x > 1]");
    assert!(output.contains(&expected), "{output}");
}

#[test]
fn query_expression_imports_query_helper() {
    let output = lower_source("define foo :( query* my.hp );");
    assert!(output.contains("import __gts_query from \"@gi-tcg/core/gts/query\";"));
    assert!(output.contains("__gts_query(({ my, opp }) => my.hp, { star: true })"));

    let output = lower_source("define foo :( query opp.hp );");
    assert!(output.contains("__gts_query(({ my, opp }) => opp.hp, { star: false })"));
}

#[test]
fn direct_action_becomes_action_attribute() {
    let output = lower_source("define foo { :bar(); }");
    let expected = format!("{{ name: __gts_Action, positionals: () => [{PRELUDE_PARAMS} => {{");
    assert!(output.contains(&expected), "{output}");
    assert!(output.contains("__gts_fnArg.bar();"));
    assert!(output.contains("named: null"));
}

#[test]
fn import_sources_follow_options() {
    let options = TranspileOptions {
        runtime_import_source: "rt".to_string(),
        provider_import_source: "prov".to_string(),
        shortcut_function_preludes: vec!["a".to_string()],
        query_bindings: vec!["self".to_string()],
    };
    let output = lower_with("define foo :( query self.y ) { x as X; };", &options);
    assert!(output.starts_with("import { createDefine as __gts_createDefine, Action as __gts_Action, Prelude as __gts_Prelude } from \"rt\";"));
    assert!(output.contains("import __gts_rootVm from \"prov/vm\";"));
    assert!(output.contains("import __gts_query from \"prov/query\";"));
    assert!(output.contains("import __gts_Binder from \"prov/binder\";"));
    assert!(output.contains("(__gts_fnArg, { a } = __gts_fnArg[__gts_Prelude])"));
    assert!(output.contains("({ self }) => self.y"));
}

#[test]
fn multiple_defines_share_one_set_of_imports() {
    let output = lower_source("define a 1;\ndefine b 2;");
    assert_eq!(output.matches("import __gts_rootVm").count(), 1);
    assert_eq!(output.matches("__gts_createDefine(__gts_rootVm").count(), 2);
}

#[test]
fn lowered_and_erased_tree_has_no_extension_nodes() {
    let source = r#"define character {
  id 1101;
  skill "Normal Attack" {
    cost Pyro, 1;
    when :( :player.hands.length > 0 );
    :damage(Physical, 2);
  } as Skill;
  passive :{
    const chars = query* my.characters;
    return chars.length >= 2;
  };
}
"#;
    let mut tree = parse(source).expect("source should parse");
    let lowered = lower(&mut tree.arena, tree.root, &TranspileOptions::default()).unwrap();
    let erased = erase_types(&mut tree.arena, lowered).unwrap();
    let mut residual = Vec::new();
    tree.arena.walk(erased, &mut |_, node| {
        if node.data.is_gts() {
            residual.push(node.kind_name());
        }
    });
    assert!(residual.is_empty(), "residual nodes: {residual:?}");
}

#[test]
fn define_start_maps_to_create_define_call() {
    let source = "define foo 1;";
    let mut tree = parse(source).expect("source should parse");
    let root = lower(&mut tree.arena, tree.root, &TranspileOptions::default()).unwrap();
    let result = print(&tree.arena, root, Some(source), PrinterOptions::default());
    let mappings = result.source_map.expect("source map").decode();
    let define_start = mappings
        .iter()
        .find(|m| m.original_line == 0 && m.original_column == 0)
        .map(|m| (m.generated_line, m.generated_column));
    assert_eq!(define_start, Some((2, 0)));
}

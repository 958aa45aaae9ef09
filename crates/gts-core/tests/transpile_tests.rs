//! Tests for the public transpile entry points.

use gts_core::{GtsErrorKind, Position, TranspileOptions, transpile, transpile_for_volar};

const CARD: &str = r#"import { Cryo } from "@gi-tcg/core";

define card {
  id 332001;
  usage 3;
  hint Cryo, 2;
  on :( :player.dice.length > 0 ) as private _;
}
"#;

fn options() -> TranspileOptions {
    TranspileOptions::default()
}

#[test]
fn transpile_produces_module_with_runtime_imports() {
    let result = transpile(CARD, "card.gts", &options()).expect("card transpiles");
    let lines: Vec<&str> = result.code.lines().collect();
    assert!(lines[0].starts_with("import { createDefine as __gts_createDefine"));
    assert_eq!(lines[1], "import __gts_rootVm from \"@gi-tcg/core/gts/vm\";");
    assert_eq!(lines[2], "import __gts_Binder from \"@gi-tcg/core/gts/binder\";");
    assert!(lines[3].starts_with("const __gts_internal_binding_0 = () => ({ name: \"on\""));
    assert_eq!(
        lines[4],
        "const _ = __gts_Binder(__gts_internal_binding_0, { path: [\"card\"] });"
    );
    assert_eq!(lines[5], "import { Cryo } from \"@gi-tcg/core\";");
    assert!(lines[6].starts_with("__gts_createDefine(__gts_rootVm, {"));
    assert!(result.code.contains("name: \"card\""));
    assert!(result.code.contains("{ name: \"usage\", positionals: () => [3], named: null }"));
    assert!(result.code.contains("{ name: \"hint\", positionals: () => [Cryo, 2], named: null }"));
    assert!(!result.code.contains("export const _"));
}

#[test]
fn source_map_embeds_the_input() {
    let result = transpile("define foo 1;", "cards/foo.gts", &options()).unwrap();
    let map = result.source_map.expect("source map");
    assert_eq!(map.version, 3);
    assert_eq!(map.sources, vec!["cards/foo.gts".to_string()]);
    assert_eq!(
        map.sources_content,
        Some(vec![Some("define foo 1;".to_string())])
    );
    assert!(!map.mappings.is_empty());
    let json: serde_json::Value = serde_json::from_str(&map.to_json()).unwrap();
    assert_eq!(json["sourcesContent"][0], "define foo 1;");
}

#[test]
fn types_are_erased_from_build_output() {
    let source = "interface Stats { hp: number }\nconst base: Stats = { hp: 10 } as Stats;\ndefine foo base;";
    let result = transpile(source, "a.gts", &options()).unwrap();
    assert!(!result.code.contains("interface"));
    assert!(result.code.contains("const base = { hp: 10 };"));
    assert!(result.code.contains("positionals: () => [\"base\"]"));
}

#[test]
fn query_sets_star_flag_and_imports_helper_once() {
    let source = "define foo :( query* my.character ), :( query opp.character );";
    let result = transpile(source, "a.gts", &options()).unwrap();
    assert_eq!(
        result
            .code
            .matches("import __gts_query from \"@gi-tcg/core/gts/query\";")
            .count(),
        1
    );
    assert!(result.code.contains("({ my, opp }) => my.character, { star: true })"));
    assert!(result.code.contains("({ my, opp }) => opp.character, { star: false })"));
}

#[test]
fn syntax_errors_are_located() {
    let err = transpile("let a = 1;\nfoo[var];", "a.gts", &options()).unwrap_err();
    assert_eq!(err.kind, GtsErrorKind::Syntax);
    let location = err.location.expect("parser errors are located");
    assert_eq!(location.start.line, 2);
}

#[test]
fn lowering_errors_are_located() {
    let err = transpile("\ndefine foo { bar as protected Baz; }", "a.gts", &options())
        .unwrap_err();
    assert_eq!(err.kind, GtsErrorKind::Unsupported);
    assert_eq!(err.message, "Protected bindings are not supported in this context.");
    let location = err.location.expect("lowering errors are located");
    assert_eq!(location.start.line, 2);
}

#[test]
fn erasure_errors_are_located() {
    let err = transpile("const a = 1;\n\nenum E { A }", "a.gts", &options()).unwrap_err();
    assert_eq!(err.message, "TypeScript feature not supported: enums");
    assert_eq!(err.location.map(|l| l.start), Some(Position::new(3, 0)));
}

#[test]
fn shortcut_syntax_outside_shortcut_scope_fails() {
    let err = transpile("const a = :b;", "a.gts", &options()).unwrap_err();
    assert!(err.location.is_some());
    let err = transpile("const a = query my.b;", "a.gts", &options()).unwrap_err();
    assert!(err.location.is_some());
}

#[test]
fn tooling_output_tolerates_incomplete_member_access() {
    let source = "define foo :{ my. };";
    assert!(transpile(source, "a.gts", &options()).is_err());
    let result = transpile_for_volar(source, "a.gts", &options()).expect("loose pipeline");
    assert!(result.code.contains("__gts_attr_obj_3.foo("));
    assert!(!result.mappings.is_empty());
}

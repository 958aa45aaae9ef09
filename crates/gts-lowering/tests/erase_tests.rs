//! Tests for TypeScript syntax erasure.

use gts_common::GtsErrorKind;
use gts_emitter::{PrinterOptions, print};
use gts_lowering::erase_types;
use gts_parser::parse;

fn erase_source(source: &str) -> String {
    let mut tree = parse(source).expect("source should parse");
    let root = erase_types(&mut tree.arena, tree.root).expect("erasure should succeed");
    print(&tree.arena, root, Some(&tree.source), PrinterOptions::default()).code
}

fn erase_error(source: &str) -> String {
    let mut tree = parse(source).expect("source should parse");
    let err = erase_types(&mut tree.arena, tree.root).expect_err("erasure should fail");
    assert_eq!(err.kind, GtsErrorKind::Unsupported);
    err.message
}

#[test]
fn annotations_are_removed() {
    assert_eq!(erase_source("let a: number = 1;"), "let a = 1;");
    assert_eq!(erase_source("let v!: number;"), "let v;");
    assert_eq!(
        erase_source("const g = (a: number, b?: string): number => a;"),
        "const g = (a, b) => a;"
    );
}

#[test]
fn function_signatures_are_stripped() {
    assert_eq!(
        erase_source("function f<T>(this: Window, a: T): T {\n  return a;\n}"),
        "function f(a) {\n\treturn a;\n}"
    );
}

#[test]
fn assertions_unwrap_to_their_expression() {
    assert_eq!(erase_source("const x = y as any;"), "const x = y;");
    assert_eq!(erase_source("const z = w!;"), "const z = w;");
    assert_eq!(erase_source("const s = v satisfies T;"), "const s = v;");
}

#[test]
fn type_arguments_are_removed() {
    assert_eq!(erase_source("f<string>(x);"), "f(x);");
    assert_eq!(erase_source("const m = new Map<string, number>();"), "const m = new Map();");
}

#[test]
fn type_declarations_disappear() {
    assert_eq!(
        erase_source("interface A {\n  x: number;\n}\ntype B = string;\nconst c = 1;"),
        "const c = 1;"
    );
    assert_eq!(erase_source("export default interface X {}"), "");
}

#[test]
fn ambient_declarations_disappear() {
    assert_eq!(
        erase_source("declare const x: number;\ndeclare function f(): void;\ndeclare class K {}\nconst y = 2;"),
        "const y = 2;"
    );
    assert_eq!(
        erase_source("function g(a: number): void;\nfunction g(a) {}"),
        "function g(a) {}"
    );
}

#[test]
fn type_only_imports_and_exports_are_dropped() {
    let source = "import type { A } from \"a\";\nimport { type B, C } from \"b\";\nimport { type D } from \"d\";\nimport \"side\";";
    assert_eq!(erase_source(source), "import { C } from \"b\";\nimport \"side\";");

    let source = "export type { A };\nexport interface I {}\nexport {};\nexport const v = 1;";
    assert_eq!(erase_source(source), "export const v = 1;");
}

#[test]
fn class_members_without_runtime_presence_are_removed() {
    let source = "abstract class A<T> extends B<T> implements I {\n  private x: number = 1;\n  declare y: string;\n  abstract m(): void;\n  [k: string]: any;\n  constructor(a?: number) {\n    super();\n  }\n}";
    assert_eq!(
        erase_source(source),
        "class A extends B {\n\tx = 1;\n\tconstructor(a) {\n\t\tsuper();\n\t}\n}"
    );
}

#[test]
fn type_only_namespaces_disappear() {
    assert_eq!(
        erase_source("namespace N {\n  type T = 1;\n}\nconst b = 1;"),
        "const b = 1;"
    );
    assert_eq!(erase_source("declare namespace M {\n  const a: number;\n}"), "");
}

#[test]
fn catch_clause_annotation_is_removed() {
    let output = erase_source("try {\n  a();\n} catch (e: unknown) {\n  b();\n}");
    assert!(output.contains("catch (e)"), "{output}");
}

#[test]
fn unsupported_features_are_rejected() {
    assert_eq!(
        erase_error("enum E { A }"),
        "TypeScript feature not supported: enums"
    );
    assert_eq!(
        erase_error("class A {\n  constructor(private x) {}\n}"),
        "TypeScript feature not supported: accessibility modifiers on constructor parameters"
    );
    assert_eq!(
        erase_error("namespace N {\n  export const a = 1;\n}"),
        "TypeScript feature not supported: namespaces with non-type nodes"
    );
    assert_eq!(
        erase_error("class A {\n  accessor x = 1;\n}"),
        "TypeScript feature not supported: accessor fields (related TSC proposal is not stage 4 yet)"
    );
    assert_eq!(
        erase_error("@sealed\nclass A {}"),
        "TypeScript feature not supported: decorators (related TSC proposal is not stage 4 yet)"
    );
}

#[test]
fn erasure_is_idempotent() {
    let source = "import { type A, b } from \"m\";\nabstract class C<T> implements A {\n  private readonly x?: T;\n  m(this: C<T>, y: number): void {}\n}\nconst z = (b as any)!;\nfunction f(): void;\nfunction f() {}";
    let mut tree = parse(source).expect("source should parse");
    let once = erase_types(&mut tree.arena, tree.root).unwrap();
    let first = print(&tree.arena, once, Some(source), PrinterOptions::default()).code;
    let twice = erase_types(&mut tree.arena, once).unwrap();
    assert_eq!(twice, once);
    let second = print(&tree.arena, twice, Some(source), PrinterOptions::default()).code;
    assert_eq!(first, second);
}

#[test]
fn plain_javascript_is_untouched() {
    let source = "const a = [1, 2];\nfor (const x of a) {\n\tconsole.log(x);\n}";
    let mut tree = parse(source).expect("source should parse");
    let root = erase_types(&mut tree.arena, tree.root).unwrap();
    assert_eq!(root, tree.root);
}

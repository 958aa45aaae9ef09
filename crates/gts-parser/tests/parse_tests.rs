//! Tests for TypeScript statement, expression and type parsing.

use gts_parser::{NodeData, NodeIndex, SyntaxTree, parse};

fn statement_kinds(tree: &SyntaxTree) -> Vec<&'static str> {
    tree.statements()
        .into_iter()
        .filter_map(|idx| tree.arena.kind_name(idx))
        .collect()
}

fn find_all(tree: &SyntaxTree, kind: &str) -> Vec<NodeIndex> {
    let mut found = Vec::new();
    tree.arena.walk(tree.root, &mut |idx, node| {
        if node.kind_name() == kind {
            found.push(idx);
        }
    });
    found
}

#[test]
fn parse_declarations_and_classes() {
    let tree = parse(
        "const x: number = 1;\n\
         function id<T>(a: T): T { return a; }\n\
         class A extends B<C> implements D {\n\
           private x = 1;\n\
           constructor(public y: string) { super(); }\n\
           get z() { return 1; }\n\
           static { init(); }\n\
         }",
    )
    .expect("valid source");
    assert_eq!(
        statement_kinds(&tree),
        vec!["VariableStatement", "FunctionDeclaration", "ClassDeclaration"]
    );
    let class = tree.statements()[2];
    let Some(NodeData::ClassDeclaration(data)) = tree.arena.data(class) else {
        panic!("expected class");
    };
    assert_eq!(data.members.len(), 4);
    assert!(data.extends_type_arguments.is_some());
    assert_eq!(data.implements.len(), 1);
}

#[test]
fn parse_type_level_declarations() {
    let tree = parse(
        "interface P<T> extends Q { readonly a?: T; m(x: number): void; [k: string]: unknown }\n\
         type C<T> = T extends string ? 'a' : T extends (infer U)[] ? U : never;\n\
         type M<T> = { readonly [K in keyof T]?: T[K] };\n\
         type F = (a: number, ...rest: string[]) => void;\n\
         type L = `prefix-${string}`;\n\
         declare module 'm' { export const v: number; }\n\
         namespace A.B { export type X = 1; }\n\
         enum E { A = 1, B }",
    )
    .expect("valid source");
    assert_eq!(
        statement_kinds(&tree),
        vec![
            "InterfaceDeclaration",
            "TypeAliasDeclaration",
            "TypeAliasDeclaration",
            "TypeAliasDeclaration",
            "TypeAliasDeclaration",
            "ModuleDeclaration",
            "ModuleDeclaration",
            "EnumDeclaration",
        ]
    );
    assert_eq!(find_all(&tree, "ConditionalType").len(), 2);
    assert_eq!(find_all(&tree, "MappedType").len(), 1);
    assert_eq!(find_all(&tree, "InferType").len(), 1);
    assert_eq!(find_all(&tree, "TemplateLiteralType").len(), 1);
}

#[test]
fn parse_expressions() {
    let tree = parse(
        "const f = async (a, b) => a + b;\n\
         const g = x => x * 2;\n\
         const r = /ab+c/g.test(s);\n\
         const t = `a${b}c${d}`;\n\
         const o = { a, b: 1, [c]: 2, m() {}, get n() { return 1; }, ...rest };\n\
         const call = f<string>(x)?.y!.z;\n\
         const c = a ? b : c ?? d;\n\
         const v = value as unknown as string;",
    )
    .expect("valid source");
    assert_eq!(find_all(&tree, "ArrowFunction").len(), 2);
    assert_eq!(find_all(&tree, "RegularExpressionLiteral").len(), 1);
    let templates = find_all(&tree, "TemplateExpression");
    assert_eq!(templates.len(), 1);
    let Some(NodeData::TemplateExpression(template)) = tree.arena.data(templates[0]) else {
        panic!("expected template");
    };
    assert_eq!(template.quasis.len(), 3);
    assert_eq!(template.expressions.len(), 2);
    assert_eq!(find_all(&tree, "AsExpression").len(), 2);
    assert_eq!(find_all(&tree, "NonNullExpression").len(), 1);
    assert_eq!(find_all(&tree, "ConditionalExpression").len(), 1);

    let calls = find_all(&tree, "CallExpression");
    let typed_call = calls.iter().any(|&idx| {
        matches!(
            tree.arena.data(idx),
            Some(NodeData::CallExpression(call)) if call.type_arguments.is_some()
        )
    });
    assert!(typed_call);
}

#[test]
fn parse_control_flow() {
    let tree = parse(
        "for (const x of xs) { if (x) continue; else break; }\n\
         for (let i = 0; i < n; i++) {}\n\
         for (k in obj) {}\n\
         while (true) { do { x--; } while (x > 0) }\n\
         switch (k) { case 1: a(); break; default: b(); }\n\
         try { f(); } catch (e) { g(e); } finally { h(); }\n\
         outer: for (;;) { break outer; }",
    )
    .expect("valid source");
    assert_eq!(
        statement_kinds(&tree),
        vec![
            "ForOfStatement",
            "ForStatement",
            "ForInStatement",
            "WhileStatement",
            "SwitchStatement",
            "TryStatement",
            "LabeledStatement",
        ]
    );
}

#[test]
fn parse_imports_and_exports() {
    let tree = parse(
        "import def, { a as b, type C } from './mod';\n\
         import * as ns from 'ns';\n\
         import type { T } from './types';\n\
         import 'side-effect';\n\
         export { a, b as c } from './other';\n\
         export * from './all';\n\
         export default function () {}\n\
         export const answer = 42;",
    )
    .expect("valid source");
    assert_eq!(
        statement_kinds(&tree),
        vec![
            "ImportDeclaration",
            "ImportDeclaration",
            "ImportDeclaration",
            "ImportDeclaration",
            "ExportNamedDeclaration",
            "ExportAllDeclaration",
            "ExportDefaultDeclaration",
            "ExportNamedDeclaration",
        ]
    );
    let Some(NodeData::ImportDeclaration(type_import)) = tree.arena.data(tree.statements()[2])
    else {
        panic!("expected import");
    };
    assert!(type_import.type_only);
}

#[test]
fn automatic_semicolon_insertion() {
    let tree = parse("let x = 1\nlet y = 2\nx + y").expect("valid source");
    assert_eq!(tree.statements().len(), 3);
}

#[test]
fn syntax_error_is_located() {
    let err = parse("const ok = 1;\nlet x = ;").expect_err("missing initializer");
    assert!(err.is_syntax());
    assert_eq!(err.start, 22);
    let location = err.location.expect("located");
    assert_eq!(location.start.line, 2);
    assert_eq!(location.start.column, 8);
}

#[test]
fn missing_semicolon_on_same_line_is_an_error() {
    assert!(parse("let a = 1 let b = 2;").is_err());
}

#[test]
fn deep_nesting_is_rejected_without_overflow() {
    let source = format!("{}1{}", "(".repeat(2000), ")".repeat(2000));
    let result = std::thread::Builder::new()
        .stack_size(32 * 1024 * 1024)
        .spawn(move || parse(&source).map(|_| ()))
        .expect("spawn parser thread")
        .join()
        .expect("parser thread");
    let err = result.expect_err("too deep");
    assert!(err.message.contains("Maximum nesting depth exceeded"));
}

//! Tests for printing syntax trees back to source text.

use gts_emitter::{DummySuppression, PrintHook, Printer, PrinterOptions, print};
use gts_parser::parser::node::*;
use gts_parser::{DUMMY_PLACEHOLDER, NodeArena, NodeIndex, NodeList, parse, parse_loose};

fn print_source(source: &str) -> String {
    let tree = parse(source).expect("source should parse");
    print(&tree.arena, tree.root, Some(source), PrinterOptions::default()).code
}

fn print_loose(source: &str, suppress_dummies: bool) -> String {
    let tree = parse_loose(source).expect("source should parse loosely");
    let mut printer = Printer::new(&tree.arena, PrinterOptions::default());
    printer.set_source(source);
    if suppress_dummies {
        printer.add_hook(Box::new(DummySuppression));
    }
    printer.print(tree.root).code
}

#[test]
fn prints_variable_statements() {
    let source = "const a = 1;\nlet b: string = \"x\";";
    assert_eq!(print_source(source), source);
}

#[test]
fn prints_functions_and_control_flow() {
    let source = "function f(a, b) {\n  if (a) {\n    return b;\n  } else return a;\n}";
    assert_eq!(
        print_source(source),
        "function f(a, b) {\n\tif (a) {\n\t\treturn b;\n\t} else\n\t\treturn a;\n}"
    );
}

#[test]
fn object_literal_layout_follows_source() {
    assert_eq!(
        print_source("const o = { a: 1, b };"),
        "const o = { a: 1, b };"
    );
    assert_eq!(
        print_source("const o = {\n  a: 1,\n};"),
        "const o = {\n\ta: 1,\n};"
    );
}

#[test]
fn keeps_parenthesized_arrow_body() {
    assert_eq!(
        print_source("const f = () => ({ a: 1 });"),
        "const f = () => ({ a: 1 });"
    );
}

#[test]
fn prints_type_level_syntax() {
    let source = "type T<K> = { [P in keyof K]?: K[P] } | string[];";
    assert_eq!(print_source(source), source);
}

#[test]
fn prints_classes() {
    let source = "class A extends B<C> implements I {\n  private x: number = 1;\n  constructor(a) {\n    super();\n  }\n  static get y() {\n    return 1;\n  }\n}";
    assert_eq!(
        print_source(source),
        "class A extends B<C> implements I {\n\tprivate x: number = 1;\n\tconstructor(a) {\n\t\tsuper();\n\t}\n\tstatic get y() {\n\t\treturn 1;\n\t}\n}"
    );
}

#[test]
fn prints_define_blocks_in_source_form() {
    let source = "define character {\n  id 1;\n  when :(:x > 1);\n};";
    assert_eq!(
        print_source(source),
        "define character {\n\tid 1;\n\twhen :(:x > 1);\n};"
    );
}

#[test]
fn dummy_identifiers_print_as_placeholder_without_hook() {
    let output = print_loose("{ foo. }", false);
    assert!(output.contains(DUMMY_PLACEHOLDER));
}

#[test]
fn dummy_suppression_prints_nothing_for_placeholders() {
    assert_eq!(print_loose("{ foo. }", true), "{\n\tfoo.;\n}");
}

#[test]
fn reemits_attached_comments() {
    let source = "// lead\nconst a = 1; // trail\nfoo(a /* last */);";
    assert_eq!(print_loose(source, true), source);
}

#[test]
fn line_comments_inside_expressions_become_block_comments() {
    assert_eq!(
        print_loose("foo(a, // note\n  b);", true),
        "foo(a /* note*/, b);"
    );
}

#[test]
fn empty_block_keeps_inner_comment() {
    assert_eq!(
        print_loose("function f() {\n  // todo\n}", true),
        "function f() {\n\t// todo\n}"
    );
}

#[test]
fn comments_can_be_disabled() {
    let source = "// lead\nconst a = 1;";
    let tree = parse_loose(source).expect("source should parse loosely");
    let options = PrinterOptions {
        comments: false,
        ..PrinterOptions::default()
    };
    let output = print(&tree.arena, tree.root, Some(source), options).code;
    assert_eq!(output, "const a = 1;");
}

fn expression_statement(arena: &mut NodeArena, expression: NodeIndex) -> NodeIndex {
    arena.add_synthetic(NodeData::ExpressionStatement(ExpressionData { expression }))
}

#[test]
fn synthesized_object_at_statement_start_is_parenthesized() {
    let mut arena = NodeArena::new();
    let object = arena.add_synthetic(NodeData::ObjectLiteralExpression(PropertiesData {
        properties: NodeList::new(),
    }));
    let name = arena.create_identifier("x");
    let access = arena.add_synthetic(NodeData::PropertyAccessExpression(PropertyAccessData {
        expression: object,
        name,
        optional: false,
    }));
    let statement = expression_statement(&mut arena, access);
    let output = print(&arena, statement, None, PrinterOptions::default());
    assert_eq!(output.code, "({}.x);");
    assert!(output.source_map.is_none());
}

#[test]
fn synthesized_literals_and_arrow_bodies() {
    let mut arena = NodeArena::new();
    let key = arena.create_identifier("a");
    let value = arena.create_string_literal("say \"hi\"");
    let property = arena.add_synthetic(NodeData::PropertyAssignment(PropertyAssignmentData {
        name: key,
        initializer: value,
    }));
    let object = arena.add_synthetic(NodeData::ObjectLiteralExpression(PropertiesData {
        properties: NodeList::from(vec![property]),
    }));
    let arrow = arena.add_synthetic(NodeData::ArrowFunction(FunctionData::new(
        NodeList::new(),
        object,
    )));
    let callee = arena.create_identifier("run");
    let call = arena.add_synthetic(NodeData::CallExpression(CallData {
        callee,
        type_arguments: None,
        arguments: NodeList::from(vec![arrow]),
        optional: false,
    }));
    let statement = expression_statement(&mut arena, call);
    let output = print(&arena, statement, None, PrinterOptions::default());
    assert_eq!(output.code, "run(() => ({ a: \"say \\\"hi\\\"\" }));");
}

struct DeferredText;

impl PrintHook for DeferredText {
    fn print(&self, _arena: &NodeArena, _idx: NodeIndex, node: &Node) -> Option<String> {
        match &node.data {
            NodeData::DeferredDeclaration(deferred) => Some(format!("type X = {};", deferred.payload)),
            _ => None,
        }
    }
}

#[test]
fn deferred_declarations_need_a_hook() {
    let mut arena = NodeArena::new();
    let deferred = arena.add_synthetic(NodeData::DeferredDeclaration(DeferredData {
        payload: "1".to_string(),
    }));
    let callee = arena.create_identifier("f");
    let call = arena.add_synthetic(NodeData::CallExpression(CallData {
        callee,
        type_arguments: None,
        arguments: NodeList::new(),
        optional: false,
    }));
    let statement = expression_statement(&mut arena, call);
    let root = arena.add_synthetic(NodeData::SourceFile(StatementsData {
        statements: NodeList::from(vec![deferred, statement]),
    }));

    let plain = print(&arena, root, None, PrinterOptions::default());
    assert_eq!(plain.code, "f();");

    let mut printer = Printer::new(&arena, PrinterOptions::default());
    printer.add_hook(Box::new(DeferredText));
    assert_eq!(printer.print(root).code, "type X = 1;\nf();");
}

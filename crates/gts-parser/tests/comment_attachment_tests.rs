//! Tests for attaching comments to nodes in loose parses.

use gts_parser::{NodeData, NodeIndex, SyntaxTree, parse_loose};

fn comment_texts<'a>(tree: &'a SyntaxTree, ranges: &[gts_common::CommentRange]) -> Vec<&'a str> {
    ranges
        .iter()
        .map(|c| &tree.source[c.pos as usize..c.end as usize])
        .collect()
}

fn leading(tree: &SyntaxTree, idx: NodeIndex) -> Vec<&str> {
    tree.arena
        .comments(idx)
        .map(|c| comment_texts(tree, &c.leading))
        .unwrap_or_default()
}

fn trailing(tree: &SyntaxTree, idx: NodeIndex) -> Vec<&str> {
    tree.arena
        .comments(idx)
        .map(|c| comment_texts(tree, &c.trailing))
        .unwrap_or_default()
}

#[test]
fn doc_comment_leads_define_statement() {
    let tree = parse_loose("/** The hero. */\ndefine character { id 1101 as TestCharacter; }")
        .expect("loose parse");
    let define = tree.statements()[0];
    assert_eq!(tree.arena.kind_name(define), Some("GtsDefineStatement"));
    assert_eq!(leading(&tree, define), vec!["/** The hero. */"]);
}

#[test]
fn same_line_comment_trails_statement() {
    let tree = parse_loose("const a = 1; // one\nconst b = 2;").expect("loose parse");
    let statements = tree.statements();
    assert_eq!(trailing(&tree, statements[0]), vec!["// one"]);
    assert!(leading(&tree, statements[1]).is_empty());
}

#[test]
fn comment_group_between_blank_lines_trails_previous_statement() {
    let tree = parse_loose("a();\n\n// c1\n// c2\n\nb();").expect("loose parse");
    let statements = tree.statements();
    assert_eq!(trailing(&tree, statements[0]), vec!["// c1", "// c2"]);
    assert!(leading(&tree, statements[1]).is_empty());
}

#[test]
fn blank_line_inside_comment_group_ends_the_group() {
    let tree = parse_loose("a();\n\n// c1\n\n// c2\n\nb();").expect("loose parse");
    let statements = tree.statements();
    assert_eq!(trailing(&tree, statements[0]), vec!["// c1"]);
}

#[test]
fn comment_directly_above_statement_leads_it() {
    let tree = parse_loose("a();\n\n// about b\nb();").expect("loose parse");
    let statements = tree.statements();
    assert!(trailing(&tree, statements[0]).is_empty());
    assert_eq!(leading(&tree, statements[1]), vec!["// about b"]);
}

#[test]
fn empty_block_keeps_inner_comment() {
    let tree = parse_loose("function f() { /* nothing */ }").expect("loose parse");
    let Some(NodeData::FunctionDeclaration(function)) = tree.arena.data(tree.statements()[0])
    else {
        panic!("expected function");
    };
    let inner = tree
        .arena
        .comments(function.body)
        .map(|c| comment_texts(&tree, &c.inner))
        .unwrap_or_default();
    assert_eq!(inner, vec!["/* nothing */"]);
}

#[test]
fn comment_before_function_body_dangles_on_function() {
    let tree = parse_loose("function f() /* d */ {}").expect("loose parse");
    let function = tree.statements()[0];
    let dangling = tree
        .arena
        .comments(function)
        .map(|c| comment_texts(&tree, &c.dangling))
        .unwrap_or_default();
    assert_eq!(dangling, vec!["/* d */"]);
}

#[test]
fn block_comment_before_next_parameter_leads_it() {
    let tree = parse_loose("function f(a /* x */, b) {}").expect("loose parse");
    let Some(NodeData::FunctionDeclaration(function)) = tree.arena.data(tree.statements()[0])
    else {
        panic!("expected function");
    };
    let params = &function.parameters.nodes;
    assert!(trailing(&tree, params[0]).is_empty());
    assert_eq!(leading(&tree, params[1]), vec!["/* x */"]);
}

#[test]
fn comment_after_last_argument_trails_it() {
    let tree = parse_loose("f(a /* last */);").expect("loose parse");
    let mut arguments = Vec::new();
    tree.arena.walk(tree.root, &mut |_, node| {
        if let NodeData::CallExpression(call) = &node.data {
            arguments.extend(call.arguments.nodes.iter().copied());
        }
    });
    assert_eq!(trailing(&tree, arguments[0]), vec!["/* last */"]);
}

#[test]
fn strict_parse_collects_but_does_not_attach() {
    let tree = gts_parser::parse("// head\nx;").expect("strict parse");
    assert_eq!(tree.comments.len(), 1);
    assert!(!tree.arena.has_comments());
}

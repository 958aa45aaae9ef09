//! Tests for `define` statements, shortcut functions and query expressions.

use gts_parser::parser::node::{BindingAccess, GtsNamedAttributeData};
use gts_parser::{NodeData, NodeIndex, SyntaxTree, parse};

const CHARACTER: &str = r#"define character {
  id 1101;
  tags "pyro", "sword";
  skill "Normal Attack" {
    type "normal";
    cost Pyro, 1;
    when :( :player.hands.length > 0 );
    usage 3;
    hint Cryo, 2;
    :damage(Physical, 2);
  }
  passive {
    on "beforeDamage", :{
      const chars = query* my.characters;
      return chars.length >= 2;
    };
  } as private _;
}
function helper() {}
"#;

fn find_all(tree: &SyntaxTree, kind: &str) -> Vec<NodeIndex> {
    let mut found = Vec::new();
    tree.arena.walk(tree.root, &mut |idx, node| {
        if node.kind_name() == kind {
            found.push(idx);
        }
    });
    found
}

fn attribute(tree: &SyntaxTree, idx: NodeIndex) -> &GtsNamedAttributeData {
    match tree.arena.data(idx) {
        Some(NodeData::GtsNamedAttributeDefinition(data)) => data,
        other => panic!("expected attribute definition, got {other:?}"),
    }
}

fn attribute_name(tree: &SyntaxTree, idx: NodeIndex) -> String {
    let name = attribute(tree, idx).name;
    tree.arena
        .identifier_text(name)
        .or_else(|| tree.arena.string_literal_value(name))
        .unwrap_or_default()
        .to_string()
}

/// Named children of the attribute's block, plus its direct action.
fn block_of(tree: &SyntaxTree, idx: NodeIndex) -> (Vec<NodeIndex>, NodeIndex) {
    let body = attribute(tree, idx).body;
    let Some(NodeData::GtsAttributeBody(body)) = tree.arena.data(body) else {
        panic!("expected attribute body");
    };
    match tree.arena.data(body.named_attributes) {
        Some(NodeData::GtsNamedAttributeBlock(block)) => {
            (block.attributes.nodes.clone(), block.direct_action)
        }
        _ => (Vec::new(), NodeIndex::NONE),
    }
}

fn positionals(tree: &SyntaxTree, idx: NodeIndex) -> Vec<NodeIndex> {
    let body = attribute(tree, idx).body;
    let Some(NodeData::GtsAttributeBody(body)) = tree.arena.data(body) else {
        panic!("expected attribute body");
    };
    match tree.arena.data(body.positional_attributes) {
        Some(NodeData::GtsPositionalAttributeList(list)) => list.attributes.nodes.clone(),
        _ => Vec::new(),
    }
}

fn define_body(tree: &SyntaxTree, statement: NodeIndex) -> NodeIndex {
    match tree.arena.data(statement) {
        Some(NodeData::GtsDefineStatement(define)) => define.body,
        other => panic!("expected define statement, got {other:?}"),
    }
}

#[test]
fn parse_define_statement_structure() {
    let tree = parse(CHARACTER).expect("valid source");
    let statements = tree.statements();
    assert_eq!(statements.len(), 2);
    assert_eq!(tree.arena.kind_name(statements[0]), Some("GtsDefineStatement"));
    assert_eq!(tree.arena.kind_name(statements[1]), Some("FunctionDeclaration"));

    let character = define_body(&tree, statements[0]);
    assert_eq!(attribute_name(&tree, character), "character");
    let (children, direct) = block_of(&tree, character);
    assert!(direct.is_none());
    let names: Vec<String> = children.iter().map(|&c| attribute_name(&tree, c)).collect();
    assert_eq!(names, vec!["id", "tags", "skill", "passive"]);

    assert_eq!(positionals(&tree, children[1]).len(), 2);
    let skill_positionals = positionals(&tree, children[2]);
    assert_eq!(skill_positionals.len(), 1);
    assert_eq!(
        tree.arena.string_literal_value(skill_positionals[0]),
        Some("Normal Attack")
    );
}

#[test]
fn direct_function_ends_named_block() {
    let tree = parse(CHARACTER).expect("valid source");
    let character = define_body(&tree, tree.statements()[0]);
    let (children, _) = block_of(&tree, character);
    let (skill_children, direct) = block_of(&tree, children[2]);
    let names: Vec<String> = skill_children
        .iter()
        .map(|&c| attribute_name(&tree, c))
        .collect();
    assert_eq!(names, vec!["type", "cost", "when", "usage", "hint"]);
    let Some(NodeData::GtsDirectFunction(action)) = tree.arena.data(direct) else {
        panic!("expected direct function");
    };
    assert_eq!(action.statements.len(), 1);
}

#[test]
fn shortcut_functions_and_arguments() {
    let tree = parse(CHARACTER).expect("valid source");
    let shortcuts = find_all(&tree, "GtsShortcutFunction");
    assert_eq!(shortcuts.len(), 2);
    let forms: Vec<bool> = shortcuts
        .iter()
        .filter_map(|&idx| match tree.arena.data(idx) {
            Some(NodeData::GtsShortcutFunction(f)) => Some(f.expression),
            _ => None,
        })
        .collect();
    assert_eq!(forms, vec![true, false]);

    let arguments: Vec<&str> = find_all(&tree, "GtsShortcutArgument")
        .into_iter()
        .filter_map(|idx| match tree.arena.data(idx) {
            Some(NodeData::GtsShortcutArgument(arg)) => tree.arena.identifier_text(arg.property),
            _ => None,
        })
        .collect();
    assert_eq!(arguments, vec!["player", "damage"]);
}

#[test]
fn query_star_is_recorded() {
    let tree = parse(CHARACTER).expect("valid source");
    let queries = find_all(&tree, "GtsQueryExpression");
    assert_eq!(queries.len(), 1);
    let Some(NodeData::GtsQueryExpression(query)) = tree.arena.data(queries[0]) else {
        panic!("expected query");
    };
    assert!(query.star);
    assert_eq!(tree.arena.kind_name(query.argument), Some("PropertyAccessExpression"));
}

#[test]
fn binding_clause_access_and_name() {
    let tree = parse(CHARACTER).expect("valid source");
    let character = define_body(&tree, tree.statements()[0]);
    let (children, _) = block_of(&tree, character);
    let passive = attribute(&tree, children[3]);
    assert_eq!(passive.binding_access, Some(BindingAccess::Private));
    assert_eq!(tree.arena.identifier_text(passive.binding_name), Some("_"));

    let tree = parse("define entity { id 1 as Foo; }").expect("valid source");
    let entity = define_body(&tree, tree.statements()[0]);
    let (children, _) = block_of(&tree, entity);
    let id = attribute(&tree, children[0]);
    assert_eq!(id.binding_access, None);
    assert_eq!(tree.arena.identifier_text(id.binding_name), Some("Foo"));
}

#[test]
fn access_word_alone_is_the_binding_name() {
    let tree = parse("define entity { id 1 as private; }").expect("valid source");
    let entity = define_body(&tree, tree.statements()[0]);
    let (children, _) = block_of(&tree, entity);
    let id = attribute(&tree, children[0]);
    assert_eq!(id.binding_access, None);
    assert_eq!(tree.arena.identifier_text(id.binding_name), Some("private"));
}

#[test]
fn string_attribute_names() {
    let tree = parse("define \"weird name\" 1, 2;").expect("valid source");
    let body = define_body(&tree, tree.statements()[0]);
    assert_eq!(attribute_name(&tree, body), "weird name");
    assert_eq!(positionals(&tree, body).len(), 2);
}

#[test]
fn define_needs_a_name_on_the_same_line() {
    let tree = parse("define\nfoo;").expect("valid source");
    let statements = tree.statements();
    assert_eq!(statements.len(), 2);
    assert!(
        statements
            .iter()
            .all(|&s| tree.arena.kind_name(s) == Some("ExpressionStatement"))
    );
}

#[test]
fn define_is_an_ordinary_identifier_elsewhere() {
    let tree = parse("const define = 1;\ndefine + 1;").expect("valid source");
    assert!(find_all(&tree, "GtsDefineStatement").is_empty());
}

#[test]
fn shortcut_argument_outside_shortcut_is_rejected() {
    let err = parse("const a = :foo;").expect_err("out of scope");
    assert!(!err.is_syntax());
    assert_eq!(
        err.message,
        "ShortcutArgumentExpression ':' must be inside ShortcutFunction or DirectShortcutFunction."
    );
    assert_eq!(err.start, 10);
}

#[test]
fn query_outside_shortcut_is_rejected() {
    let err = parse("const q = query x;").expect_err("out of scope");
    assert_eq!(
        err.message,
        "QueryExpression must be inside ShortcutFunction or DirectShortcutFunction."
    );
}

#[test]
fn query_cannot_be_exponentiated() {
    let err = parse("define a { :f(query x ** 2); }").expect_err("ambiguous");
    assert!(err.is_syntax());
}

#[test]
fn define_inside_direct_function_is_rejected() {
    let err = parse("define a { if (x) {} define b 1; }").expect_err("nested define");
    assert_eq!(err.message, "DefineStatement is not allowed in direct function.");
}

#[test]
fn object_literal_positional_is_rejected() {
    let err = parse("define a 1, { x: 1 };").expect_err("brace positional");
    assert_eq!(err.message, "Expected attribute expression, got '{'.");
}

#[test]
fn named_block_requires_attribute_names() {
    let err = parse("define a { 1 }").expect_err("number in block");
    assert_eq!(err.message, "Expected attribute name");
}

#[test]
fn shortcut_requires_paren_or_brace() {
    let err = parse("define a :x;").expect_err("bare shortcut");
    assert_eq!(err.message, "'(' or '{' expected.");
}

#[test]
fn positional_list_needs_commas() {
    assert!(parse("define a 1 2;").is_err());
}

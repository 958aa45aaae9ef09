//! Tests for error-tolerant parsing with placeholder identifiers.

use gts_parser::{DUMMY_PLACEHOLDER, NodeData, NodeIndex, SyntaxTree, parse, parse_loose};

fn dummies(tree: &SyntaxTree) -> Vec<NodeIndex> {
    let mut found = Vec::new();
    tree.arena.walk(tree.root, &mut |idx, node| {
        if node.is_dummy() {
            found.push(idx);
        }
    });
    found
}

#[test]
fn incomplete_member_access_gets_placeholder() {
    let source = "{ foo. }";
    assert!(parse(source).is_err());

    let tree = parse_loose(source).expect("loose parse");
    let found = dummies(&tree);
    assert_eq!(found.len(), 1);
    let node = tree.arena.get(found[0]).expect("dummy node");
    assert_eq!(node.pos, node.end);
    assert_eq!(node.pos, 7);
    assert_eq!(tree.arena.identifier_text(found[0]), Some(DUMMY_PLACEHOLDER));
}

#[test]
fn member_access_before_close_paren() {
    let source = "if (a.) {}";
    assert!(parse(source).is_err());
    let tree = parse_loose(source).expect("loose parse");
    let found = dummies(&tree);
    assert_eq!(found.len(), 1);
    assert_eq!(tree.arena.get(found[0]).map(|n| n.pos), Some(6));
}

#[test]
fn keywords_in_expression_position_still_fail() {
    for source in ["foo[var]", "foo?.(var)"] {
        assert!(parse(source).is_err(), "strict: {source}");
        assert!(parse_loose(source).is_err(), "loose: {source}");
    }
}

#[test]
fn empty_positional_attribute_gets_placeholder() {
    let source = "define a { hint , 2; }";
    assert!(parse(source).is_err());
    let tree = parse_loose(source).expect("loose parse");
    let found = dummies(&tree);
    assert_eq!(found.len(), 1);
    assert_eq!(tree.arena.get(found[0]).map(|n| n.pos), Some(16));
}

#[test]
fn trailing_comma_positional_gets_placeholder() {
    let tree = parse_loose("define a { hint Cryo, ; }").expect("loose parse");
    let mut lists = Vec::new();
    tree.arena.walk(tree.root, &mut |_, node| {
        if let NodeData::GtsPositionalAttributeList(list) = &node.data
            && !list.attributes.is_empty()
        {
            lists.push(list.attributes.nodes.clone());
        }
    });
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].len(), 2);
    assert!(tree.arena.is_dummy(lists[0][1]));
}

#[test]
fn bare_shortcut_colon_gets_placeholder() {
    let source = "define a { when :( : ); }";
    assert!(parse(source).is_err());
    let tree = parse_loose(source).expect("loose parse");
    let mut properties = Vec::new();
    tree.arena.walk(tree.root, &mut |_, node| {
        if let NodeData::GtsShortcutArgument(arg) = &node.data {
            properties.push(arg.property);
        }
    });
    assert_eq!(properties.len(), 1);
    assert!(tree.arena.is_dummy(properties[0]));
}

#[test]
fn well_formed_input_has_no_placeholders() {
    let tree = parse_loose("define a { hint Cryo, 2; when :( :x.y ); }").expect("loose parse");
    assert!(dummies(&tree).is_empty());
}

mod support;

use canopy_syntax::{Point, TextSize, TreeCursor};
use expect_test::expect;

/// Renders every move of a full depth-first walk.
fn walk_log(cursor: &mut TreeCursor<'_>) -> String {
    let mut log = String::new();
    let mut record = |cursor: &TreeCursor<'_>| {
        let node = cursor.node();
        let indent = "  ".repeat(cursor.current_depth() as usize);
        let field = cursor.field_name().map(|it| format!("{it}: ")).unwrap_or_default();
        log.push_str(&format!(
            "{indent}{field}{} {}..{} #{}\n",
            node.kind(),
            u32::from(node.start_byte()),
            u32::from(node.end_byte()),
            cursor.current_descendant_index(),
        ));
    };

    record(cursor);
    loop {
        if cursor.goto_first_child() {
            record(cursor);
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                record(cursor);
                break;
            }
            if !cursor.goto_parent() {
                return log;
            }
        }
    }
}

#[test]
fn walk_whole_tree() {
    let tree = support::sum(support::SUM_SOURCE);
    let mut cursor = tree.walk();
    expect![[r#"
        program 0..10 #0
          expression_statement 0..10 #1
            binary_expression 0..10 #2
              left: identifier 0..3 #3
              operator: + 4..5 #4
              right: number 6..10 #5
    "#]]
    .assert_eq(&walk_log(&mut cursor));
    assert_eq!(cursor.node(), tree.root_node());
    assert_eq!(cursor.current_depth(), 0);
}

#[test]
fn walk_with_extras_and_errors() {
    let tree = support::stray_operator();
    expect![[r#"
        program 0..11 #0
          expression_statement 0..11 #1
            binary_expression 0..11 #2
              left: number 0..1 #3
              operator: + 2..3 #4
              right: binary_expression 4..11 #5
                left: number 4..5 #6
                operator: * 6..7 #7
                ERROR 8..9 #8
                  * 8..9 #9
                right: number 10..11 #10
    "#]]
    .assert_eq(&walk_log(&mut tree.walk()));

    let tree = support::call_with_comment();
    expect![[r#"
        program 0..14 #0
          expression_statement 0..14 #1
            call_expression 0..13 #2
              function: identifier 0..3 #3
              arguments: arguments 3..13 #4
                ( 3..4 #5
                comment 4..12 #6
                ) 12..13 #7
            ; 13..14 #8
    "#]]
    .assert_eq(&walk_log(&mut tree.walk()));
}

#[test]
fn preorder_agrees_with_descendant_seek() {
    for tree in support::all() {
        let root = tree.root_node();
        let nodes = root.preorder().collect::<Vec<_>>();
        assert_eq!(nodes.len(), tree.descendant_count() as usize);

        let mut cursor = tree.walk();
        // Seek backwards too, so every seek starts from an unrelated node.
        for index in (0..nodes.len()).rev().chain(0..nodes.len()) {
            cursor.goto_descendant(index as u32);
            assert_eq!(cursor.node(), nodes[index]);
            assert_eq!(cursor.current_descendant_index(), index as u32);
            let depth = nodes[index].ancestors().count() - 1;
            assert_eq!(cursor.current_depth() as usize, depth);
        }
    }
}

#[test]
fn out_of_range_seek_is_ignored() {
    let tree = support::sum(support::SUM_SOURCE);
    let mut cursor = tree.walk();
    cursor.goto_descendant(4);
    cursor.goto_descendant(6);
    assert_eq!(cursor.node().kind(), "+");
    assert_eq!(cursor.current_descendant_index(), 4);
    assert_eq!(cursor.current_depth(), 3);
}

#[test]
fn cursor_on_inner_node() {
    let tree = support::elif_chain();
    let if_statement = tree.root_node().child(0).unwrap();
    let clause = if_statement.child(5).unwrap();
    assert_eq!(clause.field_name(), Some("alternative"));

    let mut cursor = clause.walk();
    assert_eq!(cursor.field_name(), None);
    assert!(!cursor.goto_next_sibling());
    assert!(!cursor.goto_previous_sibling());
    assert!(!cursor.goto_parent());

    assert!(cursor.goto_first_child());
    assert_eq!(cursor.node().kind(), "elif");
    assert!(cursor.goto_next_sibling());
    assert_eq!(cursor.field_name(), Some("condition"));
    assert_eq!(cursor.node().text(), "three");

    let count = clause.descendant_count();
    cursor.goto_descendant(count - 1);
    assert_eq!(cursor.node().kind(), ")");
    assert_eq!(cursor.current_descendant_index(), count - 1);
    cursor.goto_descendant(count);
    assert_eq!(cursor.node().kind(), ")");

    let seen = clause.preorder().collect::<Vec<_>>();
    assert_eq!(seen.len(), count as usize);
    assert_eq!(seen.first(), Some(&clause));
    assert!(seen[1..].iter().all(|node| clause.child_with_descendant(*node).is_some()));
}

#[test]
fn last_and_previous() {
    let tree = support::sum(support::SUM_SOURCE);
    let mut cursor = tree.walk();
    assert!(cursor.goto_last_child());
    assert!(cursor.goto_last_child());
    assert!(cursor.goto_last_child());
    assert_eq!(cursor.node().kind(), "number");
    assert_eq!(cursor.field_name(), Some("right"));
    assert!(!cursor.goto_last_child());

    let mut backwards = Vec::new();
    loop {
        backwards.push(cursor.node().kind());
        if !cursor.goto_previous_sibling() {
            break;
        }
    }
    assert_eq!(backwards, ["number", "+", "identifier"]);
    assert_eq!(cursor.current_descendant_index(), 3);
}

#[test]
fn first_child_for_position() {
    let tree = support::sum(support::SUM_SOURCE);
    let sum = tree.root_node().child(0).unwrap().child(0).unwrap();

    let mut cursor = sum.walk();
    assert_eq!(cursor.goto_first_child_for_byte(TextSize::new(4)), Some(1));
    assert_eq!(cursor.node().kind(), "+");
    assert_eq!(cursor.current_depth(), 1);

    let mut cursor = sum.walk();
    assert_eq!(cursor.goto_first_child_for_point(Point::new(0, 7)), Some(2));
    assert_eq!(cursor.node().kind(), "number");

    let mut cursor = sum.walk();
    assert_eq!(cursor.goto_first_child_for_byte(TextSize::new(10)), None);
    assert_eq!(cursor.node(), sum);
}

#[test]
fn reset() {
    let tree = support::sum(support::SUM_SOURCE);
    let mut deep = tree.walk();
    deep.goto_descendant(5);
    let mut shallow = tree.walk();

    shallow.reset_to(&deep);
    assert_eq!(shallow.node().kind(), "number");
    assert_eq!(shallow.current_depth(), 3);
    assert!(shallow.goto_parent());
    assert_eq!(deep.node().kind(), "number");

    let identifier = tree.root_node().child(0).unwrap().child(0).unwrap().child(0).unwrap();
    deep.reset(identifier);
    assert_eq!(deep.node(), identifier);
    assert_eq!(deep.current_depth(), 0);
    assert_eq!(deep.current_descendant_index(), 0);
    assert_eq!(deep.field_name(), None);
    assert!(!deep.goto_parent());

    let other = support::quotient();
    deep.reset(other.root_node());
    assert_eq!(deep.node().kind(), "program");
    assert_eq!(deep.node().text(), support::QUOTIENT_SOURCE);
}

#[test]
fn cloned_cursors_move_independently() {
    let tree = support::sum(support::SUM_SOURCE);
    let mut cursor = tree.walk();
    cursor.goto_descendant(3);
    let mut copy = cursor.clone();
    assert!(copy.goto_next_sibling());
    assert_eq!(copy.node().kind(), "+");
    assert_eq!(cursor.node().kind(), "identifier");
}

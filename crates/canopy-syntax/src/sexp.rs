//! S-expression rendering of subtrees.

use std::fmt;

use crate::{SyntaxNode, TreeCursor};

impl SyntaxNode<'_> {
    /// Renders this subtree as an S-expression of its named nodes, e.g.
    /// `(binary_expression left: (identifier) right: (number))`.
    pub fn to_sexp(&self) -> String {
        self.to_string()
    }
}

/// Named and missing nodes are printed; the node being rendered always is.
fn is_visible(cursor: &TreeCursor<'_>) -> bool {
    let node = cursor.node();
    node.is_named() || node.is_missing() || cursor.current_depth() == 0
}

impl fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cursor = self.walk();
        let mut first = true;
        'enter: loop {
            let node = cursor.node();
            if is_visible(&cursor) {
                if !first {
                    f.write_str(" ")?;
                }
                first = false;
                if let Some(field) = cursor.field_name() {
                    write!(f, "{field}: ")?;
                }
                match (node.is_missing(), node.is_named()) {
                    (true, true) => write!(f, "(MISSING {}", node.kind())?,
                    (true, false) => write!(f, "(MISSING {:?}", node.kind())?,
                    (false, true) => write!(f, "({}", node.kind())?,
                    (false, false) => write!(f, "({:?}", node.kind())?,
                }
            }
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if is_visible(&cursor) {
                    f.write_str(")")?;
                }
                if cursor.goto_next_sibling() {
                    continue 'enter;
                }
                if !cursor.goto_parent() {
                    return Ok(());
                }
            }
        }
    }
}

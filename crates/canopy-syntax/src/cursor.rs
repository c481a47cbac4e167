//! Stateful traversal of a syntax tree.

use canopy_text::Point;
use text_size::TextSize;

use crate::nodes::{NodeId, TreeInner};
use crate::{FieldId, SyntaxNode, SyntaxTree};

/// A cursor for walking a subtree efficiently.
///
/// The node a cursor is created from (or [reset](TreeCursor::reset) to) is its
/// root: the cursor never moves to the root's parent or siblings.
#[derive(Clone)]
pub struct TreeCursor<'a> {
    tree: &'a SyntaxTree,
    current: NodeId,
    /// Path from the cursor's root down to the current node's parent.
    ancestors: Vec<NodeId>,
}

impl<'a> TreeCursor<'a> {
    pub(crate) fn new(node: SyntaxNode<'a>) -> Self {
        Self { tree: node.tree(), current: node.id(), ancestors: Vec::new() }
    }

    #[inline]
    fn inner(&self) -> &'a TreeInner {
        self.tree.inner()
    }

    #[inline]
    fn root(&self) -> NodeId {
        self.ancestors.first().copied().unwrap_or(self.current)
    }

    /// Returns the node the cursor is positioned on.
    #[inline]
    pub fn node(&self) -> SyntaxNode<'a> {
        SyntaxNode::new(self.tree, self.current)
    }

    /// Returns the field name the current node is bound to, if any.
    ///
    /// Always `None` at the cursor's root, even if the root has a field in
    /// its own parent.
    pub fn field_name(&self) -> Option<&'a str> {
        self.inner().language.field_name(self.field_id()?)
    }

    pub fn field_id(&self) -> Option<FieldId> {
        if self.ancestors.is_empty() {
            return None;
        }
        self.inner().node(self.current).field
    }

    /// Depth of the current node below the cursor's root.
    #[inline]
    pub fn current_depth(&self) -> u32 {
        self.ancestors.len() as u32
    }

    /// Preorder index of the current node, relative to the cursor's root.
    #[inline]
    pub fn current_descendant_index(&self) -> u32 {
        self.current.0 - self.root().0
    }

    /// Moves to the first child. Returns `false` for a leaf.
    pub fn goto_first_child(&mut self) -> bool {
        match self.inner().children(self.current).first() {
            Some(&child) => {
                self.ancestors.push(self.current);
                self.current = child;
                true
            }
            None => false,
        }
    }

    /// Moves to the last child. Returns `false` for a leaf.
    pub fn goto_last_child(&mut self) -> bool {
        match self.inner().children(self.current).last() {
            Some(&child) => {
                self.ancestors.push(self.current);
                self.current = child;
                true
            }
            None => false,
        }
    }

    /// Moves to the next sibling. Returns `false` on the last child or at the
    /// cursor's root.
    pub fn goto_next_sibling(&mut self) -> bool {
        let Some(&parent) = self.ancestors.last() else { return false };
        let index = self.inner().node(self.current).child_index as usize;
        match self.inner().children(parent).get(index + 1) {
            Some(&sibling) => {
                self.current = sibling;
                true
            }
            None => false,
        }
    }

    /// Moves to the previous sibling. Returns `false` on the first child or
    /// at the cursor's root.
    pub fn goto_previous_sibling(&mut self) -> bool {
        let Some(&parent) = self.ancestors.last() else { return false };
        let index = self.inner().node(self.current).child_index as usize;
        let Some(index) = index.checked_sub(1) else { return false };
        self.current = self.inner().children(parent)[index];
        true
    }

    /// Moves to the parent. Returns `false` at the cursor's root.
    pub fn goto_parent(&mut self) -> bool {
        match self.ancestors.pop() {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    /// Moves to the `index`-th node of the root's subtree in preorder, where
    /// the root itself is index zero.
    ///
    /// An index past the end of the subtree leaves the cursor where it is.
    pub fn goto_descendant(&mut self, index: u32) {
        let root = self.root();
        let inner = self.inner();
        let count = inner.node(root).descendant_count;
        if index >= count {
            tracing::trace!(index, count, "descendant index out of range");
            return;
        }

        let target = NodeId(root.0 + index);
        self.ancestors.clear();
        self.current = root;
        while self.current != target {
            let children = inner.children(self.current);
            // Children are in preorder, so the subtree holding `target` starts
            // at the last child id not past it.
            let slot = children.partition_point(|child| child.0 <= target.0) - 1;
            debug_assert!(target.0 < inner.node(children[slot]).subtree_end(children[slot]));
            self.ancestors.push(self.current);
            self.current = children[slot];
        }
        tracing::trace!(index, depth = self.ancestors.len(), "moved to descendant");
    }

    /// Moves to the first child that contains `byte` or starts after it and
    /// returns its index, or returns `None` without moving.
    pub fn goto_first_child_for_byte(&mut self, byte: TextSize) -> Option<usize> {
        self.goto_first_child_where(|child| child.end_byte() > byte)
    }

    /// Moves to the first child that contains `point` or starts after it and
    /// returns its index, or returns `None` without moving.
    pub fn goto_first_child_for_point(&mut self, point: Point) -> Option<usize> {
        self.goto_first_child_where(|child| child.end_position() > point)
    }

    fn goto_first_child_where(
        &mut self,
        mut predicate: impl FnMut(SyntaxNode<'a>) -> bool,
    ) -> Option<usize> {
        let (index, child) = self.node().children().enumerate().find(|&(_, it)| predicate(it))?;
        self.ancestors.push(self.current);
        self.current = child.id();
        Some(index)
    }

    /// Re-roots the cursor at `node`.
    pub fn reset(&mut self, node: SyntaxNode<'a>) {
        self.tree = node.tree();
        self.current = node.id();
        self.ancestors.clear();
    }

    /// Copies the position and root of `other` into this cursor.
    pub fn reset_to(&mut self, other: &Self) {
        self.clone_from(other);
    }
}

impl std::fmt::Debug for TreeCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeCursor")
            .field("node", &self.node())
            .field("depth", &self.current_depth())
            .finish_non_exhaustive()
    }
}

/// Preorder traversal over the nodes of a subtree, backed by a cursor.
#[derive(Clone, Debug)]
pub struct Preorder<'a> {
    cursor: TreeCursor<'a>,
    started: bool,
    skip: bool,
    done: bool,
}

impl<'a> Preorder<'a> {
    #[inline]
    pub(crate) fn new(cursor: TreeCursor<'a>) -> Self {
        Self { cursor, started: false, skip: false, done: false }
    }

    /// Skips the children of the node returned last.
    #[inline]
    pub fn skip_subtree(&mut self) {
        self.skip = true;
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = SyntaxNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.cursor.node());
        }
        if !std::mem::take(&mut self.skip) && self.cursor.goto_first_child() {
            return Some(self.cursor.node());
        }
        loop {
            if self.cursor.goto_next_sibling() {
                return Some(self.cursor.node());
            }
            if !self.cursor.goto_parent() {
                self.done = true;
                return None;
            }
        }
    }
}

//! Node handles and their child iterators.

use std::fmt;
use std::hash::{Hash, Hasher};

use canopy_text::Point;
use text_size::{TextRange, TextSize};

use crate::nodes::{NodeData, NodeId, TreeInner};
use crate::{FieldId, Preorder, StateId, Symbol, SyntaxTree, TreeCursor, TreeError, TreeResult};

/// A lightweight handle to one node of a [`SyntaxTree`].
///
/// Handles are `Copy` and compare by identity: two handles are equal when they
/// refer to the same node of the same tree view.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a SyntaxTree,
    id: NodeId,
}

impl<'a> SyntaxNode<'a> {
    #[inline]
    pub(crate) fn new(tree: &'a SyntaxTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    #[inline]
    fn with_id(self, id: NodeId) -> Self {
        Self { tree: self.tree, id }
    }

    #[inline]
    fn inner(self) -> &'a TreeInner {
        self.tree.inner()
    }

    #[inline]
    pub(crate) fn data(self) -> &'a NodeData {
        self.inner().node(self.id)
    }

    /// Returns the node's identity within its tree.
    #[inline]
    pub fn id(self) -> NodeId {
        self.id
    }

    /// Returns the tree view this node belongs to.
    #[inline]
    pub fn tree(self) -> &'a SyntaxTree {
        self.tree
    }

    /// Returns the grammar's internal id for this node's type.
    #[inline]
    pub fn kind_id(self) -> Symbol {
        self.data().kind
    }

    /// Returns this node's type name.
    #[inline]
    pub fn kind(self) -> &'a str {
        self.inner().language.symbol_name(self.kind_id()).unwrap_or_default()
    }

    /// Returns `true` if the grammar marks this node as semantically
    /// meaningful.
    #[inline]
    pub fn is_named(self) -> bool {
        self.is_error() || self.inner().language.symbol_metadata(self.kind_id()).named
    }

    /// Returns `true` if this node is a parse error.
    #[inline]
    pub fn is_error(self) -> bool {
        self.kind_id() == Symbol::ERROR
    }

    /// Returns `true` if error recovery inserted this node without consuming
    /// any text.
    #[inline]
    pub fn is_missing(self) -> bool {
        self.data().is_missing()
    }

    /// Returns `true` if this node lies outside of the grammar's normal
    /// structure, e.g. a comment.
    #[inline]
    pub fn is_extra(self) -> bool {
        self.data().is_extra()
    }

    /// Returns `true` if this node is an error or contains an error or missing
    /// node.
    #[inline]
    pub fn has_error(self) -> bool {
        self.data().has_error()
    }

    /// Returns the parse state this node was created in.
    #[inline]
    pub fn parse_state(self) -> StateId {
        self.data().parse_state
    }

    /// Returns the parse state reached after consuming this node.
    pub fn next_parse_state(self) -> StateId {
        let state = self.parse_state();
        if state == StateId::NONE {
            return StateId::NONE;
        }
        self.inner().language.next_state(state, self.kind_id())
    }

    #[inline]
    pub fn start_byte(self) -> TextSize {
        self.data().range.start() + self.tree.offset().bytes
    }

    #[inline]
    pub fn end_byte(self) -> TextSize {
        self.data().range.end() + self.tree.offset().bytes
    }

    #[inline]
    pub fn byte_range(self) -> TextRange {
        self.data().range + self.tree.offset().bytes
    }

    /// Returns the start offset in UTF-16 code units.
    #[inline]
    pub fn start_utf16(self) -> u32 {
        self.utf16_at(self.data().range.start())
    }

    /// Returns the end offset in UTF-16 code units.
    #[inline]
    pub fn end_utf16(self) -> u32 {
        self.utf16_at(self.data().range.end())
    }

    pub fn utf16_range(self) -> std::ops::Range<u32> {
        self.start_utf16()..self.end_utf16()
    }

    #[inline]
    pub fn start_position(self) -> Point {
        self.tree.offset().point.add(self.local_point(self.data().range.start()))
    }

    #[inline]
    pub fn end_position(self) -> Point {
        self.tree.offset().point.add(self.local_point(self.data().range.end()))
    }

    fn utf16_at(self, offset: TextSize) -> u32 {
        let local = self
            .inner()
            .text
            .byte_to_utf16(offset)
            .expect("node boundaries are character boundaries");
        local + self.tree.offset().utf16
    }

    fn local_point(self, offset: TextSize) -> Point {
        self.inner().text.byte_to_point(offset).expect("node boundaries are character boundaries")
    }

    /// Returns the exact source text covered by this node.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text()[self.data().range]
    }

    /// Returns the parent node, or `None` for the root.
    #[inline]
    pub fn parent(self) -> Option<Self> {
        Some(self.with_id(self.data().parent?))
    }

    /// Returns an iterator of ancestors starting from this node.
    #[inline]
    pub fn ancestors(self) -> impl Iterator<Item = Self> + Clone {
        std::iter::successors(Some(self), |it| it.parent())
    }

    /// Returns the nearest strict ancestor whose type is one of `kinds`.
    pub fn closest(self, kinds: &[&str]) -> Option<Self> {
        self.ancestors().skip(1).find(|ancestor| kinds.contains(&ancestor.kind()))
    }

    /// Number of nodes in this subtree, including the node itself.
    #[inline]
    pub fn descendant_count(self) -> u32 {
        self.data().descendant_count
    }

    #[inline]
    fn child_ids(self) -> &'a [NodeId] {
        self.inner().children(self.id)
    }

    /// Iterates all children, including anonymous tokens and extras.
    #[inline]
    pub fn children(self) -> Children<'a> {
        Children { tree: self.tree, ids: self.child_ids().iter() }
    }

    /// Iterates the named children.
    #[inline]
    pub fn named_children(self) -> NamedChildren<'a> {
        NamedChildren { inner: self.children() }
    }

    #[inline]
    pub fn child_count(self) -> usize {
        self.child_ids().len()
    }

    #[inline]
    pub fn named_child_count(self) -> usize {
        self.named_children().count()
    }

    /// Returns the child at `index`, counting anonymous children.
    #[inline]
    pub fn child(self, index: usize) -> Option<Self> {
        Some(self.with_id(*self.child_ids().get(index)?))
    }

    /// Returns the child at `index` among the named children.
    #[inline]
    pub fn named_child(self, index: usize) -> Option<Self> {
        self.named_children().nth(index)
    }

    #[inline]
    pub fn first_child(self) -> Option<Self> {
        self.children().next()
    }

    #[inline]
    pub fn last_child(self) -> Option<Self> {
        self.children().next_back()
    }

    #[inline]
    pub fn first_named_child(self) -> Option<Self> {
        self.named_children().next()
    }

    #[inline]
    pub fn last_named_child(self) -> Option<Self> {
        self.named_children().next_back()
    }

    /// Returns the parent's child ids and this node's position among them.
    #[inline]
    fn siblings(self) -> Option<(&'a [NodeId], usize)> {
        let parent = self.data().parent?;
        Some((self.inner().children(parent), self.data().child_index as usize))
    }

    pub fn next_sibling(self) -> Option<Self> {
        let (siblings, index) = self.siblings()?;
        Some(self.with_id(*siblings.get(index + 1)?))
    }

    pub fn prev_sibling(self) -> Option<Self> {
        let (siblings, index) = self.siblings()?;
        Some(self.with_id(siblings[index.checked_sub(1)?]))
    }

    pub fn next_named_sibling(self) -> Option<Self> {
        let (siblings, index) = self.siblings()?;
        let mut following = Children { tree: self.tree, ids: siblings[index + 1..].iter() };
        following.find(|sibling| sibling.is_named())
    }

    pub fn prev_named_sibling(self) -> Option<Self> {
        let (siblings, index) = self.siblings()?;
        let preceding = Children { tree: self.tree, ids: siblings[..index].iter() };
        preceding.rev().find(|sibling| sibling.is_named())
    }

    /// Returns the id of the field this node is bound to in its parent.
    #[inline]
    pub fn field_id(self) -> Option<FieldId> {
        self.data().field
    }

    /// Returns the name of the field this node is bound to in its parent.
    #[inline]
    pub fn field_name(self) -> Option<&'a str> {
        self.inner().language.field_name(self.field_id()?)
    }

    /// Returns the first child bound to `field`.
    pub fn child_by_field_id(self, field: FieldId) -> Option<Self> {
        self.children_by_field_id(field).next()
    }

    /// Returns the first child bound to the field called `name`.
    pub fn child_by_field_name(self, name: &str) -> Option<Self> {
        self.child_by_field_id(self.inner().language.field_for_name(name)?)
    }

    /// Iterates all children bound to `field`, in source order.
    pub fn children_by_field_id(self, field: FieldId) -> impl Iterator<Item = Self> {
        self.children().filter(move |child| child.field_id() == Some(field))
    }

    /// Iterates all children bound to the field called `name`, in source
    /// order. Grammars may bind one field to several children.
    pub fn children_by_field_name(self, name: &str) -> impl Iterator<Item = Self> + use<'a> {
        let field = self.inner().language.field_for_name(name);
        self.children().filter(move |child| field.is_some() && child.field_id() == field)
    }

    /// Returns the field name of the child at `index`, counting anonymous
    /// children.
    pub fn field_name_for_child(self, index: usize) -> Option<&'a str> {
        self.child(index)?.field_name()
    }

    /// Returns the field name of the child at `index` among the named
    /// children.
    pub fn field_name_for_named_child(self, index: usize) -> Option<&'a str> {
        self.named_child(index)?.field_name()
    }

    /// Returns the child of this node that contains `descendant`, which may
    /// be `descendant` itself.
    pub fn child_with_descendant(self, descendant: Self) -> Option<Self> {
        if !self.tree.same_view(descendant.tree) {
            return None;
        }
        let mut node = descendant;
        while let Some(parent) = node.parent() {
            if parent.id == self.id {
                return Some(node);
            }
            node = parent;
        }
        None
    }

    /// Returns the smallest node that spans the byte range `start..end`.
    pub fn descendant_for_byte_range(self, start: TextSize, end: TextSize) -> TreeResult<Self> {
        self.descendant_for_byte_range_impl(start, end, false)
    }

    /// Returns the smallest named node that spans the byte range
    /// `start..end`.
    pub fn named_descendant_for_byte_range(
        self,
        start: TextSize,
        end: TextSize,
    ) -> TreeResult<Self> {
        self.descendant_for_byte_range_impl(start, end, true)
    }

    /// Returns the smallest node that spans the positions `start..end`.
    pub fn descendant_for_point_range(self, start: Point, end: Point) -> TreeResult<Self> {
        self.descendant_for_point_range_impl(start, end, false)
    }

    /// Returns the smallest named node that spans the positions
    /// `start..end`.
    pub fn named_descendant_for_point_range(self, start: Point, end: Point) -> TreeResult<Self> {
        self.descendant_for_point_range_impl(start, end, true)
    }

    fn descendant_for_byte_range_impl(
        self,
        start: TextSize,
        end: TextSize,
        named_only: bool,
    ) -> TreeResult<Self> {
        if start > end {
            return Err(TreeError::invalid_argument(format!(
                "byte range start {start:?} is after its end {end:?}"
            )));
        }
        let origin = self.tree.offset().bytes;
        let start = start.checked_sub(origin).unwrap_or_default();
        let end = end.checked_sub(origin).unwrap_or_default();
        Ok(self.descendant_for_range(start, end, named_only, |node| {
            (node.data().range.start(), node.data().range.end())
        }))
    }

    fn descendant_for_point_range_impl(
        self,
        start: Point,
        end: Point,
        named_only: bool,
    ) -> TreeResult<Self> {
        if start > end {
            return Err(TreeError::invalid_argument(format!(
                "point range start {start} is after its end {end}"
            )));
        }
        let origin = self.tree.offset().point;
        let start = start.saturating_sub(origin);
        let end = end.saturating_sub(origin);
        Ok(self.descendant_for_range(start, end, named_only, |node| {
            let range = node.data().range;
            (node.local_point(range.start()), node.local_point(range.end()))
        }))
    }

    /// Descends from this node towards the smallest node spanning
    /// `start..end`, in tree-local coordinates.
    fn descendant_for_range<P: Copy + Ord>(
        self,
        start: P,
        end: P,
        named_only: bool,
        bounds: impl Fn(Self) -> (P, P),
    ) -> Self {
        let mut node = self;
        let mut last_visible = self;
        'descend: loop {
            for child in node.children() {
                let (child_start, child_end) = bounds(child);
                if child_end < end {
                    continue;
                }
                // An empty child may still contain an empty range at its end.
                let before_start =
                    if child_start == child_end { child_end < start } else { child_end <= start };
                if before_start {
                    continue;
                }
                if start < child_start {
                    break;
                }
                node = child;
                if !named_only || node.is_named() {
                    last_visible = node;
                }
                continue 'descend;
            }
            return last_visible;
        }
    }

    /// Collects the nodes of this subtree, including the node itself, whose
    /// type is one of `kinds`, in preorder.
    ///
    /// With a `range`, only nodes overlapping the inclusive span
    /// `start..=end` are considered.
    pub fn descendants_of_type(self, kinds: &[&str], range: Option<(Point, Point)>) -> Vec<Self> {
        let language = &*self.inner().language;
        let symbols = kinds
            .iter()
            .flat_map(|kind| {
                [language.symbol_for_name(kind, true), language.symbol_for_name(kind, false)]
            })
            .flatten()
            .collect::<Vec<_>>();

        let mut result = Vec::new();
        let mut cursor = self.walk();
        'visit: loop {
            let node = cursor.node();
            let overlaps = range.is_none_or(|(start, end)| {
                node.end_position() >= start && node.start_position() <= end
            });
            if overlaps {
                if symbols.contains(&node.kind_id()) {
                    result.push(node);
                }
                if cursor.goto_first_child() {
                    continue;
                }
            }
            loop {
                if cursor.goto_next_sibling() {
                    continue 'visit;
                }
                if !cursor.goto_parent() {
                    break 'visit;
                }
            }
        }
        result
    }

    /// Returns the first child that contains `byte` or starts after it.
    pub fn first_child_for_byte(self, byte: TextSize) -> Option<Self> {
        self.first_child_for_byte_impl(byte, false)
    }

    /// Returns the first named node below this one that contains `byte` or
    /// starts after it, looking through anonymous children.
    pub fn first_named_child_for_byte(self, byte: TextSize) -> Option<Self> {
        self.first_child_for_byte_impl(byte, true)
    }

    fn first_child_for_byte_impl(self, byte: TextSize, named_only: bool) -> Option<Self> {
        let goal = byte.checked_sub(self.tree.offset().bytes).unwrap_or_default();
        let mut stack = vec![self.children()];
        while let Some(children) = stack.last_mut() {
            let Some(child) = children.next() else {
                stack.pop();
                continue;
            };
            if child.data().range.end() <= goal {
                continue;
            }
            if !named_only || child.is_named() {
                return Some(child);
            }
            if child.child_count() > 0 {
                stack.push(child.children());
            }
        }
        None
    }

    /// Returns a cursor positioned at this node.
    #[inline]
    pub fn walk(self) -> TreeCursor<'a> {
        TreeCursor::new(self)
    }

    /// Returns a preorder iterator over this subtree.
    #[inline]
    pub fn preorder(self) -> Preorder<'a> {
        Preorder::new(self.walk())
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.tree.same_view(other.tree)
    }
}

impl Eq for SyntaxNode<'_> {}

impl Hash for SyntaxNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.storage_ptr().hash(state);
        self.tree.offset().hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Node {} {} - {}}}", self.kind(), self.start_position(), self.end_position())
    }
}

/// Iterator over all children of a node.
#[derive(Clone)]
pub struct Children<'a> {
    tree: &'a SyntaxTree,
    ids: std::slice::Iter<'a, NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = SyntaxNode<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&id| SyntaxNode { tree: self.tree, id })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.ids.nth(n).map(|&id| SyntaxNode { tree: self.tree, id })
    }

    #[inline]
    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl DoubleEndedIterator for Children<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ids.next_back().map(|&id| SyntaxNode { tree: self.tree, id })
    }
}

impl ExactSizeIterator for Children<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Iterator over the named children of a node.
#[derive(Clone)]
pub struct NamedChildren<'a> {
    inner: Children<'a>,
}

impl<'a> Iterator for NamedChildren<'a> {
    type Item = SyntaxNode<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find(|child| child.is_named())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl DoubleEndedIterator for NamedChildren<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.rfind(|child| child.is_named())
    }
}

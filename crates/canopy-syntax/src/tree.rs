//! Shared, immutable tree storage and its offset views.

use std::fmt;
use std::sync::Arc;

use canopy_text::{Point, TextError, TextIndex};
use text_size::TextSize;

use crate::nodes::{NodeId, TreeInner};
use crate::{Language, SyntaxNode, TreeCursor, TreeResult};

/// A logical shift applied to every position a tree reports.
///
/// Lets a standalone parse pose as a fragment of a larger document, e.g. code
/// embedded in a template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TreeOffset {
    pub bytes: TextSize,
    pub utf16: u32,
    pub point: Point,
}

impl TreeOffset {
    pub const ZERO: Self = Self { bytes: TextSize::new(0), utf16: 0, point: Point::ZERO };

    /// The offset of a fragment that directly follows `prefix`.
    pub fn of(prefix: &str) -> Self {
        let last_line = prefix.rfind('\n').map_or(prefix, |newline| &prefix[newline + 1..]);
        Self {
            bytes: TextSize::of(prefix),
            utf16: prefix.encode_utf16().count() as u32,
            point: Point::new(
                prefix.matches('\n').count() as u32,
                last_line.encode_utf16().count() as u32,
            ),
        }
    }
}

/// An immutable syntax tree for a single source text.
///
/// Cloning is cheap and shares the node storage. The storage is released when
/// the last clone is dropped; node handles and cursors borrow the tree, so
/// none of them can outlive it.
#[derive(Clone)]
pub struct SyntaxTree {
    inner: triomphe::Arc<TreeInner>,
    offset: TreeOffset,
}

impl SyntaxTree {
    pub(crate) fn new(inner: TreeInner) -> Self {
        Self { inner: triomphe::Arc::new(inner), offset: TreeOffset::ZERO }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &TreeInner {
        &self.inner
    }

    /// Returns `true` if both values view the same storage with the same
    /// offset.
    #[inline]
    pub(crate) fn same_view(&self, other: &Self) -> bool {
        std::ptr::eq(&*self.inner, &*other.inner) && self.offset == other.offset
    }

    #[inline]
    pub(crate) fn storage_ptr(&self) -> *const () {
        std::ptr::from_ref(&*self.inner).cast()
    }

    /// Returns the root syntax node.
    #[inline]
    pub fn root_node(&self) -> SyntaxNode<'_> {
        SyntaxNode::new(self, NodeId::ROOT)
    }

    /// Returns the node with the given id, if it belongs to this tree.
    pub fn node(&self, id: NodeId) -> Option<SyntaxNode<'_>> {
        ((id.index() as usize) < self.inner.nodes.len()).then(|| SyntaxNode::new(self, id))
    }

    /// Returns a view of this tree whose positions are shifted by `offset`.
    ///
    /// The node storage is shared, not copied.
    pub fn with_offset(&self, offset: TreeOffset) -> Self {
        Self { inner: self.inner.clone(), offset }
    }

    /// Returns a view shifted by `bytes` and `point`.
    ///
    /// The UTF-16 delta is taken to equal the byte delta, which holds when
    /// the preceding text is ASCII. Use [`TreeOffset::of`] otherwise.
    pub fn offset_by(&self, bytes: TextSize, point: Point) -> Self {
        self.with_offset(TreeOffset { bytes, utf16: bytes.into(), point })
    }

    #[inline]
    pub fn offset(&self) -> TreeOffset {
        self.offset
    }

    /// Returns the full source text for this tree.
    #[inline]
    pub fn text(&self) -> &str {
        self.inner.text.text()
    }

    #[inline]
    pub fn text_index(&self) -> &TextIndex {
        &self.inner.text
    }

    #[inline]
    pub fn language(&self) -> &dyn Language {
        &*self.inner.language
    }

    /// Returns a shared handle to the language, e.g. to build another tree.
    pub fn language_arc(&self) -> Arc<dyn Language> {
        self.inner.language.clone()
    }

    /// Returns a cursor positioned at the root node.
    pub fn walk(&self) -> TreeCursor<'_> {
        self.root_node().walk()
    }

    /// Total number of nodes, including anonymous and extra nodes.
    #[inline]
    pub fn descendant_count(&self) -> u32 {
        self.inner.nodes.len() as u32
    }

    /// Converts a byte offset in this view's coordinates into a position.
    pub fn byte_to_point(&self, offset: TextSize) -> TreeResult<Point> {
        let local = offset.checked_sub(self.offset.bytes).ok_or(TextError::OffsetOutOfRange {
            offset: offset.into(),
            len: u32::from(self.offset.bytes + self.inner.text.len()),
        })?;
        Ok(self.offset.point.add(self.inner.text.byte_to_point(local)?))
    }

    /// Converts a position in this view's coordinates into a byte offset.
    pub fn point_to_byte(&self, point: Point) -> TreeResult<TextSize> {
        if point < self.offset.point {
            return Err(TextError::PointOutOfRange { point }.into());
        }
        let local = self.inner.text.point_to_byte(point.saturating_sub(self.offset.point))?;
        Ok(local + self.offset.bytes)
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("text_len", &self.text().len())
            .field("nodes", &self.inner.nodes.len())
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

//! Raw node storage.
//!
//! Nodes are stored in preorder, so a node's id is also its preorder index and
//! its subtree occupies the id range `id..id + descendant_count`.

use bitflags::bitflags;
use text_size::TextRange;

use crate::{FieldId, StateId, Symbol};

/// Identity of a node within its tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const ROOT: Self = Self(0);

    /// Returns the preorder index of the node.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub(crate) struct NodeFlags: u8 {
        /// Outside of the grammar's normal structure, e.g. a comment.
        const EXTRA = 1 << 0;
        /// Synthesized by error recovery; zero width.
        const MISSING = 1 << 1;
        /// The node is an error or contains an error or missing node.
        const HAS_ERROR = 1 << 2;
    }
}

/// Raw node stored in the tree arena.
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    /// Start of this node's slice in `TreeInner::children`.
    pub(crate) children: u32,
    pub(crate) children_len: u32,
    /// Position of this node in its parent's children.
    pub(crate) child_index: u32,
    /// Size of the subtree rooted here, including the node itself.
    pub(crate) descendant_count: u32,
    pub(crate) range: TextRange,
    pub(crate) kind: Symbol,
    pub(crate) field: Option<FieldId>,
    pub(crate) parse_state: StateId,
    pub(crate) flags: NodeFlags,
}

impl NodeData {
    #[inline]
    pub(crate) fn is_missing(&self) -> bool {
        self.flags.contains(NodeFlags::MISSING)
    }

    #[inline]
    pub(crate) fn is_extra(&self) -> bool {
        self.flags.contains(NodeFlags::EXTRA)
    }

    #[inline]
    pub(crate) fn has_error(&self) -> bool {
        self.flags.contains(NodeFlags::HAS_ERROR)
    }

    /// Returns the exclusive upper bound of this subtree's ids.
    #[inline]
    pub(crate) fn subtree_end(&self, id: NodeId) -> u32 {
        id.0 + self.descendant_count
    }
}

use std::sync::Arc;

use canopy_text::TextIndex;

use super::node::{NodeData, NodeId};
use crate::Language;

/// Owning storage for one parse result.
pub(crate) struct TreeInner {
    pub(crate) text: TextIndex,
    pub(crate) language: Arc<dyn Language>,
    /// Every node, in preorder. The root is always at index 0.
    pub(crate) nodes: Box<[NodeData]>,
    /// Child id slices of all nodes, concatenated.
    pub(crate) children: Box<[NodeId]>,
}

impl TreeInner {
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        let node = self.node(id);
        let start = node.children as usize;
        &self.children[start..start + node.children_len as usize]
    }
}

impl Drop for TreeInner {
    fn drop(&mut self) {
        tracing::debug!(
            nodes = self.nodes.len(),
            bytes = self.text.text().len(),
            "released syntax tree"
        );
    }
}

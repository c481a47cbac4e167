mod node;
mod tree;

pub use node::NodeId;
pub(crate) use node::{NodeData, NodeFlags};
pub(crate) use tree::TreeInner;

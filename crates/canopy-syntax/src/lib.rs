//! Immutable syntax trees with position-addressable nodes and preorder
//! cursors.
//!
//! A [`Builder`] turns parser events into a [`SyntaxTree`] whose nodes are
//! stored in preorder. Nodes are inspected through cheap, lifetime-guided
//! [`SyntaxNode`] handles and walked with a [`TreeCursor`].

mod builder;
mod cursor;
mod error;
mod grammar;
mod input;
mod language;
mod nodes;
mod sexp;
mod syntax;
mod tree;

/// Incremental builder for constructing a `SyntaxTree`.
pub use builder::Builder;
/// Position and text types shared with `canopy-text`.
pub use canopy_text::{Point, TextError, TextIndex, TextRange, TextSize};
/// Stateful traversal.
pub use cursor::{Preorder, TreeCursor};
/// Errors raised by positional queries.
pub use error::{TreeError, TreeResult};
/// Table-driven grammar descriptors.
pub use grammar::{Grammar, GrammarBuilder};
/// Sources of text for the builder.
pub use input::{ChunkReader, TextInput};
/// Grammar capability interface and its identifiers.
pub use language::{FieldId, Language, StateId, Symbol, SymbolMetadata};
pub use nodes::NodeId;
/// Node handles and child iterators.
pub use syntax::{Children, NamedChildren, SyntaxNode};
/// Shared tree storage and offset views.
pub use tree::{SyntaxTree, TreeOffset};

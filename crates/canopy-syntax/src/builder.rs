//! Incremental builder for the immutable syntax tree.
//!
//! A parser drives the builder with start/finish events and leaves. Nodes are
//! appended when they start, so the finished arena is already in preorder.

use std::sync::Arc;

use canopy_text::TextIndex;
use text_size::{TextRange, TextSize};

use crate::nodes::{NodeData, NodeFlags, NodeId, TreeInner};
use crate::{FieldId, Language, StateId, Symbol, SyntaxTree, TextInput};

struct Node {
    parent: Option<usize>,
    children: Vec<NodeId>,
    children_ptr: u32,
    children_len: u32,
    child_index: u32,
    descendant_count: u32,
    /// `None` until the first leaf inside this node is pushed.
    start: Option<TextSize>,
    end: TextSize,
    kind: Symbol,
    field: Option<FieldId>,
    parse_state: StateId,
    flags: NodeFlags,
}

/// Attributes applied to the next child pushed into the current node.
struct ChildAttrs {
    field: Option<FieldId>,
    extra: bool,
    parse_state: StateId,
}

impl Default for ChildAttrs {
    fn default() -> Self {
        Self { field: None, extra: false, parse_state: StateId::NONE }
    }
}

/// Builds a [`SyntaxTree`] from parser events.
pub struct Builder {
    language: Arc<dyn Language>,
    text: String,
    nodes: Vec<Node>,
    node_children: Vec<NodeId>,

    node_children_pool: Vec<Vec<NodeId>>,
    opened: Vec<usize>,
    pending: ChildAttrs,
    text_len: TextSize,
}

impl Drop for Builder {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.opened.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

const DEFAULT_TREE_DEPTH: usize = 128;
const DEFAULT_TREE_SIZE: usize = 1024;
const DEFAULT_CHILDREN_LEN: usize = 10;

impl Builder {
    /// Creates a new builder, draining `input` into the tree's source text.
    pub fn new(language: Arc<dyn Language>, mut input: impl TextInput) -> Self {
        let text = input.read_to_string();
        Self {
            language,
            text,
            nodes: Vec::with_capacity(DEFAULT_TREE_SIZE),
            node_children: Vec::with_capacity(DEFAULT_TREE_SIZE),

            node_children_pool: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            pending: ChildAttrs::default(),
            text_len: TextSize::new(0),
        }
    }

    /// Returns the language the tree is built for.
    pub fn language(&self) -> &dyn Language {
        &*self.language
    }

    /// Returns the full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the byte offset where the next leaf will start.
    pub fn position(&self) -> TextSize {
        self.text_len
    }

    /// Binds the next child to `field`.
    pub fn field(&mut self, field: FieldId) -> &mut Self {
        self.pending.field = Some(field);
        self
    }

    /// Marks the next child as an extra, e.g. a comment.
    pub fn extra(&mut self) -> &mut Self {
        self.pending.extra = true;
        self
    }

    /// Records the parse state the next child was created in.
    pub fn parse_state(&mut self, state: StateId) -> &mut Self {
        self.pending.parse_state = state;
        self
    }

    /// Starts a new node of the given kind.
    pub fn start_node(&mut self, kind: Symbol) {
        let children = self.new_node_children_vec();
        let node = self.push_node(kind, None, children, NodeFlags::empty());
        self.opened.push(node);
    }

    /// Finishes the most recently started node.
    pub fn finish_node(&mut self) {
        let index = self.opened.pop().expect("no opened nodes?");
        let mut children = std::mem::take(&mut self.nodes[index].children);

        let has_error = self.nodes[index].kind == Symbol::ERROR
            || children.iter().any(|child| {
                self.nodes[child.0 as usize]
                    .flags
                    .intersects(NodeFlags::HAS_ERROR | NodeFlags::MISSING)
            });
        let end = children.last().map(|child| self.nodes[child.0 as usize].end);
        let descendant_count = self.nodes.len() - index;

        let node = &mut self.nodes[index];
        let start = match node.start {
            Some(start) => start,
            None => {
                // Nothing inside; the node is empty at the current position.
                let start = end.unwrap_or(self.text_len);
                node.start = Some(start);
                start
            }
        };
        node.end = end.unwrap_or(start);
        if self.opened.is_empty() {
            // Leading and trailing gap bytes belong to the root.
            node.start = Some(TextSize::new(0));
            node.end = TextSize::of(self.text.as_str());
        }
        node.descendant_count = descendant_count.try_into().unwrap();
        if has_error {
            node.flags |= NodeFlags::HAS_ERROR;
        }
        node.children_ptr = self.node_children.len().try_into().unwrap();
        node.children_len = children.len().try_into().unwrap();

        self.node_children.append(&mut children);
        self.recycle_node_children_vec(children);
        self.mark_start(start);
    }

    /// Adds a leaf covering the next `text_len` bytes.
    pub fn token(&mut self, kind: Symbol, text_len: TextSize) {
        assert!(!self.opened.is_empty(), "tokens must be inside a node");
        let start = self.text_len;
        let end = self.advance(text_len);
        let flags =
            if kind == Symbol::ERROR { NodeFlags::HAS_ERROR } else { NodeFlags::empty() };
        self.push_node(kind, Some(TextRange::new(start, end)), Vec::new(), flags);
        self.mark_start(start);
    }

    /// Adds a zero-width leaf that error recovery inserted in place of a
    /// required token.
    pub fn missing(&mut self, kind: Symbol) {
        assert!(!self.opened.is_empty(), "missing nodes must be inside a node");
        let at = self.text_len;
        self.push_node(kind, Some(TextRange::empty(at)), Vec::new(), NodeFlags::MISSING);
        self.mark_start(at);
    }

    /// Skips `len` bytes that belong to no leaf, such as whitespace.
    pub fn skip(&mut self, len: TextSize) {
        self.advance(len);
    }

    /// Finishes building and returns the immutable [`SyntaxTree`].
    pub fn finish(mut self) -> SyntaxTree {
        assert!(self.opened.is_empty(), "unfinished nodes");
        assert!(!self.nodes.is_empty(), "a tree needs a root node");

        let nodes = std::mem::take(&mut self.nodes);
        let nodes = nodes
            .into_iter()
            .map(|node| NodeData {
                parent: node.parent.map(|parent| NodeId(parent as u32)),
                children: node.children_ptr,
                children_len: node.children_len,
                child_index: node.child_index,
                descendant_count: node.descendant_count,
                range: TextRange::new(node.start.unwrap_or(node.end), node.end),
                kind: node.kind,
                field: node.field,
                parse_state: node.parse_state,
                flags: node.flags,
            })
            .collect::<Box<[_]>>();

        tracing::debug!(nodes = nodes.len(), bytes = self.text.len(), "built syntax tree");

        SyntaxTree::new(TreeInner {
            text: TextIndex::new(std::mem::take(&mut self.text)),
            language: self.language.clone(),
            nodes,
            children: std::mem::take(&mut self.node_children).into_boxed_slice(),
        })
    }

    /// Appends a node in preorder position and links it to the open parent.
    fn push_node(
        &mut self,
        kind: Symbol,
        range: Option<TextRange>,
        children: Vec<NodeId>,
        mut flags: NodeFlags,
    ) -> usize {
        let parent = self.opened.last().copied();
        assert!(parent.is_some() || self.nodes.is_empty(), "a tree has a single root");

        let ChildAttrs { field, extra, parse_state } = std::mem::take(&mut self.pending);
        if extra {
            assert!(field.is_none(), "extra nodes cannot be bound to a field");
            flags |= NodeFlags::EXTRA;
        }

        let index = self.nodes.len();
        let id = NodeId(index.try_into().expect("too many nodes"));
        let child_index = match parent {
            Some(parent) => {
                let siblings = &mut self.nodes[parent].children;
                siblings.push(id);
                (siblings.len() - 1) as u32
            }
            None => 0,
        };

        self.nodes.push(Node {
            parent,
            children,
            children_ptr: 0,
            children_len: 0,
            child_index,
            descendant_count: 1,
            start: range.map(TextRange::start),
            end: range.map_or(self.text_len, TextRange::end),
            kind,
            field,
            parse_state,
            flags,
        });
        index
    }

    /// Records `start` on every open ancestor that has not started yet.
    fn mark_start(&mut self, start: TextSize) {
        for &ancestor in self.opened.iter().rev() {
            let node = &mut self.nodes[ancestor];
            if node.start.is_some() {
                // Outer nodes started no later than this one.
                break;
            }
            node.start = Some(start);
        }
    }

    fn advance(&mut self, len: TextSize) -> TextSize {
        self.text_len += len;
        let end = usize::from(self.text_len);
        assert!(end <= self.text.len(), "leaf runs past the end of the text");
        assert!(self.text.is_char_boundary(end), "leaf ends inside a character");
        self.text_len
    }

    /// Retrieves a recycled node-children buffer or allocates a new one.
    fn new_node_children_vec(&mut self) -> Vec<NodeId> {
        self.node_children_pool.pop().unwrap_or_else(|| Vec::with_capacity(DEFAULT_CHILDREN_LEN))
    }

    /// Returns a node-children buffer to the pool.
    fn recycle_node_children_vec(&mut self, vec: Vec<NodeId>) {
        self.node_children_pool.push(vec);
    }
}

//! The syntax tree: one arena snapshot per parse.
//!
//! Nodes live in a flat arena with index-based child references, so a tree
//! snapshot owns every node it can reach. Subtree reuse between parses
//! copies node records into the new snapshot's arena - two live trees never
//! share a mutable node.

pub mod invariants;

use std::fmt;
use std::sync::Arc;

use text_size::TextRange;

use crate::base::Position;
use crate::grammar::{Grammar, SymbolId};

pub use invariants::InvariantViolation;

/// Index of a node within its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The arena record behind a [`Node`] handle.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: SymbolId,
    pub(crate) start: Position,
    pub(crate) end: Position,
    pub(crate) changed: bool,
    pub(crate) children: Vec<NodeId>,
}

/// A complete parse result for a document at one point in time.
///
/// Between parses the tree is immutable from the consumer's point of view;
/// only the edit engine mutates it, to keep its positions in line with the
/// buffer until the next parse replaces it.
#[derive(Clone)]
pub struct Tree {
    pub(crate) grammar: Arc<dyn Grammar>,
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) root: NodeId,
    /// Byte ranges rewritten since this tree was built, in current
    /// coordinates. Consulted (with the grammar's lookahead margin) to
    /// refuse subtree reuse near an edit; emptied by the next parse.
    pub(crate) damage: Vec<TextRange>,
}

impl Tree {
    /// The top-level node, spanning the entire input as of the last parse.
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: self.root,
        }
    }

    /// Canonical parenthesized serialization: `(kind child*)`, children
    /// space-separated, leaves as `(kind)`. Two trees are equal for
    /// verification purposes iff their serializations are byte-identical.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root, &mut out);
        out
    }

    /// Whether any node was touched by an edit since this tree was built.
    pub fn has_changes(&self) -> bool {
        self.node_data(self.root).changed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn grammar(&self) -> &Arc<dyn Grammar> {
        &self.grammar
    }

    pub(crate) fn node_data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let data = self.node_data(id);
        out.push('(');
        out.push_str(self.symbol_name(data.kind));
        for &child in &data.children {
            let child_data = self.node_data(child);
            let visible = !child_data.children.is_empty()
                || child_data.kind.is_error()
                || self.grammar.is_visible(child_data.kind);
            if visible {
                out.push(' ');
                self.write_node(child, out);
            }
        }
        out.push(')');
    }

    fn symbol_name(&self, kind: SymbolId) -> &'static str {
        if kind.is_error() {
            "ERROR"
        } else {
            self.grammar.symbol_name(kind)
        }
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("grammar", &self.grammar.name())
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("damage", &self.damage)
            .finish()
    }
}

/// A borrowing handle onto one node of a [`Tree`].
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> Node<'t> {
    fn data(&self) -> &'t NodeData {
        self.tree.node_data(self.id)
    }

    pub fn kind_id(&self) -> SymbolId {
        self.data().kind
    }

    pub fn kind_name(&self) -> &'static str {
        self.tree.symbol_name(self.data().kind)
    }

    pub fn start(&self) -> Position {
        self.data().start
    }

    pub fn end(&self) -> Position {
        self.data().end
    }

    pub fn byte_range(&self) -> TextRange {
        TextRange::new(self.data().start.bytes, self.data().end.bytes)
    }

    /// True iff this node or a descendant was touched by an edit recorded
    /// since the tree was produced.
    pub fn has_changes(&self) -> bool {
        self.data().changed
    }

    pub fn is_error(&self) -> bool {
        self.data().kind.is_error()
    }

    pub fn is_leaf(&self) -> bool {
        self.data().children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        let id = *self.data().children.get(index)?;
        Some(Node {
            tree: self.tree,
            id,
        })
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'t>> + '_ {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }

    /// Canonical serialization of just this node's subtree.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        self.tree.write_node(self.id, &mut out);
        out
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}..{}",
            self.kind_name(),
            self.start(),
            self.end()
        )
    }
}

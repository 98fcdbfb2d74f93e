//! The parse session: the surface a grammar drives to build a tree.
//!
//! Token inspection and consumption, node building, error recovery, and -
//! the incremental heart of the engine - `try_reuse`, which splices an
//! undamaged subtree from the previous tree instead of re-deriving it.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use text_size::TextRange;
use tracing::{debug, trace};

use super::cursor::TextCursor;
use crate::base::Position;
use crate::grammar::{Grammar, SymbolId, Token};
use crate::input::Input;
use crate::tree::{NodeData, NodeId, Tree};

/// Reuse candidates drawn from the previous tree.
pub(crate) struct ReuseSource<'a> {
    tree: &'a Tree,
    /// Unchanged, non-empty nodes keyed by start byte, outermost first.
    by_start: FxHashMap<u32, Vec<NodeId>>,
    damage: Vec<TextRange>,
    margin: u32,
}

impl<'a> ReuseSource<'a> {
    pub(crate) fn new(tree: &'a Tree, margin: u32) -> Self {
        let mut by_start: FxHashMap<u32, Vec<NodeId>> = FxHashMap::default();
        // Walk the arena in document order; a parent lands in its start
        // bucket ahead of the children that share that start.
        let mut ids = vec![tree.root];
        while let Some(id) = ids.pop() {
            let data = tree.node_data(id);
            if !data.changed && data.end.bytes > data.start.bytes {
                by_start
                    .entry(u32::from(data.start.bytes))
                    .or_default()
                    .push(id);
            }
            for &child in data.children.iter().rev() {
                ids.push(child);
            }
        }
        Self {
            tree,
            by_start,
            damage: tree.damage.clone(),
            margin,
        }
    }

    /// A node is safe when its span, padded by the tokenizer's lookahead
    /// margin, clears every byte range rewritten since the tree was built.
    fn is_safe(&self, data: &NodeData) -> bool {
        let start = u32::from(data.start.bytes);
        let end = u32::from(data.end.bytes);
        for range in &self.damage {
            let damage_start = u32::from(range.start());
            let damage_end = u32::from(range.end());
            if start < damage_end && end + self.margin > damage_start {
                return false;
            }
        }
        true
    }
}

struct OpenNode {
    kind: SymbolId,
    open_pos: Position,
    children: Vec<NodeId>,
}

/// The parser state handed to [`Grammar::parse_root`].
pub struct ParseSession<'a> {
    grammar: &'a dyn Grammar,
    cursor: TextCursor<'a>,
    current: Option<Token>,
    nodes: Vec<NodeData>,
    stack: Vec<OpenNode>,
    reuse: Option<ReuseSource<'a>>,
    spliced: u32,
}

impl<'a> ParseSession<'a> {
    pub(crate) fn new(
        grammar: &'a dyn Grammar,
        input: &'a dyn Input,
        reuse: Option<ReuseSource<'a>>,
    ) -> Self {
        let cursor = TextCursor::new(input);
        let mut session = Self {
            grammar,
            cursor,
            current: None,
            nodes: Vec::new(),
            stack: Vec::new(),
            reuse,
            spliced: 0,
        };
        session.advance_token();
        session
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    /// The kind of the next significant token, or `None` at end of input.
    pub fn current(&self) -> Option<SymbolId> {
        self.current.map(|t| t.kind)
    }

    pub fn at(&self, kind: SymbolId) -> bool {
        self.current() == Some(kind)
    }

    pub fn at_eof(&self) -> bool {
        self.current.is_none()
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Consume the current token as a leaf node of its own kind.
    pub fn bump(&mut self) {
        if let Some(token) = self.current.take() {
            self.push_leaf(token.kind, token);
            self.advance_token();
        }
    }

    /// Consume the current token as a leaf node of a different kind.
    pub fn bump_as(&mut self, kind: SymbolId) {
        if let Some(token) = self.current.take() {
            self.push_leaf(kind, token);
            self.advance_token();
        }
    }

    pub fn eat(&mut self, kind: SymbolId) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Node building
    // =========================================================================

    pub fn start_node(&mut self, kind: SymbolId) {
        let open_pos = self
            .current
            .map(|t| t.start)
            .unwrap_or_else(|| self.cursor.position());
        self.stack.push(OpenNode {
            kind,
            open_pos,
            children: Vec::new(),
        });
    }

    pub fn finish_node(&mut self) {
        let Some(open) = self.stack.pop() else {
            return;
        };
        let (start, end) = match (open.children.first(), open.children.last()) {
            (Some(&first), Some(&last)) => (
                self.nodes[first.index()].start,
                self.nodes[last.index()].end,
            ),
            _ => (open.open_pos, open.open_pos),
        };
        let changed = open
            .children
            .iter()
            .any(|child| self.nodes[child.index()].changed);
        self.nodes.push(NodeData {
            kind: open.kind,
            start,
            end,
            changed,
            children: open.children,
        });
        let id = NodeId((self.nodes.len() - 1) as u32);
        self.attach(id);
    }

    /// Wrap tokens in an error node until one of `recovery` (or end of
    /// input) comes up, consuming at least one token to guarantee progress.
    pub fn error_recover(&mut self, recovery: &[SymbolId]) {
        self.start_node(SymbolId::ERROR);
        let mut consumed = false;
        while let Some(kind) = self.current() {
            if consumed && recovery.contains(&kind) {
                break;
            }
            self.bump();
            consumed = true;
        }
        self.finish_node();
    }

    // =========================================================================
    // Subtree reuse
    // =========================================================================

    /// Splice a subtree from the previous tree if one is available at the
    /// current position, acceptable to the grammar's resynchronization
    /// predicate, and clear of every edited region. Returns the kind of the
    /// spliced node.
    pub fn try_reuse(&mut self, kinds: &[SymbolId]) -> Option<SymbolId> {
        let token = self.current?;
        let (tree, found) = {
            let source = self.reuse.as_ref()?;
            let mut found = None;
            if let Some(candidates) = source.by_start.get(&u32::from(token.start.bytes)) {
                for &id in candidates {
                    let data = source.tree.node_data(id);
                    if self.grammar.resume_compatible(kinds, data.kind) && source.is_safe(data) {
                        found = Some(id);
                        break;
                    }
                }
            }
            (source.tree, found)
        };
        let id = found?;
        let (kind, end) = {
            let data = tree.node_data(id);
            (data.kind, data.end)
        };
        let copied = self.copy_subtree(tree, id);
        self.attach(copied);
        self.cursor.seek(end);
        self.current = None;
        self.advance_token();
        self.spliced += 1;
        trace!(
            kind = self.symbol_name(kind),
            start = u32::from(token.start.bytes),
            end = u32::from(end.bytes),
            "spliced subtree from previous tree"
        );
        Some(kind)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn symbol_name(&self, kind: SymbolId) -> &'static str {
        if kind.is_error() {
            "ERROR"
        } else {
            self.grammar.symbol_name(kind)
        }
    }

    fn advance_token(&mut self) {
        self.current = loop {
            match self.grammar.next_token(&mut self.cursor) {
                None => break None,
                Some(token) if self.grammar.is_trivia(token.kind) => continue,
                Some(token) => break Some(token),
            }
        };
    }

    fn push_leaf(&mut self, kind: SymbolId, token: Token) {
        self.nodes.push(NodeData {
            kind,
            start: token.start,
            end: token.end,
            changed: false,
            children: Vec::new(),
        });
        let id = NodeId((self.nodes.len() - 1) as u32);
        self.attach(id);
    }

    fn attach(&mut self, id: NodeId) {
        // With an empty stack the node is the root (or a candidate for it);
        // `finish` picks up the last one standing.
        if let Some(open) = self.stack.last_mut() {
            open.children.push(id);
        }
    }

    fn copy_subtree(&mut self, source: &Tree, id: NodeId) -> NodeId {
        let data = source.node_data(id);
        let children: Vec<NodeId> = data
            .children
            .iter()
            .map(|&child| self.copy_subtree(source, child))
            .collect();
        self.nodes.push(NodeData {
            kind: data.kind,
            start: data.start,
            end: data.end,
            changed: data.changed,
            children,
        });
        NodeId((self.nodes.len() - 1) as u32)
    }

    pub(crate) fn finish(mut self, grammar: Arc<dyn Grammar>) -> Tree {
        while !self.stack.is_empty() {
            self.finish_node();
        }
        let root = if self.nodes.is_empty() {
            let pos = self.cursor.position();
            self.nodes.push(NodeData {
                kind: grammar.root_symbol(),
                start: pos,
                end: pos,
                changed: false,
                children: Vec::new(),
            });
            NodeId(0)
        } else {
            NodeId((self.nodes.len() - 1) as u32)
        };

        // A well-formed grammar consumes every token; absorb stragglers so
        // a tree still comes out whole.
        while let Some(token) = self.current.take() {
            self.nodes.push(NodeData {
                kind: SymbolId::ERROR,
                start: token.start,
                end: token.end,
                changed: false,
                children: Vec::new(),
            });
            let id = NodeId((self.nodes.len() - 1) as u32);
            self.nodes[root.index()].children.push(id);
            self.advance_token();
        }

        // The root spans the entire input, leading and trailing trivia
        // included.
        let end = self.cursor.position();
        let root_data = &mut self.nodes[root.index()];
        root_data.start = Position::zero();
        root_data.end = end;

        debug!(
            grammar = grammar.name(),
            nodes = self.nodes.len(),
            spliced = self.spliced,
            "parse finished"
        );
        Tree {
            grammar,
            nodes: self.nodes,
            root,
            damage: Vec::new(),
        }
    }
}

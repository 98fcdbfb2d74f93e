//! The grammar capability: pluggable, opaque lexer/parser definitions.
//!
//! The engine never knows a language's syntax. A [`Grammar`] owns its token
//! definitions and its tree shapes, and drives a [`ParseSession`] to build
//! nodes; the engine owns positions, subtree reuse, and resynchronization.
//! Grammars are selected per document through an explicit
//! [`GrammarRegistry`] - there is no process-wide registry.

mod arithmetic;
mod json;
mod registry;

use std::sync::Arc;

use crate::base::Position;
use crate::parse::{ParseSession, TextCursor};

pub use arithmetic::Arithmetic;
pub use json::Json;
pub use registry::GrammarRegistry;

/// A grammar-defined node kind identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u16);

impl SymbolId {
    /// The engine-reserved kind for error nodes.
    pub const ERROR: SymbolId = SymbolId(u16::MAX);

    pub fn is_error(self) -> bool {
        self == Self::ERROR
    }
}

/// A lexed token with its kind and span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SymbolId,
    pub start: Position,
    pub end: Position,
}

/// One pluggable language: a tokenizer plus the rules that shape its tree.
///
/// Implementations are shared immutably behind an `Arc`; one grammar value
/// may serve many documents at once.
pub trait Grammar: Send + Sync {
    /// Registry key for this grammar.
    fn name(&self) -> &'static str;

    /// The kind of the tree's root node.
    fn root_symbol(&self) -> SymbolId;

    /// Human-readable name for a kind, used by canonical serialization.
    fn symbol_name(&self, symbol: SymbolId) -> &'static str;

    /// Tokens that never become nodes (whitespace and the like).
    fn is_trivia(&self, symbol: SymbolId) -> bool;

    /// Whether a leaf of this kind appears in the canonical serialization.
    fn is_visible(&self, _symbol: SymbolId) -> bool {
        true
    }

    /// How many bytes past a token's end the tokenizer may have examined
    /// before settling on it. Subtrees ending within this margin of an
    /// edited region are re-derived rather than reused.
    fn lookahead_margin(&self) -> u32 {
        1
    }

    /// The resynchronization predicate: may a previously parsed node of
    /// kind `candidate` stand in where the grammar is prepared to resume
    /// one of `expected`?
    fn resume_compatible(&self, expected: &[SymbolId], candidate: SymbolId) -> bool {
        expected.contains(&candidate)
    }

    /// Produce the next token at the cursor, or `None` at end of input.
    ///
    /// Unrecognized input must come back as a token of [`SymbolId::ERROR`]
    /// covering at least one byte, never as a failure that stops the parse.
    fn next_token(&self, cursor: &mut TextCursor<'_>) -> Option<Token>;

    /// Drive the session to build the whole tree. The implementation must
    /// open the root node first and consume every token.
    fn parse_root(&self, session: &mut ParseSession<'_>);
}

/// Lex one token through the cursor's chunked window.
///
/// `scan` tokenizes the front of a string slice and reports the token kind
/// and byte length. When the scanned token runs flush against the window
/// edge it might still extend, so the window is grown and the token lexed
/// again; this is what keeps results identical for every input chunk size.
pub fn lex_streaming(
    cursor: &mut TextCursor<'_>,
    scan: impl Fn(&str) -> (SymbolId, usize),
) -> Option<Token> {
    loop {
        let (kind, len, may_extend) = {
            let rest = cursor.rest();
            if rest.is_empty() {
                return None;
            }
            let (kind, len) = scan(rest);
            (kind, len, len == rest.len())
        };
        if may_extend && cursor.grow() {
            continue;
        }
        let start = cursor.position();
        cursor.advance(len);
        return Some(Token {
            kind,
            start,
            end: cursor.position(),
        });
    }
}

/// The built-in grammars, as `Arc`ed trait objects ready for a registry.
pub fn builtin_grammars() -> Vec<Arc<dyn Grammar>> {
    vec![Arc::new(Arithmetic) as Arc<dyn Grammar>, Arc::new(Json)]
}

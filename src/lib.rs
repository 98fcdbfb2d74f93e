//! # sprig
//!
//! An incremental parsing engine: position-tracked syntax trees, tree
//! edits, and minimal reparsing.
//!
//! Given a text buffer and a pluggable grammar, sprig produces a syntax
//! tree; when the buffer is edited it re-derives only the regions whose
//! structure could have changed, splicing the rest of the previous tree
//! into the new one. The incremental result is always identical to a
//! from-scratch parse of the current text.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! document  → façade binding one input, one grammar, one tree
//!   ↓
//! parse     → incremental parser: cursor, session, subtree reuse
//!   ↓
//! edit      → edit application: shifting, invalidation, damage
//!   ↓
//! tree      → arena syntax tree, serialization, invariants
//!   ↓
//! input     → input capability: chunked reads, edit log, undo
//!   ↓
//! grammar   → grammar capability, registry, built-in grammars
//!   ↓
//! base      → primitives (Point, Extent, Position)
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use sprig::{Arithmetic, Document};
//!
//! let mut doc = Document::with_text(Arc::new(Arithmetic), "1+2");
//! assert_eq!(doc.parse().serialize(), "(expr (num) (op) (num))");
//!
//! doc.edit(1, 0, "3").unwrap();
//! assert_eq!(doc.text(), "13+2");
//! assert_eq!(doc.parse().serialize(), "(expr (num) (op) (num))");
//!
//! doc.undo().unwrap();
//! assert_eq!(doc.parse().serialize(), "(expr (num) (op) (num))");
//! ```

// ============================================================================
// MODULES (dependency order: base → grammar → input → tree → edit → parse)
// ============================================================================

/// Foundation types: Point, Extent, Position
pub mod base;

/// Errors surfaced by document editing
pub mod error;

/// Grammar capability: trait, registry, built-in grammars
pub mod grammar;

/// Input capability: chunked reads, edit log, undo
pub mod input;

/// Arena syntax tree, canonical serialization, invariant checking
pub mod tree;

/// Edit application: position shifting, invalidation, damaged ranges
pub mod edit;

/// Incremental parser: text cursor, parse session, subtree reuse
pub mod parse;

/// Document façade
pub mod document;

// Re-export the commonly needed surface
pub use base::{Extent, Point, Position};
pub use document::Document;
pub use edit::InputEdit;
pub use error::EditError;
pub use grammar::{Arithmetic, Grammar, GrammarRegistry, Json, SymbolId, Token};
pub use input::{Input, TextInput};
pub use parse::{ParseSession, TextCursor, parse};
pub use tree::{InvariantViolation, Node, Tree};

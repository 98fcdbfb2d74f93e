//! Shared helpers for the integration suites.

#![allow(dead_code)]

use std::sync::Arc;

use sprig::tree::invariants;
use sprig::{Document, Grammar, GrammarRegistry, Tree};

/// Look up a built-in grammar, panicking on a bad name.
pub fn grammar(name: &str) -> Arc<dyn Grammar> {
    GrammarRegistry::with_builtin()
        .get(name)
        .unwrap_or_else(|| panic!("no built-in grammar named {name:?}"))
}

/// Serialize a from-scratch parse of `text`: the ground truth every
/// incremental result must match.
pub fn scratch_parse(grammar: Arc<dyn Grammar>, text: &str) -> String {
    let mut doc = Document::with_text(grammar, text);
    doc.parse().serialize()
}

/// Recursively validate the structural invariants over the whole tree.
pub fn assert_consistent(tree: &Tree) {
    if let Err(violation) = invariants::check(tree) {
        panic!("inconsistent tree {}: {violation}", tree.serialize());
    }
}

/// Parse the document and check the result against a from-scratch parse of
/// the same text, returning the serialization.
pub fn parse_and_verify(doc: &mut Document) -> String {
    let grammar = Arc::clone(doc.grammar());
    let text = doc.text();
    let tree = doc.parse();
    assert_consistent(tree);
    assert!(
        !tree.has_changes(),
        "freshly parsed tree still reports changes"
    );
    let serialized = tree.serialize();
    let expected = scratch_parse(grammar, &text);
    assert_eq!(
        serialized, expected,
        "incremental parse of {text:?} diverged from a full parse"
    );
    serialized
}

//! Whole-tree structural validation.
//!
//! Checks every node, not a sample: span ordering in both coordinate
//! systems, sibling ordering, parent containment, and upward propagation
//! of the changed flag. A correct engine never produces a violation; this
//! exists for tests and debug assertions.

use thiserror::Error;

use super::{NodeId, Tree};
use crate::base::Position;

/// A structural invariant broken somewhere in a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("node `{kind}` starts at {start} but ends at {end}")]
    StartAfterEnd {
        kind: String,
        start: String,
        end: String,
    },

    #[error("node `{kind}`: child {index} starts at {start}, before its previous sibling ends at {prev_end}")]
    SiblingOverlap {
        kind: String,
        index: usize,
        start: String,
        prev_end: String,
    },

    #[error("node `{kind}`: child {index} (`{child_kind}`) escapes its parent's span")]
    ChildEscapesParent {
        kind: String,
        child_kind: String,
        index: usize,
    },

    #[error("node `{kind}` has a changed child but is not marked changed")]
    UnpropagatedChange { kind: String },
}

/// Both orderings must agree that `a` does not come after `b`.
fn ordered(a: Position, b: Position) -> bool {
    a.bytes <= b.bytes && a.point <= b.point
}

/// Validate every invariant over the whole tree.
pub fn check(tree: &Tree) -> Result<(), InvariantViolation> {
    check_node(tree.root())
}

fn check_node(node: super::Node<'_>) -> Result<(), InvariantViolation> {
    if !ordered(node.start(), node.end()) {
        return Err(InvariantViolation::StartAfterEnd {
            kind: node.kind_name().to_owned(),
            start: node.start().to_string(),
            end: node.end().to_string(),
        });
    }

    let mut prev_end: Option<Position> = None;
    for (index, child) in node.children().enumerate() {
        if !ordered(node.start(), child.start()) || !ordered(child.end(), node.end()) {
            return Err(InvariantViolation::ChildEscapesParent {
                kind: node.kind_name().to_owned(),
                child_kind: child.kind_name().to_owned(),
                index,
            });
        }
        if let Some(prev) = prev_end {
            if !ordered(prev, child.start()) {
                return Err(InvariantViolation::SiblingOverlap {
                    kind: node.kind_name().to_owned(),
                    index,
                    start: child.start().to_string(),
                    prev_end: prev.to_string(),
                });
            }
        }
        prev_end = Some(child.end());

        if child.has_changes() && !node.has_changes() {
            return Err(InvariantViolation::UnpropagatedChange {
                kind: node.kind_name().to_owned(),
            });
        }

        check_node(child)?;
    }

    Ok(())
}

/// Iterate every node id in document (pre-)order. Used by tests that want
/// to make assertions over the full arena.
pub(crate) fn preorder(tree: &Tree) -> Vec<NodeId> {
    let mut out = Vec::with_capacity(tree.node_count());
    let mut stack = vec![tree.root];
    while let Some(id) = stack.pop() {
        out.push(id);
        for &child in tree.node_data(id).children.iter().rev() {
            stack.push(child);
        }
    }
    out
}

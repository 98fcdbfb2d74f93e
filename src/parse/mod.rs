//! The incremental parser.
//!
//! `parse` reconciles an edited buffer against the previous tree: regions
//! the edits could not have touched are spliced in wholesale, everything
//! else is re-derived through the grammar. The result is required to be
//! exactly the tree a from-scratch parse of the current text would produce;
//! incrementality is never observable in the output.

mod cursor;
mod session;

use std::sync::Arc;

use tracing::debug;

use crate::grammar::Grammar;
use crate::input::Input;
use crate::tree::Tree;

pub use cursor::TextCursor;
pub use session::ParseSession;

use session::ReuseSource;

/// Produce a tree for the input's current contents.
///
/// With no previous tree a full parse runs from byte zero. With an
/// undamaged previous tree the previous snapshot is returned as-is. With a
/// damaged previous tree the grammar re-derives from the damaged regions
/// outward, resynchronizing with reusable subtrees where it can; in the
/// worst case this degrades to a full re-parse.
pub fn parse(grammar: &Arc<dyn Grammar>, input: &dyn Input, previous: Option<&Tree>) -> Tree {
    if let Some(previous) = previous {
        if previous.damage.is_empty() {
            debug!(
                grammar = grammar.name(),
                "no edits since last parse, returning snapshot"
            );
            return previous.clone();
        }
    }
    let reuse = previous.map(|tree| ReuseSource::new(tree, grammar.lookahead_margin()));
    let mut session = ParseSession::new(grammar.as_ref(), input, reuse);
    grammar.parse_root(&mut session);
    session.finish(Arc::clone(grammar))
}

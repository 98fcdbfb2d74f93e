//! The document façade: one input, one grammar, one current tree.

use std::sync::Arc;

use text_size::TextSize;
use tracing::trace;

use crate::edit;
use crate::error::EditError;
use crate::grammar::Grammar;
use crate::input::{Input, TextInput};
use crate::parse;
use crate::tree::Tree;

/// A parsed, editable text document.
///
/// A document is owned and driven by exactly one logical caller: `edit`
/// records a change against the input and corrects the current tree,
/// `parse` produces a fresh tree reflecting every edit issued so far.
pub struct Document {
    grammar: Arc<dyn Grammar>,
    input: Box<dyn Input>,
    tree: Option<Tree>,
    edit_count: u64,
}

impl Document {
    pub fn new(grammar: Arc<dyn Grammar>, input: Box<dyn Input>) -> Self {
        Self {
            grammar,
            input,
            tree: None,
            edit_count: 0,
        }
    }

    /// Convenience constructor over an in-memory [`TextInput`].
    pub fn with_text(grammar: Arc<dyn Grammar>, text: impl Into<String>) -> Self {
        Self::new(grammar, Box::new(TextInput::new(text)))
    }

    /// Replace `deleted_len` bytes at `position` with `inserted`.
    ///
    /// Records the change against the input and corrects the current
    /// tree's positions and changed flags. Does not reparse.
    pub fn edit(
        &mut self,
        position: usize,
        deleted_len: usize,
        inserted: &str,
    ) -> Result<(), EditError> {
        let out_of_range = || EditError::OutOfRange {
            position,
            deleted: deleted_len,
            len: usize::from(self.input.len()),
        };
        let position = TextSize::try_from(position).map_err(|_| out_of_range())?;
        let deleted_len = TextSize::try_from(deleted_len).map_err(|_| out_of_range())?;
        let input_edit = self.input.record_edit(position, deleted_len, inserted)?;
        if let Some(tree) = self.tree.as_mut() {
            let damaged = edit::apply(tree, &input_edit);
            trace!(?damaged, "tree corrected for edit");
        }
        self.edit_count += 1;
        Ok(())
    }

    /// Reverse the most recent edit, routing the inverse through the same
    /// tree-correction path as a forward edit.
    pub fn undo(&mut self) -> Result<(), EditError> {
        let input_edit = self.input.record_undo().ok_or(EditError::NothingToUndo)?;
        if let Some(tree) = self.tree.as_mut() {
            edit::apply(tree, &input_edit);
        }
        self.edit_count += 1;
        Ok(())
    }

    /// Parse the current text, replacing the document's tree.
    ///
    /// Reflects every edit issued before the call and none after.
    /// Idempotent: calling twice with no intervening edit yields trees
    /// serializing identically.
    pub fn parse(&mut self) -> &Tree {
        let tree = parse::parse(&self.grammar, self.input.as_ref(), self.tree.as_ref());
        self.tree.insert(tree)
    }

    /// The current tree, absent before the first parse.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// The current text, assembled through the input's chunked reads.
    pub fn text(&self) -> String {
        self.input.contents()
    }

    pub fn len(&self) -> usize {
        usize::from(self.input.len())
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// How many edits (undos included) have been recorded.
    pub fn edit_count(&self) -> u64 {
        self.edit_count
    }

    pub fn grammar(&self) -> &Arc<dyn Grammar> {
        &self.grammar
    }
}

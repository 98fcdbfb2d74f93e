//! Errors surfaced by document editing.

use thiserror::Error;

/// Reasons an edit request can be rejected.
///
/// Rejection happens before any mutation: the buffer and the tree are left
/// exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The edited range extends past the end of the buffer.
    #[error("edit at byte {position} deleting {deleted} bytes exceeds buffer length {len}")]
    OutOfRange {
        position: usize,
        deleted: usize,
        len: usize,
    },

    /// Undo was requested with no recorded edit left to reverse.
    #[error("no recorded edit to undo")]
    NothingToUndo,
}

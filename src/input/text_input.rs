//! String-backed reference implementation of the input capability.

use smol_str::SmolStr;
use text_size::TextSize;

use super::Input;
use crate::base::{Extent, Point, Position};
use crate::edit::InputEdit;
use crate::error::EditError;

/// One entry in the undo log: enough to reconstruct the exact inverse.
#[derive(Debug, Clone)]
struct EditRecord {
    position: TextSize,
    deleted: SmolStr,
    inserted: SmolStr,
}

/// An in-memory text buffer with a configurable read chunk size and an
/// edit log for undo.
///
/// The chunk size exists to exercise consumers: parsing through one-byte
/// chunks must produce the same tree as reading the whole buffer at once.
#[derive(Debug, Clone)]
pub struct TextInput {
    text: String,
    chunk_size: usize,
    log: Vec<EditRecord>,
}

impl TextInput {
    /// A buffer that serves reads as large as callers ask for.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_chunk_size(text, usize::MAX)
    }

    /// A buffer that serves reads at most `chunk_size` bytes at a time.
    pub fn with_chunk_size(text: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            text: text.into(),
            chunk_size: chunk_size.max(1),
            log: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// How many recorded edits are available to undo.
    pub fn undo_depth(&self) -> usize {
        self.log.len()
    }

    fn splice(&mut self, position: TextSize, deleted_len: TextSize, inserted: &str) -> InputEdit {
        let start_usize = usize::from(position);
        let end_usize = usize::from(position + deleted_len);
        let start = self.position_at(position);
        let old_end = self.position_at(position + deleted_len);
        self.text.replace_range(start_usize..end_usize, inserted);
        InputEdit {
            start,
            old_end,
            new_end: start.advanced_by(inserted),
        }
    }

    fn in_bounds(&self, position: TextSize, deleted_len: TextSize) -> bool {
        let end = usize::from(position) + usize::from(deleted_len);
        end <= self.text.len()
            && self.text.is_char_boundary(usize::from(position))
            && self.text.is_char_boundary(end)
    }
}

impl Input for TextInput {
    fn len(&self) -> TextSize {
        TextSize::of(&self.text)
    }

    fn read(&self, offset: TextSize, max_len: usize) -> &str {
        let start = usize::from(offset);
        if start >= self.text.len() {
            return "";
        }
        debug_assert!(self.text.is_char_boundary(start));
        let want = max_len.min(self.chunk_size);
        let mut end = start.saturating_add(want).min(self.text.len());
        while end > start && !self.text.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            // Chunk smaller than one character: round up to a whole one.
            end = start + 1;
            while end < self.text.len() && !self.text.is_char_boundary(end) {
                end += 1;
            }
        }
        &self.text[start..end]
    }

    fn position_at(&self, offset: TextSize) -> Position {
        let prefix = &self.text[..usize::from(offset)];
        Position {
            bytes: offset,
            point: Point::zero() + Extent::of(prefix),
        }
    }

    fn record_edit(
        &mut self,
        position: TextSize,
        deleted_len: TextSize,
        inserted: &str,
    ) -> Result<InputEdit, EditError> {
        if !self.in_bounds(position, deleted_len) {
            return Err(EditError::OutOfRange {
                position: usize::from(position),
                deleted: usize::from(deleted_len),
                len: self.text.len(),
            });
        }
        let deleted_text = SmolStr::new(
            &self.text[usize::from(position)..usize::from(position + deleted_len)],
        );
        let edit = self.splice(position, deleted_len, inserted);
        self.log.push(EditRecord {
            position,
            deleted: deleted_text,
            inserted: SmolStr::new(inserted),
        });
        Ok(edit)
    }

    fn record_undo(&mut self) -> Option<InputEdit> {
        let record = self.log.pop()?;
        let inserted_len = TextSize::of(record.inserted.as_str());
        Some(self.splice(record.position, inserted_len, record.deleted.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunked_reads_reassemble_the_text() {
        for chunk_size in [1, 3, usize::MAX] {
            let input = TextInput::with_chunk_size("hello\nworld", chunk_size);
            assert_eq!(input.contents(), "hello\nworld");
        }
    }

    #[test]
    fn read_never_exceeds_the_chunk_size() {
        let input = TextInput::with_chunk_size("abcdef", 3);
        assert_eq!(input.read(TextSize::new(0), usize::MAX), "abc");
        assert_eq!(input.read(TextSize::new(3), 2), "de");
        assert_eq!(input.read(TextSize::new(5), usize::MAX), "f");
        assert_eq!(input.read(TextSize::new(6), usize::MAX), "");
    }

    #[test]
    fn one_byte_chunks_round_up_over_multibyte_chars() {
        let input = TextInput::with_chunk_size("aéb", 1);
        assert_eq!(input.read(TextSize::new(0), usize::MAX), "a");
        assert_eq!(input.read(TextSize::new(1), usize::MAX), "é");
        assert_eq!(input.read(TextSize::new(3), usize::MAX), "b");
    }

    #[test]
    fn position_at_counts_rows_and_columns() {
        let input = TextInput::new("ab\ncd\n");
        let pos = input.position_at(TextSize::new(4));
        assert_eq!(pos.point, Point::new(1, 1));
        let end = input.position_at(input.len());
        assert_eq!(end.point, Point::new(2, 0));
    }

    #[test]
    fn record_edit_returns_both_coordinate_systems() {
        let mut input = TextInput::new("ab\ncd");
        let edit = input
            .record_edit(TextSize::new(3), TextSize::new(2), "xyz\n")
            .expect("edit in bounds");
        assert_eq!(input.text(), "ab\nxyz\n");
        assert_eq!(edit.start.point, Point::new(1, 0));
        assert_eq!(edit.old_end.point, Point::new(1, 2));
        assert_eq!(edit.new_end.point, Point::new(2, 0));
    }

    #[test]
    fn out_of_range_edit_leaves_the_buffer_alone() {
        let mut input = TextInput::new("abc");
        let err = input
            .record_edit(TextSize::new(2), TextSize::new(5), "x")
            .expect_err("out of range");
        assert_eq!(
            err,
            EditError::OutOfRange {
                position: 2,
                deleted: 5,
                len: 3
            }
        );
        assert_eq!(input.text(), "abc");
    }

    #[test]
    fn undo_restores_the_previous_text() {
        let mut input = TextInput::new("1+2");
        input
            .record_edit(TextSize::new(1), TextSize::new(0), "3")
            .expect("edit");
        assert_eq!(input.text(), "13+2");
        let inverse = input.record_undo().expect("one edit to undo");
        assert_eq!(input.text(), "1+2");
        assert_eq!(u32::from(inverse.start.bytes), 1);
        assert_eq!(u32::from(inverse.old_end.bytes), 2);
        assert_eq!(u32::from(inverse.new_end.bytes), 1);
        assert!(input.record_undo().is_none());
    }

    #[test]
    fn undo_stacks_in_reverse_order() {
        let mut input = TextInput::new("abc");
        input
            .record_edit(TextSize::new(0), TextSize::new(1), "X")
            .expect("edit");
        input
            .record_edit(TextSize::new(2), TextSize::new(1), "YZ")
            .expect("edit");
        assert_eq!(input.text(), "XbYZ");
        input.record_undo().expect("undo second");
        assert_eq!(input.text(), "Xbc");
        input.record_undo().expect("undo first");
        assert_eq!(input.text(), "abc");
    }
}

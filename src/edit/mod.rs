//! The edit engine: keeping a tree honest about a buffer it no longer
//! matches.
//!
//! Applying an edit shifts every position at or after the edited region (in
//! both coordinate systems), marks overlapping nodes changed, propagates
//! the flag upward, and records the rewritten byte range so the next parse
//! refuses to reuse subtrees whose tokens could have merged with the new
//! text.

use text_size::{TextRange, TextSize};
use tracing::trace;

use crate::base::Position;
use crate::tree::{NodeId, Tree};

/// One buffer mutation, described in both coordinate systems.
///
/// `start..old_end` is the replaced span of the old buffer; `start..new_end`
/// is the span the replacement occupies in the new buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEdit {
    pub start: Position,
    pub old_end: Position,
    pub new_end: Position,
}

impl InputEdit {
    /// Rebase a position from the old buffer's coordinates into the new
    /// buffer's.
    ///
    /// Positions at or before the edit stay put; positions at or after the
    /// replaced span shift by the edit's delta; positions inside the
    /// replaced span collapse onto its new end.
    pub fn adjust(&self, pos: Position) -> Position {
        if pos.bytes >= self.old_end.bytes {
            let (bytes, extent) = pos.offset_from(self.old_end);
            self.new_end.offset_by(bytes, extent)
        } else if pos.bytes > self.start.bytes {
            self.new_end
        } else {
            pos
        }
    }

    fn adjust_byte(&self, offset: TextSize) -> TextSize {
        if offset >= self.old_end.bytes {
            self.new_end.bytes + (offset - self.old_end.bytes)
        } else if offset > self.start.bytes {
            self.new_end.bytes
        } else {
            offset
        }
    }
}

/// Apply an edit to a tree, returning the minimal damaged range: the
/// corrected span of the deepest node that was marked changed and contains
/// the whole replaced region.
pub fn apply(tree: &mut Tree, edit: &InputEdit) -> TextRange {
    // Previously recorded unsafe ranges move with the text they cover.
    for range in &mut tree.damage {
        *range = TextRange::new(edit.adjust_byte(range.start()), edit.adjust_byte(range.end()));
    }

    let root = tree.root;
    let mut damaged: Option<NodeId> = None;
    apply_to_node(tree, root, edit, &mut damaged);

    tree.damage
        .push(TextRange::new(edit.start.bytes, edit.new_end.bytes));
    coalesce(&mut tree.damage);

    let damaged_range = match damaged {
        Some(id) => {
            let data = tree.node_data(id);
            TextRange::new(data.start.bytes, data.end.bytes)
        }
        None => TextRange::new(edit.start.bytes, edit.new_end.bytes),
    };
    trace!(
        start = u32::from(edit.start.bytes),
        old_end = u32::from(edit.old_end.bytes),
        new_end = u32::from(edit.new_end.bytes),
        ?damaged_range,
        "applied edit to tree"
    );
    damaged_range
}

fn apply_to_node(
    tree: &mut Tree,
    id: NodeId,
    edit: &InputEdit,
    damaged: &mut Option<NodeId>,
) -> bool {
    let (start, end, children) = {
        let data = tree.node_data(id);
        (data.start, data.end, data.children.clone())
    };

    // Entirely before the edit: a node ending exactly at an insertion
    // point does not overlap it.
    if end.bytes <= edit.start.bytes {
        return tree.node_data(id).changed;
    }

    let overlaps = start.bytes < edit.old_end.bytes && end.bytes > edit.start.bytes;
    let contains = start.bytes <= edit.start.bytes && end.bytes >= edit.old_end.bytes;
    if overlaps && contains {
        // Children that also qualify will overwrite this; the deepest
        // qualifying node wins.
        *damaged = Some(id);
    }

    let mut child_changed = false;
    for child in children {
        child_changed |= apply_to_node(tree, child, edit, damaged);
    }

    let data = tree.node_data_mut(id);
    data.start = edit.adjust(start);
    data.end = edit.adjust(end);
    data.changed = data.changed || overlaps || child_changed;
    data.changed
}

fn coalesce(ranges: &mut Vec<TextRange>) {
    ranges.sort_by_key(|r| (r.start(), r.end()));
    let mut merged: Vec<TextRange> = Vec::with_capacity(ranges.len());
    for &range in ranges.iter() {
        match merged.last_mut() {
            Some(last) if range.start() <= last.end() => {
                *last = TextRange::new(last.start(), last.end().max(range.end()));
            }
            _ => merged.push(range),
        }
    }
    *ranges = merged;
}

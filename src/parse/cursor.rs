//! Chunk-independent text access for tokenizers.
//!
//! The input capability hands out chunks of any size it likes, down to one
//! byte. The cursor accumulates them into a contiguous window so a grammar
//! can tokenize against ordinary string slices, growing the window whenever
//! a token runs flush against its edge.

use text_size::TextSize;

use crate::base::Position;
use crate::input::Input;

/// How many bytes to request from the input per refill.
const REQUEST: usize = 1024;

/// A forward-only reader over an [`Input`], tracking its position in both
/// coordinate systems.
pub struct TextCursor<'a> {
    input: &'a dyn Input,
    len: TextSize,
    window: String,
    pos: Position,
}

impl<'a> TextCursor<'a> {
    pub fn new(input: &'a dyn Input) -> Self {
        Self {
            input,
            len: input.len(),
            window: String::new(),
            pos: Position::zero(),
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn offset(&self) -> TextSize {
        self.pos.bytes
    }

    pub fn at_end(&self) -> bool {
        self.pos.bytes >= self.len
    }

    /// The unconsumed front of the window, filled on demand. Empty only at
    /// end of input.
    pub fn rest(&mut self) -> &str {
        let offset = usize::from(self.pos.bytes);
        if self.window.len() <= offset {
            self.fill_to(offset + REQUEST);
        }
        &self.window[offset..]
    }

    /// Pull more text into the window. Returns false at end of input.
    pub fn grow(&mut self) -> bool {
        let before = self.window.len();
        self.fill_to(before + REQUEST);
        self.window.len() > before
    }

    /// Consume `len` bytes, updating the position in both dimensions.
    pub fn advance(&mut self, len: usize) {
        let offset = usize::from(self.pos.bytes);
        let consumed = &self.window[offset..offset + len];
        self.pos = self.pos.advanced_by(consumed);
    }

    /// Jump forward to a known position (the end of a spliced subtree).
    pub fn seek(&mut self, to: Position) {
        debug_assert!(to.bytes >= self.pos.bytes, "cursor only moves forward");
        self.fill_to(usize::from(to.bytes));
        self.pos = to;
    }

    fn fill_to(&mut self, target: usize) {
        let target = target.min(usize::from(self.len));
        while self.window.len() < target {
            let offset = TextSize::new(self.window.len() as u32);
            let chunk = self.input.read(offset, target - self.window.len());
            if chunk.is_empty() {
                break;
            }
            self.window.push_str(chunk);
        }
    }
}

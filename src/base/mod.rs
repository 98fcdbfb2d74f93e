//! Foundation types for the sprig engine.
//!
//! This module provides the two-dimensional position model used throughout
//! the crate:
//! - [`Point`] - row/column coordinates (columns measured in bytes)
//! - [`Extent`] - the relative size of a span of text in both dimensions
//! - [`Position`] - a byte offset paired with its [`Point`]
//!
//! This module has NO dependencies on other sprig modules.

mod position;

pub use position::{Extent, Point, Position};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};

//! # Source Span
//!
//! Byte ranges into the program text. Every token, AST node and diagnostic
//! carries one; the path resolver and the editor adapters work in them.
//!
//! ```rust
//! use kcl_parser::Span;
//!
//! let source = "const w = 4";
//! let name = Span::new(6, 7);
//! assert_eq!(name.slice(source), Some("w"));
//! assert!(name.contains(6) && !name.contains(7));
//! ```

use serde::{Deserialize, Serialize};

/// Half-open byte range `start..end` with `start <= end`.
///
/// [`Span::new`] clamps an inverted range to an empty span at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted span {start}..{end}");
        Self {
            start,
            end: end.max(start),
        }
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// `true` when `offset` falls inside the half-open range.
    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// `true` when `other` lies entirely inside this span.
    #[inline]
    pub fn encloses(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Text of `source` under this span, or `None` when the span is out of
    /// bounds or splits a character.
    pub fn slice<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.start..self.end)
    }
}

/// Anything that knows its own source range.
pub trait Spanned {
    fn span(&self) -> Span;
}

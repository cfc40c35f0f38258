//! # Line Index
//!
//! Conversion between byte offsets (used by every pipeline span) and LSP
//! positions (zero-based line, UTF-16 column).

use kcl_parser::Span;
use tower_lsp::lsp_types::{Position, Range};

/// Line-start table for one text.
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    /// Position of byte `offset`, clamped to the text and to a char boundary.
    pub fn position(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let character = self.text[self.line_starts[line]..offset].encode_utf16().count();
        Position::new(line as u32, character as u32)
    }

    pub fn range(&self, span: Span) -> Range {
        Range::new(self.position(span.start()), self.position(span.end()))
    }

    /// Range covering the whole text.
    pub fn full_range(&self) -> Range {
        Range::new(Position::new(0, 0), self.position(self.text.len()))
    }

    /// Byte offset of `position`, if it lies inside the text.
    pub fn offset(&self, position: Position) -> Option<usize> {
        let start = *self.line_starts.get(position.line as usize)?;
        let end = self
            .line_starts
            .get(position.line as usize + 1)
            .map_or(self.text.len(), |next| next - 1);
        let mut units = 0;
        for (i, c) in self.text[start..end].char_indices() {
            if units >= position.character as usize {
                return Some(start + i);
            }
            units += c.len_utf16();
        }
        (units >= position.character as usize).then_some(end)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_across_lines() {
        let index = LineIndex::new("const a = 1\nconst b = 2\n");
        assert_eq!(index.position(0), Position::new(0, 0));
        assert_eq!(index.position(6), Position::new(0, 6));
        assert_eq!(index.position(12), Position::new(1, 0));
        assert_eq!(index.position(18), Position::new(1, 6));
        assert_eq!(index.position(24), Position::new(2, 0));
    }

    #[test]
    fn test_position_counts_utf16_units() {
        let text = "const s = 'é𝄞' x";
        let index = LineIndex::new(text);
        let x = text.find('x').unwrap();
        // 'é' is one UTF-16 unit, '𝄞' is two.
        assert_eq!(index.position(x), Position::new(0, 15));
        // Inside a multi-byte char: clamped back to its start.
        let inside = text.find('é').unwrap() + 1;
        assert_eq!(index.position(inside), Position::new(0, 11));
    }

    #[test]
    fn test_range_and_full_range() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(
            index.range(Span::new(1, 4)),
            Range::new(Position::new(0, 1), Position::new(1, 1))
        );
        assert_eq!(index.full_range().end, Position::new(1, 2));
    }

    #[test]
    fn test_offset_inverts_position() {
        let text = "const a = 1\nconst é = a";
        let index = LineIndex::new(text);
        for offset in text.char_indices().map(|(i, _)| i) {
            assert_eq!(index.offset(index.position(offset)), Some(offset), "offset {offset}");
        }
        assert_eq!(index.offset(Position::new(0, 11)), Some(11));
        assert_eq!(index.offset(Position::new(0, 40)), None);
        assert_eq!(index.offset(Position::new(5, 0)), None);
    }
}

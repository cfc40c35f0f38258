//! # Character Cursor
//!
//! Walks the source one `char` at a time while tracking the byte offset the
//! lexer turns into spans.

// =============================================================================
// CURSOR
// =============================================================================

/// Character cursor with byte offset tracking.
///
/// ## Example
///
/// ```rust
/// use kcl_parser::lexer::Cursor;
///
/// let mut cursor = Cursor::new("xLine");
/// assert_eq!(cursor.advance(), Some('x'));
/// assert_eq!(cursor.position(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    byte: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, byte: 0 }
    }

    /// Byte offset of the next character.
    pub fn position(&self) -> usize {
        self.byte
    }

    pub fn is_eof(&self) -> bool {
        self.byte >= self.source.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// One character of lookahead past [`Cursor::peek`], for `//`, `/*`
    /// and the fraction of `1.5`.
    pub fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Consume one character.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.byte += c.len_utf8();
        Some(c)
    }

    /// Consume the current character if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume characters while `predicate` holds.
    pub fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.advance();
        }
    }

    /// Source text between `start` and the current position.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.byte]
    }

    fn rest(&self) -> &'a str {
        &self.source[self.byte..]
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_at_end() {
        let mut cursor = Cursor::new("");
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_cursor_lookahead() {
        let cursor = Cursor::new("//x");
        assert_eq!(cursor.peek(), Some('/'));
        assert_eq!(cursor.peek_next(), Some('/'));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_cursor_eat() {
        let mut cursor = Cursor::new("|>");
        assert!(cursor.eat('|'));
        assert!(!cursor.eat('|'));
        assert!(cursor.eat('>'));
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_cursor_scans_identifier() {
        let mut cursor = Cursor::new("xLine2(");
        cursor.advance_while(|c| c.is_ascii_alphanumeric());
        assert_eq!(cursor.slice_from(0), "xLine2");
        assert_eq!(cursor.peek(), Some('('));
    }

    #[test]
    fn test_cursor_offsets_are_bytes() {
        let mut cursor = Cursor::new("'é'");
        cursor.advance();
        assert_eq!(cursor.advance(), Some('é'));
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.slice_from(1), "é");
    }
}

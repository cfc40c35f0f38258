//! # KCL Lexer
//!
//! Tokenizes KCL source code into tokens with exact byte ranges.
//!
//! The lexer is a resumable iterator: each call to `next` scans exactly one
//! token, so callers can stop and continue at any token boundary. The
//! cooperative [`lex_async`] variant is built on that and yields to the tokio
//! scheduler between tokens.
//!
//! ## Example
//!
//! ```rust
//! use kcl_parser::lexer::{lex, TokenKind};
//!
//! let tokens = lex("line([1, 1], %)").unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Identifier);
//! assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
//! ```

mod cursor;
mod token;

pub use cursor::Cursor;
pub use token::{Token, TokenKind};

use crate::error::LexError;
use crate::span::Span;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Tokenize the entire source.
///
/// ## Returns
///
/// Every token in order followed by a single [`TokenKind::Eof`] marker, or the
/// first lexical error.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Cooperative variant of [`lex`].
///
/// Yields to the scheduler every [`config::constants::LEXER_YIELD_INTERVAL`]
/// tokens. Produces exactly the same tokens as [`lex`].
///
/// ## Example
///
/// ```rust
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let tokens = kcl_parser::lexer::lex_async("const x = 1").await.unwrap();
/// assert_eq!(tokens, kcl_parser::lexer::lex("const x = 1").unwrap());
/// # });
/// ```
#[cfg(feature = "async")]
pub async fn lex_async(source: &str) -> Result<Vec<Token>, LexError> {
    lex_async_with_interval(source, config::constants::LEXER_YIELD_INTERVAL).await
}

/// Cooperative lexing with an explicit yield interval (in tokens).
///
/// An interval of zero is treated as one.
#[cfg(feature = "async")]
pub async fn lex_async_with_interval(
    source: &str,
    interval: usize,
) -> Result<Vec<Token>, LexError> {
    let interval = interval.max(1);
    let mut tokens = Vec::new();
    for token in Lexer::new(source) {
        tokens.push(token?);
        if tokens.len() % interval == 0 {
            tokio::task::yield_now().await;
        }
    }
    Ok(tokens)
}

/// Decode the value of a string token.
///
/// Strips the surrounding quotes and resolves escapes. The lexer has already
/// rejected unknown escapes, so any that remain are kept verbatim.
///
/// ## Example
///
/// ```rust
/// use kcl_parser::lexer::unescape;
///
/// assert_eq!(unescape(r#""a\"b""#), "a\"b");
/// assert_eq!(unescape("'yo'"), "yo");
/// ```
pub fn unescape(raw: &str) -> String {
    let inner = raw
        .get(1..raw.len().saturating_sub(1))
        .unwrap_or_default();
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped) => match escape_value(escaped) {
                Some(resolved) => value.push(resolved),
                None => {
                    value.push('\\');
                    value.push(escaped);
                }
            },
            None => value.push('\\'),
        }
    }
    value
}

fn escape_value(c: char) -> Option<char> {
    Some(match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        '\\' => '\\',
        '"' => '"',
        '\'' => '\'',
        _ => return None,
    })
}

// =============================================================================
// LEXER
// =============================================================================

/// KCL lexer.
///
/// Converts source text into a stream of tokens. As an iterator it yields
/// `Ok` tokens up to and including `Eof`, or stops after the first `Err`.
///
/// ## Example
///
/// ```rust
/// use kcl_parser::lexer::{Lexer, TokenKind};
///
/// let mut lexer = Lexer::new("x |> f(%)");
/// assert_eq!(lexer.next().unwrap().unwrap().kind, TokenKind::Identifier);
/// assert_eq!(lexer.next().unwrap().unwrap().kind, TokenKind::PipeGt);
/// ```
pub struct Lexer<'a> {
    /// Character cursor.
    cursor: Cursor<'a>,
    /// Set once Eof or an error has been produced.
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for source text.
    ///
    /// ## Parameters
    ///
    /// - `source`: KCL source code
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            finished: false,
        }
    }

    /// Tokenize the entire source.
    ///
    /// ## Returns
    ///
    /// Vector of tokens including the Eof token.
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }

    /// Scan the next token, skipping whitespace and comments.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;
        let start = self.cursor.position();
        let c = match self.cursor.advance() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, Span::new(start, start), String::new())),
        };

        let kind = match c {
            // Single-character tokens
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,

            // Two-character tokens
            '=' => {
                if self.cursor.eat('=') {
                    TokenKind::EqEq
                } else if self.cursor.eat('>') {
                    TokenKind::FatArrow
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.cursor.eat('=') {
                    TokenKind::BangEq
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.cursor.eat('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.cursor.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '|' if self.cursor.eat('>') => TokenKind::PipeGt,

            // String literal
            '"' | '\'' => return self.scan_string(start, c),

            // Number literal
            '0'..='9' => return Ok(self.scan_number(start)),

            // Identifier or keyword
            c if c.is_ascii_alphabetic() || c == '_' => return Ok(self.scan_identifier(start)),

            character => {
                return Err(LexError::UnexpectedCharacter {
                    character,
                    span: Span::new(start, self.cursor.position()),
                })
            }
        };

        Ok(self.token_from(kind, start))
    }

    fn token_from(&self, kind: TokenKind, start: usize) -> Token {
        let end = self.cursor.position();
        Token::new(kind, Span::new(start, end), self.cursor.slice_from(start).to_string())
    }

    /// Skip whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            self.cursor.advance_while(char::is_whitespace);

            // Line comments
            if self.cursor.peek() == Some('/') && self.cursor.peek_next() == Some('/') {
                self.cursor.advance_while(|c| c != '\n');
                continue;
            }

            // Block comments
            if self.cursor.peek() == Some('/') && self.cursor.peek_next() == Some('*') {
                let start = self.cursor.position();
                self.cursor.advance(); // /
                self.cursor.advance(); // *
                loop {
                    if self.cursor.is_eof() {
                        return Err(LexError::UnterminatedComment {
                            span: Span::new(start, self.cursor.position()),
                        });
                    }
                    if self.cursor.peek() == Some('*') && self.cursor.peek_next() == Some('/') {
                        self.cursor.advance(); // *
                        self.cursor.advance(); // /
                        break;
                    }
                    self.cursor.advance();
                }
                continue;
            }

            return Ok(());
        }
    }

    /// Scan a string literal delimited by `quote`.
    fn scan_string(&mut self, start: usize, quote: char) -> Result<Token, LexError> {
        loop {
            let escape_start = self.cursor.position();
            match self.cursor.advance() {
                None => {
                    return Err(LexError::UnterminatedString {
                        span: Span::new(start, self.cursor.position()),
                    })
                }
                Some(c) if c == quote => break,
                Some('\\') => match self.cursor.advance() {
                    None => {
                        return Err(LexError::UnterminatedString {
                            span: Span::new(start, self.cursor.position()),
                        })
                    }
                    Some(escaped) if escape_value(escaped).is_some() => {}
                    Some(_) => {
                        return Err(LexError::InvalidEscape {
                            sequence: self.cursor.slice_from(escape_start).to_string(),
                            span: Span::new(escape_start, self.cursor.position()),
                        })
                    }
                },
                Some(_) => {}
            }
        }
        Ok(self.token_from(TokenKind::String, start))
    }

    /// Scan a number literal; the first digit is already consumed.
    fn scan_number(&mut self, start: usize) -> Token {
        self.cursor.advance_while(|c| c.is_ascii_digit());

        // A dot only belongs to the number when a digit follows it.
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }

        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            let mut lookahead = self.cursor.clone();
            lookahead.advance();
            if matches!(lookahead.peek(), Some('+' | '-')) {
                lookahead.advance();
            }
            if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                lookahead.advance_while(|c| c.is_ascii_digit());
                self.cursor = lookahead;
            }
        }

        self.token_from(TokenKind::Number, start)
    }

    /// Scan an identifier or keyword.
    fn scan_identifier(&mut self, start: usize) -> Token {
        self.cursor
            .advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let kind = TokenKind::keyword(self.cursor.slice_from(start)).unwrap_or(TokenKind::Identifier);
        self.token_from(kind, start)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if !token.is_eof() => {}
            _ => self.finished = true,
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_pipe_call() {
        let tokens = lex("line([1, 1], %)").unwrap();

        // line ( [ 1 , 1 ] , % ) EOF
        assert_eq!(tokens.len(), 11);
        assert_eq!(tokens[0].text, "line");
        assert_eq!(tokens[0].span, Span::new(0, 4));
        assert_eq!(tokens[8].kind, TokenKind::Percent);
        assert_eq!(tokens[8].span, Span::new(13, 14));
        assert_eq!(tokens[10].kind, TokenKind::Eof);
        assert_eq!(tokens[10].span, Span::new(15, 15));
    }

    #[test]
    fn test_tokenize_keywords() {
        assert_eq!(
            kinds("const let var fn return true false"),
            vec![
                TokenKind::Const,
                TokenKind::Let,
                TokenKind::Var,
                TokenKind::Fn,
                TokenKind::Return,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            kinds("== != <= >= |> => = < > !"),
            vec![
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::PipeGt,
                TokenKind::FatArrow,
                TokenKind::Eq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Bang,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        let tokens = lex("3.14 10 2e3 1.5e-2").unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["3.14", "10", "2e3", "1.5e-2", ""]);
    }

    #[test]
    fn test_number_followed_by_member_access() {
        // `1.x` is a number, a dot and an identifier.
        assert_eq!(
            kinds("1.x"),
            vec![TokenKind::Number, TokenKind::Dot, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_tokenize_strings_both_quotes() {
        let tokens = lex(r#""yo" 'seg01'"#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "\"yo\"");
        assert_eq!(tokens[1].text, "'seg01'");
        assert_eq!(unescape(&tokens[1].text), "seg01");
    }

    #[test]
    fn test_string_escapes() {
        let tokens = lex(r#""a\nb\"c""#).unwrap();
        assert_eq!(unescape(&tokens[0].text), "a\nb\"c");
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = lex("// comment\nx /* block */ + 1").unwrap();
        assert_eq!(tokens[0].text, "x");
        assert_eq!(tokens[0].span, Span::new(11, 12));
        assert_eq!(tokens[1].kind, TokenKind::Plus);
    }

    #[test]
    fn test_unexpected_character() {
        let err = lex("x = 1 @ 2").unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: '@',
                span: Span::new(6, 7)
            }
        );
    }

    #[test]
    fn test_lone_pipe_is_error() {
        let err = lex("a | b").unwrap_err();
        assert_eq!(err.span(), Span::new(2, 3));
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex("x = \"abc").unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { span: Span::new(4, 8) });
    }

    #[test]
    fn test_invalid_escape() {
        let err = lex(r#""a\qb""#).unwrap_err();
        assert_eq!(
            err,
            LexError::InvalidEscape {
                sequence: "\\q".to_string(),
                span: Span::new(2, 4)
            }
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let err = lex("x /* open").unwrap_err();
        assert_eq!(err, LexError::UnterminatedComment { span: Span::new(2, 9) });
    }

    #[test]
    fn test_iterator_stops_after_eof() {
        let mut lexer = Lexer::new("x");
        assert!(lexer.next().is_some());
        assert!(lexer.next().unwrap().unwrap().is_eof());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let mut lexer = Lexer::new("@ x");
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_empty_source() {
        let tokens = lex("   \n").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].span, Span::new(4, 4));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_matches_sync() {
        let source = "const part001 = startSketchAt([0, 0])\n  |> lineTo({ to: [2, 2], tag: \"yo\" }, %)\n";
        let sync = lex(source).unwrap();
        for interval in [1, 2, 3, 1000] {
            let tokens = lex_async_with_interval(source, interval).await.unwrap();
            assert_eq!(tokens, sync);
        }
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_reports_same_error() {
        let source = "x = 'unterminated";
        assert_eq!(lex_async(source).await.unwrap_err(), lex(source).unwrap_err());
    }
}

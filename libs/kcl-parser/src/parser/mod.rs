//! # KCL Parser
//!
//! Recursive descent parser for KCL. Produces a span-annotated [`Program`]
//! or stops at the first unexpected token.
//!
//! ## Module Structure
//!
//! - `statements` - Program, declarations, return statements
//! - `operators` - Binary and unary operators with precedence climbing
//! - `pipes` - `|>` chains and pipe threading analysis
//! - `postfix` - Call arguments, index and member access
//! - `primaries` - Literals, identifiers, parentheses, function literals
//! - `collections` - Array and object literals
//!
//! ## Example
//!
//! ```rust
//! use kcl_parser::lexer::lex;
//! use kcl_parser::parser::Parser;
//!
//! let tokens = lex("const x = 1 + 2").unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//! assert_eq!(program.body.len(), 1);
//! ```

mod collections;
mod operators;
mod pipes;
mod postfix;
mod primaries;
mod statements;

use crate::ast::Program;
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::span::Span;

// =============================================================================
// PARSER
// =============================================================================

/// Recursive descent parser for KCL.
pub struct Parser {
    /// Token stream; always ends with an Eof token.
    tokens: Vec<Token>,
    /// Current token index.
    current: usize,
    /// True while parsing the arguments of a pipe stage, where `%` is legal.
    placeholder_allowed: bool,
}

impl Parser {
    /// Create a new parser.
    ///
    /// A stream that does not end in Eof gets one appended at the end of its
    /// last token.
    ///
    /// ## Parameters
    ///
    /// - `tokens`: Tokens from lexer
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let end = tokens.last().map_or(0, |token| token.span.end());
            tokens.push(Token::new(TokenKind::Eof, Span::new(end, end), String::new()));
        }
        Self {
            tokens,
            current: 0,
            placeholder_allowed: false,
        }
    }

    /// Parse the entire token stream into a program.
    ///
    /// ## Returns
    ///
    /// The program, or the error for the first unexpected token
    pub fn parse(mut self) -> Result<Program, ParseError> {
        self.parse_program()
    }

    // =========================================================================
    // TOKEN ACCESS
    // =========================================================================

    /// Get current token.
    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.current.min(last)]
    }

    /// Get current token kind.
    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Get the kind of the token `offset` positions ahead.
    fn peek_kind_at(&self, offset: usize) -> TokenKind {
        let last = self.tokens.len() - 1;
        self.tokens[(self.current + offset).min(last)].kind
    }

    /// Check if current token matches kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Check if at end of input.
    fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    /// Byte offset where the current token starts.
    fn current_position(&self) -> usize {
        self.peek().span.start()
    }

    /// Advance to next token.
    ///
    /// ## Returns
    ///
    /// The token that was consumed
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    /// Get previous token.
    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Consume token if it matches expected kind.
    fn expect(&mut self, kind: TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.display()))
        }
    }

    /// Try to consume token if it matches.
    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Error for the current token, which did not match `expected`.
    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        if token.is_eof() {
            ParseError::unexpected_eof(expected, token.span)
        } else {
            ParseError::unexpected_token(&token.text, expected, token.span)
        }
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// Create span from start to the end of the previous token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.previous().span.end().max(start))
    }

    /// Run `f` with `%` allowed or forbidden, restoring the previous setting.
    fn with_placeholder<T>(&mut self, allowed: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.placeholder_allowed, allowed);
        let result = f(self);
        self.placeholder_allowed = saved;
        result
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BodyItem, Expr};
    use crate::error::ParseErrorKind;
    use crate::lexer::lex;

    pub(super) fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(lex(source).unwrap()).parse()
    }

    /// First expression of the first statement.
    pub(super) fn parse_expr(source: &str) -> Expr {
        let program = parse(source).unwrap_or_else(|e| panic!("{source}: {e}"));
        match program.body.into_iter().next() {
            Some(BodyItem::ExpressionStatement(stmt)) => stmt.expression,
            Some(BodyItem::VariableDeclaration(decl)) => decl.init,
            other => panic!("unexpected body item {other:?}"),
        }
    }

    #[test]
    fn test_parse_empty() {
        let program = parse("").unwrap();
        assert!(program.body.is_empty());
        assert_eq!(program.span, Span::new(0, 0));
    }

    #[test]
    fn test_program_span_covers_trailing_whitespace() {
        let program = parse("x\n\n").unwrap();
        assert_eq!(program.span, Span::new(0, 3));
    }

    #[test]
    fn test_parse_multiple_statements() {
        let program = parse("const a = 1; const b = 2\nshow(a)").unwrap();
        assert_eq!(program.body.len(), 3);
    }

    #[test]
    fn test_missing_eof_is_appended() {
        let mut tokens = lex("x").unwrap();
        tokens.pop();
        let program = Parser::new(tokens).parse().unwrap();
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_error_reports_first_unexpected_token() {
        let err = parse("const x = (1 + ]").unwrap_err();
        assert_eq!(err.span, Span::new(15, 16));
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn test_error_at_eof() {
        let err = parse("const x =").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }));
        assert_eq!(err.span, Span::new(9, 9));
    }
}

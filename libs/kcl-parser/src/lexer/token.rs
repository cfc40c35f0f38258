//! # Tokens
//!
//! Token types for the KCL lexer.
//!
//! ## Example
//!
//! ```rust
//! use kcl_parser::lexer::{Token, TokenKind};
//! use kcl_parser::Span;
//!
//! let token = Token::new(TokenKind::Number, Span::new(0, 2), "10".to_string());
//! assert_eq!(token.kind, TokenKind::Number);
//! ```

use crate::span::{Span, Spanned};
use serde::{Deserialize, Serialize};

// =============================================================================
// TOKEN
// =============================================================================

/// A token produced by the lexer.
///
/// `text` is the exact source slice covered by `span`; string tokens keep
/// their quotes and escapes (see [`crate::lexer::unescape`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: String) -> Self {
        Self { kind, span, text }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

// =============================================================================
// TOKEN KIND
// =============================================================================

/// Token categories. Keywords are recognised from identifier-shaped words
/// by [`TokenKind::keyword`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Number literal like `10` or `3.14`
    Number,
    /// String literal like `"yo"` or `'yo'`
    String,
    True,
    False,

    /// Name such as `lineTo` or `myPath`
    Identifier,

    // Keywords
    Const,
    Let,
    Var,
    Fn,
    Return,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    Eq,
    EqEq,
    BangEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    /// `|>` pipe operator
    PipeGt,
    /// `%` pipe substitution placeholder
    Percent,
    FatArrow,
    Colon,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Dot,

    Eof,
}

impl TokenKind {
    /// Map an identifier-shaped word to its keyword kind.
    pub fn keyword(word: &str) -> Option<Self> {
        Some(match word {
            "const" => Self::Const,
            "let" => Self::Let,
            "var" => Self::Var,
            "fn" => Self::Fn,
            "return" => Self::Return,
            "true" => Self::True,
            "false" => Self::False,
            _ => return None,
        })
    }

    /// How the kind is named in "expected ..." parse errors.
    pub const fn display(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::True => "true",
            Self::False => "false",
            Self::Identifier => "identifier",
            Self::Const => "const",
            Self::Let => "let",
            Self::Var => "var",
            Self::Fn => "fn",
            Self::Return => "return",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Bang => "!",
            Self::Eq => "=",
            Self::EqEq => "==",
            Self::BangEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::PipeGt => "|>",
            Self::Percent => "%",
            Self::FatArrow => "=>",
            Self::Colon => ":",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Eof => "end of input",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_keyword_lookup() {
        assert_eq!(TokenKind::keyword("const"), Some(TokenKind::Const));
        assert_eq!(TokenKind::keyword("fn"), Some(TokenKind::Fn));
        assert_eq!(TokenKind::keyword("true"), Some(TokenKind::True));
        assert_eq!(TokenKind::keyword("lineTo"), None);
        assert_eq!(TokenKind::keyword("Const"), None);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(TokenKind::PipeGt.display(), "|>");
        assert_eq!(TokenKind::Identifier.display(), "identifier");
        assert_eq!(TokenKind::Eof.display(), "end of input");
    }
}

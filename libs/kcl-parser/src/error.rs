//! # Front-end Errors
//!
//! Error types for the lexer and parser. Every error carries exactly one
//! [`Span`] pinpointing the offending text.
//!
//! ## Example
//!
//! ```rust
//! use kcl_parser::error::{ParseError, ParseErrorKind};
//! use kcl_parser::Span;
//!
//! let error = ParseError::new(ParseErrorKind::PipeStageNotCall, Span::new(5, 6));
//! assert!(error.to_string().contains("pipe"));
//! ```

use crate::span::Span;
use thiserror::Error;

// =============================================================================
// LEX ERROR
// =============================================================================

/// Errors raised while scanning source text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A character that cannot begin any token.
    #[error("unexpected character '{character}'")]
    UnexpectedCharacter { character: char, span: Span },

    /// A string literal without a closing quote. The span runs from the
    /// opening quote to the end of input.
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    /// A `/*` comment without a closing `*/`.
    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },

    /// A backslash escape that is not recognised.
    #[error("invalid escape sequence '{sequence}'")]
    InvalidEscape { sequence: String, span: Span },
}

impl LexError {
    /// Source location of the error.
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedCharacter { span, .. }
            | Self::UnterminatedString { span }
            | Self::UnterminatedComment { span }
            | Self::InvalidEscape { span, .. } => *span,
        }
    }
}

// =============================================================================
// PARSE ERROR
// =============================================================================

/// A parse error with location information.
///
/// The parser stops at the first unexpected token; `span` is that token's
/// range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// Error kind with details.
    pub kind: ParseErrorKind,
    /// Source location of error.
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error.
    ///
    /// ## Parameters
    ///
    /// - `kind`: Error kind
    /// - `span`: Source location
    pub const fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create unexpected token error.
    ///
    /// ## Parameters
    ///
    /// - `found`: Text of the token that was found
    /// - `expected`: Description of expected token
    /// - `span`: Range of the found token
    pub fn unexpected_token(found: &str, expected: &str, span: Span) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken {
                found: found.to_string(),
                expected: expected.to_string(),
            },
            span,
        )
    }

    /// Create unexpected end-of-input error.
    pub fn unexpected_eof(expected: &str, span: Span) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof {
                expected: expected.to_string(),
            },
            span,
        )
    }
}

/// Types of parse errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    /// Unexpected token found.
    #[error("unexpected '{found}', expected {expected}")]
    UnexpectedToken { found: String, expected: String },

    /// Input ended while more tokens were required.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    /// Number literal could not be converted to a float.
    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String },

    /// `%` used outside the argument list of a pipe stage.
    #[error("pipe substitution '%' is only allowed in the arguments of a pipe stage")]
    MisplacedPipeSubstitution,

    /// The right-hand side of `|>` is not a function call.
    #[error("each pipe stage must be a function call")]
    PipeStageNotCall,

    /// A token stream that does not end with the end-of-input marker.
    #[error("token stream is missing its end-of-input marker")]
    MissingEof,
}

// =============================================================================
// FRONTEND ERROR
// =============================================================================

/// Either stage of the text-to-tree front end.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrontendError {
    /// Scanning failed.
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    /// Parsing failed.
    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),
}

impl FrontendError {
    /// Source location of the error.
    pub fn span(&self) -> Span {
        match self {
            Self::Lex(err) => err.span(),
            Self::Parse(err) => err.span,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

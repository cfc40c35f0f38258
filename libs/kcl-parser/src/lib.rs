//! # KCL Parser (Pure Rust)
//!
//! Front end for the KCL sketch language: lexer, parser, path resolver and
//! canonical formatter ("recast").
//!
//! ## Architecture
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Program ─┬→ recast → Source Text
//!                                                  └→ path   ↔ Span
//! ```
//!
//! ## Example
//!
//! ```rust
//! use kcl_parser::{parse_source, recast};
//!
//! let program = parse_source("const x=startSketchAt([0,0])|>line([1,1],%)").unwrap();
//! assert_eq!(
//!     recast(&program),
//!     "const x = startSketchAt([0, 0])\n  |> line([1, 1], %)\n"
//! );
//! ```
//!
//! ## Pipeline Integration
//!
//! This crate is the first layer in the KCL pipeline:
//!
//! ```text
//! kcl-parser → kcl-eval → kcl-session → kcl-lsp / wasm
//! ```

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod path;
pub mod recast;
pub mod span;

// Re-export public API
pub use ast::Program;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{FrontendError, LexError, ParseError, ParseErrorKind};
pub use path::{node_at, path_of, path_of_range, range_of, NodePath, NodeRef, PathError, PathStep};
pub use recast::recast;
pub use span::{Span, Spanned};

// =============================================================================
// PUBLIC API
// =============================================================================

/// Parse a token stream into a program.
///
/// ## Parameters
///
/// - `tokens`: Output of [`lexer::lex`]
///
/// ## Returns
///
/// The program, or a syntax error at the first unexpected token
pub fn parse(tokens: Vec<lexer::Token>) -> Result<Program, ParseError> {
    parser::Parser::new(tokens).parse()
}

/// Lex and parse KCL source code.
///
/// ## Example
///
/// ```rust
/// use kcl_parser::{parse_source, FrontendError};
///
/// assert!(parse_source("const x = 1").is_ok());
/// assert!(matches!(parse_source("const x = @"), Err(FrontendError::Lex(_))));
/// assert!(matches!(parse_source("const x = )"), Err(FrontendError::Parse(_))));
/// ```
pub fn parse_source(source: &str) -> Result<Program, FrontendError> {
    let tokens = lexer::lex(source)?;
    Ok(parse(tokens)?)
}

/// Cooperative variant of [`parse_source`]; only lexing yields.
#[cfg(feature = "async")]
pub async fn parse_source_async(source: &str) -> Result<Program, FrontendError> {
    let tokens = lexer::lex_async(source).await?;
    Ok(parse(tokens)?)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_sketch() {
        let program = parse_source(
            "const part001 = startSketchAt([0, 0])\n  |> lineTo({ to: [2, 2], tag: \"yo\" }, %)\n",
        )
        .unwrap();
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_parse_source_lex_error_span() {
        let err = parse_source("x = #").unwrap_err();
        assert_eq!(err.span(), Span::new(4, 5));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_parse_source_async_matches_sync() {
        let source = "const a = 1 + 2\nshow(a)";
        assert_eq!(parse_source_async(source).await, parse_source(source));
    }
}

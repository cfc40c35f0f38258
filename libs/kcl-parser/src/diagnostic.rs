//! # Diagnostics
//!
//! The UI-facing flattening of every pipeline error: a kind, a message, a
//! single source span and whether the failure halted the pipeline.

use crate::error::{FrontendError, LexError, ParseError};
use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Which stage produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    Runtime,
}

/// A diagnostic message with kind and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
    /// `true` when the failure stopped lexing, parsing or execution.
    pub fatal: bool,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: String, span: Span) -> Self {
        Self {
            kind,
            message,
            span,
            fatal: true,
        }
    }

    /// Marks the diagnostic as informational.
    pub fn non_fatal(mut self) -> Self {
        self.fatal = false;
        self
    }

    pub fn lexical(message: String, span: Span) -> Self {
        Self::new(DiagnosticKind::Lexical, message, span)
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self::new(DiagnosticKind::Syntax, message, span)
    }

    pub fn runtime(message: String, span: Span) -> Self {
        Self::new(DiagnosticKind::Runtime, message, span)
    }
}

impl From<&LexError> for Diagnostic {
    fn from(err: &LexError) -> Self {
        Self::lexical(err.to_string(), err.span())
    }
}

impl From<LexError> for Diagnostic {
    fn from(err: LexError) -> Self {
        Self::from(&err)
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        Self::syntax(err.to_string(), err.span)
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        Self::from(&err)
    }
}

impl From<FrontendError> for Diagnostic {
    fn from(err: FrontendError) -> Self {
        match err {
            FrontendError::Lex(err) => err.into(),
            FrontendError::Parse(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn test_diagnostic_from_parse_error() {
        let err = ParseError::new(ParseErrorKind::PipeStageNotCall, Span::new(7, 9));
        let diagnostic = Diagnostic::from(err);
        assert_eq!(diagnostic.kind, DiagnosticKind::Syntax);
        assert_eq!(diagnostic.span, Span::new(7, 9));
        assert!(diagnostic.fatal);
    }

    #[test]
    fn test_diagnostic_serializes_kind_lowercase() {
        let diagnostic = Diagnostic::runtime("boom".into(), Span::new(0, 1));
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "runtime");
        assert_eq!(json["span"]["start"], 0);
    }
}

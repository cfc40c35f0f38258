//! # Runtime Errors
//!
//! Error types for program execution. Every error carries exactly one source
//! span: the node whose evaluation failed.

use kcl_parser::{Diagnostic, Span};
use thiserror::Error;

/// Error raised while executing a program.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub span: Span,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Value of the wrong type at `span`.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        Self::new(
            RuntimeErrorKind::TypeMismatch {
                expected: expected.into(),
                found: found.into(),
            },
            span,
        )
    }

    /// Argument outside the function's domain.
    pub fn invalid_argument(message: impl Into<String>, span: Span) -> Self {
        Self::new(RuntimeErrorKind::InvalidArgument(message.into()), span)
    }

    /// Geometrically impossible request (vertical angle for an x-leg, ...).
    pub fn invalid_geometry(message: impl Into<String>, span: Span) -> Self {
        Self::new(RuntimeErrorKind::InvalidGeometry(message.into()), span)
    }
}

/// What went wrong during execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeErrorKind {
    #[error("undefined name `{0}`")]
    UndefinedName(String),

    #[error("`{0}` is already declared in this scope")]
    Redeclaration(String),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("`{0}` is not a function")]
    NotAFunction(String),

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("`{function}` expects {expected} argument(s), got {found}")]
    ArgumentCount {
        function: String,
        expected: String,
        found: usize,
    },

    #[error("call to `{function}` exceeds the maximum call depth of {limit}")]
    RecursionLimit { function: String, limit: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("index {index} is out of bounds for an array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("no property `{0}`")]
    MissingProperty(String),

    #[error("no segment tagged `{0}`")]
    UnknownTag(String),

    #[error("tag `{0}` is already used in this sketch")]
    DuplicateTag(String),

    #[error("lines are parallel")]
    ParallelLines,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    InvalidGeometry(String),
}

impl From<RuntimeError> for Diagnostic {
    fn from(err: RuntimeError) -> Self {
        Diagnostic::runtime(err.to_string(), err.span)
    }
}

impl From<&RuntimeError> for Diagnostic {
    fn from(err: &RuntimeError) -> Self {
        Diagnostic::runtime(err.to_string(), err.span)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kcl_parser::DiagnosticKind;

    #[test]
    fn test_error_display() {
        let err = RuntimeError::new(RuntimeErrorKind::UnknownTag("yo".into()), Span::new(3, 9));
        assert_eq!(err.to_string(), "no segment tagged `yo`");
    }

    #[test]
    fn test_error_to_diagnostic() {
        let err = RuntimeError::type_mismatch("number", "string", Span::new(1, 4));
        let diagnostic = Diagnostic::from(&err);
        assert_eq!(diagnostic.kind, DiagnosticKind::Runtime);
        assert_eq!(diagnostic.span, Span::new(1, 4));
        assert!(diagnostic.fatal);
        assert_eq!(diagnostic.message, "expected number, found string");
    }
}

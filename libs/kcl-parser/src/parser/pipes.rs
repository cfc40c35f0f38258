//! # Pipe Parsing
//!
//! Parses `head |> call(...) |> call(...)` chains and decides, per stage,
//! how the running value is threaded in.
//!
//! ## Grammar
//!
//! ```text
//! pipe = comparison ("|>" call)*
//! ```
//!
//! A stage that mentions `%` anywhere in its own arguments is
//! [`Threading::Placeholder`]; otherwise the running value becomes an
//! implicit trailing argument ([`Threading::Trailing`]). The search does not
//! descend into nested pipe stages or function bodies, whose `%` belong to
//! their own pipelines.

use super::Parser;
use crate::ast::{
    CallExpression, Expr, MemberProperty, PipeExpression, PipeStage, Precedence, Threading,
};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::TokenKind;

impl Parser {
    /// Parse a pipe chain, or a plain expression when no `|>` follows.
    pub(super) fn parse_pipe(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_position();
        let head = self.parse_precedence(Precedence::Comparison)?;
        if !self.check(TokenKind::PipeGt) {
            return Ok(head);
        }

        let mut stages = Vec::new();
        while self.match_token(TokenKind::PipeGt) {
            stages.push(self.parse_pipe_stage()?);
        }

        Ok(Expr::PipeExpression(PipeExpression {
            head: Box::new(head),
            stages,
            span: self.span_from(start),
        }))
    }

    /// Parse the call on the right of `|>`.
    fn parse_pipe_stage(&mut self) -> Result<PipeStage, ParseError> {
        if !(self.check(TokenKind::Identifier) && self.peek_kind_at(1) == TokenKind::LParen) {
            return Err(ParseError::new(ParseErrorKind::PipeStageNotCall, self.peek().span));
        }
        let call = self.with_placeholder(true, |parser| parser.parse_call())?;
        let threading = if call.arguments.iter().any(contains_placeholder) {
            Threading::Placeholder
        } else {
            Threading::Trailing
        };
        Ok(PipeStage { call, threading })
    }
}

/// Whether `expr` uses the enclosing stage's `%`.
fn contains_placeholder(expr: &Expr) -> bool {
    match expr {
        Expr::PipeSubstitution(_) => true,
        Expr::Literal(_) | Expr::Identifier(_) | Expr::FunctionExpression(_) => false,
        Expr::BinaryExpression(binary) => {
            contains_placeholder(&binary.left) || contains_placeholder(&binary.right)
        }
        Expr::UnaryExpression(unary) => contains_placeholder(&unary.argument),
        Expr::CallExpression(call) => call_contains_placeholder(call),
        // Only the head of a nested pipe can refer to the outer `%`.
        Expr::PipeExpression(pipe) => contains_placeholder(&pipe.head),
        Expr::ArrayExpression(array) => array.elements.iter().any(contains_placeholder),
        Expr::ObjectExpression(object) => object
            .properties
            .iter()
            .any(|property| contains_placeholder(&property.value)),
        Expr::MemberExpression(member) => {
            contains_placeholder(&member.object)
                || match &member.property {
                    MemberProperty::Identifier(_) => false,
                    MemberProperty::Computed(index) => contains_placeholder(index),
                }
        }
    }
}

fn call_contains_placeholder(call: &CallExpression) -> bool {
    call.arguments.iter().any(contains_placeholder)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::tests::{parse, parse_expr};
    use crate::ast::{Expr, PipeExpression, Threading};
    use crate::error::ParseErrorKind;
    use crate::span::{Span, Spanned};

    fn pipe(source: &str) -> PipeExpression {
        match parse_expr(source) {
            Expr::PipeExpression(pipe) => pipe,
            other => panic!("expected pipe, got {other:?}"),
        }
    }

    #[test]
    fn test_pipe_chain() {
        let source = "startSketchAt([0, 0]) |> line([1, 1], %) |> close(%)";
        let pipe = pipe(source);
        assert_eq!(pipe.stages.len(), 2);
        assert_eq!(pipe.stages[0].call.callee.name, "line");
        assert_eq!(pipe.span, Span::new(0, source.len()));
        assert!(matches!(*pipe.head, Expr::CallExpression(_)));
    }

    #[test]
    fn test_threading_placeholder_vs_trailing() {
        let pipe = pipe("x |> line([1, 1], %) |> extrude(4)");
        assert_eq!(pipe.stages[0].threading, Threading::Placeholder);
        assert_eq!(pipe.stages[1].threading, Threading::Trailing);
    }

    #[test]
    fn test_placeholder_nested_in_arguments() {
        let pipe = pipe("x |> lineTo([segEndX('a', %), 3])");
        assert_eq!(pipe.stages[0].threading, Threading::Placeholder);
    }

    #[test]
    fn test_placeholder_inside_function_body_is_rejected() {
        let err = parse("x |> f(() => { return % })").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MisplacedPipeSubstitution);
    }

    #[test]
    fn test_placeholder_outside_pipe_is_error() {
        let err = parse("const x = line([1, 1], %)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MisplacedPipeSubstitution);
        assert_eq!(err.span, Span::new(23, 24));
    }

    #[test]
    fn test_placeholder_as_pipe_head_is_error() {
        let err = parse("% |> f()").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MisplacedPipeSubstitution);
    }

    #[test]
    fn test_stage_must_be_call() {
        let err = parse("x |> 5").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::PipeStageNotCall);
        assert_eq!(err.span, Span::new(5, 6));
    }

    #[test]
    fn test_pipe_binds_looser_than_arithmetic() {
        let pipe = pipe("a + 1 |> f(%)");
        assert!(matches!(*pipe.head, Expr::BinaryExpression(_)));
        assert_eq!(pipe.head.span(), Span::new(0, 5));
    }
}

//! # Operator Parsing
//!
//! Parses binary and unary operators using precedence climbing.
//!
//! ## Operator Precedence
//!
//! | Precedence | Operators | Associativity |
//! |------------|-----------|---------------|
//! | 1 | \|> | Left |
//! | 2 | == != < > <= >= | Left |
//! | 3 | + - | Left |
//! | 4 | * / | Left |
//! | 5 | - ! (unary) | Right |
//! | 6 | () [] . | Left |
//!
//! The pipe level is handled in `pipes`; this module covers levels 2 to 5.

use super::Parser;
use crate::ast::{BinaryExpression, BinaryOperator, Expr, Precedence, UnaryExpression, UnaryOperator};
use crate::error::ParseError;
use crate::lexer::TokenKind;
use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};

/// Map an operator token to its binary operator.
fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    Some(match kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Minus => BinaryOperator::Sub,
        TokenKind::Star => BinaryOperator::Mul,
        TokenKind::Slash => BinaryOperator::Div,
        TokenKind::EqEq => BinaryOperator::Eq,
        TokenKind::BangEq => BinaryOperator::NotEq,
        TokenKind::Lt => BinaryOperator::Lt,
        TokenKind::Gt => BinaryOperator::Gt,
        TokenKind::LtEq => BinaryOperator::LtEq,
        TokenKind::GtEq => BinaryOperator::GtEq,
        _ => return None,
    })
}

impl Parser {
    /// Parse an expression.
    ///
    /// Entry point for expression parsing.
    ///
    /// ## Example
    ///
    /// ```text
    /// 1 + 2 * 3
    /// startSketchAt([0, 0]) |> line([1, 1], %)
    /// ```
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        stacker::maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            self.parse_pipe()
        })
    }

    /// Parse expression with minimum precedence.
    ///
    /// ## Parameters
    ///
    /// - `min_prec`: Minimum precedence level to parse
    pub(super) fn parse_precedence(&mut self, min_prec: Precedence) -> Result<Expr, ParseError> {
        let start = self.current_position();
        let mut left = self.parse_unary()?;

        while let Some(operator) = binary_operator(self.peek_kind()) {
            let prec = operator.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();
            let right = self.parse_precedence(prec.next())?;
            left = Expr::BinaryExpression(BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span_from(start),
            });
        }

        Ok(left)
    }

    /// Parse unary expression.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// unary = ("-" | "!") unary | postfix
    /// ```
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let operator = match self.peek_kind() {
            TokenKind::Minus => UnaryOperator::Neg,
            TokenKind::Bang => UnaryOperator::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.current_position();
        self.advance();
        let argument = stacker::maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            self.parse_unary()
        })?;
        Ok(Expr::UnaryExpression(UnaryExpression {
            operator,
            argument: Box::new(argument),
            span: self.span_from(start),
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::tests::parse_expr;
    use crate::ast::{BinaryOperator, Expr, UnaryOperator};
    use crate::span::{Span, Spanned};

    fn binary(expr: &Expr) -> (&Expr, BinaryOperator, &Expr) {
        match expr {
            Expr::BinaryExpression(b) => (&b.left, b.operator, &b.right),
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_factor_binds_tighter_than_term() {
        let expr = parse_expr("1 + 2 * 3");
        let (_, op, right) = binary(&expr);
        assert_eq!(op, BinaryOperator::Add);
        assert_eq!(binary(right).1, BinaryOperator::Mul);
    }

    #[test]
    fn test_left_associative() {
        let expr = parse_expr("10 - 4 - 3");
        let (left, op, _) = binary(&expr);
        assert_eq!(op, BinaryOperator::Sub);
        assert_eq!(binary(left).1, BinaryOperator::Sub);
        assert_eq!(left.span(), Span::new(0, 6));
    }

    #[test]
    fn test_comparison_lowest() {
        let expr = parse_expr("a + 1 < b * 2");
        assert_eq!(binary(&expr).1, BinaryOperator::Lt);
    }

    #[test]
    fn test_parenthesized_span_includes_parens() {
        let expr = parse_expr("(1 + 2) * 3");
        let (left, op, _) = binary(&expr);
        assert_eq!(op, BinaryOperator::Mul);
        assert_eq!(expr.span(), Span::new(0, 11));
        assert_eq!(left.span(), Span::new(1, 6));
    }

    #[test]
    fn test_unary_minus() {
        let expr = parse_expr("-x * 2");
        let (left, _, _) = binary(&expr);
        match left {
            Expr::UnaryExpression(u) => {
                assert_eq!(u.operator, UnaryOperator::Neg);
                assert_eq!(u.span, Span::new(0, 2));
            }
            other => panic!("expected unary, got {other:?}"),
        }
    }

    #[test]
    fn test_deeply_nested_expression() {
        let source = format!("{}1{}", "(".repeat(2000), ")".repeat(2000));
        assert!(matches!(parse_expr(&source), Expr::Literal(_)));
    }
}

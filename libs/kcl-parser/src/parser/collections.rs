//! # Collection Parsing
//!
//! Parses array and object literals.
//!
//! ## Responsibilities
//!
//! - Array literals: `[1, 2, 3]`
//! - Object literals: `{ to: [2, 2], tag: "yo" }` (insertion order kept)

use super::Parser;
use crate::ast::{ArrayExpression, Expr, ObjectExpression, ObjectProperty};
use crate::error::ParseError;
use crate::lexer::TokenKind;

impl Parser {
    /// Parse an array literal.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// array = "[" (expression ("," expression)* ","?)? "]"
    /// ```
    pub(super) fn parse_array(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_position();
        self.expect(TokenKind::LBracket)?;

        let mut elements = Vec::new();
        while !self.check(TokenKind::RBracket) {
            elements.push(self.parse_expression()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.expect(TokenKind::RBracket)?;
        Ok(Expr::ArrayExpression(ArrayExpression {
            elements,
            span: self.span_from(start),
        }))
    }

    /// Parse an object literal.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// object = "{" (identifier ":" expression ("," identifier ":" expression)* ","?)? "}"
    /// ```
    pub(super) fn parse_object(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_position();
        self.expect(TokenKind::LBrace)?;

        let mut properties = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let key = self.parse_identifier()?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_expression()?;
            properties.push(ObjectProperty {
                span: self.span_from(key.span.start()),
                key,
                value,
            });
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.expect(TokenKind::RBrace)?;
        Ok(Expr::ObjectExpression(ObjectExpression {
            properties,
            span: self.span_from(start),
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::tests::{parse, parse_expr};
    use crate::ast::Expr;
    use crate::span::Span;

    #[test]
    fn test_array_with_trailing_comma() {
        match parse_expr("[1, 2, 3,]") {
            Expr::ArrayExpression(array) => {
                assert_eq!(array.elements.len(), 3);
                assert_eq!(array.span, Span::new(0, 10));
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_array() {
        assert!(matches!(parse_expr("[]"), Expr::ArrayExpression(a) if a.elements.is_empty()));
    }

    #[test]
    fn test_object_preserves_order() {
        match parse_expr("{ tag: 'b', angle: 180, offset: -1 }") {
            Expr::ObjectExpression(object) => {
                let keys: Vec<_> = object.properties.iter().map(|p| p.key.name.as_str()).collect();
                assert_eq!(keys, vec!["tag", "angle", "offset"]);
                assert_eq!(object.properties[0].span, Span::new(2, 10));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_object_missing_colon() {
        let err = parse("{ to [1, 2] }").unwrap_err();
        assert_eq!(err.span, Span::new(5, 6));
    }
}

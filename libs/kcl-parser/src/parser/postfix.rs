//! # Postfix Expression Parsing
//!
//! Parses function calls, index access and member access.
//!
//! ## Responsibilities
//!
//! - Function calls: `lineTo([1, 1], %)`
//! - Index access: `point[0]`
//! - Member access: `sketch.position`

use super::Parser;
use crate::ast::{CallExpression, Expr, MemberExpression, MemberProperty};
use crate::error::ParseError;
use crate::lexer::TokenKind;

impl Parser {
    /// Parse postfix expressions (index, dot).
    ///
    /// ## Grammar
    ///
    /// ```text
    /// postfix = primary ("[" expr "]" | "." identifier)*
    /// ```
    pub(super) fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_position();
        let mut expr = self.parse_primary()?;

        loop {
            let property = match self.peek_kind() {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket)?;
                    MemberProperty::Computed(Box::new(index))
                }
                TokenKind::Dot => {
                    self.advance();
                    MemberProperty::Identifier(self.parse_identifier()?)
                }
                _ => break,
            };
            expr = Expr::MemberExpression(MemberExpression {
                object: Box::new(expr),
                property,
                span: self.span_from(start),
            });
        }

        Ok(expr)
    }

    /// Parse `callee(arguments)`.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// call = identifier "(" (expression ("," expression)* ","?)? ")"
    /// ```
    pub(super) fn parse_call(&mut self) -> Result<CallExpression, ParseError> {
        let start = self.current_position();
        let callee = self.parse_identifier()?;
        let arguments = self.parse_arguments()?;
        Ok(CallExpression {
            callee,
            arguments,
            span: self.span_from(start),
        })
    }

    /// Parse a parenthesized, comma-separated argument list.
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut arguments = Vec::new();
        while !self.check(TokenKind::RParen) {
            arguments.push(self.parse_expression()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(arguments)
    }
}

// =============================================================================
// TESTS
// =============================================================================

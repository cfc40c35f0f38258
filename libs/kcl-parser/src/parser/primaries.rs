//! # Primary Expression Parsing
//!
//! Parses primary expressions: literals, identifiers, calls, the pipe
//! placeholder, parenthesized expressions and function literals.
//!
//! ## Responsibilities
//!
//! - Number literals: `42`, `3.14`
//! - String literals: `"yo"`, `'seg01'`
//! - Boolean literals: `true`, `false`
//! - Identifiers and calls: `x`, `line(...)`
//! - Placeholder: `%`
//! - Parenthesized expressions: `(1 + 2)`
//! - Function literals: `(a, b) => { return a + b }`

use super::Parser;
use crate::ast::{
    Expr, FunctionBody, FunctionExpression, Identifier, Literal, LiteralValue, PipeSubstitution,
};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{unescape, TokenKind};

impl Parser {
    /// Parse primary expression.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// primary = number | string | "true" | "false" | "%" | identifier
    ///         | call | array | object | function | "(" expression ")"
    /// ```
    pub(super) fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::Number => {
                self.advance();
                let value = token.text.parse::<f64>().map_err(|_| {
                    ParseError::new(
                        ParseErrorKind::InvalidNumber {
                            text: token.text.clone(),
                        },
                        token.span,
                    )
                })?;
                Ok(Expr::Literal(Literal {
                    value: LiteralValue::Number(value),
                    raw: token.text,
                    span: token.span,
                }))
            }

            TokenKind::String => {
                self.advance();
                Ok(Expr::Literal(Literal {
                    value: LiteralValue::String(unescape(&token.text)),
                    raw: token.text,
                    span: token.span,
                }))
            }

            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(Expr::Literal(Literal {
                    value: LiteralValue::Bool(token.kind == TokenKind::True),
                    raw: token.text,
                    span: token.span,
                }))
            }

            TokenKind::Percent => {
                if !self.placeholder_allowed {
                    return Err(ParseError::new(
                        ParseErrorKind::MisplacedPipeSubstitution,
                        token.span,
                    ));
                }
                self.advance();
                Ok(Expr::PipeSubstitution(PipeSubstitution { span: token.span }))
            }

            TokenKind::Identifier => {
                if self.peek_kind_at(1) == TokenKind::LParen {
                    return Ok(Expr::CallExpression(self.parse_call()?));
                }
                self.advance();
                Ok(Expr::Identifier(Identifier::new(token.text, token.span)))
            }

            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_object(),

            TokenKind::LParen if self.is_function_start() => self.parse_function(),
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }

            _ => Err(self.unexpected("expression")),
        }
    }

    /// Looks ahead for `( ident, ... ) =>` without consuming anything.
    fn is_function_start(&self) -> bool {
        let mut offset = 1;
        if self.peek_kind_at(offset) != TokenKind::RParen {
            loop {
                if self.peek_kind_at(offset) != TokenKind::Identifier {
                    return false;
                }
                offset += 1;
                match self.peek_kind_at(offset) {
                    TokenKind::Comma => offset += 1,
                    TokenKind::RParen => break,
                    _ => return false,
                }
            }
        }
        self.peek_kind_at(offset + 1) == TokenKind::FatArrow
    }

    /// Parse a function literal.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// function = "(" (identifier ("," identifier)*)? ")" "=>" "{" body_item* "}"
    /// ```
    fn parse_function(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_position();
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) {
            params.push(self.parse_identifier()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::FatArrow)?;

        let body_start = self.current_position();
        self.expect(TokenKind::LBrace)?;
        let body = self.with_placeholder(false, |parser| parser.parse_body_items(TokenKind::RBrace))?;
        self.expect(TokenKind::RBrace)?;
        let body = FunctionBody {
            body,
            span: self.span_from(body_start),
        };

        Ok(Expr::FunctionExpression(FunctionExpression {
            params,
            body,
            span: self.span_from(start),
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================

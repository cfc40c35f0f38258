//! # Statement Parsing
//!
//! Parses the program body and function bodies.
//!
//! ## Grammar
//!
//! ```text
//! program     = body_item*
//! body_item   = declaration | "return" expression | expression
//! declaration = ("const" | "let" | "var" | "fn") identifier "=" expression
//! ```
//!
//! Semicolons between statements are optional and not recorded.

use super::Parser;
use crate::ast::{
    BodyItem, ExpressionStatement, Identifier, Program, ReturnStatement, VariableDeclaration,
    VariableKind,
};
use crate::error::ParseError;
use crate::lexer::TokenKind;
use crate::span::{Span, Spanned};

impl Parser {
    /// Parse the whole token stream.
    pub(super) fn parse_program(&mut self) -> Result<Program, ParseError> {
        let body = self.parse_body_items(TokenKind::Eof)?;
        let end = self.peek().span.end();
        Ok(Program {
            body,
            span: Span::new(0, end),
        })
    }

    /// Parse statements until `terminator` (not consumed).
    pub(super) fn parse_body_items(
        &mut self,
        terminator: TokenKind,
    ) -> Result<Vec<BodyItem>, ParseError> {
        let mut body = Vec::new();
        loop {
            while self.match_token(TokenKind::Semicolon) {}
            if self.check(terminator) || self.is_at_end() {
                return Ok(body);
            }
            body.push(self.parse_body_item()?);
        }
    }

    /// Parse one statement.
    fn parse_body_item(&mut self) -> Result<BodyItem, ParseError> {
        let start = self.current_position();
        let kind = match self.peek_kind() {
            TokenKind::Const => Some(VariableKind::Const),
            TokenKind::Let => Some(VariableKind::Let),
            TokenKind::Var => Some(VariableKind::Var),
            TokenKind::Fn => Some(VariableKind::Fn),
            TokenKind::Return => {
                self.advance();
                let argument = self.parse_expression()?;
                return Ok(BodyItem::ReturnStatement(ReturnStatement {
                    argument,
                    span: self.span_from(start),
                }));
            }
            _ => None,
        };

        match kind {
            Some(kind) => {
                self.advance();
                let name = self.parse_identifier()?;
                self.expect(TokenKind::Eq)?;
                let init = self.parse_expression()?;
                Ok(BodyItem::VariableDeclaration(VariableDeclaration {
                    kind,
                    name,
                    init,
                    span: self.span_from(start),
                }))
            }
            None => {
                let expression = self.parse_expression()?;
                let span = expression.span();
                Ok(BodyItem::ExpressionStatement(ExpressionStatement {
                    expression,
                    span: Span::new(start, span.end()),
                }))
            }
        }
    }

    /// Parse a plain identifier.
    pub(super) fn parse_identifier(&mut self) -> Result<Identifier, ParseError> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(Identifier::new(token.text.clone(), token.span))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::tests::parse;
    use crate::ast::{BodyItem, Expr, VariableKind};
    use crate::span::Span;

    #[test]
    fn test_parse_declaration_kinds() {
        let program = parse("const a = 1\nlet b = 2\nvar c = 3").unwrap();
        let kinds: Vec<_> = program
            .body
            .iter()
            .map(|item| match item {
                BodyItem::VariableDeclaration(decl) => decl.kind,
                other => panic!("expected declaration, got {other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec![VariableKind::Const, VariableKind::Let, VariableKind::Var]);
    }

    #[test]
    fn test_declaration_span() {
        let program = parse("const yo = 5;").unwrap();
        let BodyItem::VariableDeclaration(decl) = &program.body[0] else {
            panic!("expected declaration");
        };
        assert_eq!(decl.span, Span::new(0, 12));
        assert_eq!(decl.name.span, Span::new(6, 8));
    }

    #[test]
    fn test_fn_declaration() {
        let program = parse("fn double = (x) => { return x * 2 }").unwrap();
        let BodyItem::VariableDeclaration(decl) = &program.body[0] else {
            panic!("expected declaration");
        };
        assert_eq!(decl.kind, VariableKind::Fn);
        let Expr::FunctionExpression(function) = &decl.init else {
            panic!("expected function");
        };
        assert_eq!(function.params.len(), 1);
        assert!(matches!(function.body.body[0], BodyItem::ReturnStatement(_)));
    }

    #[test]
    fn test_keyword_is_not_a_name() {
        assert!(parse("const return = 1").is_err());
    }

    #[test]
    fn test_missing_equals() {
        let err = parse("const x 1").unwrap_err();
        assert_eq!(err.span, Span::new(8, 9));
    }
}

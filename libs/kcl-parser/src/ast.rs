//! # Abstract Syntax Tree
//!
//! Closed sum types for every KCL node kind. Every node carries the [`Span`]
//! of its own source text; child spans always lie inside their parent's.
//!
//! ## Node Overview
//!
//! ```text
//! Program
//! └── BodyItem: VariableDeclaration | ExpressionStatement | ReturnStatement
//!     └── Expr: Literal | Identifier | BinaryExpression | UnaryExpression
//!             | CallExpression | PipeExpression | PipeSubstitution
//!             | ArrayExpression | ObjectExpression | MemberExpression
//!             | FunctionExpression
//! ```
//!
//! Pipe threading is resolved at parse time: each [`PipeStage`] records
//! whether the running value is substituted for a `%` inside its arguments
//! or appended as an implicit trailing argument.
//!
//! Nodes serialize with a `type` tag so trees can cross the WASM boundary as
//! JSON.

use crate::span::{Span, Spanned};
use serde::{Deserialize, Serialize};

// =============================================================================
// PROGRAM
// =============================================================================

/// Root node: the ordered statements of one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<BodyItem>,
    /// Always starts at 0 and ends at the end of input.
    pub span: Span,
}

/// A top-level or function-body statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BodyItem {
    VariableDeclaration(VariableDeclaration),
    ExpressionStatement(ExpressionStatement),
    ReturnStatement(ReturnStatement),
}

impl Spanned for BodyItem {
    fn span(&self) -> Span {
        match self {
            Self::VariableDeclaration(decl) => decl.span,
            Self::ExpressionStatement(stmt) => stmt.span,
            Self::ReturnStatement(stmt) => stmt.span,
        }
    }
}

/// Declaration keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Const,
    Let,
    Var,
    Fn,
}

impl VariableKind {
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Let => "let",
            Self::Var => "var",
            Self::Fn => "fn",
        }
    }
}

/// `const name = init`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub kind: VariableKind,
    pub name: Identifier,
    pub init: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Expr,
    pub span: Span,
}

/// `return argument`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub argument: Expr,
    pub span: Span,
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

/// Expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    Literal(Literal),
    Identifier(Identifier),
    BinaryExpression(BinaryExpression),
    UnaryExpression(UnaryExpression),
    CallExpression(CallExpression),
    PipeExpression(PipeExpression),
    PipeSubstitution(PipeSubstitution),
    ArrayExpression(ArrayExpression),
    ObjectExpression(ObjectExpression),
    MemberExpression(MemberExpression),
    FunctionExpression(FunctionExpression),
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Self::Literal(node) => node.span,
            Self::Identifier(node) => node.span,
            Self::BinaryExpression(node) => node.span,
            Self::UnaryExpression(node) => node.span,
            Self::CallExpression(node) => node.span,
            Self::PipeExpression(node) => node.span,
            Self::PipeSubstitution(node) => node.span,
            Self::ArrayExpression(node) => node.span,
            Self::ObjectExpression(node) => node.span,
            Self::MemberExpression(node) => node.span,
            Self::FunctionExpression(node) => node.span,
        }
    }
}

impl Expr {
    /// Binding strength of this expression when printed without parentheses.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::BinaryExpression(binary) => binary.operator.precedence(),
            Self::PipeExpression(_) => Precedence::Pipe,
            Self::UnaryExpression(_) => Precedence::Unary,
            // A function literal extends as far right as it can.
            Self::FunctionExpression(_) => Precedence::Pipe,
            _ => Precedence::Postfix,
        }
    }
}

/// A name reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Number, string or boolean literal.
///
/// `raw` keeps the source spelling (`1.50`, `'yo'`) so printing is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub value: LiteralValue,
    pub raw: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Number(f64),
    String(String),
    Bool(bool),
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">=")]
    GtEq,
}

impl BinaryOperator {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
        }
    }

    pub const fn precedence(&self) -> Precedence {
        match self {
            Self::Add | Self::Sub => Precedence::Term,
            Self::Mul | Self::Div => Precedence::Factor,
            Self::Eq | Self::NotEq | Self::Lt | Self::Gt | Self::LtEq | Self::GtEq => {
                Precedence::Comparison
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    #[serde(rename = "-")]
    Neg,
    #[serde(rename = "!")]
    Not,
}

impl UnaryOperator {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub argument: Box<Expr>,
    pub span: Span,
}

/// `callee(arg, arg, …)`
///
/// ## Example
///
/// ```rust
/// use kcl_parser::ast::{BodyItem, Expr};
///
/// let program = kcl_parser::parse_source(r#"lineTo({ to: [1, 1], tag: "yo" }, sketch)"#).unwrap();
/// let BodyItem::ExpressionStatement(stmt) = &program.body[0] else { panic!() };
/// let Expr::CallExpression(call) = &stmt.expression else { panic!() };
/// assert_eq!(call.tag(), Some("yo"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpression {
    pub callee: Identifier,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

impl CallExpression {
    /// Tag label attached to this call.
    ///
    /// The label is the string-literal `tag` property of the last object
    /// argument the call was written with.
    pub fn tag(&self) -> Option<&str> {
        let object = self.arguments.iter().rev().find_map(|arg| match arg {
            Expr::ObjectExpression(object) => Some(object),
            _ => None,
        })?;
        match object.get("tag") {
            Some(Expr::Literal(Literal {
                value: LiteralValue::String(tag),
                ..
            })) => Some(tag),
            _ => None,
        }
    }
}

/// How a pipe stage receives the running value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Threading {
    /// Every `%` in the stage's arguments stands for the running value.
    Placeholder,
    /// No `%` present: the running value is appended as the last argument.
    Trailing,
}

/// One `|> call(...)` stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeStage {
    pub call: CallExpression,
    pub threading: Threading,
}

/// `head |> stage |> stage …`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeExpression {
    pub head: Box<Expr>,
    pub stages: Vec<PipeStage>,
    pub span: Span,
}

/// The `%` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSubstitution {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayExpression {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// `{ key: value, … }` with insertion order preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectExpression {
    pub properties: Vec<ObjectProperty>,
    pub span: Span,
}

impl ObjectExpression {
    /// Value of the first property named `key`.
    pub fn get(&self, key: &str) -> Option<&Expr> {
        self.properties
            .iter()
            .find(|property| property.key.name == key)
            .map(|property| &property.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperty {
    pub key: Identifier,
    pub value: Expr,
    pub span: Span,
}

/// `object.name` or `object[expr]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberExpression {
    pub object: Box<Expr>,
    pub property: MemberProperty,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum MemberProperty {
    Identifier(Identifier),
    Computed(Box<Expr>),
}

/// `(a, b) => { … }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExpression {
    pub params: Vec<Identifier>,
    pub body: FunctionBody,
    pub span: Span,
}

/// The braces of a function literal and the statements between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionBody {
    pub body: Vec<BodyItem>,
    pub span: Span,
}

// =============================================================================
// PRECEDENCE
// =============================================================================

/// Operator precedence levels.
///
/// Higher values bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// No precedence (sentinel value)
    None = 0,
    /// Pipe: `|>`
    Pipe = 1,
    /// Comparison: `== != < > <= >=`
    Comparison = 2,
    /// Addition/subtraction: `+ -`
    Term = 3,
    /// Multiplication/division: `* /`
    Factor = 4,
    /// Unary: `- !`
    Unary = 5,
    /// Call/access: `() [] .` and atoms
    Postfix = 6,
}

impl Precedence {
    /// Get next higher precedence level.
    ///
    /// Used for left-associative operators.
    pub fn next(&self) -> Self {
        match self {
            Self::None => Self::Pipe,
            Self::Pipe => Self::Comparison,
            Self::Comparison => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor => Self::Unary,
            Self::Unary | Self::Postfix => Self::Postfix,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn string_literal(value: &str, span: Span) -> Expr {
        Expr::Literal(Literal {
            value: LiteralValue::String(value.to_string()),
            raw: format!("\"{value}\""),
            span,
        })
    }

    #[test]
    fn test_precedence_order() {
        assert!(Precedence::Factor > Precedence::Term);
        assert!(Precedence::Term > Precedence::Comparison);
        assert!(Precedence::Comparison > Precedence::Pipe);
        assert_eq!(Precedence::Term.next(), Precedence::Factor);
    }

    #[test]
    fn test_call_tag_from_object_argument() {
        let call = CallExpression {
            callee: Identifier::new("line", Span::new(0, 4)),
            arguments: vec![
                Expr::ObjectExpression(ObjectExpression {
                    properties: vec![ObjectProperty {
                        key: Identifier::new("tag", Span::new(6, 9)),
                        value: string_literal("seg01", Span::new(11, 18)),
                        span: Span::new(6, 18),
                    }],
                    span: Span::new(5, 19),
                }),
                Expr::PipeSubstitution(PipeSubstitution {
                    span: Span::new(21, 22),
                }),
            ],
            span: Span::new(0, 23),
        };
        assert_eq!(call.tag(), Some("seg01"));
    }

    #[test]
    fn test_call_without_object_has_no_tag() {
        let call = CallExpression {
            callee: Identifier::new("xLine", Span::new(0, 5)),
            arguments: vec![string_literal("not a tag", Span::new(6, 17))],
            span: Span::new(0, 18),
        };
        assert_eq!(call.tag(), None);
    }

    #[test]
    fn test_expr_serializes_with_type_tag() {
        let expr = Expr::Identifier(Identifier::new("x", Span::new(0, 1)));
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["type"], "Identifier");
        assert_eq!(json["name"], "x");
    }
}

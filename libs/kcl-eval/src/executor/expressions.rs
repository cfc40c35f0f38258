//! # Expression Evaluation
//!
//! Evaluates KCL expressions to runtime values.
//!
//! ## Responsibilities
//!
//! - Literals, arrays, objects and function values
//! - Variable lookup
//! - Binary and unary operators
//! - Member and index access
//! - Dispatch of calls and pipes to [`super::calls`]

use super::calls::{eval_call, eval_pipe};
use super::ExecContext;
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::object::ObjectMap;
use crate::value::Value;
use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use kcl_parser::ast::{
    BinaryExpression, BinaryOperator, Expr, LiteralValue, MemberExpression, MemberProperty,
    UnaryExpression, UnaryOperator,
};
use kcl_parser::{Span, Spanned};

// =============================================================================
// EXPRESSION EVALUATION
// =============================================================================

/// Evaluate an expression to a value.
///
/// ## Parameters
///
/// - `ctx`: Execution context
/// - `expr`: Expression to evaluate
///
/// ## Returns
///
/// Evaluated value, or the first runtime error located at the failing node
pub fn eval_expr(ctx: &mut ExecContext, expr: &Expr) -> Result<Value, RuntimeError> {
    stacker::maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
        eval_expr_inner(ctx, expr)
    })
}

fn eval_expr_inner(ctx: &mut ExecContext, expr: &Expr) -> Result<Value, RuntimeError> {
    match expr {
        Expr::Literal(literal) => Ok(match &literal.value {
            LiteralValue::Number(n) => Value::Number(*n),
            LiteralValue::String(s) => Value::String(s.clone()),
            LiteralValue::Bool(b) => Value::Bool(*b),
        }),
        Expr::Identifier(ident) => ctx.scope.get(&ident.name).cloned().ok_or_else(|| {
            RuntimeError::new(RuntimeErrorKind::UndefinedName(ident.name.clone()), ident.span)
        }),
        Expr::BinaryExpression(binary) => eval_binary(ctx, binary),
        Expr::UnaryExpression(unary) => eval_unary(ctx, unary),
        Expr::CallExpression(call) => eval_call(ctx, call),
        Expr::PipeExpression(pipe) => eval_pipe(ctx, pipe),
        Expr::PipeSubstitution(sub) => ctx.pipe_value().cloned().ok_or_else(|| {
            RuntimeError::new(RuntimeErrorKind::UndefinedName("%".to_string()), sub.span)
        }),
        Expr::ArrayExpression(array) => array
            .elements
            .iter()
            .map(|element| eval_expr(ctx, element))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Expr::ObjectExpression(object) => {
            let mut map = ObjectMap::new();
            for property in &object.properties {
                let value = eval_expr(ctx, &property.value)?;
                map.insert(property.key.name.clone(), value);
            }
            Ok(Value::Object(map))
        }
        Expr::MemberExpression(member) => eval_member(ctx, member),
        Expr::FunctionExpression(function) => Ok(Value::Function(Box::new(function.clone()))),
    }
}

// =============================================================================
// OPERATORS
// =============================================================================

fn numbers(
    left: &Value,
    right: &Value,
    binary: &BinaryExpression,
) -> Result<(f64, f64), RuntimeError> {
    Ok((
        left.expect_number(binary.left.span())?,
        right.expect_number(binary.right.span())?,
    ))
}

/// Evaluate a binary operation.
///
/// `+` adds numbers or concatenates strings; `==`/`!=` compare any two
/// values; the remaining operators take numbers.
fn eval_binary(ctx: &mut ExecContext, binary: &BinaryExpression) -> Result<Value, RuntimeError> {
    let left = eval_expr(ctx, &binary.left)?;
    let right = eval_expr(ctx, &binary.right)?;

    match binary.operator {
        BinaryOperator::Add => match (&left, &right) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
            (Value::String(_), other) => Err(RuntimeError::type_mismatch(
                "string",
                other.type_name(),
                binary.right.span(),
            )),
            _ => {
                let (a, b) = numbers(&left, &right, binary)?;
                Ok(Value::Number(a + b))
            }
        },
        BinaryOperator::Sub => numbers(&left, &right, binary).map(|(a, b)| Value::Number(a - b)),
        BinaryOperator::Mul => numbers(&left, &right, binary).map(|(a, b)| Value::Number(a * b)),
        BinaryOperator::Div => {
            let (a, b) = numbers(&left, &right, binary)?;
            if b == 0.0 {
                return Err(RuntimeError::new(RuntimeErrorKind::DivisionByZero, binary.span));
            }
            Ok(Value::Number(a / b))
        }
        BinaryOperator::Eq => Ok(Value::Bool(left == right)),
        BinaryOperator::NotEq => Ok(Value::Bool(left != right)),
        BinaryOperator::Lt => numbers(&left, &right, binary).map(|(a, b)| Value::Bool(a < b)),
        BinaryOperator::Gt => numbers(&left, &right, binary).map(|(a, b)| Value::Bool(a > b)),
        BinaryOperator::LtEq => numbers(&left, &right, binary).map(|(a, b)| Value::Bool(a <= b)),
        BinaryOperator::GtEq => numbers(&left, &right, binary).map(|(a, b)| Value::Bool(a >= b)),
    }
}

fn eval_unary(ctx: &mut ExecContext, unary: &UnaryExpression) -> Result<Value, RuntimeError> {
    let value = eval_expr(ctx, &unary.argument)?;
    let span = unary.argument.span();
    match unary.operator {
        UnaryOperator::Neg => Ok(Value::Number(-value.expect_number(span)?)),
        UnaryOperator::Not => Ok(Value::Bool(!value.expect_bool(span)?)),
    }
}

// =============================================================================
// MEMBER ACCESS
// =============================================================================

fn eval_member(ctx: &mut ExecContext, member: &MemberExpression) -> Result<Value, RuntimeError> {
    let object = eval_expr(ctx, &member.object)?;
    match &member.property {
        MemberProperty::Identifier(ident) => property(object, &ident.name, member.object.span(), ident.span),
        MemberProperty::Computed(index) => {
            let key = eval_expr(ctx, index)?;
            match (&object, &key) {
                (Value::Array(items), Value::Number(n)) => {
                    array_index(items, *n, index.span())
                }
                (Value::Object(_), Value::String(name)) => {
                    property(object.clone(), name, member.object.span(), index.span())
                }
                (Value::Array(_), other) => Err(RuntimeError::type_mismatch(
                    "number",
                    other.type_name(),
                    index.span(),
                )),
                (Value::Object(_), other) => Err(RuntimeError::type_mismatch(
                    "string",
                    other.type_name(),
                    index.span(),
                )),
                (other, _) => Err(RuntimeError::type_mismatch(
                    "array or object",
                    other.type_name(),
                    member.object.span(),
                )),
            }
        }
    }
}

fn property(object: Value, name: &str, object_span: Span, key_span: Span) -> Result<Value, RuntimeError> {
    match object {
        Value::Object(mut map) => map.remove(name).ok_or_else(|| {
            RuntimeError::new(RuntimeErrorKind::MissingProperty(name.to_string()), key_span)
        }),
        other => Err(RuntimeError::type_mismatch("object", other.type_name(), object_span)),
    }
}

fn array_index(items: &[Value], index: f64, span: Span) -> Result<Value, RuntimeError> {
    if index < 0.0 || index.fract() != 0.0 {
        return Err(RuntimeError::type_mismatch(
            "non-negative integer index",
            index.to_string(),
            span,
        ));
    }
    let i = index as usize;
    items.get(i).cloned().ok_or_else(|| {
        RuntimeError::new(
            RuntimeErrorKind::IndexOutOfBounds {
                index: i,
                len: items.len(),
            },
            span,
        )
    })
}

// =============================================================================
// TESTS
// =============================================================================

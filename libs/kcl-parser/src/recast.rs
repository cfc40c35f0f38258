//! # Recast
//!
//! Deterministic tree-to-text printer producing canonical KCL source.
//!
//! ## Conventions
//!
//! - One statement per line, two-space indentation per nesting level
//! - Each pipe stage on its own line as `|> call(...)`, one level deeper than
//!   the line holding the head
//! - Arguments and array elements separated by `, `
//! - Objects inline as `{ key: value }` unless wider than
//!   [`RECAST_MAX_INLINE_WIDTH`], then one property per line
//! - Literals printed from their source spelling
//! - Parentheses only where precedence requires them
//! - Comments are not preserved
//!
//! Output never depends on spans, so printing a re-parsed copy of the output
//! yields the same text.
//!
//! ## Example
//!
//! ```rust
//! use kcl_parser::{parse_source, recast};
//!
//! let program = parse_source("const  x=( 1+2 )*3").unwrap();
//! assert_eq!(recast(&program), "const x = (1 + 2) * 3\n");
//! ```

use crate::ast::{
    BinaryExpression, BodyItem, CallExpression, Expr, FunctionExpression, MemberProperty,
    ObjectExpression, PipeExpression, Precedence, Program,
};
use config::constants::{RECAST_INDENT, RECAST_MAX_INLINE_WIDTH};

/// Print a program as canonical source text.
///
/// Every statement ends with a newline; an empty program prints as `""`.
pub fn recast(program: &Program) -> String {
    print_block(&program.body, 0)
}

/// Print a single expression at the outermost indentation level.
pub fn recast_expr(expr: &Expr) -> String {
    print_expr(expr, 0)
}

// =============================================================================
// STATEMENTS
// =============================================================================

fn indent(level: usize) -> String {
    RECAST_INDENT.repeat(level)
}

fn print_block(items: &[BodyItem], level: usize) -> String {
    let printed: Vec<String> = items.iter().map(|item| print_body_item(item, level)).collect();
    let mut out = String::new();
    for (i, text) in printed.iter().enumerate() {
        out.push_str(&indent(level));
        out.push_str(text);
        // Without a separator the next statement would continue this one.
        if printed
            .get(i + 1)
            .is_some_and(|next| next.starts_with(['(', '[', '-']))
        {
            out.push(';');
        }
        out.push('\n');
    }
    out
}

fn print_body_item(item: &BodyItem, level: usize) -> String {
    match item {
        BodyItem::VariableDeclaration(decl) => format!(
            "{} {} = {}",
            decl.kind.keyword(),
            decl.name.name,
            print_expr(&decl.init, level)
        ),
        BodyItem::ExpressionStatement(stmt) => print_expr(&stmt.expression, level),
        BodyItem::ReturnStatement(stmt) => format!("return {}", print_expr(&stmt.argument, level)),
    }
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

fn print_expr(expr: &Expr, level: usize) -> String {
    match expr {
        Expr::Literal(literal) => literal.raw.clone(),
        Expr::Identifier(ident) => ident.name.clone(),
        Expr::BinaryExpression(binary) => print_binary(binary, level),
        Expr::UnaryExpression(unary) => format!(
            "{}{}",
            unary.operator.symbol(),
            print_operand(&unary.argument, Precedence::Unary, level)
        ),
        Expr::CallExpression(call) => print_call(call, level),
        Expr::PipeExpression(pipe) => print_pipe(pipe, level),
        Expr::PipeSubstitution(_) => "%".to_string(),
        Expr::ArrayExpression(array) => format!("[{}]", print_list(&array.elements, level)),
        Expr::ObjectExpression(object) => print_object(object, level),
        Expr::MemberExpression(member) => {
            let object = print_operand(&member.object, Precedence::Postfix, level);
            match &member.property {
                MemberProperty::Identifier(ident) => format!("{object}.{}", ident.name),
                MemberProperty::Computed(index) => format!("{object}[{}]", print_expr(index, level)),
            }
        }
        Expr::FunctionExpression(function) => print_function(function, level),
    }
}

/// Print `expr`, parenthesized when it binds looser than `min`.
fn print_operand(expr: &Expr, min: Precedence, level: usize) -> String {
    let text = print_expr(expr, level);
    if expr.precedence() < min {
        format!("({text})")
    } else {
        text
    }
}

fn print_binary(binary: &BinaryExpression, level: usize) -> String {
    let prec = binary.operator.precedence();
    // Left-associative: an equal-precedence right operand needs parentheses.
    format!(
        "{} {} {}",
        print_operand(&binary.left, prec, level),
        binary.operator.symbol(),
        print_operand(&binary.right, prec.next(), level)
    )
}

fn print_list(items: &[Expr], level: usize) -> String {
    items
        .iter()
        .map(|item| print_expr(item, level))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_call(call: &CallExpression, level: usize) -> String {
    format!("{}({})", call.callee.name, print_list(&call.arguments, level))
}

fn print_pipe(pipe: &PipeExpression, level: usize) -> String {
    let mut out = print_operand(&pipe.head, Precedence::Comparison, level);
    for stage in &pipe.stages {
        out.push('\n');
        out.push_str(&indent(level + 1));
        out.push_str("|> ");
        out.push_str(&print_call(&stage.call, level + 1));
    }
    out
}

fn print_object(object: &ObjectExpression, level: usize) -> String {
    if object.properties.is_empty() {
        return "{}".to_string();
    }

    let entries: Vec<String> = object
        .properties
        .iter()
        .map(|property| format!("{}: {}", property.key.name, print_expr(&property.value, level)))
        .collect();
    let inline = format!("{{ {} }}", entries.join(", "));
    if inline.chars().count() <= RECAST_MAX_INLINE_WIDTH && !inline.contains('\n') {
        return inline;
    }

    let inner = indent(level + 1);
    let entries: Vec<String> = object
        .properties
        .iter()
        .map(|property| {
            format!(
                "{inner}{}: {}",
                property.key.name,
                print_expr(&property.value, level + 1)
            )
        })
        .collect();
    format!("{{\n{}\n{}}}", entries.join(",\n"), indent(level))
}

fn print_function(function: &FunctionExpression, level: usize) -> String {
    let params = function
        .params
        .iter()
        .map(|param| param.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    if function.body.body.is_empty() {
        return format!("({params}) => {{}}");
    }
    format!(
        "({params}) => {{\n{}{}}}",
        print_block(&function.body.body, level + 1),
        indent(level)
    )
}

// =============================================================================
// TESTS
// =============================================================================

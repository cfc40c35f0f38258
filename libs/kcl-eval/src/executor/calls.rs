//! # Calls and Pipes
//!
//! Function calls resolve the callee in scope first (user functions) and
//! fall back to the standard library.
//!
//! Pipe stages receive the running value according to their threading:
//!
//! ```text
//! a |> f(x, %)   // Placeholder: `%` evaluates to a  → f(x, a)
//! a |> f(x)      // Trailing: a appended             → f(x, a)
//! ```
//!
//! A bare `%` argument receives the running value itself rather than a copy,
//! so a sketch threaded through a pipe grows in place.

use super::{exec_block, eval_expr, ExecContext, Flow};
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::stdlib::{self, Arg, Args};
use crate::value::Value;
use config::constants::MAX_CALL_DEPTH;
use kcl_parser::ast::{CallExpression, Expr, FunctionExpression, PipeExpression, Threading};
use kcl_parser::{Span, Spanned};

fn eval_arguments(ctx: &mut ExecContext, arguments: &[Expr]) -> Result<Vec<Arg>, RuntimeError> {
    arguments
        .iter()
        .map(|expr| Ok(Arg::new(eval_expr(ctx, expr)?, expr.span())))
        .collect()
}

/// Evaluate a call expression.
pub(super) fn eval_call(ctx: &mut ExecContext, call: &CallExpression) -> Result<Value, RuntimeError> {
    let args = eval_arguments(ctx, &call.arguments)?;
    invoke(ctx, call, args)
}

/// Evaluate a pipe expression stage by stage.
pub(super) fn eval_pipe(ctx: &mut ExecContext, pipe: &PipeExpression) -> Result<Value, RuntimeError> {
    let mut current = eval_expr(ctx, &pipe.head)?;
    let mut current_span = pipe.head.span();

    for stage in &pipe.stages {
        let args = match stage.threading {
            Threading::Placeholder => eval_placeholder_arguments(ctx, &stage.call.arguments, current)?,
            Threading::Trailing => {
                let mut args = eval_arguments(ctx, &stage.call.arguments)?;
                args.push(Arg::new(current, current_span));
                args
            }
        };
        current = invoke(ctx, &stage.call, args)?;
        current_span = Span::new(pipe.span.start(), stage.call.span.end());
    }
    Ok(current)
}

/// Arguments of a stage that refers to the running value with `%`.
///
/// The last bare `%` argument is filled with `current` after every other
/// argument has been evaluated; nested uses of `%` see a copy.
fn eval_placeholder_arguments(
    ctx: &mut ExecContext,
    arguments: &[Expr],
    current: Value,
) -> Result<Vec<Arg>, RuntimeError> {
    let bare = arguments
        .iter()
        .rposition(|expr| matches!(expr, Expr::PipeSubstitution(_)));

    ctx.pipe_values.push(current);
    let evaluated = arguments
        .iter()
        .enumerate()
        .map(|(i, expr)| {
            let value = if Some(i) == bare {
                Value::None
            } else {
                eval_expr(ctx, expr)?
            };
            Ok(Arg::new(value, expr.span()))
        })
        .collect::<Result<Vec<_>, RuntimeError>>();
    let current = ctx.pipe_values.pop();

    let mut args = evaluated?;
    if let (Some(i), Some(current)) = (bare, current) {
        args[i].value = current;
    }
    Ok(args)
}

/// Call `call.callee` with already-evaluated arguments.
fn invoke(ctx: &mut ExecContext, call: &CallExpression, args: Vec<Arg>) -> Result<Value, RuntimeError> {
    let name = &call.callee.name;
    tracing::trace!(function = %name, args = args.len(), "call");

    if let Some(bound) = ctx.scope.get(name) {
        return match bound {
            Value::Function(function) => {
                let function = function.clone();
                call_user_function(ctx, &function, call, args)
            }
            _ => Err(RuntimeError::new(
                RuntimeErrorKind::NotAFunction(name.clone()),
                call.callee.span,
            )),
        };
    }

    let Some(builtin) = stdlib::lookup(name) else {
        return Err(RuntimeError::new(
            RuntimeErrorKind::UnknownFunction(name.clone()),
            call.callee.span,
        ));
    };
    let mut args = Args {
        function: name,
        call_span: call.span,
        values: args,
        tolerance: ctx.tolerance,
        output: &mut ctx.shown,
    };
    builtin(&mut args)
}

/// Run a user function in a fresh scope over the globals.
fn call_user_function(
    ctx: &mut ExecContext,
    function: &FunctionExpression,
    call: &CallExpression,
    args: Vec<Arg>,
) -> Result<Value, RuntimeError> {
    if function.params.len() != args.len() {
        return Err(RuntimeError::new(
            RuntimeErrorKind::ArgumentCount {
                function: call.callee.name.clone(),
                expected: function.params.len().to_string(),
                found: args.len(),
            },
            call.span,
        ));
    }

    if ctx.depth >= MAX_CALL_DEPTH {
        return Err(RuntimeError::new(
            RuntimeErrorKind::RecursionLimit {
                function: call.callee.name.clone(),
                limit: MAX_CALL_DEPTH,
            },
            call.span,
        ));
    }

    ctx.depth += 1;
    let saved = ctx.scope.enter_function();
    let result = bind_and_run(ctx, function, args);
    ctx.scope.exit_function(saved);
    ctx.depth -= 1;

    match result? {
        Flow::Return(value) => Ok(value),
        Flow::Continue => Ok(Value::None),
    }
}

fn bind_and_run(
    ctx: &mut ExecContext,
    function: &FunctionExpression,
    args: Vec<Arg>,
) -> Result<Flow, RuntimeError> {
    for (param, arg) in function.params.iter().zip(args) {
        if !ctx.scope.define(&param.name, arg.value) {
            return Err(RuntimeError::new(
                RuntimeErrorKind::Redeclaration(param.name.clone()),
                param.span,
            ));
        }
    }
    exec_block(ctx, &function.body.body)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::tests::{global, run};
    use super::*;

    #[test]
    fn test_user_function() {
        let source = "fn add = (a, b) => { const s = a + b return s * 2 }\nconst x = add(1, 2)";
        assert_eq!(global(source, "x"), Value::Number(6.0));
    }

    #[test]
    fn test_function_without_return_yields_none() {
        assert_eq!(global("fn f = () => { const a = 1 }\nconst x = f()", "x"), Value::None);
    }

    #[test]
    fn test_function_sees_globals_not_caller_locals() {
        let source = "const g = 10
fn inner = () => { return g }
fn outer = () => { const local = 1 return inner() + local }
const x = outer()";
        assert_eq!(global(source, "x"), Value::Number(11.0));

        let leaky = "fn inner = () => { return local }
fn outer = () => { const local = 1 return inner() }
const x = outer()";
        let err = run(leaky).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::UndefinedName("local".into()));
    }

    #[test]
    fn test_function_locals_do_not_escape() {
        let memory = run("fn f = (p) => { const t = p return t }\nconst x = f(3)").unwrap();
        assert!(memory.get("t").is_none());
        assert!(memory.get("p").is_none());
        assert_eq!(memory.get("x"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn test_argument_count_mismatch() {
        let source = "fn f = (a) => { return a }\nconst x = f(1, 2)";
        let err = run(source).unwrap_err();
        assert!(matches!(err.kind, RuntimeErrorKind::ArgumentCount { found: 2, .. }));
        assert_eq!(err.span.slice(source), Some("f(1, 2)"));
    }

    #[test]
    fn test_unbounded_recursion_is_a_runtime_error() {
        let source = "fn f = (n) => { return f(n + 1) }\nconst x = f(0)";
        let err = run(source).unwrap_err();
        assert_eq!(
            err.kind,
            RuntimeErrorKind::RecursionLimit {
                function: "f".into(),
                limit: MAX_CALL_DEPTH,
            }
        );
        assert_eq!(err.span.slice(source), Some("f(n + 1)"));
    }

    #[test]
    fn test_depth_unwinds_after_calls() {
        let mut ctx = ExecContext::new(crate::ProgramMemory::new(), config::constants::EPSILON);
        let ok = kcl_parser::parse_source("fn id = (n) => { return n }\nconst x = id(id(id(3)))").unwrap();
        assert!(exec_block(&mut ctx, &ok.body).is_ok());
        assert_eq!(ctx.depth, 0);

        let failing = kcl_parser::parse_source("fn f = (n) => { return n / 0 }\nconst y = f(1)").unwrap();
        assert!(exec_block(&mut ctx, &failing.body).is_err());
        assert_eq!(ctx.depth, 0);
    }

    #[test]
    fn test_unknown_function() {
        let source = "const x = cube(1)";
        let err = run(source).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::UnknownFunction("cube".into()));
        assert_eq!(err.span.slice(source), Some("cube"));
    }

    #[test]
    fn test_calling_a_number() {
        let err = run("const f = 1\nconst x = f()").unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::NotAFunction("f".into()));
    }

    #[test]
    fn test_pipe_threading() {
        let placeholder = "fn sub = (a, b) => { return a - b }\nconst x = 10 |> sub(%, 3)";
        assert_eq!(global(placeholder, "x"), Value::Number(7.0));
        let trailing = "fn sub = (a, b) => { return a - b }\nconst x = 10 |> sub(3)";
        assert_eq!(global(trailing, "x"), Value::Number(-7.0));
    }

    #[test]
    fn test_bare_placeholder_takes_running_value() {
        let source = "fn pick = (a, b, c) => { return [a, b, c] }
const x = 5 |> pick(% + 1, %, %)";
        assert_eq!(
            global(source, "x"),
            Value::Array(vec![Value::Number(6.0), Value::Number(5.0), Value::Number(5.0)])
        );
    }

    #[test]
    fn test_pipe_does_not_change_bound_sketch() {
        let source = "const base = startSketchAt([0, 0]) |> line([1, 0], %)
const longer = base |> line([0, 1], %) |> line([-1, 0], %)";
        let memory = run(source).unwrap();
        let Some(Value::SketchGroup(base)) = memory.get("base") else { panic!("base") };
        let Some(Value::SketchGroup(longer)) = memory.get("longer") else { panic!("longer") };
        assert_eq!(base.value.len(), 1);
        assert_eq!(longer.value.len(), 3);
    }

    #[test]
    fn test_nested_pipe_in_stage_arguments() {
        let source = "fn sub = (a, b) => { return a - b }
const x = 10 |> sub(%, 1 |> sub(%, 3)) |> sub(%, 1)";
        // inner: 1 - 3 = -2; 10 - (-2) = 12; 12 - 1 = 11
        assert_eq!(global(source, "x"), Value::Number(11.0));
    }

    #[test]
    fn test_trailing_value_type_error_points_at_pipe_prefix() {
        let source = "const x = 'nope' |> xLine(1)";
        let err = run(source).unwrap_err();
        assert_eq!(err.span.slice(source), Some("'nope'"));
    }
}

//! # Executor
//!
//! Runs a parsed program statement by statement and produces a fresh
//! [`ProgramMemory`].
//!
//! ## Architecture
//!
//! ```text
//! Program ──▶ exec_block ──▶ eval_expr ──┬─▶ operators / members / literals
//!                                        ├─▶ pipes (threading per stage)
//!                                        └─▶ calls ──┬─▶ user functions
//!                                                    └─▶ stdlib::lookup
//! ```
//!
//! ## Example
//!
//! ```rust
//! use kcl_eval::{executor::Executor, ProgramMemory, value::Value};
//!
//! let program = kcl_parser::parse_source("const x = 2 * 3").unwrap();
//! let memory = Executor::new().execute(&program, ProgramMemory::new()).unwrap();
//! assert_eq!(memory.get("x"), Some(&Value::Number(6.0)));
//! ```

mod calls;
mod expressions;

use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::memory::ProgramMemory;
use crate::scope::Scope;
use crate::value::Value;
use config::constants::{PipelineConfig, EPSILON};
use kcl_parser::ast::{BodyItem, Program};
use kcl_parser::Diagnostic;

pub use expressions::eval_expr;

// =============================================================================
// EXECUTION CONTEXT
// =============================================================================

/// State carried through one execution.
pub struct ExecContext {
    /// Variable scope; the global level becomes `ProgramMemory::root`.
    pub scope: Scope,
    /// Values handed to `show`.
    pub shown: Vec<Value>,
    /// Running values of the enclosing pipe stages, innermost last.
    pipe_values: Vec<Value>,
    /// Parallel / vertical tolerance for geometry.
    pub tolerance: f64,
    /// Number of user-function calls currently active.
    pub depth: usize,
}

impl ExecContext {
    /// Context whose globals are seeded from `memory`.
    pub fn new(memory: ProgramMemory, tolerance: f64) -> Self {
        Self {
            scope: Scope::with_globals(memory.root),
            shown: memory.sketch,
            pipe_values: Vec::new(),
            tolerance,
            depth: 0,
        }
    }

    /// Value `%` refers to, if inside a pipe stage.
    pub fn pipe_value(&self) -> Option<&Value> {
        self.pipe_values.last()
    }
}

/// Outcome of running a block.
enum Flow {
    Continue,
    Return(Value),
}

/// Run `items` in order, stopping at the first `return`.
fn exec_block(ctx: &mut ExecContext, items: &[BodyItem]) -> Result<Flow, RuntimeError> {
    for item in items {
        match item {
            BodyItem::VariableDeclaration(decl) => {
                let value = eval_expr(ctx, &decl.init)?;
                if !ctx.scope.define(&decl.name.name, value) {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::Redeclaration(decl.name.name.clone()),
                        decl.name.span,
                    ));
                }
                tracing::trace!(name = %decl.name.name, kind = decl.kind.keyword(), "declared");
            }
            BodyItem::ExpressionStatement(stmt) => {
                eval_expr(ctx, &stmt.expression)?;
            }
            BodyItem::ReturnStatement(stmt) => {
                return Ok(Flow::Return(eval_expr(ctx, &stmt.argument)?));
            }
        }
    }
    Ok(Flow::Continue)
}

// =============================================================================
// EXECUTOR
// =============================================================================

/// Program executor.
#[derive(Debug, Clone, Copy)]
pub struct Executor {
    tolerance: f64,
}

impl Executor {
    /// Executor using the default [`EPSILON`] tolerance.
    pub fn new() -> Self {
        Self { tolerance: EPSILON }
    }

    /// Executor using the tolerance of `config`.
    pub fn with_config(config: &PipelineConfig) -> Self {
        Self {
            tolerance: config.tolerance,
        }
    }

    /// Execute `program`, seeding globals from `memory`.
    ///
    /// ## Parameters
    ///
    /// - `program`: Parsed program
    /// - `memory`: Initial bindings; usually [`ProgramMemory::new`]
    ///
    /// ## Returns
    ///
    /// A new memory holding every global binding, the `show` output and the
    /// top-level `return` value, or the first runtime error
    pub fn execute(&self, program: &Program, memory: ProgramMemory) -> Result<ProgramMemory, RuntimeError> {
        tracing::debug!(statements = program.body.len(), "executing program");
        let mut ctx = ExecContext::new(memory, self.tolerance);
        let return_value = match exec_block(&mut ctx, &program.body) {
            Ok(Flow::Return(value)) => Some(value),
            Ok(Flow::Continue) => None,
            Err(err) => {
                tracing::debug!(error = %err, span = ?err.span, "execution failed");
                return Err(err);
            }
        };
        Ok(ProgramMemory {
            root: ctx.scope.into_globals(),
            sketch: ctx.shown,
            return_value,
        })
    }

    /// Lex, parse and execute `source` from empty memory.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use kcl_eval::executor::Executor;
    /// use kcl_parser::DiagnosticKind;
    ///
    /// let err = Executor::new().execute_source("const x = 1 / 0").unwrap_err();
    /// assert_eq!(err.kind, DiagnosticKind::Runtime);
    /// ```
    pub fn execute_source(&self, source: &str) -> Result<ProgramMemory, Diagnostic> {
        let program = kcl_parser::parse_source(source)?;
        Ok(self.execute(&program, ProgramMemory::new())?)
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kcl_parser::Span;

    pub(super) fn run(source: &str) -> Result<ProgramMemory, RuntimeError> {
        let program = kcl_parser::parse_source(source).unwrap_or_else(|e| panic!("{source}: {e}"));
        Executor::new().execute(&program, ProgramMemory::new())
    }

    pub(super) fn global(source: &str, name: &str) -> Value {
        let memory = run(source).unwrap_or_else(|e| panic!("{source}: {e}"));
        memory.get(name).cloned().unwrap_or_else(|| panic!("{name} not bound"))
    }

    #[test]
    fn test_declarations_in_order() {
        let memory = run("const a = 1\nlet b = a + 1\nvar c = b * 10").unwrap();
        assert_eq!(memory.get("c"), Some(&Value::Number(20.0)));
        assert_eq!(memory.root.len(), 3);
    }

    #[test]
    fn test_redeclaration_is_error() {
        let err = run("const a = 1\nconst a = 2").unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::Redeclaration("a".into()));
        assert_eq!(err.span, Span::new(18, 19));
    }

    #[test]
    fn test_top_level_return() {
        let memory = run("const a = 4\nreturn a * 2\nconst b = 1").unwrap();
        assert_eq!(memory.return_value, Some(Value::Number(8.0)));
        assert!(memory.get("b").is_none());
    }

    #[test]
    fn test_memory_seeds_globals() {
        let program = kcl_parser::parse_source("const y = x + 1").unwrap();
        let mut seed = ProgramMemory::new();
        seed.root.insert("x".into(), Value::Number(41.0));
        let memory = Executor::new().execute(&program, seed).unwrap();
        assert_eq!(memory.get("y"), Some(&Value::Number(42.0)));
        assert_eq!(memory.get("x"), Some(&Value::Number(41.0)));
    }

    #[test]
    fn test_show_accumulates_in_call_order() {
        let memory = run("show(1, 2)\nshow('three')").unwrap();
        assert_eq!(
            memory.sketch,
            vec![Value::Number(1.0), Value::Number(2.0), Value::from("three")]
        );
    }

    #[test]
    fn test_execute_source_flattens_errors() {
        let executor = Executor::new();
        assert_eq!(
            executor.execute_source("const = 1").unwrap_err().kind,
            kcl_parser::DiagnosticKind::Syntax
        );
        assert!(executor.execute_source("const a = 1").is_ok());
    }
}

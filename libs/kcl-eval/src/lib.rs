//! # KCL Eval
//!
//! Executes parsed KCL programs into [`ProgramMemory`] and provides the
//! sketch standard library.
//!
//! ## Architecture
//!
//! ```text
//! Program → Executor → ProgramMemory { root, sketch, return }
//!              │
//!              └─▶ stdlib (startSketchAt, lineTo, angledLineThatIntersects, segEndX, ...)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use kcl_eval::{execute, ProgramMemory, value::Value};
//!
//! let source = "const part001 = startSketchAt([0, 0])
//!   |> lineTo({ to: [2, 2], tag: \"yo\" }, %)
//! const x = segEndX('yo', part001)";
//! let program = kcl_parser::parse_source(source).unwrap();
//! let memory = execute(&program, ProgramMemory::new()).unwrap();
//! assert_eq!(memory.get("x"), Some(&Value::Number(2.0)));
//! ```
//!
//! ## Pipeline Integration
//!
//! ```text
//! kcl-parser → kcl-eval → kcl-session → kcl-lsp / wasm
//! ```

pub mod error;
pub mod executor;
pub mod memory;
pub mod object;
pub mod scope;
pub mod sketch;
pub mod stdlib;
pub mod value;

pub use error::{RuntimeError, RuntimeErrorKind};
pub use executor::Executor;
pub use memory::ProgramMemory;
pub use object::ObjectMap;
pub use sketch::{ExtrudeGroup, SegmentKind, SketchGroup};
pub use value::Value;

use kcl_parser::{Diagnostic, Program};

/// Execute `program` with the default tolerance.
///
/// ## Parameters
///
/// - `program`: Parsed program
/// - `memory`: Initial global bindings
///
/// ## Returns
///
/// A fresh memory, or the first runtime error
pub fn execute(program: &Program, memory: ProgramMemory) -> Result<ProgramMemory, RuntimeError> {
    Executor::new().execute(program, memory)
}

/// Lex, parse and execute `source`, flattening any failure to a diagnostic.
pub fn execute_source(source: &str) -> Result<ProgramMemory, Diagnostic> {
    Executor::new().execute_source(source)
}

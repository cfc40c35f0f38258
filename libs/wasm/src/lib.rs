//! WASM-facing entry points for the KCL pipeline.
//!
//! This crate is compiled to a `cdylib` and consumed from JavaScript via
//! `wasm-bindgen`. Trees, paths, spans and memory cross the boundary as JSON
//! strings; failures are thrown as plain diagnostic objects. Native tests use
//! the `*_internal` helpers, which return Rust types directly.
//!
//! ```
//! let program = kcl_wasm::parse_internal("const a = 1 + 2").unwrap();
//! let memory = kcl_wasm::execute_internal(&program, "{}").unwrap();
//! assert!(memory.contains("\"a\""));
//! ```

use config::constants::{PipelineConfig, EPSILON};
use kcl_eval::{Executor, ProgramMemory};
use kcl_parser::{lexer, parse_source, NodePath, Program};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod diagnostics;

pub use diagnostics::{Diagnostic, Severity, Stage};

/// Installs a panic hook that forwards Rust panics to the browser console.
///
/// # Examples
/// ```no_run
/// // In JavaScript: import and call once at startup.
/// // import { init_panic_hook } from "kcl-wasm";
/// // init_panic_hook();
/// ```
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Returns the tolerance the geometry library uses for parallel lines.
///
/// # Examples
/// ```
/// assert!(kcl_wasm::default_tolerance() > 0.0);
/// ```
#[wasm_bindgen]
pub fn default_tolerance() -> f64 {
    EPSILON
}

// =============================================================================
// JSON BOUNDARY
// =============================================================================

fn decode<T: DeserializeOwned>(argument: &str, json: &str) -> Result<T, Diagnostic> {
    serde_json::from_str(json).map_err(|err| Diagnostic::invalid_input(argument, &err))
}

fn encode<T: Serialize>(value: &T) -> Result<String, Diagnostic> {
    serde_json::to_string(value).map_err(|err| Diagnostic::invalid_input("output", &err))
}

fn to_js(diagnostic: Diagnostic) -> JsValue {
    diagnostic.to_js_object()
}

// =============================================================================
// HOST-ONLY HELPERS
// =============================================================================

/// Tokenizes `source`.
///
/// ## Returns
///
/// The token list as JSON
pub fn lex_internal(source: &str) -> Result<String, Diagnostic> {
    let tokens = lexer::lex(source).map_err(kcl_parser::Diagnostic::from)?;
    encode(&tokens)
}

/// Parses `source` into a program.
///
/// ## Returns
///
/// The program as JSON
pub fn parse_internal(source: &str) -> Result<String, Diagnostic> {
    encode(&parse_source(source).map_err(kcl_parser::Diagnostic::from)?)
}

/// Executes a JSON program against a JSON memory.
///
/// ## Parameters
///
/// - `program_json`: Program produced by [`parse_internal`]
/// - `memory_json`: Seed memory; `{}` starts from an empty one
///
/// ## Returns
///
/// The resulting memory as JSON
pub fn execute_internal(program_json: &str, memory_json: &str) -> Result<String, Diagnostic> {
    let program: Program = decode("program", program_json)?;
    let memory: ProgramMemory = if matches!(memory_json.trim(), "" | "{}") {
        ProgramMemory::new()
    } else {
        decode("memory", memory_json)?
    };
    let executor = Executor::with_config(&PipelineConfig::default());
    let memory = executor
        .execute(&program, memory)
        .map_err(kcl_parser::Diagnostic::from)?;
    encode(&memory)
}

/// Prints a JSON program in canonical form.
pub fn recast_internal(program_json: &str) -> Result<String, Diagnostic> {
    let program: Program = decode("program", program_json)?;
    Ok(kcl_parser::recast(&program))
}

/// Source range of the node at a JSON path, as a JSON span.
pub fn range_of_internal(program_json: &str, path_json: &str) -> Result<String, Diagnostic> {
    let program: Program = decode("program", program_json)?;
    let path: NodePath = decode("path", path_json)?;
    encode(&kcl_parser::range_of(&program, &path)?)
}

/// Path of the innermost node containing byte `offset`, as JSON.
pub fn path_of_internal(program_json: &str, offset: usize) -> Result<String, Diagnostic> {
    let program: Program = decode("program", program_json)?;
    encode(&kcl_parser::path_of(&program, offset)?)
}

// =============================================================================
// EXPORTS
// =============================================================================

/// Tokenizes `source`.
///
/// # Errors
/// Throws a diagnostic object when lexing fails.
///
/// # Examples
/// ```no_run
/// // In JavaScript: const tokens = JSON.parse(lex("const a = 1"));
/// ```
#[wasm_bindgen]
pub fn lex(source: &str) -> Result<String, JsValue> {
    lex_internal(source).map_err(to_js)
}

/// Parses `source` and returns the program as JSON.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // try {
/// //   const program = parse("const a = 1");
/// // } catch (diag) {
/// //   console.error(diag.message, diag.start, diag.end);
/// // }
/// ```
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<String, JsValue> {
    parse_internal(source).map_err(to_js)
}

/// Executes a JSON program against a JSON memory and returns the new memory.
#[wasm_bindgen]
pub fn execute(program_json: &str, memory_json: &str) -> Result<String, JsValue> {
    execute_internal(program_json, memory_json).map_err(to_js)
}

#[wasm_bindgen]
pub fn recast(program_json: &str) -> Result<String, JsValue> {
    recast_internal(program_json).map_err(to_js)
}

#[wasm_bindgen]
pub fn range_of(program_json: &str, path_json: &str) -> Result<String, JsValue> {
    range_of_internal(program_json, path_json).map_err(to_js)
}

#[wasm_bindgen]
pub fn path_of(program_json: &str, offset: usize) -> Result<String, JsValue> {
    path_of_internal(program_json, offset).map_err(to_js)
}

#[cfg(test)]
mod tests;

//! WASM-compatible diagnostic types.
//!
//! This module provides JavaScript-compatible wrappers for pipeline
//! diagnostics and for failures at the JSON boundary.

use kcl_parser::{Diagnostic as RustDiagnostic, PathError};
use wasm_bindgen::prelude::*;

/// Diagnostic severity for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Where a diagnostic comes from.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexical,
    Syntax,
    Runtime,
    /// A node path did not resolve.
    Path,
    /// A JSON argument could not be decoded.
    Input,
}

/// A diagnostic message for JavaScript.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // try { parse(source) } catch (diag) {
/// //   console.log(diag.message, diag.start, diag.end);
/// // }
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    stage: Stage,
    message: String,
    start: usize,
    end: usize,
}

#[wasm_bindgen]
impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn message(&self) -> String {
        self.message.clone()
    }

    /// Byte offset where the diagnostic starts in the source.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Converts this diagnostic to a plain JavaScript object.
    ///
    /// This is useful for passing data between the worker and main thread,
    /// as wasm-bindgen wrappers cannot be transferred.
    pub fn to_js_object(&self) -> JsValue {
        use js_sys::{Object, Reflect};

        let obj = Object::new();
        let fields = [
            ("severity", JsValue::from(self.severity as i32)),
            ("stage", JsValue::from(self.stage as i32)),
            ("message", JsValue::from_str(&self.message)),
            ("start", JsValue::from(self.start as f64)),
            ("end", JsValue::from(self.end as f64)),
        ];
        for (key, value) in fields {
            // Setting a data property on a fresh plain object cannot throw.
            let _ = Reflect::set(&obj, &JsValue::from_str(key), &value);
        }
        JsValue::from(obj)
    }
}

impl Diagnostic {
    /// A diagnostic for a malformed JSON argument.
    pub fn invalid_input(argument: &str, err: &serde_json::Error) -> Self {
        Self {
            severity: Severity::Error,
            stage: Stage::Input,
            message: format!("invalid {argument}: {err}"),
            start: 0,
            end: 0,
        }
    }
}

impl From<RustDiagnostic> for Diagnostic {
    fn from(diag: RustDiagnostic) -> Self {
        Self {
            severity: if diag.fatal {
                Severity::Error
            } else {
                Severity::Warning
            },
            stage: match diag.kind {
                kcl_parser::DiagnosticKind::Lexical => Stage::Lexical,
                kcl_parser::DiagnosticKind::Syntax => Stage::Syntax,
                kcl_parser::DiagnosticKind::Runtime => Stage::Runtime,
            },
            message: diag.message,
            start: diag.span.start(),
            end: diag.span.end(),
        }
    }
}

impl From<PathError> for Diagnostic {
    fn from(err: PathError) -> Self {
        let (start, end) = match &err {
            PathError::NoMatchingNode { span } => (span.start(), span.end()),
            PathError::OffsetOutOfRange { offset, .. } => (*offset, *offset),
            PathError::StaleStep { .. } | PathError::NotANode => (0, 0),
        };
        Self {
            severity: Severity::Error,
            stage: Stage::Path,
            message: err.to_string(),
            start,
            end,
        }
    }
}

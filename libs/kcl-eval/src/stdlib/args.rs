//! # Call Arguments
//!
//! Evaluated arguments of a standard-library call, each paired with the span
//! of the expression that produced it, plus typed accessors that report
//! mismatches on that span.

use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::sketch::SketchGroup;
use crate::value::Value;
use glam::DVec2;
use kcl_parser::Span;

/// One evaluated argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub value: Value,
    pub span: Span,
}

impl Arg {
    pub fn new(value: Value, span: Span) -> Self {
        Self { value, span }
    }

    pub fn number(&self) -> Result<f64, RuntimeError> {
        self.value.expect_number(self.span)
    }

    pub fn string(&self) -> Result<&str, RuntimeError> {
        self.value.expect_str(self.span)
    }

    pub fn point(&self) -> Result<DVec2, RuntimeError> {
        self.value.expect_point(self.span)
    }

    pub fn sketch(&self) -> Result<&SketchGroup, RuntimeError> {
        self.value.expect_sketch(self.span)
    }

    /// Property `key` of an object argument.
    pub fn field(&self, key: &str) -> Result<&Value, RuntimeError> {
        match &self.value {
            Value::Object(map) => map.get(key).ok_or_else(|| {
                RuntimeError::new(RuntimeErrorKind::MissingProperty(key.to_string()), self.span)
            }),
            other => Err(RuntimeError::type_mismatch("object", other.type_name(), self.span)),
        }
    }

    /// Optional string `tag` property of an object argument.
    pub fn tag(&self) -> Result<Option<String>, RuntimeError> {
        match &self.value {
            Value::Object(map) => match map.get("tag") {
                None | Some(Value::None) => Ok(None),
                Some(tag) => Ok(Some(tag.expect_str(self.span)?.to_string())),
            },
            _ => Ok(None),
        }
    }
}

/// Arguments handed to a standard-library function.
pub struct Args<'a> {
    /// Callee name, for arity messages.
    pub function: &'a str,
    /// Range of the whole call.
    pub call_span: Span,
    pub values: Vec<Arg>,
    /// Parallel / vertical tolerance.
    pub tolerance: f64,
    /// Accumulator behind `show`.
    pub output: &'a mut Vec<Value>,
}

impl<'a> Args<'a> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn arity_error(&self, expected: impl Into<String>) -> RuntimeError {
        RuntimeError::new(
            RuntimeErrorKind::ArgumentCount {
                function: self.function.to_string(),
                expected: expected.into(),
                found: self.values.len(),
            },
            self.call_span,
        )
    }

    /// Require exactly `n` arguments.
    pub fn expect_len(&self, n: usize) -> Result<(), RuntimeError> {
        if self.values.len() == n {
            Ok(())
        } else {
            Err(self.arity_error(n.to_string()))
        }
    }

    /// Require between `min` and `max` arguments, inclusive.
    pub fn expect_len_between(&self, min: usize, max: usize) -> Result<(), RuntimeError> {
        if (min..=max).contains(&self.values.len()) {
            Ok(())
        } else {
            Err(self.arity_error(format!("{min} to {max}")))
        }
    }

    pub fn get(&self, index: usize) -> Result<&Arg, RuntimeError> {
        self.values
            .get(index)
            .ok_or_else(|| self.arity_error(format!("at least {}", index + 1)))
    }

    pub fn number(&self, index: usize) -> Result<f64, RuntimeError> {
        self.get(index)?.number()
    }

    pub fn string(&self, index: usize) -> Result<&str, RuntimeError> {
        self.get(index)?.string()
    }

    pub fn sketch(&self, index: usize) -> Result<&SketchGroup, RuntimeError> {
        self.get(index)?.sketch()
    }

    /// Moves the sketch argument at `index` out of the list, leaving `none`.
    ///
    /// Primitives extend the sketch they take instead of copying it.
    pub fn take_sketch(&mut self, index: usize) -> Result<SketchGroup, RuntimeError> {
        if index >= self.values.len() {
            return Err(self.arity_error(format!("at least {}", index + 1)));
        }
        let arg = &mut self.values[index];
        match std::mem::replace(&mut arg.value, Value::None) {
            Value::SketchGroup(sketch) => Ok(*sketch),
            other => {
                let err = RuntimeError::type_mismatch("sketch", other.type_name(), arg.span);
                arg.value = other;
                Err(err)
            }
        }
    }

    // =========================================================================
    // SKETCH DATA
    // =========================================================================

    /// `[x, y]` or `{ <key>: [x, y], tag }`.
    pub fn point_data(&self, index: usize, key: &str) -> Result<(DVec2, Option<String>), RuntimeError> {
        let arg = self.get(index)?;
        match &arg.value {
            Value::Object(_) => {
                let point = arg.field(key)?.expect_point(arg.span)?;
                Ok((point, arg.tag()?))
            }
            _ => Ok((arg.point()?, None)),
        }
    }

    /// `n` or `{ <key>: n, tag }`.
    pub fn number_data(&self, index: usize, key: &str) -> Result<(f64, Option<String>), RuntimeError> {
        let arg = self.get(index)?;
        match &arg.value {
            Value::Object(_) => {
                let n = arg.field(key)?.expect_number(arg.span)?;
                Ok((n, arg.tag()?))
            }
            _ => Ok((arg.number()?, None)),
        }
    }

    /// `[angle, n]` or `{ angle, <key>: n, tag }`.
    pub fn angle_data(&self, index: usize, key: &str) -> Result<(f64, f64, Option<String>), RuntimeError> {
        let arg = self.get(index)?;
        match &arg.value {
            Value::Object(_) => {
                let angle = arg.field("angle")?.expect_number(arg.span)?;
                let n = arg.field(key)?.expect_number(arg.span)?;
                Ok((angle, n, arg.tag()?))
            }
            _ => {
                let pair = arg
                    .value
                    .as_point()
                    .ok_or_else(|| RuntimeError::type_mismatch("[angle, number]", arg.value.type_name(), arg.span))?;
                Ok((pair.x, pair.y, None))
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! # Runtime Values
//!
//! Dynamic values produced by executing KCL expressions.

use crate::error::RuntimeError;
use crate::object::ObjectMap;
use crate::sketch::{ExtrudeGroup, SketchGroup};
use glam::DVec2;
use kcl_parser::ast::FunctionExpression;
use kcl_parser::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A KCL runtime value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    None,
    Number(f64),
    String(String),
    Bool(bool),
    Array(Vec<Value>),
    Object(ObjectMap),
    SketchGroup(Box<SketchGroup>),
    ExtrudeGroup(Box<ExtrudeGroup>),
    Function(Box<FunctionExpression>),
}

impl Value {
    /// Name used in type-mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::SketchGroup(_) => "sketch",
            Value::ExtrudeGroup(_) => "solid",
            Value::Function(_) => "function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a two-element numeric array to a point.
    pub fn as_point(&self) -> Option<DVec2> {
        match self {
            Value::Array(items) if items.len() == 2 => {
                Some(DVec2::new(items[0].as_number()?, items[1].as_number()?))
            }
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Checked accessors: `span` locates the expression that produced `self`.
    // -------------------------------------------------------------------------

    pub fn expect_number(&self, span: Span) -> Result<f64, RuntimeError> {
        self.as_number()
            .ok_or_else(|| RuntimeError::type_mismatch("number", self.type_name(), span))
    }

    pub fn expect_str(&self, span: Span) -> Result<&str, RuntimeError> {
        self.as_str()
            .ok_or_else(|| RuntimeError::type_mismatch("string", self.type_name(), span))
    }

    pub fn expect_bool(&self, span: Span) -> Result<bool, RuntimeError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(RuntimeError::type_mismatch("bool", other.type_name(), span)),
        }
    }

    pub fn expect_point(&self, span: Span) -> Result<DVec2, RuntimeError> {
        self.as_point()
            .ok_or_else(|| RuntimeError::type_mismatch("[x, y] point", self.type_name(), span))
    }

    pub fn expect_sketch(&self, span: Span) -> Result<&SketchGroup, RuntimeError> {
        match self {
            Value::SketchGroup(sketch) => Ok(sketch.as_ref()),
            other => Err(RuntimeError::type_mismatch("sketch", other.type_name(), span)),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<SketchGroup> for Value {
    fn from(sketch: SketchGroup) -> Self {
        Value::SketchGroup(Box::new(sketch))
    }
}

impl From<ExtrudeGroup> for Value {
    fn from(solid: ExtrudeGroup) -> Self {
        Value::ExtrudeGroup(Box::new(solid))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "\"{s}\""),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {key}: {value}")?;
                }
                if map.is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
            Value::SketchGroup(sketch) => write!(f, "<sketch with {} segment(s)>", sketch.value.len()),
            Value::ExtrudeGroup(solid) => write!(f, "<solid with {} face(s)>", solid.value.len()),
            Value::Function(function) => write!(f, "<function of {} parameter(s)>", function.params.len()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

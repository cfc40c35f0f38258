//! # Program Memory
//!
//! The result of one execution: global bindings, the values handed to
//! `show`, and the top-level `return` value.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bindings and output of an executed program.
///
/// A fresh memory is produced by every execution; the input memory only
/// seeds the global scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramMemory {
    /// Global bindings by name.
    pub root: BTreeMap<String, Value>,
    /// Values passed to `show`, in call order.
    pub sketch: Vec<Value>,
    /// Value of a top-level `return`, if one ran.
    #[serde(rename = "return")]
    pub return_value: Option<Value>,
}

impl ProgramMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Global binding named `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }
}

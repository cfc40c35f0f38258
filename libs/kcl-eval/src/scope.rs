//! # Variable Scope
//!
//! Lexical scoping for KCL bindings.
//!
//! ## Scoping Rules
//!
//! - Names resolve from the innermost level outwards
//! - A name may be declared once per level; inner levels may shadow
//! - Function calls see the global level plus their own locals, never the
//!   caller's locals
//!
//! ## Example
//!
//! ```rust
//! use kcl_eval::scope::Scope;
//! use kcl_eval::value::Value;
//!
//! let mut scope = Scope::new();
//! assert!(scope.define("x", Value::Number(10.0)));
//! assert!(!scope.define("x", Value::Number(11.0)));
//! assert_eq!(scope.get("x"), Some(&Value::Number(10.0)));
//! ```

use crate::value::Value;
use std::collections::{BTreeMap, HashMap};

/// A single scope level containing variable bindings.
#[derive(Debug, Clone, Default)]
struct ScopeLevel {
    bindings: HashMap<String, Value>,
}

/// Stack of binding levels, global level first.
#[derive(Debug, Clone)]
pub struct Scope {
    levels: Vec<ScopeLevel>,
}

/// Levels hidden while a function body runs; see [`Scope::enter_function`].
#[derive(Debug)]
pub struct SavedLevels(Vec<ScopeLevel>);

impl Scope {
    /// Scope with an empty global level.
    pub fn new() -> Self {
        Self {
            levels: vec![ScopeLevel::default()],
        }
    }

    /// Scope whose global level starts with `globals`.
    pub fn with_globals(globals: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            levels: vec![ScopeLevel {
                bindings: globals.into_iter().collect(),
            }],
        }
    }

    /// Push a new scope level.
    pub fn push(&mut self) {
        self.levels.push(ScopeLevel::default());
    }

    /// Pop the current scope level. The global level is never popped.
    pub fn pop(&mut self) {
        if self.levels.len() > 1 {
            self.levels.pop();
        }
    }

    /// Bind `name` in the innermost level.
    ///
    /// ## Returns
    ///
    /// `false` (leaving the existing binding untouched) if the innermost
    /// level already declares `name`
    pub fn define(&mut self, name: &str, value: Value) -> bool {
        let Some(level) = self.levels.last_mut() else {
            return false;
        };
        if level.bindings.contains_key(name) {
            return false;
        }
        level.bindings.insert(name.to_string(), value);
        true
    }

    /// Look up `name`, innermost level first.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.levels
            .iter()
            .rev()
            .find_map(|level| level.bindings.get(name))
    }

    /// Hide every non-global level and push a fresh one for a function body.
    pub fn enter_function(&mut self) -> SavedLevels {
        let saved = self.levels.split_off(1);
        self.push();
        SavedLevels(saved)
    }

    /// Drop the function's levels and bring back the caller's.
    pub fn exit_function(&mut self, saved: SavedLevels) {
        self.levels.truncate(1);
        self.levels.extend(saved.0);
    }

    /// Consume the scope, returning the global bindings in name order.
    pub fn into_globals(mut self) -> BTreeMap<String, Value> {
        self.levels.truncate(1);
        self.levels
            .pop()
            .map(|level| level.bindings.into_iter().collect())
            .unwrap_or_default()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Session variable scope shared across one query execution.

use crate::access::Value;
use std::collections::HashMap;

/// Mutable `@variable` store read by variable references and written by `:=`.
///
/// A scope is owned by the caller and lent mutably to one evaluation at a
/// time; it does no locking of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    pub variables: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables(variables: HashMap<String, Value>) -> Self {
        Self { variables }
    }

    /// Current value of a variable; unset variables read as `NULL`.
    pub fn get(&self, name: &str) -> Value {
        self.variables.get(name).cloned().unwrap_or(Value::Null)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }
}

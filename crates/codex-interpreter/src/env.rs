//! Environment and bindings for the CodeX interpreter.

use std::collections::HashMap;

use crate::value::Value;
use codex_syntax::ast::DataType;
use codex_syntax::error::{error, Result};

#[derive(Debug, Clone)]
pub struct Binding {
    /// The runtime value of this binding
    pub value: Value,
    /// Declared type, used to convert `XIN` input
    pub ty: DataType,
}

/// Chain of lexical scopes, innermost last. The root scope is never popped.
#[derive(Debug, Clone)]
pub struct Env {
    scopes: Vec<HashMap<String, Binding>>,
}

impl Default for Env {
    fn default() -> Self {
        Self::new_root()
    }
}

impl Env {
    pub fn new_root() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub(crate) fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of open scopes, the root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Top-level bindings sorted by name.
    pub fn vars_snapshot(&self) -> Vec<(String, DataType, Value)> {
        let mut vars: Vec<_> = self.scopes[0]
            .iter()
            .map(|(k, b)| (k.clone(), b.ty, b.value.clone()))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }

    /// Nearest binding of `name`, searching outwards from the innermost scope.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Binds a fresh slot in the innermost scope. Shadowing an outer scope is
    /// fine; declaring the same name twice in one scope is not.
    pub(crate) fn define(&mut self, name: &str, value: Value, ty: DataType) -> Result<()> {
        let Some(scope) = self.scopes.last_mut() else {
            return error("No open scope");
        };
        if scope.contains_key(name) {
            return error(format!("Variable '{}' is already declared in this scope", name));
        }
        scope.insert(name.to_string(), Binding { value, ty });
        Ok(())
    }

    pub(crate) fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        match self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name)) {
            Some(b) => {
                b.value = value;
                Ok(())
            }
            None => error(format!("Assignment to undefined variable '{}'", name)),
        }
    }
}

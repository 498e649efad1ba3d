use std::collections::HashMap;

use crate::scope::Scope;
use crate::value::Value;

/// Mutable variables of one template pass.
///
/// Local bindings (from assignments and `eval` directives) shadow the
/// read-only scope chain the environment was seeded with. Names are
/// case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct Environment<'s> {
    bindings: HashMap<String, Value>,
    scope: Option<&'s Scope>,
}

impl<'s> Environment<'s> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment that falls back to `scope` for unbound names.
    pub fn with_scope(scope: &'s Scope) -> Self {
        Self {
            bindings: HashMap::new(),
            scope: Some(scope),
        }
    }

    pub fn scope(&self) -> Option<&'s Scope> {
        self.scope
    }

    /// Bind `name`, overwriting any prior local binding.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// A binding made in this environment, ignoring the scope chain.
    pub fn local(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Look a variable up: local bindings first, then the scope chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.bindings.get(name) {
            return Some(v.clone());
        }
        self.scope
            .and_then(|scope| scope.resolve(name))
            .map(Value::from_scope_text)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
            || self.scope.is_some_and(|scope| scope.resolve(name).is_some())
    }
}

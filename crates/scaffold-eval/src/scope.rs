//! Parent-linked scope chain, one node per model nesting level.
//!
//! Scopes are populated by whatever walks the model (domain, then each
//! entity, then each member) and are read-only once shared. They are
//! `Send + Sync`, so independent template passes can share one chain.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeLevel {
    Domain,
    Entity,
    Member,
    Custom(String),
}

impl std::fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeLevel::Domain => f.write_str("domain"),
            ScopeLevel::Entity => f.write_str("entity"),
            ScopeLevel::Member => f.write_str("member"),
            ScopeLevel::Custom(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    level: ScopeLevel,
    bindings: BTreeMap<String, String>,
    parent: Option<Arc<Scope>>,
}

impl Scope {
    pub fn root(level: ScopeLevel) -> Self {
        Self {
            level,
            bindings: BTreeMap::new(),
            parent: None,
        }
    }

    pub fn child(parent: &Arc<Scope>, level: ScopeLevel) -> Self {
        Self {
            level,
            bindings: BTreeMap::new(),
            parent: Some(Arc::clone(parent)),
        }
    }

    /// Bind `name` in this node, replacing any previous binding here.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bindings.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bind(name, value);
        self
    }

    pub fn level(&self) -> &ScopeLevel {
        &self.level
    }

    pub fn parent(&self) -> Option<&Arc<Scope>> {
        self.parent.as_ref()
    }

    /// This node followed by its ancestors, innermost first.
    pub fn chain(&self) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self), |s| s.parent.as_deref())
    }

    /// Look `name` up here, then in each parent; the innermost binding wins.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.chain()
            .find_map(|scope| scope.bindings.get(name))
            .map(String::as_str)
    }

    /// Level of the scope node that supplies `name`.
    pub fn resolve_level(&self, name: &str) -> Option<&ScopeLevel> {
        self.chain()
            .find(|scope| scope.bindings.contains_key(name))
            .map(|scope| &scope.level)
    }

    pub fn depth(&self) -> usize {
        self.chain().count()
    }

    /// Every name visible from this node.
    pub fn names(&self) -> BTreeSet<&str> {
        self.chain()
            .flat_map(|scope| scope.bindings.keys().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scope>();
        assert_send_sync::<Arc<Scope>>();
    }

    #[test]
    fn resolve_walks_to_root() {
        let domain = Arc::new(Scope::root(ScopeLevel::Domain).with("Namespace", "Shop"));
        let entity = Scope::child(&domain, ScopeLevel::Entity).with("Name", "Order");
        assert_eq!(entity.resolve("Namespace"), Some("Shop"));
        assert_eq!(entity.resolve("Missing"), None);
        assert_eq!(entity.depth(), 2);
        assert_eq!(
            entity.resolve_level("Namespace"),
            Some(&ScopeLevel::Domain)
        );
    }
}

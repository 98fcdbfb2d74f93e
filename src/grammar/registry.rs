//! Explicit grammar lookup, keyed by name.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::{Grammar, builtin_grammars};

/// A mapping from grammar name to grammar, owned by whoever constructs
/// documents. Iteration order is registration order.
#[derive(Default, Clone)]
pub struct GrammarRegistry {
    grammars: IndexMap<SmolStr, Arc<dyn Grammar>>,
}

impl GrammarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the built-in grammars.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for grammar in builtin_grammars() {
            registry.register(grammar);
        }
        registry
    }

    /// Register a grammar under its own name, replacing any previous entry
    /// with that name.
    pub fn register(&mut self, grammar: Arc<dyn Grammar>) {
        self.grammars.insert(SmolStr::new(grammar.name()), grammar);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Grammar>> {
        self.grammars.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.grammars.keys().map(SmolStr::as_str)
    }

    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }
}

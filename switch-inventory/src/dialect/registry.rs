//! Family tag to dialect resolution.

use std::collections::HashMap;
use std::sync::Arc;

use super::Dialect;
use super::vendors;

/// Registry mapping family tags to dialects.
///
/// Lookup tries the tag as written, then registered aliases, then the
/// normalized tag (lowercase, `-` and spaces as `_`), so a roster family
/// named `Cisco-IOS` selects the `cisco_ios` dialect.
#[derive(Debug, Default, Clone)]
pub struct DialectRegistry {
    dialects: HashMap<String, Arc<Dialect>>,
    aliases: HashMap<String, String>,
}

impl DialectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in dialects.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(vendors::cisco_ios::dialect());
        registry.register(vendors::arista_eos::dialect());
        registry.alias("cisco_xe", "cisco_ios");
        registry.alias("cisco_ios_telnet", "cisco_ios");
        registry.alias("eos", "arista_eos");
        registry
    }

    /// Register or replace a dialect under its own name.
    pub fn register(&mut self, dialect: Dialect) {
        self.dialects
            .insert(dialect.name.clone(), Arc::new(dialect));
    }

    /// Let `family` resolve to the dialect named `dialect`.
    pub fn alias(&mut self, family: impl Into<String>, dialect: impl Into<String>) {
        self.aliases.insert(family.into(), dialect.into());
    }

    /// Resolve a family tag.
    pub fn resolve(&self, family: &str) -> Option<Arc<Dialect>> {
        self.lookup(family)
            .or_else(|| self.lookup(&normalize(family)))
    }

    fn lookup(&self, key: &str) -> Option<Arc<Dialect>> {
        self.dialects.get(key).cloned().or_else(|| {
            self.aliases
                .get(key)
                .and_then(|target| self.dialects.get(target))
                .cloned()
        })
    }

    /// Names of registered dialects.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.dialects.keys()
    }
}

fn normalize(family: &str) -> String {
    family
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

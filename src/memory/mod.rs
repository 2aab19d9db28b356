//! Ephemeral key-value memory, mutated by `CommonMemory:` directives.

use std::collections::BTreeMap;

use tracing::info;

/// Facts collected from one document. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    facts: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str, value: &str) {
        info!(key, value, "memory: added fact");
        self.facts.insert(key.to_string(), value.to_string());
    }

    /// Returns `false` when the key was not present.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.facts.remove(key).is_some();
        if removed {
            info!(key, "memory: removed fact");
        } else {
            info!(key, "memory: no fact to remove");
        }
        removed
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.facts.get(key).map(String::as_str)
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.facts.clone()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_overwrites_and_remove_reports_presence() {
        let mut store = MemoryStore::new();
        store.add("lang", "Python");
        store.add("lang", "Rust");
        assert_eq!(store.get("lang"), Some("Rust"));
        assert!(store.remove("lang"));
        assert!(!store.remove("lang"));
        assert!(store.is_empty());
    }

    #[test]
    fn snapshot_is_detached() {
        let mut store = MemoryStore::new();
        store.add("a", "1");
        let snap = store.snapshot();
        store.add("b", "2");
        assert_eq!(snap.len(), 1);
        assert_eq!(store.len(), 2);
    }
}

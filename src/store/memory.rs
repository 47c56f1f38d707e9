//! In-process key-value store.

use std::collections::HashMap;

use super::KeyValueStore;
use crate::error::Result;

/// A [`KeyValueStore`] that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("2".to_string()));

        store.remove("a").unwrap();
        store.remove("missing").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }
}

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::DomainError;
use crate::ports::KeyValueStore;

/// In-process key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("brand_token").unwrap().is_none());

        store.set("brand_token", "abc").unwrap();
        assert_eq!(store.get("brand_token").unwrap().as_deref(), Some("abc"));

        store.set("brand_token", "def").unwrap();
        assert_eq!(store.get("brand_token").unwrap().as_deref(), Some("def"));

        store.remove("brand_token").unwrap();
        store.remove("brand_token").unwrap();
        assert!(store.get("brand_token").unwrap().is_none());
    }
}

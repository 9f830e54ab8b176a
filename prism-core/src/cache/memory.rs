use std::collections::HashMap;

use parking_lot::RwLock;

use super::Cache;
use crate::error::PrismResult;

/// Process-local cache backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> PrismResult<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Vec<u8>) -> PrismResult<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> PrismResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> PrismResult<bool> {
        Ok(self.entries.read().contains_key(key))
    }
}

//! In-memory set store.

use crate::ports::outbound::{SetStore, StoreError};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};

/// Process-local backend for tests and `RY_STORE_BACKEND=memory`.
#[derive(Debug, Default)]
pub struct InMemorySetStore {
    sets: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl InMemorySetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SetStore for InMemorySetStore {
    fn sadd(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut sets = self.sets.write();
        Ok(sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    fn smembers(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let sets = self.sets.read();
        Ok(sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }
}

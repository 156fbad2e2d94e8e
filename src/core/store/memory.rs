//! In-process store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::Store;
use crate::core::types::{KvPair, KvPairs};
use crate::error::{StoreError, StoreResult};

/// Store kept in memory, ordered by key.
///
/// Used by library consumers that manage persistence themselves, and by tests.
#[derive(Debug, Default)]
pub struct Memory {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> StoreResult<MutexGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl Store for Memory {
    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.entries()?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.entries()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn list(&self, prefix: &str) -> StoreResult<KvPairs> {
        Ok(self
            .entries()?
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| KvPair::new(key.as_str(), value.as_slice()))
            .collect())
    }
}

//! In-memory document store
//!
//! Used for tests and for ephemeral development servers.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{CasOutcome, DocumentStore};
use crate::error::StoreResult;

type Collections = HashMap<String, BTreeMap<String, Vec<u8>>>;

/// Thread-safe in-memory store guarded by a single `RwLock`
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|c| c.get(key))
            .cloned())
    }

    async fn put(&self, collection: &str, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, collection: &str, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .and_then(|c| c.remove(key)))
    }

    async fn scan(&self, collection: &str) -> StoreResult<Vec<(String, Vec<u8>)>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|c| c.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    async fn compare_and_swap(
        &self,
        collection: &str,
        key: &str,
        expected: Option<&[u8]>,
        new: Option<Vec<u8>>,
    ) -> StoreResult<CasOutcome> {
        let mut collections = self.collections.write().await;
        let entries = collections.entry(collection.to_string()).or_default();

        let current = entries.get(key).map(Vec::as_slice);
        if current != expected {
            return Ok(CasOutcome::Mismatch {
                current: current.map(<[u8]>::to_vec),
            });
        }

        match new {
            Some(value) => {
                entries.insert(key.to_string(), value);
            }
            None => {
                entries.remove(key);
            }
        }
        Ok(CasOutcome::Swapped)
    }

    async fn flush(&self) -> StoreResult<()> {
        Ok(())
    }
}

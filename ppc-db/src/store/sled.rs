//! Sled persistent document store
//!
//! One sled tree per collection; conditional writes use sled's native
//! compare-and-swap.

use async_trait::async_trait;
use std::path::Path;

use super::{CasOutcome, DocumentStore};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct SledStore {
    db: ::sled::Db,
}

impl SledStore {
    /// Open or create a database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = ::sled::open(path)
            .map_err(|e| StoreError::Backend(format!("Failed to open sled db: {}", e)))?;
        Ok(Self { db })
    }

    /// Open a throwaway database that is removed on drop
    pub fn temporary() -> StoreResult<Self> {
        let db = ::sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| StoreError::Backend(format!("Failed to open temporary sled db: {}", e)))?;
        Ok(Self { db })
    }

    fn tree(&self, collection: &str) -> StoreResult<::sled::Tree> {
        self.db.open_tree(collection).map_err(|e| {
            StoreError::Backend(format!("Failed to open {} tree: {}", collection, e))
        })
    }

    fn key_string(key: &[u8]) -> StoreResult<String> {
        String::from_utf8(key.to_vec())
            .map_err(|e| StoreError::Backend(format!("Non UTF-8 key in store: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for SledStore {
    fn backend(&self) -> &'static str {
        "sled"
    }

    async fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let value = self
            .tree(collection)?
            .get(key)
            .map_err(|e| StoreError::Backend(format!("Failed to get {}/{}: {}", collection, key, e)))?;
        Ok(value.map(|v| v.to_vec()))
    }

    async fn put(&self, collection: &str, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.tree(collection)?
            .insert(key, value)
            .map_err(|e| StoreError::Backend(format!("Failed to put {}/{}: {}", collection, key, e)))?;
        Ok(())
    }

    async fn remove(&self, collection: &str, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let removed = self.tree(collection)?.remove(key).map_err(|e| {
            StoreError::Backend(format!("Failed to remove {}/{}: {}", collection, key, e))
        })?;
        Ok(removed.map(|v| v.to_vec()))
    }

    async fn scan(&self, collection: &str) -> StoreResult<Vec<(String, Vec<u8>)>> {
        let mut entries = Vec::new();
        for item in self.tree(collection)?.iter() {
            let (key, value) = item.map_err(|e| {
                StoreError::Backend(format!("Failed to iterate {}: {}", collection, e))
            })?;
            entries.push((Self::key_string(&key)?, value.to_vec()));
        }
        Ok(entries)
    }

    async fn compare_and_swap(
        &self,
        collection: &str,
        key: &str,
        expected: Option<&[u8]>,
        new: Option<Vec<u8>>,
    ) -> StoreResult<CasOutcome> {
        let result = self
            .tree(collection)?
            .compare_and_swap(key, expected, new)
            .map_err(|e| {
                StoreError::Backend(format!("Failed to swap {}/{}: {}", collection, key, e))
            })?;

        Ok(match result {
            Ok(()) => CasOutcome::Swapped,
            Err(mismatch) => CasOutcome::Mismatch {
                current: mismatch.current.map(|v| v.to_vec()),
            },
        })
    }

    async fn flush(&self) -> StoreResult<()> {
        self.db
            .flush()
            .map_err(|e| StoreError::Backend(format!("Failed to flush db: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::conformance;

    #[tokio::test]
    async fn test_put_get_remove() {
        conformance::put_get_remove(&SledStore::temporary().unwrap()).await;
    }

    #[tokio::test]
    async fn test_scan() {
        conformance::scan_in_key_order(&SledStore::temporary().unwrap()).await;
    }

    #[tokio::test]
    async fn test_compare_and_swap() {
        conformance::compare_and_swap(&SledStore::temporary().unwrap()).await;
    }

    #[tokio::test]
    async fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path().join("ppc")).unwrap();
        store.put("things", "a", b"1".to_vec()).await.unwrap();
        store.flush().await.unwrap();
        assert_eq!(store.get("things", "a").await.unwrap(), Some(b"1".to_vec()));
    }
}

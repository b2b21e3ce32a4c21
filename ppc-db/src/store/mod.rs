//! Document store
//!
//! Documents are opaque JSON blobs grouped in named collections and keyed
//! by string. Every read-modify-write goes through `compare_and_swap`, which
//! also serves as the insert-if-absent primitive behind unique indexes.

pub mod memory;
pub mod sled;

pub use self::memory::MemoryStore;
pub use self::sled::SledStore;

use async_trait::async_trait;

use crate::error::StoreResult;

/// Result of a conditional write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasOutcome {
    /// The stored value matched and was replaced
    Swapped,
    /// The stored value differed; nothing was written
    Mismatch { current: Option<Vec<u8>> },
}

impl CasOutcome {
    pub fn is_swapped(&self) -> bool {
        matches!(self, CasOutcome::Swapped)
    }
}

/// Storage backend interface
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name, for logs and health output
    fn backend(&self) -> &'static str;

    async fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Unconditional write
    async fn put(&self, collection: &str, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Returns the removed value, if any
    async fn remove(&self, collection: &str, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// All entries of a collection in key order
    async fn scan(&self, collection: &str) -> StoreResult<Vec<(String, Vec<u8>)>>;

    /// Atomically replace `expected` with `new`
    ///
    /// `expected = None` means "only if absent"; `new = None` deletes.
    async fn compare_and_swap(
        &self,
        collection: &str,
        key: &str,
        expected: Option<&[u8]>,
        new: Option<Vec<u8>>,
    ) -> StoreResult<CasOutcome>;

    /// Persist buffered writes
    async fn flush(&self) -> StoreResult<()>;
}

#[cfg(test)]
pub(crate) mod conformance {
    //! Behaviour every backend must share

    use super::*;

    pub async fn put_get_remove(store: &dyn DocumentStore) {
        assert_eq!(store.get("things", "a").await.unwrap(), None);
        store.put("things", "a", b"1".to_vec()).await.unwrap();
        assert_eq!(store.get("things", "a").await.unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get("others", "a").await.unwrap(), None);

        let removed = store.remove("things", "a").await.unwrap();
        assert_eq!(removed, Some(b"1".to_vec()));
        assert_eq!(store.get("things", "a").await.unwrap(), None);
    }

    pub async fn scan_in_key_order(store: &dyn DocumentStore) {
        store.put("things", "b", b"2".to_vec()).await.unwrap();
        store.put("things", "a", b"1".to_vec()).await.unwrap();
        let all = store.scan("things").await.unwrap();
        let keys: Vec<_> = all.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(store.scan("empty").await.unwrap().is_empty());
    }

    pub async fn compare_and_swap(store: &dyn DocumentStore) {
        let first = store
            .compare_and_swap("idx", "k", None, Some(b"owner-1".to_vec()))
            .await
            .unwrap();
        assert!(first.is_swapped());

        let second = store
            .compare_and_swap("idx", "k", None, Some(b"owner-2".to_vec()))
            .await
            .unwrap();
        assert_eq!(
            second,
            CasOutcome::Mismatch {
                current: Some(b"owner-1".to_vec())
            }
        );

        let release = store
            .compare_and_swap("idx", "k", Some(b"owner-1"), None)
            .await
            .unwrap();
        assert!(release.is_swapped());
        assert_eq!(store.get("idx", "k").await.unwrap(), None);
    }
}

//! Typed collections and unique indexes over a [`DocumentStore`]

use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

use ppc_core::error::{DomainError, DomainResult};
use ppc_core::logging::operations;

use crate::error::{StoreError, StoreResult};
use crate::store::{CasOutcome, DocumentStore};

/// Attempts before a contended update gives up
pub const MAX_CAS_RETRIES: usize = 64;

/// A domain type stored as one JSON document
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection (tree) name
    const COLLECTION: &'static str;

    /// Human name used in "not found" errors
    const LABEL: &'static str;

    fn key(&self) -> String;
}

/// Typed view over one collection
pub struct Collection<T: Document> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    fn encode(doc: &T) -> StoreResult<Vec<u8>> {
        Ok(serde_json::to_vec(doc)?)
    }

    fn decode(bytes: &[u8]) -> StoreResult<T> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub async fn get(&self, key: &str) -> StoreResult<Option<T>> {
        match self.store.get(T::COLLECTION, key).await? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Like [`Collection::get`] but a missing document is `NOT_FOUND`
    pub async fn require(&self, key: &str) -> DomainResult<T> {
        self.get(key).await?.ok_or(DomainError::NotFound(T::LABEL))
    }

    /// Insert a new document; returns false if the key is taken
    pub async fn insert(&self, doc: &T) -> StoreResult<bool> {
        let outcome = self
            .store
            .compare_and_swap(T::COLLECTION, &doc.key(), None, Some(Self::encode(doc)?))
            .await?;
        Ok(outcome.is_swapped())
    }

    /// Unconditional write
    pub async fn put(&self, doc: &T) -> StoreResult<()> {
        self.store
            .put(T::COLLECTION, &doc.key(), Self::encode(doc)?)
            .await
    }

    pub async fn remove(&self, key: &str) -> StoreResult<Option<T>> {
        match self.store.remove(T::COLLECTION, key).await? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> StoreResult<Vec<T>> {
        self.store
            .scan(T::COLLECTION)
            .await?
            .iter()
            .map(|(_, bytes)| Self::decode(bytes))
            .collect()
    }

    pub async fn count(&self) -> StoreResult<usize> {
        Ok(self.store.scan(T::COLLECTION).await?.len())
    }

    /// Read-modify-write one document atomically
    ///
    /// `apply` runs against a fresh copy on every attempt and may run more
    /// than once. If it returns an error nothing is written. The write only
    /// lands if the stored bytes are unchanged since the read; otherwise the
    /// whole cycle is retried.
    pub async fn update<R, F>(&self, key: &str, mut apply: F) -> DomainResult<(T, R)>
    where
        F: FnMut(&mut T) -> DomainResult<R> + Send,
        R: Send,
    {
        for attempt in 0..MAX_CAS_RETRIES {
            let current = self
                .store
                .get(T::COLLECTION, key)
                .await?
                .ok_or(DomainError::NotFound(T::LABEL))?;

            let mut doc = Self::decode(&current)?;
            let result = apply(&mut doc)?;
            let next = Self::encode(&doc)?;

            match self
                .store
                .compare_and_swap(T::COLLECTION, key, Some(&current), Some(next))
                .await?
            {
                CasOutcome::Swapped => return Ok((doc, result)),
                CasOutcome::Mismatch { current: None } => {
                    return Err(DomainError::NotFound(T::LABEL))
                }
                CasOutcome::Mismatch { .. } => {
                    debug!(
                        operation = operations::CAS_RETRY,
                        collection = T::COLLECTION,
                        key,
                        attempt,
                        "Concurrent write detected, retrying"
                    );
                    tokio::task::yield_now().await;
                }
            }
        }

        Err(StoreError::Contention {
            collection: T::COLLECTION,
            key: key.to_string(),
        }
        .into())
    }
}

/// Unique value → owner index built on insert-if-absent
#[derive(Clone)]
pub struct UniqueIndex {
    store: Arc<dyn DocumentStore>,
    name: &'static str,
}

impl UniqueIndex {
    pub fn new(store: Arc<dyn DocumentStore>, name: &'static str) -> Self {
        Self { store, name }
    }

    /// Claim `value` for `owner`. False when someone else holds it.
    ///
    /// Claiming a value already held by the same owner succeeds.
    pub async fn claim(&self, value: &str, owner: &str) -> StoreResult<bool> {
        match self
            .store
            .compare_and_swap(self.name, value, None, Some(owner.as_bytes().to_vec()))
            .await?
        {
            CasOutcome::Swapped => Ok(true),
            CasOutcome::Mismatch { current } => Ok(current.as_deref() == Some(owner.as_bytes())),
        }
    }

    /// Release `value` if `owner` holds it
    pub async fn release(&self, value: &str, owner: &str) -> StoreResult<()> {
        self.store
            .compare_and_swap(self.name, value, Some(owner.as_bytes()), None)
            .await?;
        Ok(())
    }

    /// Current owner of `value`
    pub async fn owner(&self, value: &str) -> StoreResult<Option<String>> {
        Ok(self
            .store
            .get(self.name, value)
            .await?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }
}

//! PPC Database - main entry point for storage operations

use std::path::Path;
use std::sync::Arc;

use ppc_core::types::{
    Citizen, CivicIssue, CouncilMember, Event, GovernanceDecision, Survey, SurveyResponse,
};

use crate::collection::{Collection, UniqueIndex};
use crate::documents::{EMAIL_INDEX, RESPONSE_INDEX};
use crate::error::StoreResult;
use crate::store::{DocumentStore, MemoryStore, SledStore};

pub struct PpcDatabase {
    store: Arc<dyn DocumentStore>,
    pub citizens: Collection<Citizen>,
    pub issues: Collection<CivicIssue>,
    pub events: Collection<Event>,
    pub surveys: Collection<Survey>,
    pub responses: Collection<SurveyResponse>,
    pub council: Collection<CouncilMember>,
    pub decisions: Collection<GovernanceDecision>,
    pub emails: UniqueIndex,
    pub respondents: UniqueIndex,
}

impl PpcDatabase {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            citizens: Collection::new(store.clone()),
            issues: Collection::new(store.clone()),
            events: Collection::new(store.clone()),
            surveys: Collection::new(store.clone()),
            responses: Collection::new(store.clone()),
            council: Collection::new(store.clone()),
            decisions: Collection::new(store.clone()),
            emails: UniqueIndex::new(store.clone(), EMAIL_INDEX),
            respondents: UniqueIndex::new(store.clone(), RESPONSE_INDEX),
            store,
        }
    }

    /// Ephemeral database
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Persistent database rooted at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Ok(Self::new(Arc::new(SledStore::open(path)?)))
    }

    /// Name of the storage backend
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Check that the backend answers reads
    pub async fn health_check(&self) -> StoreResult<bool> {
        self.store.get(EMAIL_INDEX, "").await.map(|_| true)
    }

    pub async fn flush(&self) -> StoreResult<()> {
        self.store.flush().await
    }
}

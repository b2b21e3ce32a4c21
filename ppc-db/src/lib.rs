//! PPC Database Layer
//!
//! Document storage for the People Center. Every domain record is one JSON
//! document in a named collection; concurrent writers are reconciled with
//! compare-and-swap instead of locks.
//!
//! # Backends
//!
//! - [`SledStore`] - persistent, one sled tree per collection
//! - [`MemoryStore`] - ephemeral, for tests and throwaway servers
//!
//! # Usage
//!
//! ```ignore
//! use ppc_db::{PpcDatabase, services::CitizenService};
//! use std::sync::Arc;
//!
//! let db = Arc::new(PpcDatabase::open("./data/ppc")?);
//! let citizens = CitizenService::new(db.clone(), hasher);
//! ```

pub mod collection;
pub mod database;
pub mod documents;
pub mod error;
pub mod services;
pub mod store;

pub use collection::{Collection, Document, UniqueIndex, MAX_CAS_RETRIES};
pub use database::PpcDatabase;
pub use error::*;
pub use services::{
    CitizenService, DashboardService, EventService, GovernanceService, IssueService,
    SurveyService,
};
pub use store::{CasOutcome, DocumentStore, MemoryStore, SledStore};

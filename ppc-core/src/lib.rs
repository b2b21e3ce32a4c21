//! PPC Core - Politikos People Center domain layer
//!
//! This crate holds everything about the civic-engagement domain that does
//! not depend on storage or transport:
//! - Entity types (citizens, issues, events, surveys, governance records)
//! - Lifecycle rules (issue status history, event capacity, survey
//!   integrity, decision consensus)
//! - Credential hashing and input validation
//! - Registry traits implemented by the storage layer

pub mod access;
pub mod aggregation;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod registry;
pub mod types;
pub mod validation;

pub use access::*;
pub use constants::*;
pub use error::*;
pub use types::*;

//! PPC Database error types

use ppc_core::error::DomainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Write contention on {collection}/{key}")]
    Contention { collection: &'static str, key: String },
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        DomainError::Storage(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

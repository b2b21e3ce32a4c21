//! CLI error types

use thiserror::Error;

use ppc_api::AuthError;
use ppc_core::error::DomainError;
use ppc_db::StoreError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Server error: {message}")]
    Server { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        CliError::Config {
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        CliError::Server {
            message: message.into(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } | CliError::Auth(_) => 1,
            CliError::Domain(_) => 2,
            CliError::Store(_) => 3,
            CliError::Server { .. } => 4,
            CliError::Json(_) => 5,
        }
    }
}

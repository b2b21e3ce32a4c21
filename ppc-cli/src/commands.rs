//! Command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use ppc_core::constants::{DEFAULT_CITIZEN_PAGE_SIZE, DEFAULT_TOKEN_EXPIRE_HOURS};

use crate::logging::LogFormat;

/// Politikos People Center
#[derive(Parser, Debug)]
#[command(name = "ppc")]
#[command(version)]
#[command(about = "Politikos People Center server and administration tool")]
pub struct Cli {
    /// Database directory (env: PPC_DATA_DIR)
    #[arg(long, env = "PPC_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Use an ephemeral in-memory database instead of `--data-dir`
    #[arg(long, global = true)]
    pub memory: bool,

    /// Log output format (env: PPC_LOG_FORMAT)
    #[arg(long, env = "PPC_LOG_FORMAT", default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Output format for listings
    #[arg(short, long, default_value = "table", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable columns
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the API server
    Serve(ServeArgs),

    /// Promote an existing account to administrator
    MakeAdmin {
        /// Account email (case-insensitive)
        email: String,
    },

    /// Print the citizen directory, newest first
    ListUsers {
        /// Match name or email
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_CITIZEN_PAGE_SIZE)]
        limit: u32,
    },

    /// Remove accounts whose stored email no longer passes validation
    CleanupEmails {
        /// Only report what would be removed
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Host to bind to (env: PPC_HOST)
    #[arg(short = 'H', long, env = "PPC_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on (env: PPC_PORT)
    #[arg(short, long, env = "PPC_PORT", default_value = "5000")]
    pub port: u16,

    /// Token signing secret, at least 32 bytes (env: JWT_SECRET)
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Token lifetime in hours (env: JWT_EXPIRE_HOURS)
    #[arg(long, env = "JWT_EXPIRE_HOURS", default_value_t = DEFAULT_TOKEN_EXPIRE_HOURS)]
    pub jwt_expire_hours: i64,

    /// Directory for uploaded images (env: PPC_UPLOAD_DIR)
    #[arg(long, env = "PPC_UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Allowed CORS origin; any origin when unset (env: CLIENT_URL)
    #[arg(long, env = "CLIENT_URL")]
    pub client_url: Option<String>,

    /// Requests per minute per client, 0 disables (env: PPC_RATE_LIMIT)
    #[arg(long, env = "PPC_RATE_LIMIT", default_value = "100")]
    pub rate_limit: u32,

    /// Argon2 memory cost in KiB (env: PPC_HASH_MEMORY_KIB)
    #[arg(long, env = "PPC_HASH_MEMORY_KIB")]
    pub hash_memory_kib: Option<u32>,

    /// Argon2 iterations (env: PPC_HASH_ITERATIONS)
    #[arg(long, env = "PPC_HASH_ITERATIONS")]
    pub hash_iterations: Option<u32>,
}

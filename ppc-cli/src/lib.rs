//! People Center CLI
//!
//! Runs the API server and performs maintenance directly against the
//! database.
//!
//! ```text
//! ppc [OPTIONS] <COMMAND>
//!
//! Commands:
//!   serve           Run the API server
//!   make-admin      Promote an account to administrator
//!   list-users      Print the citizen directory
//!   cleanup-emails  Remove accounts whose email fails validation
//!
//! Options:
//!       --data-dir <DIR>       Database directory [env: PPC_DATA_DIR] [default: data]
//!       --memory               Use an ephemeral in-memory database
//!       --log-format <FORMAT>  pretty, compact or json [env: PPC_LOG_FORMAT]
//!   -f, --format <FORMAT>      Output format (table, json) [default: table]
//! ```

pub mod commands;
pub mod error;
pub mod handler;
pub mod logging;
pub mod output;

pub use commands::{Cli, Commands, OutputFormat, ServeArgs};
pub use error::{CliError, CliResult};
pub use logging::LogFormat;

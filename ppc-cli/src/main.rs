//! People Center CLI entry point
//!
//! Configuration is read from the environment (optionally from a `.env`
//! file); command-line flags override it.
//!
//! Usage:
//!   ppc serve                 - Run the API server
//!   ppc make-admin <email>    - Promote an account to administrator
//!   ppc list-users            - Print the citizen directory
//!   ppc cleanup-emails        - Remove accounts with invalid emails

use clap::Parser;
use ppc_cli::{handler, logging, Cli};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.log_format);

    if let Err(e) = handler::run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

//! Command handlers

use std::sync::Arc;
use tracing::info;

use ppc_api::{run_server, ApiConfig, AppState, JwtConfig};
use ppc_core::credentials::{CredentialHasher, HashingCost};
use ppc_core::registry::CitizenRegistry;
use ppc_core::types::PageRequest;
use ppc_db::{CitizenService, PpcDatabase};

use crate::commands::{Cli, Commands, ServeArgs};
use crate::error::{CliError, CliResult};
use crate::output;

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> CliResult<()> {
    let database = Arc::new(open_database(&cli)?);

    match cli.command {
        Commands::Serve(args) => handle_serve(database, args).await,
        Commands::MakeAdmin { email } => handle_make_admin(database, &email).await,
        Commands::ListUsers {
            search,
            page,
            limit,
        } => {
            let citizens = citizen_service(database, HashingCost::default())?;
            let page = citizens
                .list_citizens(search.as_deref(), PageRequest::new(Some(page), Some(limit), limit))
                .await?
                .map(|c| c.to_public());
            output::print_citizens(&page, cli.format)
        }
        Commands::CleanupEmails { dry_run } => {
            let citizens = citizen_service(database.clone(), HashingCost::default())?;
            let removed: Vec<_> = citizens
                .remove_invalid_emails(dry_run)
                .await?
                .iter()
                .map(|c| c.to_public())
                .collect();
            database.flush().await?;
            output::print_cleanup(&removed, dry_run, cli.format)
        }
    }
}

fn open_database(cli: &Cli) -> CliResult<PpcDatabase> {
    if cli.memory {
        return Ok(PpcDatabase::in_memory());
    }
    Ok(PpcDatabase::open(&cli.data_dir)?)
}

fn hashing_cost(args: &ServeArgs) -> HashingCost {
    let default = HashingCost::default();
    HashingCost {
        memory_kib: args.hash_memory_kib.unwrap_or(default.memory_kib),
        iterations: args.hash_iterations.unwrap_or(default.iterations),
        ..default
    }
}

fn credential_hasher(cost: HashingCost) -> CliResult<CredentialHasher> {
    CredentialHasher::new(cost)
        .map_err(|e| CliError::config(format!("Invalid password hashing parameters: {}", e)))
}

fn citizen_service(database: Arc<PpcDatabase>, cost: HashingCost) -> CliResult<CitizenService> {
    Ok(CitizenService::new(database, credential_hasher(cost)?))
}

async fn handle_serve(database: Arc<PpcDatabase>, args: ServeArgs) -> CliResult<()> {
    let jwt = JwtConfig::try_new(args.jwt_secret.as_str(), args.jwt_expire_hours)?;
    let hasher = credential_hasher(hashing_cost(&args))?;

    tokio::fs::create_dir_all(&args.upload_dir).await.map_err(|e| {
        CliError::config(format!(
            "Cannot create upload directory {}: {}",
            args.upload_dir.display(),
            e
        ))
    })?;

    let state = AppState::new(database, hasher, jwt, args.upload_dir);
    let config = ApiConfig {
        host: args.host,
        port: args.port,
        client_url: args.client_url,
        rate_limit_per_minute: args.rate_limit,
        ..ApiConfig::default()
    };

    run_server(state, config)
        .await
        .map_err(|e| CliError::server(e.to_string()))
}

async fn handle_make_admin(database: Arc<PpcDatabase>, email: &str) -> CliResult<()> {
    let citizens = citizen_service(database.clone(), HashingCost::default())?;
    let citizen = citizens.grant_admin(email).await?;
    database.flush().await?;

    info!(citizen_id = %citizen.id, "Administrator granted");
    println!("{} <{}> is now an administrator", citizen.name, citizen.email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ppc_core::types::NewCitizen;

    fn serve_args(extra: &[&str]) -> ServeArgs {
        let mut argv = vec!["ppc", "serve", "--jwt-secret", "0123456789abcdef0123456789abcdef"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Serve(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_hashing_cost_overrides() {
        let args = serve_args(&["--hash-memory-kib", "4096", "--hash-iterations", "3"]);
        let cost = hashing_cost(&args);
        assert_eq!(cost.memory_kib, 4096);
        assert_eq!(cost.iterations, 3);
        assert_eq!(cost.parallelism, HashingCost::default().parallelism);
    }

    #[test]
    fn test_hashing_cost_defaults() {
        assert_eq!(hashing_cost(&serve_args(&[])), HashingCost::default());
    }

    #[tokio::test]
    async fn test_make_admin_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let database = Arc::new(PpcDatabase::open(dir.path().join("ppc")).unwrap());
        let citizens = citizen_service(database.clone(), HashingCost::for_testing()).unwrap();
        citizens
            .register(NewCitizen {
                name: Some("Ada Admin".into()),
                email: Some("ada@example.com".into()),
                password: Some("password123".into()),
                ..NewCitizen::default()
            })
            .await
            .unwrap();

        handle_make_admin(database.clone(), "ADA@example.com").await.unwrap();

        let citizen = citizens.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert!(citizen.is_admin());
    }

    #[tokio::test]
    async fn test_make_admin_unknown_email() {
        let database = Arc::new(PpcDatabase::in_memory());
        let err = handle_make_admin(database, "nobody@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

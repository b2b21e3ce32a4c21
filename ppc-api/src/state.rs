//! Application state for the API server

use std::path::PathBuf;
use std::sync::Arc;

use ppc_core::credentials::CredentialHasher;
use ppc_db::{
    CitizenService, DashboardService, EventService, GovernanceService, IssueService, PpcDatabase,
    SurveyService,
};

use crate::middleware::auth::JwtConfig;
use crate::upload::ImageStore;

/// API server state
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<PpcDatabase>,
    pub citizens: Arc<CitizenService>,
    pub issues: Arc<IssueService>,
    pub events: Arc<EventService>,
    pub surveys: Arc<SurveyService>,
    pub governance: Arc<GovernanceService>,
    pub dashboard: Arc<DashboardService>,
    pub jwt: Arc<JwtConfig>,
    pub uploads: Arc<ImageStore>,
    /// API version
    pub version: String,
}

impl AppState {
    pub fn new(
        database: Arc<PpcDatabase>,
        hasher: CredentialHasher,
        jwt: JwtConfig,
        upload_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            citizens: Arc::new(CitizenService::new(database.clone(), hasher)),
            issues: Arc::new(IssueService::new(database.clone())),
            events: Arc::new(EventService::new(database.clone())),
            surveys: Arc::new(SurveyService::new(database.clone())),
            governance: Arc::new(GovernanceService::new(database.clone())),
            dashboard: Arc::new(DashboardService::new(database.clone())),
            database,
            jwt: Arc::new(jwt),
            uploads: Arc::new(ImageStore::new(upload_dir)),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin; any origin when unset
    pub client_url: Option<String>,
    /// Requests per minute per client, 0 disables limiting
    pub rate_limit_per_minute: u32,
    /// Largest accepted request body
    pub body_limit_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            client_url: None,
            rate_limit_per_minute: 100,
            body_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

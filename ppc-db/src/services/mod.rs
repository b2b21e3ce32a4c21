//! Registry Service Implementations
//!
//! Concrete implementations of the registry traits defined in ppc-core,
//! backed by the ppc-db document collections.

pub mod citizen_service;
pub mod dashboard_service;
pub mod event_service;
pub mod governance_service;
pub mod issue_service;
pub mod survey_service;

pub use citizen_service::CitizenService;
pub use dashboard_service::DashboardService;
pub use event_service::EventService;
pub use governance_service::GovernanceService;
pub use issue_service::IssueService;
pub use survey_service::SurveyService;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use ppc_core::access::Actor;
    use ppc_core::credentials::{CredentialHasher, HashingCost};
    use ppc_core::types::{CitizenId, NewCitizen, Role};

    use super::CitizenService;
    use crate::database::PpcDatabase;

    pub fn database() -> Arc<PpcDatabase> {
        Arc::new(PpcDatabase::in_memory())
    }

    pub fn hasher() -> CredentialHasher {
        CredentialHasher::new(HashingCost::for_testing()).unwrap()
    }

    pub fn citizen_service() -> CitizenService {
        CitizenService::new(database(), hasher())
    }

    pub fn registration(name: &str, email: &str) -> NewCitizen {
        NewCitizen {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some("password123".to_string()),
            ..Default::default()
        }
    }

    pub fn admin() -> Actor {
        Actor::new(CitizenId::new("admin-1"), Role::Admin)
    }

    pub fn citizen(id: &str) -> Actor {
        Actor::new(CitizenId::new(id), Role::Citizen)
    }
}

//! Citizen Registry - accounts, credentials and profiles

use async_trait::async_trait;

use crate::access::Actor;
use crate::error::DomainResult;
use crate::types::{
    Citizen, CitizenId, Location, NewCitizen, Page, PageRequest, PasswordChange, ProfileUpdate,
};

/// Citizen Registry trait
#[async_trait]
pub trait CitizenRegistry: Send + Sync {
    /// Register a new citizen account
    async fn register(&self, input: NewCitizen) -> DomainResult<Citizen>;

    /// Check credentials; unknown email and wrong password fail identically
    async fn authenticate(&self, email: Option<&str>, password: Option<&str>)
        -> DomainResult<Citizen>;

    async fn get_citizen(&self, id: &CitizenId) -> DomainResult<Option<Citizen>>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Citizen>>;

    /// Update name, email or phone of the caller's own account
    async fn update_profile(
        &self,
        actor: &Actor,
        id: &CitizenId,
        update: ProfileUpdate,
    ) -> DomainResult<Citizen>;

    async fn change_password(
        &self,
        actor: &Actor,
        id: &CitizenId,
        change: PasswordChange,
    ) -> DomainResult<()>;

    /// Replace the interest list
    async fn update_interests(
        &self,
        actor: &Actor,
        id: &CitizenId,
        interests: Vec<String>,
    ) -> DomainResult<Citizen>;

    async fn update_location(
        &self,
        actor: &Actor,
        id: &CitizenId,
        location: Option<Location>,
    ) -> DomainResult<Citizen>;

    /// Change another account's role (admin only)
    async fn set_role(&self, actor: &Actor, id: &CitizenId, role: &str) -> DomainResult<Citizen>;

    /// Newest first, optionally filtered by name or email
    async fn list_citizens(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<Page<Citizen>>;

    /// Remove accounts whose stored email no longer passes validation
    async fn remove_invalid_emails(&self, dry_run: bool) -> DomainResult<Vec<Citizen>>;
}

//! Citizen Registry Service Implementation
//!
//! Implements the CitizenRegistry trait on top of the citizen collection and
//! the unique email index.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use ppc_core::access::Actor;
use ppc_core::credentials::CredentialHasher;
use ppc_core::error::{codes, DomainError, DomainResult};
use ppc_core::logging::operations;
use ppc_core::registry::CitizenRegistry;
use ppc_core::types::{
    Citizen, CitizenId, Interest, Location, NewCitizen, Page, PageRequest, PasswordChange,
    ProfileUpdate, Role, SearchPattern,
};
use ppc_core::validation::{is_valid_email, normalize_email};

use crate::database::PpcDatabase;

/// Citizen Registry Service
pub struct CitizenService {
    database: Arc<PpcDatabase>,
    hasher: CredentialHasher,
}

impl CitizenService {
    pub fn new(database: Arc<PpcDatabase>, hasher: CredentialHasher) -> Self {
        Self { database, hasher }
    }

    /// Hash on the blocking pool
    async fn hash_password(&self, password: String) -> DomainResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::Internal(format!("hashing task failed: {}", e)))?
    }

    /// Verify on the blocking pool; a missing hash runs the dummy check
    async fn verify_password(&self, password: String, stored: Option<String>) -> DomainResult<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || match stored {
            Some(hash) => hasher.verify(&password, &hash),
            None => hasher.verify_dummy(&password),
        })
        .await
        .map_err(|e| DomainError::Internal(format!("verification task failed: {}", e)))
    }

    /// Promote an account to administrator by email
    pub async fn grant_admin(&self, email: &str) -> DomainResult<Citizen> {
        let citizen = self
            .find_by_email(email)
            .await?
            .ok_or(DomainError::NotFound("Citizen"))?;
        let (citizen, _) = self
            .database
            .citizens
            .update(citizen.id.as_str(), |c| {
                c.role = Role::Admin;
                c.updated_at = Utc::now();
                Ok(())
            })
            .await?;

        info!(
            operation = operations::ROLE_CHANGE,
            citizen_id = %citizen.id,
            role = %citizen.role,
            "Citizen promoted to admin"
        );
        Ok(citizen)
    }
}

#[async_trait]
impl CitizenRegistry for CitizenService {
    async fn register(&self, input: NewCitizen) -> DomainResult<Citizen> {
        let registration = input.validate()?;

        if self.database.emails.owner(&registration.email).await?.is_some() {
            return Err(DomainError::DuplicateEmail);
        }

        let password_hash = self.hash_password(registration.password.clone()).await?;
        let citizen = Citizen::new(registration, password_hash, Utc::now());

        // The index claim is the authoritative uniqueness check
        if !self
            .database
            .emails
            .claim(&citizen.email, citizen.id.as_str())
            .await?
        {
            return Err(DomainError::DuplicateEmail);
        }

        match self.database.citizens.insert(&citizen).await {
            Ok(true) => {}
            Ok(false) => {
                self.database
                    .emails
                    .release(&citizen.email, citizen.id.as_str())
                    .await?;
                return Err(DomainError::Internal("citizen id collision".to_string()));
            }
            Err(e) => {
                self.database
                    .emails
                    .release(&citizen.email, citizen.id.as_str())
                    .await?;
                return Err(e.into());
            }
        }

        info!(
            operation = operations::REGISTER,
            citizen_id = %citizen.id,
            "Citizen registered"
        );
        Ok(citizen)
    }

    async fn authenticate(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> DomainResult<Citizen> {
        let email = email.map(str::trim).filter(|e| !e.is_empty());
        let password = password.filter(|p| !p.is_empty());
        let (email, password) = match (email, password) {
            (Some(email), Some(password)) => (email, password),
            _ => {
                return Err(DomainError::validation(
                    codes::MISSING_CREDENTIALS,
                    "Please provide email and password",
                ))
            }
        };

        let citizen = self.find_by_email(email).await?;
        let stored = citizen.as_ref().map(|c| c.password_hash.clone());
        let verified = self.verify_password(password.to_string(), stored).await?;

        match citizen {
            Some(citizen) if verified => {
                info!(
                    operation = operations::LOGIN,
                    citizen_id = %citizen.id,
                    "Citizen logged in"
                );
                Ok(citizen)
            }
            _ => {
                warn!(operation = operations::LOGIN, "Login rejected");
                Err(DomainError::InvalidCredentials)
            }
        }
    }

    async fn get_citizen(&self, id: &CitizenId) -> DomainResult<Option<Citizen>> {
        Ok(self.database.citizens.get(id.as_str()).await?)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Citizen>> {
        let email = normalize_email(email);
        let Some(owner) = self.database.emails.owner(&email).await? else {
            return Ok(None);
        };
        let citizen = self.database.citizens.get(&owner).await?;
        Ok(citizen.filter(|c| c.email == email))
    }

    async fn update_profile(
        &self,
        actor: &Actor,
        id: &CitizenId,
        update: ProfileUpdate,
    ) -> DomainResult<Citizen> {
        actor.ensure_self(id, "profile")?;
        let update = update.validate()?;
        let current = self.database.citizens.require(id.as_str()).await?;

        let new_email = update.email.clone().filter(|e| *e != current.email);
        if let Some(email) = &new_email {
            if !self.database.emails.claim(email, id.as_str()).await? {
                return Err(DomainError::EmailInUse);
            }
        }

        let result = self
            .database
            .citizens
            .update(id.as_str(), |c| {
                update.apply(c, Utc::now());
                Ok(())
            })
            .await;

        match result {
            Ok((citizen, _)) => {
                if new_email.is_some() {
                    self.database
                        .emails
                        .release(&current.email, id.as_str())
                        .await?;
                }
                info!(
                    operation = operations::PROFILE_UPDATE,
                    citizen_id = %citizen.id,
                    "Profile updated"
                );
                Ok(citizen)
            }
            Err(e) => {
                if let Some(email) = &new_email {
                    self.database.emails.release(email, id.as_str()).await?;
                }
                Err(e)
            }
        }
    }

    async fn change_password(
        &self,
        actor: &Actor,
        id: &CitizenId,
        change: PasswordChange,
    ) -> DomainResult<()> {
        actor.ensure_self(id, "password")?;
        let (current_password, new_password) = change.validate()?;
        let citizen = self.database.citizens.require(id.as_str()).await?;

        if !self
            .verify_password(current_password, Some(citizen.password_hash.clone()))
            .await?
        {
            return Err(DomainError::IncorrectPassword);
        }

        let new_hash = self.hash_password(new_password).await?;
        self.database
            .citizens
            .update(id.as_str(), |c| {
                c.password_hash = new_hash.clone();
                c.updated_at = Utc::now();
                Ok(())
            })
            .await?;

        info!(
            operation = operations::PASSWORD_CHANGE,
            citizen_id = %id,
            "Password changed"
        );
        Ok(())
    }

    async fn update_interests(
        &self,
        actor: &Actor,
        id: &CitizenId,
        interests: Vec<String>,
    ) -> DomainResult<Citizen> {
        actor.ensure_self(id, "interests")?;
        let interests = Interest::parse_list(&interests)?;
        let (citizen, _) = self
            .database
            .citizens
            .update(id.as_str(), |c| {
                c.interests = interests.clone();
                c.updated_at = Utc::now();
                Ok(())
            })
            .await?;
        Ok(citizen)
    }

    async fn update_location(
        &self,
        actor: &Actor,
        id: &CitizenId,
        location: Option<Location>,
    ) -> DomainResult<Citizen> {
        actor.ensure_self(id, "location")?;
        let location = location.filter(|l| !l.is_empty()).ok_or_else(|| {
            DomainError::validation(codes::MISSING_LOCATION, "Please provide location data")
        })?;
        let (citizen, _) = self
            .database
            .citizens
            .update(id.as_str(), |c| {
                c.location = Some(location.clone());
                c.updated_at = Utc::now();
                Ok(())
            })
            .await?;
        Ok(citizen)
    }

    async fn set_role(&self, actor: &Actor, id: &CitizenId, role: &str) -> DomainResult<Citizen> {
        actor.ensure_admin()?;
        let role = Role::parse(role).ok_or_else(|| {
            DomainError::validation(codes::INVALID_ROLE, "Role must be either citizen or admin")
        })?;
        self.database.citizens.require(id.as_str()).await?;
        if &actor.id == id {
            return Err(DomainError::Forbidden(
                "You cannot change your own role".to_string(),
            ));
        }

        let (citizen, _) = self
            .database
            .citizens
            .update(id.as_str(), |c| {
                c.role = role;
                c.updated_at = Utc::now();
                Ok(())
            })
            .await?;

        info!(
            operation = operations::ROLE_CHANGE,
            citizen_id = %citizen.id,
            role = %role,
            changed_by = %actor.id,
            "Citizen role changed"
        );
        Ok(citizen)
    }

    async fn list_citizens(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> DomainResult<Page<Citizen>> {
        let search = search.and_then(SearchPattern::new);
        let mut citizens: Vec<Citizen> = self
            .database
            .citizens
            .list()
            .await?
            .into_iter()
            .filter(|c| {
                search
                    .as_ref()
                    .map_or(true, |s| s.matches_any([c.name.as_str(), c.email.as_str()]))
            })
            .collect();
        citizens.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Page::from_sorted(citizens, page))
    }

    async fn remove_invalid_emails(&self, dry_run: bool) -> DomainResult<Vec<Citizen>> {
        let invalid: Vec<Citizen> = self
            .database
            .citizens
            .list()
            .await?
            .into_iter()
            .filter(|c| !is_valid_email(&c.email))
            .collect();

        if !dry_run {
            for citizen in &invalid {
                self.database.citizens.remove(citizen.id.as_str()).await?;
                self.database
                    .emails
                    .release(&citizen.email, citizen.id.as_str())
                    .await?;
            }
        }

        info!(
            operation = operations::EMAIL_CLEANUP,
            count = invalid.len(),
            dry_run,
            "Invalid email scan complete"
        );
        Ok(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{citizen_service, registration};

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let service = citizen_service();
        let citizen = service
            .register(registration("Jane Citizen", "  Jane@Example.COM "))
            .await
            .unwrap();
        assert_eq!(citizen.email, "jane@example.com");
        assert_eq!(citizen.role, Role::Citizen);
        assert_ne!(citizen.password_hash, "password123");
    }

    #[tokio::test]
    async fn test_duplicate_email_case_insensitive() {
        let service = citizen_service();
        service
            .register(registration("Jane Citizen", "jane@example.com"))
            .await
            .unwrap();
        let err = service
            .register(registration("Jane Again", "JANE@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateEmail);
        assert_eq!(service.database.citizens.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_registration() {
        let service = Arc::new(citizen_service());
        let tasks: Vec<_> = (0..5)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .register(registration(&format!("Racer {i}"), "race@example.com"))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert_eq!(e, DomainError::DuplicateEmail),
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_login_failures_are_identical() {
        let service = citizen_service();
        service
            .register(registration("Jane Citizen", "jane@example.com"))
            .await
            .unwrap();

        let unknown = service
            .authenticate(Some("nobody@example.com"), Some("password123"))
            .await
            .unwrap_err();
        let wrong = service
            .authenticate(Some("jane@example.com"), Some("wrong-password"))
            .await
            .unwrap_err();
        assert_eq!(unknown, wrong);
        assert_eq!(unknown.code(), codes::INVALID_CREDENTIALS);
        assert_eq!(unknown.to_string(), wrong.to_string());

        let missing = service.authenticate(Some("jane@example.com"), None).await.unwrap_err();
        assert_eq!(missing.code(), codes::MISSING_CREDENTIALS);

        let ok = service
            .authenticate(Some("JANE@example.com"), Some("password123"))
            .await
            .unwrap();
        assert_eq!(ok.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_profile_email_change_moves_index() {
        let service = citizen_service();
        let jane = service
            .register(registration("Jane Citizen", "jane@example.com"))
            .await
            .unwrap();
        service
            .register(registration("John Citizen", "john@example.com"))
            .await
            .unwrap();
        let actor = Actor::new(jane.id.clone(), jane.role);

        let taken = ProfileUpdate {
            email: Some("john@example.com".into()),
            ..Default::default()
        };
        let err = service.update_profile(&actor, &jane.id, taken).await.unwrap_err();
        assert_eq!(err, DomainError::EmailInUse);

        let update = ProfileUpdate {
            email: Some("jane.doe@example.com".into()),
            ..Default::default()
        };
        let updated = service.update_profile(&actor, &jane.id, update).await.unwrap();
        assert_eq!(updated.email, "jane.doe@example.com");
        assert!(service.find_by_email("jane@example.com").await.unwrap().is_none());
        assert!(service
            .register(registration("New Jane", "jane@example.com"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_self_only_updates() {
        let service = citizen_service();
        let jane = service
            .register(registration("Jane Citizen", "jane@example.com"))
            .await
            .unwrap();
        let other = Actor::new(CitizenId::new("someone-else"), Role::Citizen);

        let err = service
            .update_interests(&other, &jane.id, vec!["housing".into()])
            .await
            .unwrap_err();
        assert_eq!(err.code(), codes::FORBIDDEN);

        let me = Actor::new(jane.id.clone(), Role::Citizen);
        let updated = service
            .update_interests(&me, &jane.id, vec!["housing".into(), "education".into()])
            .await
            .unwrap();
        assert_eq!(updated.interests, vec![Interest::Housing, Interest::Education]);

        let err = service.update_location(&me, &jane.id, None).await.unwrap_err();
        assert_eq!(err.code(), codes::MISSING_LOCATION);
    }

    #[tokio::test]
    async fn test_change_password() {
        let service = citizen_service();
        let jane = service
            .register(registration("Jane Citizen", "jane@example.com"))
            .await
            .unwrap();
        let me = Actor::new(jane.id.clone(), Role::Citizen);

        let wrong = PasswordChange {
            current_password: Some("not-my-password".into()),
            new_password: Some("new-password-1".into()),
        };
        let err = service.change_password(&me, &jane.id, wrong).await.unwrap_err();
        assert_eq!(err, DomainError::IncorrectPassword);

        let change = PasswordChange {
            current_password: Some("password123".into()),
            new_password: Some("new-password-1".into()),
        };
        service.change_password(&me, &jane.id, change).await.unwrap();
        assert!(service
            .authenticate(Some("jane@example.com"), Some("new-password-1"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_set_role_rules() {
        let service = citizen_service();
        let admin = service
            .register(registration("Ada Admin", "ada@example.com"))
            .await
            .unwrap();
        let admin = service.grant_admin(&admin.email).await.unwrap();
        let jane = service
            .register(registration("Jane Citizen", "jane@example.com"))
            .await
            .unwrap();
        let actor = Actor::new(admin.id.clone(), admin.role);

        let err = service.set_role(&actor, &jane.id, "mayor").await.unwrap_err();
        assert_eq!(err.code(), codes::INVALID_ROLE);

        let err = service
            .set_role(&actor, &CitizenId::new("missing"), "admin")
            .await
            .unwrap_err();
        assert_eq!(err.code(), codes::NOT_FOUND);

        let err = service.set_role(&actor, &admin.id, "citizen").await.unwrap_err();
        assert_eq!(err.code(), codes::FORBIDDEN);

        let promoted = service.set_role(&actor, &jane.id, "admin").await.unwrap();
        assert!(promoted.is_admin());
    }

    #[tokio::test]
    async fn test_list_citizens_search() {
        let service = citizen_service();
        for (name, email) in [
            ("Jane Citizen", "jane@example.com"),
            ("John Voter", "john@example.com"),
            ("Ada Admin", "ada@example.org"),
        ] {
            service.register(registration(name, email)).await.unwrap();
        }

        let page = service
            .list_citizens(Some("example.com"), PageRequest::new(None, None, 20))
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);

        let page = service
            .list_citizens(None, PageRequest::new(Some(2), Some(2), 20))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.pages, 2);
    }

    #[tokio::test]
    async fn test_remove_invalid_emails() {
        let service = citizen_service();
        let jane = service
            .register(registration("Jane Citizen", "jane@example.com"))
            .await
            .unwrap();

        // Simulate a legacy record that slipped past validation
        let mut legacy = jane.clone();
        legacy.id = CitizenId::new("legacy");
        legacy.email = "legacy@gmial.com".into();
        service.database.citizens.put(&legacy).await.unwrap();
        service
            .database
            .emails
            .claim(&legacy.email, legacy.id.as_str())
            .await
            .unwrap();

        let found = service.remove_invalid_emails(true).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(service.database.citizens.count().await.unwrap(), 2);

        let removed = service.remove_invalid_emails(false).await.unwrap();
        assert_eq!(removed[0].id, legacy.id);
        assert_eq!(service.database.citizens.count().await.unwrap(), 1);
        assert!(service.database.emails.owner("legacy@gmial.com").await.unwrap().is_none());
    }
}

//! Access control rules
//!
//! The authenticated caller is passed explicitly to every operation that
//! needs it; there is no ambient identity.

use crate::error::{DomainError, DomainResult};
use crate::types::{CitizenId, Role};

/// The authenticated caller of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: CitizenId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: CitizenId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn ensure_admin(&self) -> DomainResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::AdminOnly)
        }
    }

    /// Only the account owner may act; `what` names the resource in the message
    pub fn ensure_self(&self, target: &CitizenId, what: &str) -> DomainResult<()> {
        if &self.id == target {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "You can only update your own {}",
                what
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_self() {
        let actor = Actor::new(CitizenId::new("a"), Role::Citizen);
        assert!(actor.ensure_self(&CitizenId::new("a"), "profile").is_ok());
        let err = actor.ensure_self(&CitizenId::new("b"), "profile").unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
        assert_eq!(err.to_string(), "You can only update your own profile");
    }

    #[test]
    fn test_ensure_admin() {
        assert_eq!(
            Actor::new(CitizenId::new("a"), Role::Citizen).ensure_admin(),
            Err(DomainError::AdminOnly)
        );
        assert!(Actor::new(CitizenId::new("a"), Role::Admin).ensure_admin().is_ok());
    }
}

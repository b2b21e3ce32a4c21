//! Event Registry - community events and registrations

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::access::Actor;
use crate::error::DomainResult;
use crate::types::{Event, EventId, NewEvent};

/// Event Registry trait
#[async_trait]
pub trait EventRegistry: Send + Sync {
    /// Schedule an event (admin only)
    async fn create_event(&self, actor: &Actor, input: NewEvent) -> DomainResult<Event>;

    async fn get_event(&self, id: &EventId) -> DomainResult<Option<Event>>;

    /// Upcoming events dated at or after `now`, soonest first
    async fn upcoming_events(&self, now: DateTime<Utc>) -> DomainResult<Vec<Event>>;

    /// Register the caller; all checks and the append are one atomic update
    async fn register_attendee(&self, actor: &Actor, id: &EventId) -> DomainResult<Event>;

    async fn unregister_attendee(&self, actor: &Actor, id: &EventId) -> DomainResult<Event>;
}

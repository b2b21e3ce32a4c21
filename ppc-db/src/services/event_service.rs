//! Event Registry Service Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use ppc_core::access::Actor;
use ppc_core::error::{DomainError, DomainResult};
use ppc_core::logging::operations;
use ppc_core::registry::EventRegistry;
use ppc_core::types::{Event, EventId, NewEvent};

use crate::database::PpcDatabase;

/// Event Registry Service
pub struct EventService {
    database: Arc<PpcDatabase>,
}

impl EventService {
    pub fn new(database: Arc<PpcDatabase>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl EventRegistry for EventService {
    async fn create_event(&self, actor: &Actor, input: NewEvent) -> DomainResult<Event> {
        actor.ensure_admin()?;
        let now = Utc::now();
        let event = Event::new(input.validate(now)?, actor.id.clone(), now);

        if !self.database.events.insert(&event).await? {
            return Err(DomainError::Internal("event id collision".to_string()));
        }

        info!(
            operation = operations::EVENT_CREATE,
            event_id = %event.id,
            date = %event.date,
            "Event created"
        );
        Ok(event)
    }

    async fn get_event(&self, id: &EventId) -> DomainResult<Option<Event>> {
        Ok(self.database.events.get(id.as_str()).await?)
    }

    async fn upcoming_events(&self, now: DateTime<Utc>) -> DomainResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .database
            .events
            .list()
            .await?
            .into_iter()
            .filter(|e| e.is_upcoming(now))
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(events)
    }

    async fn register_attendee(&self, actor: &Actor, id: &EventId) -> DomainResult<Event> {
        let (event, _) = self
            .database
            .events
            .update(id.as_str(), |event| event.register(&actor.id, Utc::now()))
            .await?;

        info!(
            operation = operations::EVENT_REGISTER,
            event_id = %event.id,
            citizen_id = %actor.id,
            registered = event.registered_citizens.len(),
            "Citizen registered for event"
        );
        Ok(event)
    }

    async fn unregister_attendee(&self, actor: &Actor, id: &EventId) -> DomainResult<Event> {
        let (event, _) = self
            .database
            .events
            .update(id.as_str(), |event| event.unregister(&actor.id, Utc::now()))
            .await?;

        info!(
            operation = operations::EVENT_UNREGISTER,
            event_id = %event.id,
            citizen_id = %actor.id,
            "Citizen unregistered from event"
        );
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{admin, citizen, database};
    use chrono::Duration;
    use ppc_core::types::EventLocation;

    fn new_event(days_ahead: i64, capacity: Option<i64>) -> NewEvent {
        NewEvent {
            title: Some("Budget town hall".to_string()),
            description: Some("Open discussion of the ward budget".to_string()),
            event_type: Some("town-hall".to_string()),
            date: Some((Utc::now() + Duration::days(days_ahead)).to_rfc3339()),
            time: Some("18:00".to_string()),
            location: Some(EventLocation {
                venue: Some("Civic Hall".to_string()),
                ..Default::default()
            }),
            capacity,
        }
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let service = EventService::new(database());
        let err = service
            .create_event(&citizen("c1"), new_event(3, None))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::AdminOnly);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_respect_capacity() {
        let capacity = 5;
        let service = Arc::new(EventService::new(database()));
        let event = service
            .create_event(&admin(), new_event(3, Some(capacity)))
            .await
            .unwrap();

        let tasks: Vec<_> = (0..=capacity)
            .map(|i| {
                let service = service.clone();
                let id = event.id.clone();
                tokio::spawn(async move {
                    service
                        .register_attendee(&citizen(&format!("c{i}")), &id)
                        .await
                })
            })
            .collect();

        let mut ok = 0;
        let mut full = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => ok += 1,
                Err(DomainError::EventFull) => full += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(ok, capacity as usize);
        assert!(full >= 1);

        let stored = service.get_event(&event.id).await.unwrap().unwrap();
        assert_eq!(stored.registered_citizens.len(), capacity as usize);
    }

    #[tokio::test]
    async fn test_register_twice_and_unregister() {
        let service = EventService::new(database());
        let event = service
            .create_event(&admin(), new_event(3, None))
            .await
            .unwrap();
        let jane = citizen("jane");

        service.register_attendee(&jane, &event.id).await.unwrap();
        let err = service.register_attendee(&jane, &event.id).await.unwrap_err();
        assert_eq!(err, DomainError::AlreadyRegistered);

        let event = service.unregister_attendee(&jane, &event.id).await.unwrap();
        assert!(event.registered_citizens.is_empty());
        let err = service.unregister_attendee(&jane, &event.id).await.unwrap_err();
        assert_eq!(err, DomainError::NotRegistered);
    }

    #[tokio::test]
    async fn test_register_unknown_event() {
        let service = EventService::new(database());
        let err = service
            .register_attendee(&citizen("jane"), &EventId::new("nope"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound("Event"));
    }

    #[tokio::test]
    async fn test_upcoming_sorted_soonest_first() {
        let service = EventService::new(database());
        let later = service.create_event(&admin(), new_event(10, None)).await.unwrap();
        let sooner = service.create_event(&admin(), new_event(2, None)).await.unwrap();

        let upcoming = service.upcoming_events(Utc::now()).await.unwrap();
        let ids: Vec<_> = upcoming.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec![sooner.id, later.id]);

        let far_future = Utc::now() + Duration::days(30);
        assert!(service.upcoming_events(far_future).await.unwrap().is_empty());
    }
}

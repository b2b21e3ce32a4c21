//! Community events and registration

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::{non_blank, CitizenId, EventId};
use crate::constants::*;
use crate::error::{DomainError, DomainResult};
use crate::validation::check_length;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    Meeting,
    Workshop,
    TownHall,
    Hearing,
    Other,
}

impl EventType {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "meeting" => Ok(EventType::Meeting),
            "workshop" => Ok(EventType::Workshop),
            "town-hall" => Ok(EventType::TownHall),
            "hearing" => Ok(EventType::Hearing),
            "other" => Ok(EventType::Other),
            _ => Err(DomainError::invalid(format!("Unknown event type: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLocation {
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub time: String,
    pub location: EventLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    pub registered_citizens: Vec<CitizenId>,
    pub created_by: CitizenId,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw event creation input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    /// RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<EventLocation>,
    #[serde(default)]
    pub capacity: Option<i64>,
}

/// Event input that passed validation
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub time: String,
    pub location: EventLocation,
    pub capacity: Option<u32>,
}

fn parse_event_date(raw: &str) -> DomainResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| DomainError::invalid(format!("Invalid event date: {}", raw)))
}

impl NewEvent {
    pub fn validate(self, now: DateTime<Utc>) -> DomainResult<EventDraft> {
        let title = non_blank(self.title);
        let description = non_blank(self.description);
        let event_type = non_blank(self.event_type);
        let date = non_blank(self.date);
        let time = non_blank(self.time);
        let location = self
            .location
            .filter(|l| l.venue.as_deref().is_some_and(|v| !v.trim().is_empty()));

        let (title, description, event_type, date, time, mut location) =
            match (title, description, event_type, date, time, location) {
                (Some(t), Some(d), Some(e), Some(dt), Some(tm), Some(l)) => (t, d, e, dt, tm, l),
                _ => {
                    return Err(DomainError::missing_fields(
                        "Please provide all required fields",
                    ))
                }
            };

        let title = check_length("Title", &title, EVENT_TITLE_MIN_LENGTH, EVENT_TITLE_MAX_LENGTH)?;
        let description =
            check_length("Description", &description, 1, EVENT_DESCRIPTION_MAX_LENGTH)?;
        let event_type = EventType::parse(&event_type)?;

        let date = parse_event_date(&date)?;
        if date <= now {
            return Err(DomainError::invalid("Event date must be in the future"));
        }

        let capacity = match self.capacity {
            Some(c) if c < 1 => return Err(DomainError::invalid("Capacity must be at least 1")),
            Some(c) => Some(
                u32::try_from(c).map_err(|_| DomainError::invalid("Capacity is too large"))?,
            ),
            None => None,
        };

        location.venue = non_blank(location.venue);

        Ok(EventDraft {
            title,
            description,
            event_type,
            date,
            time,
            location,
            capacity,
        })
    }
}

impl Event {
    pub fn new(draft: EventDraft, created_by: CitizenId, now: DateTime<Utc>) -> Self {
        Self {
            id: EventId::generate(),
            title: draft.title,
            description: draft.description,
            event_type: draft.event_type,
            date: draft.date,
            time: draft.time,
            location: draft.location,
            capacity: draft.capacity,
            registered_citizens: Vec::new(),
            created_by,
            status: EventStatus::Upcoming,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_registered(&self, citizen: &CitizenId) -> bool {
        self.registered_citizens.contains(citizen)
    }

    pub fn is_full(&self) -> bool {
        self.capacity
            .is_some_and(|cap| self.registered_citizens.len() >= cap as usize)
    }

    /// Upcoming and not yet started
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.status == EventStatus::Upcoming && self.date >= now
    }

    /// Add a registration: past events first, then duplicates, then capacity
    pub fn register(&mut self, citizen: &CitizenId, now: DateTime<Utc>) -> DomainResult<()> {
        if self.date < now {
            return Err(DomainError::EventPast);
        }
        if self.is_registered(citizen) {
            return Err(DomainError::AlreadyRegistered);
        }
        if self.is_full() {
            return Err(DomainError::EventFull);
        }
        self.registered_citizens.push(citizen.clone());
        self.updated_at = now;
        Ok(())
    }

    pub fn unregister(&mut self, citizen: &CitizenId, now: DateTime<Utc>) -> DomainResult<()> {
        let before = self.registered_citizens.len();
        self.registered_citizens.retain(|c| c != citizen);
        if self.registered_citizens.len() == before {
            return Err(DomainError::NotRegistered);
        }
        self.updated_at = now;
        Ok(())
    }
}

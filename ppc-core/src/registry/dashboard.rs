//! Administrator dashboard

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::access::Actor;
use crate::error::DomainResult;
use crate::types::{ActivityItem, DashboardStats};

/// Read-only views across all registries
#[async_trait]
pub trait Dashboard: Send + Sync {
    /// Headline counts; upcoming events are counted from the start of `now`'s day
    async fn stats(&self, actor: &Actor, now: DateTime<Utc>) -> DomainResult<DashboardStats>;

    /// Balanced feed of the latest activity in each area
    async fn recent_activity(&self, actor: &Actor) -> DomainResult<Vec<ActivityItem>>;
}

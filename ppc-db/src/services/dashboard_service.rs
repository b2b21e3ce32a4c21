//! Administrator dashboard service

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use ppc_core::access::Actor;
use ppc_core::error::DomainResult;
use ppc_core::registry::Dashboard;
use ppc_core::types::{
    recent_activity, ActivityItem, Citizen, CivicIssue, DashboardStats, Event, IssueStatusCounts,
    Survey,
};

use crate::database::PpcDatabase;

pub struct DashboardService {
    database: Arc<PpcDatabase>,
}

impl DashboardService {
    pub fn new(database: Arc<PpcDatabase>) -> Self {
        Self { database }
    }
}

/// Midnight UTC of the day containing `now`
fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

#[async_trait]
impl Dashboard for DashboardService {
    async fn stats(&self, actor: &Actor, now: DateTime<Utc>) -> DomainResult<DashboardStats> {
        actor.ensure_admin()?;
        let issues = self.database.issues.list().await?;
        let today = start_of_day(now);

        Ok(DashboardStats {
            total_citizens: self.database.citizens.count().await?,
            total_issues: issues.len(),
            issues_by_status: IssueStatusCounts::tally(&issues),
            upcoming_events: self
                .database
                .events
                .list()
                .await?
                .iter()
                .filter(|e| e.date >= today)
                .count(),
            active_surveys: self
                .database
                .surveys
                .list()
                .await?
                .iter()
                .filter(|s| s.is_active())
                .count(),
        })
    }

    async fn recent_activity(&self, actor: &Actor) -> DomainResult<Vec<ActivityItem>> {
        actor.ensure_admin()?;

        let mut citizens: Vec<Citizen> = self.database.citizens.list().await?;
        citizens.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let mut issues: Vec<CivicIssue> = self.database.issues.list().await?;
        issues.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let mut events: Vec<Event> = self.database.events.list().await?;
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let mut surveys: Vec<Survey> = self.database.surveys.list().await?;
        surveys.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(recent_activity(&citizens, &issues, &events, &surveys))
    }
}

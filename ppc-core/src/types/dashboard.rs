//! Administrator dashboard views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Citizen, CivicIssue, Event, IssueStatus, Survey};
use crate::constants::{ACTIVITY_FEED_LIMIT, ACTIVITY_PER_CATEGORY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStatusCounts {
    pub open: usize,
    #[serde(rename = "in-progress")]
    pub in_progress: usize,
    pub resolved: usize,
    pub closed: usize,
}

impl IssueStatusCounts {
    pub fn tally<'a>(issues: impl IntoIterator<Item = &'a CivicIssue>) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            match issue.status {
                IssueStatus::Open => counts.open += 1,
                IssueStatus::InProgress => counts.in_progress += 1,
                IssueStatus::Resolved => counts.resolved += 1,
                IssueStatus::Closed => counts.closed += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_citizens: usize,
    pub total_issues: usize,
    pub issues_by_status: IssueStatusCounts,
    pub upcoming_events: usize,
    pub active_surveys: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Citizen,
    Issue,
    Event,
    Survey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Most recent entries from each category, newest first
///
/// Each input slice must already be sorted newest first.
pub fn recent_activity(
    citizens: &[Citizen],
    issues: &[CivicIssue],
    events: &[Event],
    surveys: &[Survey],
) -> Vec<ActivityItem> {
    let take = ACTIVITY_PER_CATEGORY;
    let mut feed: Vec<ActivityItem> = Vec::with_capacity(take * 4);

    feed.extend(citizens.iter().take(take).map(|c| ActivityItem {
        kind: ActivityKind::Citizen,
        text: format!("{} registered", c.name),
        timestamp: c.created_at,
    }));
    feed.extend(issues.iter().take(take).map(|i| ActivityItem {
        kind: ActivityKind::Issue,
        text: format!("Issue \"{}\" marked as {}", i.title, i.status.label()),
        timestamp: i.updated_at,
    }));
    feed.extend(events.iter().take(take).map(|e| ActivityItem {
        kind: ActivityKind::Event,
        text: format!("Event \"{}\" scheduled", e.title),
        timestamp: e.created_at,
    }));
    feed.extend(surveys.iter().take(take).map(|s| ActivityItem {
        kind: ActivityKind::Survey,
        text: format!("Survey \"{}\" published", s.title),
        timestamp: s.created_at,
    }));

    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed.truncate(ACTIVITY_FEED_LIMIT);
    feed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_counts_serialize_kebab() {
        let counts = IssueStatusCounts {
            in_progress: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["in-progress"], 2);
        assert_eq!(json["open"], 0);
    }

    #[test]
    fn test_empty_feed() {
        assert!(recent_activity(&[], &[], &[], &[]).is_empty());
    }

    #[test]
    fn test_activity_kind_wire_name() {
        let item = ActivityItem {
            kind: ActivityKind::Survey,
            text: "Survey \"Parks\" published".into(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(item).unwrap();
        assert_eq!(json["type"], "survey");
    }
}

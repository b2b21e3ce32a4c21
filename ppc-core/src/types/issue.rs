//! Civic issues and their status lifecycle
//!
//! Status history is append-only: every accepted status change or comment
//! adds exactly one entry, and nothing ever edits or removes one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{non_blank, CitizenId, IssueId, Location, SearchPattern};
use crate::constants::*;
use crate::error::{codes, DomainError, DomainResult};
use crate::validation::check_length;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    Infrastructure,
    Education,
    Healthcare,
    Environment,
    PublicSafety,
    Transportation,
    Housing,
    Other,
}

impl IssueCategory {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "infrastructure" => Ok(IssueCategory::Infrastructure),
            "education" => Ok(IssueCategory::Education),
            "healthcare" => Ok(IssueCategory::Healthcare),
            "environment" => Ok(IssueCategory::Environment),
            "public-safety" => Ok(IssueCategory::PublicSafety),
            "transportation" => Ok(IssueCategory::Transportation),
            "housing" => Ok(IssueCategory::Housing),
            "other" => Ok(IssueCategory::Other),
            _ => Err(DomainError::invalid(format!("Unknown issue category: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 4] = [
        IssueStatus::Open,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
        IssueStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "open",
            IssueStatus::InProgress => "in-progress",
            IssueStatus::Resolved => "resolved",
            IssueStatus::Closed => "closed",
        }
    }

    /// Human wording used in activity feeds
    pub fn label(&self) -> &'static str {
        match self {
            IssueStatus::InProgress => "in progress",
            other => other.as_str(),
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(DomainError::InvalidStatus)
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an issue's status history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub status: IssueStatus,
    pub comment: String,
    pub updated_by: CitizenId,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CivicIssue {
    pub id: IssueId,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub status: IssueStatus,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub submitted_by: CitizenId,
    pub status_history: Vec<StatusEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw issue submission
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

/// Issue submission that passed validation
#[derive(Debug, Clone)]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub location: Location,
}

impl NewIssue {
    pub fn validate(self) -> DomainResult<IssueDraft> {
        let title = non_blank(self.title);
        let description = non_blank(self.description);
        let category = non_blank(self.category);
        let location = self.location.filter(|l| l.address().is_some());

        let (title, description, category, mut location) =
            match (title, description, category, location) {
                (Some(t), Some(d), Some(c), Some(l)) => (t, d, c, l),
                _ => {
                    return Err(DomainError::missing_fields(
                        "Please provide title, description, category, and location",
                    ))
                }
            };

        let title = check_length("Title", &title, ISSUE_TITLE_MIN_LENGTH, ISSUE_TITLE_MAX_LENGTH)?;
        let description = check_length(
            "Description",
            &description,
            ISSUE_DESCRIPTION_MIN_LENGTH,
            ISSUE_DESCRIPTION_MAX_LENGTH,
        )?;
        let category = IssueCategory::parse(&category)?;
        location.address = location.address().map(str::to_string);

        Ok(IssueDraft {
            title,
            description,
            category,
            location,
        })
    }
}

/// A validated request to change an issue's status
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: IssueStatus,
    pub comment: String,
}

impl StatusUpdate {
    /// Checks the status value first, then the resolution comment
    pub fn new(status: Option<&str>, comment: Option<&str>) -> DomainResult<Self> {
        let status = IssueStatus::parse(status.unwrap_or_default())?;
        let comment = comment.map(str::trim).filter(|c| !c.is_empty());

        if status == IssueStatus::Resolved && comment.is_none() {
            return Err(DomainError::CommentRequired);
        }

        Ok(Self {
            status,
            comment: comment
                .map(str::to_string)
                .unwrap_or_else(|| format!("Status changed to {}", status)),
        })
    }
}

impl CivicIssue {
    /// Create an open issue with its initial history entry
    pub fn open(
        draft: IssueDraft,
        submitted_by: CitizenId,
        image_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: IssueId::generate(),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            status: IssueStatus::Open,
            location: draft.location,
            image_url,
            status_history: vec![StatusEntry {
                status: IssueStatus::Open,
                comment: "Issue created".to_string(),
                updated_by: submitted_by.clone(),
                updated_at: now,
            }],
            submitted_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a status change and record it. Any status may follow any other.
    pub fn apply_status(&mut self, update: &StatusUpdate, by: &CitizenId, now: DateTime<Utc>) {
        self.status = update.status;
        self.status_history.push(StatusEntry {
            status: update.status,
            comment: update.comment.clone(),
            updated_by: by.clone(),
            updated_at: now,
        });
        self.updated_at = now;
    }

    /// Record a comment against the current status
    pub fn add_comment(
        &mut self,
        comment: &str,
        by: &CitizenId,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(DomainError::validation(
                codes::MISSING_COMMENT,
                "Please provide a comment",
            ));
        }
        self.status_history.push(StatusEntry {
            status: self.status,
            comment: comment.to_string(),
            updated_by: by.clone(),
            updated_at: now,
        });
        self.updated_at = now;
        Ok(())
    }
}

/// Listing filter for issues
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub status: Option<IssueStatus>,
    pub category: Option<IssueCategory>,
    pub submitted_by: Option<CitizenId>,
    pub search: Option<SearchPattern>,
}

impl IssueFilter {
    /// Build from raw query values; blank values are ignored
    pub fn from_query(
        status: Option<&str>,
        category: Option<&str>,
        search: Option<&str>,
    ) -> DomainResult<Self> {
        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Some(IssueStatus::parse(s)?),
            None => None,
        };
        let category = match category.map(str::trim).filter(|s| !s.is_empty()) {
            Some(c) => Some(IssueCategory::parse(c)?),
            None => None,
        };
        Ok(Self {
            status,
            category,
            submitted_by: None,
            search: search.and_then(SearchPattern::new),
        })
    }

    pub fn matches(&self, issue: &CivicIssue) -> bool {
        self.status.map_or(true, |s| issue.status == s)
            && self.category.map_or(true, |c| issue.category == c)
            && self
                .submitted_by
                .as_ref()
                .map_or(true, |id| &issue.submitted_by == id)
            && self.search.as_ref().map_or(true, |search| {
                search.matches_any([issue.title.as_str(), issue.description.as_str()])
            })
    }
}

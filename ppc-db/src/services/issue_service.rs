//! Issue Registry Service Implementation

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use ppc_core::access::Actor;
use ppc_core::error::{DomainError, DomainResult};
use ppc_core::logging::operations;
use ppc_core::registry::IssueRegistry;
use ppc_core::types::{
    CitizenId, CivicIssue, IssueFilter, IssueId, NewIssue, Page, PageRequest, StatusUpdate,
};

use crate::database::PpcDatabase;

/// Issue Registry Service
pub struct IssueService {
    database: Arc<PpcDatabase>,
}

impl IssueService {
    pub fn new(database: Arc<PpcDatabase>) -> Self {
        Self { database }
    }

    async fn matching(&self, filter: &IssueFilter) -> DomainResult<Vec<CivicIssue>> {
        let mut issues: Vec<CivicIssue> = self
            .database
            .issues
            .list()
            .await?
            .into_iter()
            .filter(|issue| filter.matches(issue))
            .collect();
        issues.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(issues)
    }
}

#[async_trait]
impl IssueRegistry for IssueService {
    async fn submit_issue(
        &self,
        actor: &Actor,
        input: NewIssue,
        image_url: Option<String>,
    ) -> DomainResult<CivicIssue> {
        let draft = input.validate()?;
        let issue = CivicIssue::open(draft, actor.id.clone(), image_url, Utc::now());

        if !self.database.issues.insert(&issue).await? {
            return Err(DomainError::Internal("issue id collision".to_string()));
        }

        info!(
            operation = operations::ISSUE_SUBMIT,
            issue_id = %issue.id,
            citizen_id = %actor.id,
            category = ?issue.category,
            "Issue submitted"
        );
        Ok(issue)
    }

    async fn get_issue(&self, id: &IssueId) -> DomainResult<Option<CivicIssue>> {
        Ok(self.database.issues.get(id.as_str()).await?)
    }

    async fn list_issues(
        &self,
        filter: IssueFilter,
        page: PageRequest,
    ) -> DomainResult<Page<CivicIssue>> {
        let issues = self.matching(&filter).await?;
        Ok(Page::from_sorted(issues, page))
    }

    async fn issues_by_citizen(&self, id: &CitizenId) -> DomainResult<Vec<CivicIssue>> {
        let filter = IssueFilter {
            submitted_by: Some(id.clone()),
            ..Default::default()
        };
        self.matching(&filter).await
    }

    async fn update_status(
        &self,
        actor: &Actor,
        id: &IssueId,
        update: StatusUpdate,
    ) -> DomainResult<CivicIssue> {
        actor.ensure_admin()?;
        let (issue, _) = self
            .database
            .issues
            .update(id.as_str(), |issue| {
                issue.apply_status(&update, &actor.id, Utc::now());
                Ok(())
            })
            .await?;

        info!(
            operation = operations::ISSUE_STATUS,
            issue_id = %issue.id,
            status = %issue.status,
            updated_by = %actor.id,
            "Issue status updated"
        );
        Ok(issue)
    }

    async fn add_comment(
        &self,
        actor: &Actor,
        id: &IssueId,
        comment: &str,
    ) -> DomainResult<CivicIssue> {
        actor.ensure_admin()?;
        let (issue, _) = self
            .database
            .issues
            .update(id.as_str(), |issue| {
                issue.add_comment(comment, &actor.id, Utc::now())
            })
            .await?;

        info!(
            operation = operations::ISSUE_COMMENT,
            issue_id = %issue.id,
            updated_by = %actor.id,
            "Issue comment added"
        );
        Ok(issue)
    }
}

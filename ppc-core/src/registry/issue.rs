//! Issue Registry - civic issue reports

use async_trait::async_trait;

use crate::access::Actor;
use crate::error::DomainResult;
use crate::types::{
    CitizenId, CivicIssue, IssueFilter, IssueId, NewIssue, Page, PageRequest, StatusUpdate,
};

/// Issue Registry trait
#[async_trait]
pub trait IssueRegistry: Send + Sync {
    /// Submit an issue on behalf of the caller
    async fn submit_issue(
        &self,
        actor: &Actor,
        input: NewIssue,
        image_url: Option<String>,
    ) -> DomainResult<CivicIssue>;

    async fn get_issue(&self, id: &IssueId) -> DomainResult<Option<CivicIssue>>;

    /// Newest first
    async fn list_issues(
        &self,
        filter: IssueFilter,
        page: PageRequest,
    ) -> DomainResult<Page<CivicIssue>>;

    /// All issues submitted by one citizen, newest first
    async fn issues_by_citizen(&self, id: &CitizenId) -> DomainResult<Vec<CivicIssue>>;

    /// Change status and append one history entry (admin only)
    async fn update_status(
        &self,
        actor: &Actor,
        id: &IssueId,
        update: StatusUpdate,
    ) -> DomainResult<CivicIssue>;

    /// Append a comment without changing status (admin only)
    async fn add_comment(
        &self,
        actor: &Actor,
        id: &IssueId,
        comment: &str,
    ) -> DomainResult<CivicIssue>;
}

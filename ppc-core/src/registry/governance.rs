//! Governance Registry - council membership and decisions

use async_trait::async_trait;

use crate::access::Actor;
use crate::error::DomainResult;
use crate::types::{
    CouncilMember, DecisionId, DecisionInput, DecisionStatus, GovernanceDecision,
    GovernanceMetrics, MemberId, MemberInput,
};

/// Governance Registry trait
#[async_trait]
pub trait GovernanceRegistry: Send + Sync {
    /// Active members ordered by role then name
    async fn active_council(&self) -> DomainResult<Vec<CouncilMember>>;

    /// Every member, active first, then by role and name (admin only)
    async fn all_council(&self, actor: &Actor) -> DomainResult<Vec<CouncilMember>>;

    async fn add_member(&self, actor: &Actor, input: MemberInput) -> DomainResult<CouncilMember>;

    async fn update_member(
        &self,
        actor: &Actor,
        id: &MemberId,
        input: MemberInput,
    ) -> DomainResult<CouncilMember>;

    /// Deletion is deactivation; the record is kept
    async fn deactivate_member(&self, actor: &Actor, id: &MemberId)
        -> DomainResult<CouncilMember>;

    /// Newest first, optionally filtered by status
    async fn decisions(
        &self,
        status: Option<DecisionStatus>,
        limit: Option<usize>,
    ) -> DomainResult<Vec<GovernanceDecision>>;

    async fn propose_decision(
        &self,
        actor: &Actor,
        input: DecisionInput,
    ) -> DomainResult<GovernanceDecision>;

    /// Apply an update as one atomic document change
    async fn update_decision(
        &self,
        actor: &Actor,
        id: &DecisionId,
        input: DecisionInput,
    ) -> DomainResult<GovernanceDecision>;

    async fn metrics(&self) -> DomainResult<GovernanceMetrics>;
}

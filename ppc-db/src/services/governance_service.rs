//! Governance Registry Service Implementation
//!
//! Council membership and the decision lifecycle. Every decision update is
//! a single compare-and-swap of the whole document, so the tally, consensus
//! rate and outcome status always land together.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use ppc_core::access::Actor;
use ppc_core::constants::DEFAULT_DECISION_LIMIT;
use ppc_core::error::{DomainError, DomainResult};
use ppc_core::logging::operations;
use ppc_core::registry::GovernanceRegistry;
use ppc_core::types::{
    CouncilMember, DecisionId, DecisionInput, DecisionStatus, GovernanceDecision,
    GovernanceMetrics, MemberId, MemberInput,
};

use crate::database::PpcDatabase;

/// Governance Registry Service
pub struct GovernanceService {
    database: Arc<PpcDatabase>,
}

impl GovernanceService {
    pub fn new(database: Arc<PpcDatabase>) -> Self {
        Self { database }
    }

    fn by_role_then_name(members: &mut [CouncilMember]) {
        members.sort_by(|a, b| a.role.cmp(&b.role).then_with(|| a.name.cmp(&b.name)));
    }
}

#[async_trait]
impl GovernanceRegistry for GovernanceService {
    async fn active_council(&self) -> DomainResult<Vec<CouncilMember>> {
        let mut members: Vec<CouncilMember> = self
            .database
            .council
            .list()
            .await?
            .into_iter()
            .filter(CouncilMember::is_active)
            .collect();
        Self::by_role_then_name(&mut members);
        Ok(members)
    }

    async fn all_council(&self, actor: &Actor) -> DomainResult<Vec<CouncilMember>> {
        actor.ensure_admin()?;
        let mut members = self.database.council.list().await?;
        Self::by_role_then_name(&mut members);
        // stable sort keeps role/name order inside each group
        members.sort_by_key(|m| !m.is_active());
        Ok(members)
    }

    async fn add_member(&self, actor: &Actor, input: MemberInput) -> DomainResult<CouncilMember> {
        actor.ensure_admin()?;
        let member = CouncilMember::create(input, Utc::now())?;

        if !self.database.council.insert(&member).await? {
            return Err(DomainError::Internal("member id collision".to_string()));
        }

        info!(
            operation = operations::MEMBER_ADD,
            member_id = %member.id,
            role = member.role.as_str(),
            "Council member added"
        );
        Ok(member)
    }

    async fn update_member(
        &self,
        actor: &Actor,
        id: &MemberId,
        input: MemberInput,
    ) -> DomainResult<CouncilMember> {
        actor.ensure_admin()?;
        let (member, _) = self
            .database
            .council
            .update(id.as_str(), |member| member.apply(input.clone(), Utc::now()))
            .await?;

        info!(
            operation = operations::MEMBER_UPDATE,
            member_id = %member.id,
            active = member.is_active(),
            "Council member updated"
        );
        Ok(member)
    }

    async fn deactivate_member(
        &self,
        actor: &Actor,
        id: &MemberId,
    ) -> DomainResult<CouncilMember> {
        actor.ensure_admin()?;
        let (member, _) = self
            .database
            .council
            .update(id.as_str(), |member| {
                member.deactivate(Utc::now());
                Ok(())
            })
            .await?;

        info!(
            operation = operations::MEMBER_DEACTIVATE,
            member_id = %member.id,
            "Council member deactivated"
        );
        Ok(member)
    }

    async fn decisions(
        &self,
        status: Option<DecisionStatus>,
        limit: Option<usize>,
    ) -> DomainResult<Vec<GovernanceDecision>> {
        let mut decisions: Vec<GovernanceDecision> = self
            .database
            .decisions
            .list()
            .await?
            .into_iter()
            .filter(|d| status.map_or(true, |s| d.status == s))
            .collect();
        decisions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        decisions.truncate(limit.unwrap_or(DEFAULT_DECISION_LIMIT));
        Ok(decisions)
    }

    async fn propose_decision(
        &self,
        actor: &Actor,
        input: DecisionInput,
    ) -> DomainResult<GovernanceDecision> {
        actor.ensure_admin()?;
        let decision = GovernanceDecision::create(input, Utc::now())?;

        if !self.database.decisions.insert(&decision).await? {
            return Err(DomainError::Internal("decision id collision".to_string()));
        }

        info!(
            operation = operations::DECISION_PROPOSE,
            decision_id = %decision.id,
            category = ?decision.category,
            "Decision proposed"
        );
        Ok(decision)
    }

    async fn update_decision(
        &self,
        actor: &Actor,
        id: &DecisionId,
        input: DecisionInput,
    ) -> DomainResult<GovernanceDecision> {
        actor.ensure_admin()?;
        let (decision, _) = self
            .database
            .decisions
            .update(id.as_str(), |decision| {
                decision.apply_update(input.clone(), Utc::now())
            })
            .await?;

        info!(
            operation = operations::DECISION_UPDATE,
            decision_id = %decision.id,
            status = decision.status.as_str(),
            consensus_rate = decision.consensus_rate,
            "Decision updated"
        );
        Ok(decision)
    }

    async fn metrics(&self) -> DomainResult<GovernanceMetrics> {
        let decisions = self.database.decisions.list().await?;
        let members = self.database.council.list().await?;
        Ok(GovernanceMetrics::compute(&decisions, &members, Utc::now()))
    }
}

//! Governance council and decision workflow
//!
//! Decisions move forward through their status and stage. Explicit status
//! moves by an administrator are limited to the deliberation path and to
//! implementing an approved decision; approval and rejection come only from
//! recorded votes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{non_blank, DecisionId, MemberId};
use crate::constants::*;
use crate::error::{DomainError, DomainResult};
use crate::validation::{check_length, validate_email};

// ============================================================================
// Council
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CouncilRole {
    #[serde(rename = "Women Representative")]
    WomenRepresentative,
    #[serde(rename = "Youth Member")]
    YouthMember,
    #[serde(rename = "Local Business Leader")]
    LocalBusinessLeader,
    #[serde(rename = "NGO/Academic Representative")]
    NgoAcademicRepresentative,
    #[serde(rename = "Civic Volunteer Lead")]
    CivicVolunteerLead,
    #[serde(rename = "PPC Coordinator")]
    PpcCoordinator,
}

impl CouncilRole {
    pub const ALL: [CouncilRole; 6] = [
        CouncilRole::WomenRepresentative,
        CouncilRole::YouthMember,
        CouncilRole::LocalBusinessLeader,
        CouncilRole::NgoAcademicRepresentative,
        CouncilRole::CivicVolunteerLead,
        CouncilRole::PpcCoordinator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CouncilRole::WomenRepresentative => "Women Representative",
            CouncilRole::YouthMember => "Youth Member",
            CouncilRole::LocalBusinessLeader => "Local Business Leader",
            CouncilRole::NgoAcademicRepresentative => "NGO/Academic Representative",
            CouncilRole::CivicVolunteerLead => "Civic Volunteer Lead",
            CouncilRole::PpcCoordinator => "PPC Coordinator",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DomainError::invalid(format!("Unknown council role: {}", s)))
    }
}

/// Council membership lifecycle, exposed on the wire as `isActive`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MembershipStatus {
    #[default]
    Active,
    Inactive,
}

impl MembershipStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, MembershipStatus::Active)
    }

    pub fn from_flag(active: bool) -> Self {
        if active {
            MembershipStatus::Active
        } else {
            MembershipStatus::Inactive
        }
    }
}

mod membership_flag {
    use super::MembershipStatus;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(status: &MembershipStatus, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bool(status.is_active())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<MembershipStatus, D::Error> {
        bool::deserialize(d).map(MembershipStatus::from_flag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouncilMember {
    pub id: MemberId,
    pub name: String,
    pub role: CouncilRole,
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "isActive", with = "membership_flag")]
    pub status: MembershipStatus,
    pub joined_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Council member input, used for both creation and updates
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl CouncilMember {
    pub fn create(input: MemberInput, now: DateTime<Utc>) -> DomainResult<Self> {
        let (name, role) = match (non_blank(input.name.clone()), non_blank(input.role.clone())) {
            (Some(name), Some(role)) => (name, role),
            _ => return Err(DomainError::missing_fields("Name and role are required")),
        };
        let mut member = Self {
            id: MemberId::generate(),
            name: check_length("Name", &name, NAME_MIN_LENGTH, NAME_MAX_LENGTH)?,
            role: CouncilRole::parse(&role)?,
            term: DEFAULT_COUNCIL_TERM.to_string(),
            photo: None,
            bio: None,
            email: None,
            status: MembershipStatus::Active,
            joined_date: now,
            created_at: now,
            updated_at: now,
        };
        member.apply(
            MemberInput {
                name: None,
                role: None,
                ..input
            },
            now,
        )?;
        Ok(member)
    }

    /// Apply the supplied fields; absent fields are left unchanged
    pub fn apply(&mut self, input: MemberInput, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = non_blank(input.name) {
            self.name = check_length("Name", &name, NAME_MIN_LENGTH, NAME_MAX_LENGTH)?;
        }
        if let Some(role) = non_blank(input.role) {
            self.role = CouncilRole::parse(&role)?;
        }
        if let Some(term) = non_blank(input.term) {
            self.term = term;
        }
        if let Some(photo) = input.photo {
            self.photo = non_blank(Some(photo));
        }
        if let Some(bio) = input.bio {
            self.bio = match non_blank(Some(bio)) {
                Some(bio) => Some(check_length("Bio", &bio, 0, BIO_MAX_LENGTH)?),
                None => None,
            };
        }
        if let Some(email) = input.email {
            self.email = match non_blank(Some(email)) {
                Some(email) => Some(validate_email(&email)?),
                None => None,
            };
        }
        if let Some(active) = input.is_active {
            self.status = MembershipStatus::from_flag(active);
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.status = MembershipStatus::Inactive;
        self.updated_at = now;
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

// ============================================================================
// Decisions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DecisionStatus {
    #[default]
    Proposed,
    #[serde(rename = "In Deliberation")]
    InDeliberation,
    Voting,
    Approved,
    Rejected,
    Implemented,
}

impl DecisionStatus {
    pub const ALL: [DecisionStatus; 6] = [
        DecisionStatus::Proposed,
        DecisionStatus::InDeliberation,
        DecisionStatus::Voting,
        DecisionStatus::Approved,
        DecisionStatus::Rejected,
        DecisionStatus::Implemented,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Proposed => "Proposed",
            DecisionStatus::InDeliberation => "In Deliberation",
            DecisionStatus::Voting => "Voting",
            DecisionStatus::Approved => "Approved",
            DecisionStatus::Rejected => "Rejected",
            DecisionStatus::Implemented => "Implemented",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| DomainError::invalid(format!("Unknown decision status: {}", s)))
    }

    /// Still awaiting an outcome
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            DecisionStatus::Proposed | DecisionStatus::InDeliberation | DecisionStatus::Voting
        )
    }

    /// Moves an administrator may request directly
    pub fn can_move_to(&self, next: DecisionStatus) -> bool {
        *self == next
            || matches!(
                (self, next),
                (DecisionStatus::Proposed, DecisionStatus::InDeliberation)
                    | (DecisionStatus::InDeliberation, DecisionStatus::Voting)
                    | (DecisionStatus::Approved, DecisionStatus::Implemented)
            )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum DecisionStage {
    #[default]
    Deliberation,
    Consensus,
    Documentation,
    Implementation,
}

impl DecisionStage {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "Deliberation" => Ok(DecisionStage::Deliberation),
            "Consensus" => Ok(DecisionStage::Consensus),
            "Documentation" => Ok(DecisionStage::Documentation),
            "Implementation" => Ok(DecisionStage::Implementation),
            _ => Err(DomainError::invalid(format!("Unknown decision stage: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DecisionCategory {
    Policy,
    Budget,
    Event,
    Partnership,
    Infrastructure,
    #[default]
    Other,
}

impl DecisionCategory {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "Policy" => Ok(DecisionCategory::Policy),
            "Budget" => Ok(DecisionCategory::Budget),
            "Event" => Ok(DecisionCategory::Event),
            "Partnership" => Ok(DecisionCategory::Partnership),
            "Infrastructure" => Ok(DecisionCategory::Infrastructure),
            "Other" => Ok(DecisionCategory::Other),
            _ => Err(DomainError::invalid(format!("Unknown decision category: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DecisionPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl DecisionPriority {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "Low" => Ok(DecisionPriority::Low),
            "Medium" => Ok(DecisionPriority::Medium),
            "High" => Ok(DecisionPriority::High),
            "Critical" => Ok(DecisionPriority::Critical),
            _ => Err(DomainError::invalid(format!("Unknown decision priority: {}", s))),
        }
    }
}

/// Vote counts and the derived consensus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTally {
    pub votes_for: u32,
    pub votes_against: u32,
}

impl VoteTally {
    /// Combined votes; `None` when the sum does not fit a `u32`
    pub fn total(&self) -> Option<u32> {
        self.votes_for.checked_add(self.votes_against)
    }

    /// Share of votes in favour, as a whole percentage rounded half up
    pub fn consensus_rate(&self) -> u32 {
        let total = u64::from(self.votes_for) + u64::from(self.votes_against);
        if total == 0 {
            return 0;
        }
        let rate = (u64::from(self.votes_for) * 200 + total) / (total * 2);
        rate as u32
    }

    /// Outcome implied by the tally; `None` when nobody voted
    pub fn outcome(&self) -> Option<DecisionStatus> {
        if self.votes_for == 0 && self.votes_against == 0 {
            None
        } else if self.consensus_rate() >= CONSENSUS_THRESHOLD {
            Some(DecisionStatus::Approved)
        } else {
            Some(DecisionStatus::Rejected)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceDecision {
    pub id: DecisionId,
    pub title: String,
    pub description: String,
    pub status: DecisionStatus,
    pub stage: DecisionStage,
    pub proposed_by: String,
    pub votes_for: u32,
    pub votes_against: u32,
    pub total_votes: u32,
    pub consensus_rate: u32,
    pub category: DecisionCategory,
    pub priority: DecisionPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Decision input, used for both creation and updates
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub proposed_by: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub implementation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub votes_for: Option<u32>,
    #[serde(default)]
    pub votes_against: Option<u32>,
}

impl GovernanceDecision {
    /// New decisions always start as `Proposed` in `Deliberation`
    pub fn create(input: DecisionInput, now: DateTime<Utc>) -> DomainResult<Self> {
        let title = non_blank(input.title);
        let description = non_blank(input.description);
        let proposed_by = non_blank(input.proposed_by);
        let (title, description, proposed_by) = match (title, description, proposed_by) {
            (Some(t), Some(d), Some(p)) => (t, d, p),
            _ => {
                return Err(DomainError::missing_fields(
                    "Title, description and proposer are required",
                ))
            }
        };

        Ok(Self {
            id: DecisionId::generate(),
            title,
            description,
            status: DecisionStatus::Proposed,
            stage: DecisionStage::Deliberation,
            proposed_by,
            votes_for: 0,
            votes_against: 0,
            total_votes: 0,
            consensus_rate: 0,
            category: match non_blank(input.category) {
                Some(c) => DecisionCategory::parse(&c)?,
                None => DecisionCategory::default(),
            },
            priority: match non_blank(input.priority) {
                Some(p) => DecisionPriority::parse(&p)?,
                None => DecisionPriority::default(),
            },
            notes: non_blank(input.notes),
            decision_date: None,
            implementation_date: input.implementation_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an administrator update
    ///
    /// Plain fields first, then stage, then an explicit status move, then
    /// votes. The caller discards the document on error, so a rejected
    /// update leaves the stored decision untouched.
    pub fn apply_update(&mut self, input: DecisionInput, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(title) = non_blank(input.title) {
            self.title = title;
        }
        if let Some(description) = non_blank(input.description) {
            self.description = description;
        }
        if let Some(proposed_by) = non_blank(input.proposed_by) {
            self.proposed_by = proposed_by;
        }
        if let Some(category) = non_blank(input.category) {
            self.category = DecisionCategory::parse(&category)?;
        }
        if let Some(priority) = non_blank(input.priority) {
            self.priority = DecisionPriority::parse(&priority)?;
        }
        if let Some(notes) = input.notes {
            self.notes = non_blank(Some(notes));
        }

        if let Some(stage) = non_blank(input.stage) {
            self.advance_stage(DecisionStage::parse(&stage)?)?;
        }

        if let Some(status) = non_blank(input.status) {
            self.advance_status(DecisionStatus::parse(&status)?, input.implementation_date, now)?;
        } else if let Some(date) = input.implementation_date {
            self.implementation_date = Some(date);
        }

        match (input.votes_for, input.votes_against) {
            (Some(votes_for), Some(votes_against)) => self.record_votes(
                VoteTally {
                    votes_for,
                    votes_against,
                },
                now,
            )?,
            (None, None) => {}
            _ => {
                return Err(DomainError::invalid(
                    "Both votesFor and votesAgainst are required to record votes",
                ))
            }
        }

        self.updated_at = now;
        Ok(())
    }

    fn advance_stage(&mut self, next: DecisionStage) -> DomainResult<()> {
        if next < self.stage {
            return Err(DomainError::InvalidTransition(format!(
                "Cannot move decision back from {:?} to {:?} stage",
                self.stage, next
            )));
        }
        self.stage = next;
        Ok(())
    }

    fn advance_status(
        &mut self,
        next: DecisionStatus,
        implementation_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if !self.status.can_move_to(next) {
            return Err(DomainError::InvalidTransition(format!(
                "Cannot move decision from {} to {}",
                self.status.as_str(),
                next.as_str()
            )));
        }
        if next == DecisionStatus::Implemented && self.status != next {
            self.implementation_date = Some(implementation_date.unwrap_or(now));
        } else if let Some(date) = implementation_date {
            self.implementation_date = Some(date);
        }
        self.status = next;
        Ok(())
    }

    /// Replace the tally and derive the outcome
    ///
    /// `decisionDate` is stamped only when the outcome changes the status,
    /// so resubmitting the same tally leaves it alone.
    pub fn record_votes(&mut self, tally: VoteTally, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == DecisionStatus::Implemented {
            return Err(DomainError::InvalidTransition(
                "Cannot record votes on an implemented decision".to_string(),
            ));
        }
        let total = tally
            .total()
            .ok_or_else(|| DomainError::invalid("Vote counts are too large"))?;
        self.votes_for = tally.votes_for;
        self.votes_against = tally.votes_against;
        self.total_votes = total;
        self.consensus_rate = tally.consensus_rate();

        if let Some(outcome) = tally.outcome() {
            if outcome != self.status || self.decision_date.is_none() {
                self.status = outcome;
                self.decision_date = Some(now);
            }
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Public governance summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceMetrics {
    pub total_decisions: usize,
    pub approved_decisions: usize,
    pub pending_decisions: usize,
    pub active_members: usize,
    /// Whole percentage with a `%` suffix
    pub avg_consensus_rate: String,
    pub last_updated: DateTime<Utc>,
}

impl GovernanceMetrics {
    pub fn compute(
        decisions: &[GovernanceDecision],
        members: &[CouncilMember],
        now: DateTime<Utc>,
    ) -> Self {
        let rated: Vec<u32> = decisions
            .iter()
            .map(|d| d.consensus_rate)
            .filter(|r| *r > 0)
            .collect();
        let average = if rated.is_empty() {
            0
        } else {
            let sum: u64 = rated.iter().map(|r| u64::from(*r)).sum();
            let n = rated.len() as u64;
            (sum * 2 + n) / (n * 2)
        };

        Self {
            total_decisions: decisions.len(),
            approved_decisions: decisions
                .iter()
                .filter(|d| d.status == DecisionStatus::Approved)
                .count(),
            pending_decisions: decisions.iter().filter(|d| d.status.is_pending()).count(),
            active_members: members.iter().filter(|m| m.is_active()).count(),
            avg_consensus_rate: format!("{}%", average),
            last_updated: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decision() -> GovernanceDecision {
        GovernanceDecision::create(
            DecisionInput {
                title: Some("Fund the library".into()),
                description: Some("Extend opening hours".into()),
                proposed_by: Some("Council".into()),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn votes(votes_for: u32, votes_against: u32) -> DecisionInput {
        DecisionInput {
            votes_for: Some(votes_for),
            votes_against: Some(votes_against),
            ..Default::default()
        }
    }

    #[test]
    fn test_consensus_rounding() {
        let rate = |f, a| VoteTally { votes_for: f, votes_against: a }.consensus_rate();
        assert_eq!(rate(7, 3), 70);
        assert_eq!(rate(6, 4), 60);
        assert_eq!(rate(2, 1), 67);
        assert_eq!(rate(1, 7), 13);
        assert_eq!(rate(0, 0), 0);
    }

    #[test]
    fn test_votes_derive_outcome() {
        let mut d = decision();
        d.apply_update(votes(7, 3), Utc::now()).unwrap();
        assert_eq!(d.status, DecisionStatus::Approved);
        assert_eq!(d.total_votes, 10);
        assert_eq!(d.consensus_rate, 70);
        assert!(d.decision_date.is_some());

        let mut d = decision();
        d.apply_update(votes(6, 4), Utc::now()).unwrap();
        assert_eq!(d.status, DecisionStatus::Rejected);
        assert_eq!(d.consensus_rate, 60);
    }

    #[test]
    fn test_identical_tally_keeps_decision_date() {
        let mut d = decision();
        d.apply_update(votes(7, 3), Utc::now()).unwrap();
        let first = d.decision_date;
        d.apply_update(votes(7, 3), Utc::now() + chrono::Duration::seconds(5))
            .unwrap();
        assert_eq!(d.decision_date, first);
    }

    #[test]
    fn test_overflowing_tally_rejected() {
        let mut d = decision();
        d.apply_update(votes(7, 3), Utc::now()).unwrap();
        let before = d.clone();

        let err = d.apply_update(votes(u32::MAX, 1), Utc::now()).unwrap_err();
        assert_eq!(err.code(), crate::error::codes::VALIDATION_ERROR);
        assert_eq!(d, before);

        assert_eq!(
            VoteTally { votes_for: u32::MAX, votes_against: 0 }.total(),
            Some(u32::MAX)
        );
    }

    #[test]
    fn test_zero_votes_keep_status() {
        let mut d = decision();
        d.apply_update(votes(0, 0), Utc::now()).unwrap();
        assert_eq!(d.status, DecisionStatus::Proposed);
        assert!(d.decision_date.is_none());
    }

    #[test]
    fn test_single_vote_field_rejected() {
        let mut d = decision();
        let before = d.clone();
        let err = d
            .apply_update(
                DecisionInput {
                    votes_for: Some(3),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap_err();
        assert_eq!(err.code(), crate::error::codes::VALIDATION_ERROR);
        assert_eq!(d.votes_for, before.votes_for);
    }

    #[test]
    fn test_explicit_status_moves() {
        let mut d = decision();
        let status = |s: &str| DecisionInput {
            status: Some(s.into()),
            ..Default::default()
        };
        d.apply_update(status("In Deliberation"), Utc::now()).unwrap();
        d.apply_update(status("Voting"), Utc::now()).unwrap();
        d.apply_update(status("Voting"), Utc::now()).unwrap();
        let err = d.apply_update(status("Approved"), Utc::now()).unwrap_err();
        assert_eq!(err.code(), "INVALID_TRANSITION");

        d.apply_update(votes(9, 1), Utc::now()).unwrap();
        d.apply_update(status("Implemented"), Utc::now()).unwrap();
        assert!(d.implementation_date.is_some());

        let err = d.apply_update(votes(1, 9), Utc::now()).unwrap_err();
        assert_eq!(err.code(), "INVALID_TRANSITION");
        assert_eq!(d.status, DecisionStatus::Implemented);
    }

    #[test]
    fn test_stage_forward_only() {
        let mut d = decision();
        let stage = |s: &str| DecisionInput {
            stage: Some(s.into()),
            ..Default::default()
        };
        d.apply_update(stage("Documentation"), Utc::now()).unwrap();
        assert!(d.apply_update(stage("Consensus"), Utc::now()).is_err());
        assert_eq!(d.stage, DecisionStage::Documentation);
    }

    #[test]
    fn test_member_is_active_flag() {
        let input: MemberInput = serde_json::from_value(json!({
            "name": "Amina Odhiambo",
            "role": "Youth Member"
        }))
        .unwrap();
        let mut member = CouncilMember::create(input, Utc::now()).unwrap();
        assert_eq!(member.term, DEFAULT_COUNCIL_TERM);

        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["role"], "Youth Member");

        member.deactivate(Utc::now());
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["isActive"], false);
        let back: CouncilMember = serde_json::from_value(json).unwrap();
        assert_eq!(back.status, MembershipStatus::Inactive);
    }

    #[test]
    fn test_metrics() {
        let now = Utc::now();
        let mut approved = decision();
        approved.record_votes(VoteTally { votes_for: 8, votes_against: 2 }, now).unwrap();
        let mut rejected = decision();
        rejected.record_votes(VoteTally { votes_for: 5, votes_against: 5 }, now).unwrap();
        let pending = decision();

        let metrics = GovernanceMetrics::compute(&[approved, rejected, pending], &[], now);
        assert_eq!(metrics.total_decisions, 3);
        assert_eq!(metrics.approved_decisions, 1);
        assert_eq!(metrics.pending_decisions, 1);
        assert_eq!(metrics.avg_consensus_rate, "65%");
    }
}

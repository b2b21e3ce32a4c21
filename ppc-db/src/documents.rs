//! Collection bindings for the domain types

use ppc_core::types::{
    Citizen, CivicIssue, CouncilMember, Event, GovernanceDecision, Survey, SurveyResponse,
};

use crate::collection::Document;

/// Unique index of normalized email → citizen id
pub const EMAIL_INDEX: &str = "idx_citizen_email";

/// Unique index of `survey:respondent` → response id
pub const RESPONSE_INDEX: &str = "idx_survey_respondent";

impl Document for Citizen {
    const COLLECTION: &'static str = "citizens";
    const LABEL: &'static str = "Citizen";

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Document for CivicIssue {
    const COLLECTION: &'static str = "issues";
    const LABEL: &'static str = "Issue";

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Document for Event {
    const COLLECTION: &'static str = "events";
    const LABEL: &'static str = "Event";

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Document for Survey {
    const COLLECTION: &'static str = "surveys";
    const LABEL: &'static str = "Survey";

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Document for SurveyResponse {
    const COLLECTION: &'static str = "survey_responses";
    const LABEL: &'static str = "Survey response";

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Document for CouncilMember {
    const COLLECTION: &'static str = "council_members";
    const LABEL: &'static str = "Council member";

    fn key(&self) -> String {
        self.id.to_string()
    }
}

impl Document for GovernanceDecision {
    const COLLECTION: &'static str = "governance_decisions";
    const LABEL: &'static str = "Decision";

    fn key(&self) -> String {
        self.id.to_string()
    }
}

/// Key of the response uniqueness index
pub fn response_key(survey: &str, respondent: &str) -> String {
    format!("{}:{}", survey, respondent)
}

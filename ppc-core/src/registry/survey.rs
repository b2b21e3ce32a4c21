//! Survey Registry - surveys, responses and results

use async_trait::async_trait;

use crate::access::Actor;
use crate::aggregation::SurveyResults;
use crate::error::DomainResult;
use crate::types::{Answer, NewSurvey, Survey, SurveyId, SurveyResponse};

/// Survey Registry trait
#[async_trait]
pub trait SurveyRegistry: Send + Sync {
    /// Publish a survey (admin only)
    async fn create_survey(&self, actor: &Actor, input: NewSurvey) -> DomainResult<Survey>;

    async fn get_survey(&self, id: &SurveyId) -> DomainResult<Option<Survey>>;

    /// Active surveys, newest first
    async fn active_surveys(&self) -> DomainResult<Vec<Survey>>;

    /// Record the caller's single response to a survey
    async fn submit_response(
        &self,
        actor: &Actor,
        id: &SurveyId,
        answers: Vec<Answer>,
    ) -> DomainResult<SurveyResponse>;

    /// Aggregated results (admin only)
    async fn survey_results(&self, actor: &Actor, id: &SurveyId) -> DomainResult<SurveyResults>;

    /// Close a survey for good (admin only)
    async fn close_survey(&self, actor: &Actor, id: &SurveyId) -> DomainResult<Survey>;
}

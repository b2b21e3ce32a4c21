//! Survey Registry Service Implementation

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use ppc_core::access::Actor;
use ppc_core::aggregation::{aggregate, SurveyResults};
use ppc_core::error::{DomainError, DomainResult};
use ppc_core::logging::operations;
use ppc_core::registry::SurveyRegistry;
use ppc_core::types::{Answer, NewSurvey, ResponseId, Survey, SurveyId, SurveyResponse};

use crate::database::PpcDatabase;
use crate::documents::response_key;

/// Survey Registry Service
pub struct SurveyService {
    database: Arc<PpcDatabase>,
}

impl SurveyService {
    pub fn new(database: Arc<PpcDatabase>) -> Self {
        Self { database }
    }

    async fn responses_for(&self, id: &SurveyId) -> DomainResult<Vec<SurveyResponse>> {
        Ok(self
            .database
            .responses
            .list()
            .await?
            .into_iter()
            .filter(|r| &r.survey == id)
            .collect())
    }
}

#[async_trait]
impl SurveyRegistry for SurveyService {
    async fn create_survey(&self, actor: &Actor, input: NewSurvey) -> DomainResult<Survey> {
        actor.ensure_admin()?;
        let survey = Survey::create(input, actor.id.clone(), Utc::now())?;

        if !self.database.surveys.insert(&survey).await? {
            return Err(DomainError::Internal("survey id collision".to_string()));
        }

        info!(
            operation = operations::SURVEY_CREATE,
            survey_id = %survey.id,
            questions = survey.questions.len(),
            "Survey created"
        );
        Ok(survey)
    }

    async fn get_survey(&self, id: &SurveyId) -> DomainResult<Option<Survey>> {
        Ok(self.database.surveys.get(id.as_str()).await?)
    }

    async fn active_surveys(&self) -> DomainResult<Vec<Survey>> {
        let mut surveys: Vec<Survey> = self
            .database
            .surveys
            .list()
            .await?
            .into_iter()
            .filter(Survey::is_active)
            .collect();
        surveys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(surveys)
    }

    async fn submit_response(
        &self,
        actor: &Actor,
        id: &SurveyId,
        answers: Vec<Answer>,
    ) -> DomainResult<SurveyResponse> {
        let survey = self.database.surveys.require(id.as_str()).await?;
        survey.check_answers(&answers)?;

        let response = SurveyResponse {
            id: ResponseId::generate(),
            survey: survey.id.clone(),
            respondent: actor.id.clone(),
            answers,
            submitted_at: Utc::now(),
        };

        // One response per (survey, citizen); the index entry is the lock
        let key = response_key(survey.id.as_str(), actor.id.as_str());
        if !self
            .database
            .respondents
            .claim(&key, response.id.as_str())
            .await?
        {
            return Err(DomainError::DuplicateResponse);
        }

        match self.database.responses.insert(&response).await {
            Ok(true) => {}
            Ok(false) => {
                self.database
                    .respondents
                    .release(&key, response.id.as_str())
                    .await?;
                return Err(DomainError::Internal("response id collision".to_string()));
            }
            Err(e) => {
                warn!(survey_id = %survey.id, error = %e, "Response write failed, releasing claim");
                self.database
                    .respondents
                    .release(&key, response.id.as_str())
                    .await?;
                return Err(e.into());
            }
        }

        info!(
            operation = operations::SURVEY_RESPOND,
            survey_id = %survey.id,
            citizen_id = %actor.id,
            "Survey response recorded"
        );
        Ok(response)
    }

    async fn survey_results(&self, actor: &Actor, id: &SurveyId) -> DomainResult<SurveyResults> {
        actor.ensure_admin()?;
        let survey = self.database.surveys.require(id.as_str()).await?;
        let responses = self.responses_for(id).await?;
        Ok(aggregate(&survey, &responses))
    }

    async fn close_survey(&self, actor: &Actor, id: &SurveyId) -> DomainResult<Survey> {
        actor.ensure_admin()?;
        let (survey, _) = self
            .database
            .surveys
            .update(id.as_str(), |survey| survey.close(Utc::now()))
            .await?;

        info!(
            operation = operations::SURVEY_CLOSE,
            survey_id = %survey.id,
            "Survey closed"
        );
        Ok(survey)
    }
}

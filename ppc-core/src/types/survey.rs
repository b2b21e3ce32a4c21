//! Surveys and responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{non_blank, CitizenId, QuestionId, ResponseId, SurveyId};
use crate::constants::*;
use crate::error::{codes, DomainError, DomainResult};
use crate::validation::check_length;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    Text,
    Rating,
    YesNo,
}

impl QuestionType {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "multiple-choice" => Ok(QuestionType::MultipleChoice),
            "text" => Ok(QuestionType::Text),
            "rating" => Ok(QuestionType::Rating),
            "yes-no" => Ok(QuestionType::YesNo),
            _ => Err(DomainError::invalid(format!("Unknown question type: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SurveyStatus {
    #[default]
    Active,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub question_text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: SurveyId,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub status: SurveyStatus,
    pub created_by: CitizenId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single answer inside a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: QuestionId,
    #[serde(default)]
    pub answer: Value,
}

impl Answer {
    /// Null, blank strings and empty arrays count as unanswered
    pub fn is_empty(&self) -> bool {
        match &self.answer {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}

/// Parse the `answers` field of a submission
///
/// Anything other than an array is `MISSING_ANSWERS`.
pub fn parse_answers(raw: Option<Value>) -> DomainResult<Vec<Answer>> {
    match raw {
        Some(value @ Value::Array(_)) => serde_json::from_value(value)
            .map_err(|e| DomainError::invalid(format!("Malformed answers: {}", e))),
        _ => Err(DomainError::validation(
            codes::MISSING_ANSWERS,
            "Please provide answers",
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: ResponseId,
    pub survey: SurveyId,
    pub respondent: CitizenId,
    pub answers: Vec<Answer>,
    pub submitted_at: DateTime<Utc>,
}

/// Raw question input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: Option<bool>,
}

/// Raw survey creation input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurvey {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Option<Vec<NewQuestion>>,
}

impl NewQuestion {
    fn validate(self, index: usize) -> DomainResult<Question> {
        let text = non_blank(self.question_text).ok_or_else(|| {
            DomainError::invalid(format!("Question {} is missing its text", index + 1))
        })?;
        let question_type = match non_blank(self.question_type) {
            Some(t) => QuestionType::parse(&t)?,
            None => {
                return Err(DomainError::invalid(format!(
                    "Question {} is missing its type",
                    index + 1
                )))
            }
        };
        let options: Vec<String> = self
            .options
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if question_type == QuestionType::MultipleChoice && options.len() < 2 {
            return Err(DomainError::invalid(format!(
                "Question {} needs at least two options",
                index + 1
            )));
        }

        Ok(Question {
            id: QuestionId::generate(),
            question_text: text,
            question_type,
            options,
            required: self.required.unwrap_or(true),
        })
    }
}

impl Survey {
    pub fn create(input: NewSurvey, created_by: CitizenId, now: DateTime<Utc>) -> DomainResult<Self> {
        let title = non_blank(input.title);
        let description = non_blank(input.description);
        let questions = input.questions.filter(|q| !q.is_empty());

        let (title, description, questions) = match (title, description, questions) {
            (Some(t), Some(d), Some(q)) => (t, d, q),
            _ => {
                return Err(DomainError::missing_fields(
                    "Please provide title, description, and at least one question",
                ))
            }
        };

        let title = check_length("Title", &title, SURVEY_TITLE_MIN_LENGTH, SURVEY_TITLE_MAX_LENGTH)?;
        let description =
            check_length("Description", &description, 1, SURVEY_DESCRIPTION_MAX_LENGTH)?;
        let questions = questions
            .into_iter()
            .enumerate()
            .map(|(i, q)| q.validate(i))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Self {
            id: SurveyId::generate(),
            title,
            description,
            questions,
            status: SurveyStatus::Active,
            created_by,
            closed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == SurveyStatus::Active
    }

    /// Check that the survey accepts these answers
    ///
    /// Answers to question ids the survey does not contain are ignored.
    pub fn check_answers(&self, answers: &[Answer]) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::SurveyClosed);
        }
        let unanswered = self.questions.iter().filter(|q| q.required).any(|q| {
            !answers
                .iter()
                .any(|a| a.question_id == q.id && !a.is_empty())
        });
        if unanswered {
            return Err(DomainError::MissingRequiredAnswers);
        }
        Ok(())
    }

    /// Close the survey. Closed surveys never reopen.
    pub fn close(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_active() {
            return Err(DomainError::AlreadyClosed);
        }
        self.status = SurveyStatus::Closed;
        self.closed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

//! Survey result aggregation
//!
//! Choice questions produce a distribution over distinct answer values,
//! rating questions an average and a 1 to 5 histogram, and text questions
//! the raw answers.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::{QuestionId, QuestionType, Survey, SurveyId, SurveyResponse};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    pub id: SurveyId,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResults {
    pub survey: SurveySummary,
    pub total_responses: usize,
    pub results: Vec<QuestionResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub question_text: String,
    pub question_type: QuestionType,
    /// Responses that answered this question
    pub total_responses: usize,
    #[serde(flatten)]
    pub summary: AnswerSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerSummary {
    Choice {
        distribution: Vec<ChoiceCount>,
    },
    Rating {
        #[serde(serialize_with = "average_or_na")]
        average: Option<f64>,
        histogram: BTreeMap<u8, usize>,
    },
    Text {
        responses: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceCount {
    pub value: String,
    pub count: usize,
    /// Percentage of answering responses, one decimal place
    pub percentage: f64,
}

fn average_or_na<S: Serializer>(average: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match average {
        Some(avg) => s.serialize_f64(*avg),
        None => s.serialize_str("N/A"),
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Label used to bucket a choice answer
fn choice_label(value: &Value, question_type: QuestionType) -> Option<String> {
    match value {
        Value::Bool(true) => Some("yes".to_string()),
        Value::Bool(false) => Some("no".to_string()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else if question_type == QuestionType::YesNo {
                Some(s.to_lowercase())
            } else {
                Some(s.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn rating_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn summarize_choice(
    question_type: QuestionType,
    declared: &[String],
    answers: &[&Value],
) -> AnswerSummary {
    let mut order: Vec<String> = match question_type {
        QuestionType::YesNo => vec!["yes".to_string(), "no".to_string()],
        _ => declared.to_vec(),
    };
    let mut counts: BTreeMap<String, usize> = order.iter().map(|o| (o.clone(), 0)).collect();

    for answer in answers {
        let values: Vec<&Value> = match answer {
            Value::Array(items) => items.iter().collect(),
            single => vec![*single],
        };
        for value in values {
            if let Some(label) = choice_label(value, question_type) {
                let count = counts.entry(label.clone()).or_insert_with(|| {
                    order.push(label);
                    0
                });
                *count += 1;
            }
        }
    }

    let total = answers.len();
    let distribution = order
        .into_iter()
        .map(|value| {
            let count = counts.get(&value).copied().unwrap_or(0);
            let percentage = if total == 0 {
                0.0
            } else {
                round_to(count as f64 / total as f64 * 100.0, 1)
            };
            ChoiceCount {
                value,
                count,
                percentage,
            }
        })
        .collect();

    AnswerSummary::Choice { distribution }
}

fn summarize_rating(answers: &[&Value]) -> AnswerSummary {
    let ratings: Vec<f64> = answers.iter().filter_map(|a| rating_value(a)).collect();

    let mut histogram: BTreeMap<u8, usize> = (1..=5).map(|r| (r, 0)).collect();
    for rating in &ratings {
        if rating.fract() == 0.0 && (1.0..=5.0).contains(rating) {
            if let Some(bucket) = histogram.get_mut(&(*rating as u8)) {
                *bucket += 1;
            }
        }
    }

    let average = if ratings.is_empty() {
        None
    } else {
        Some(round_to(ratings.iter().sum::<f64>() / ratings.len() as f64, 2))
    };

    AnswerSummary::Rating { average, histogram }
}

fn summarize_text(answers: &[&Value]) -> AnswerSummary {
    let responses = answers
        .iter()
        .map(|a| match a {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    AnswerSummary::Text { responses }
}

/// Aggregate all responses of a survey
pub fn aggregate(survey: &Survey, responses: &[SurveyResponse]) -> SurveyResults {
    let results = survey
        .questions
        .iter()
        .map(|question| {
            let answers: Vec<&Value> = responses
                .iter()
                .flat_map(|r| r.answers.iter())
                .filter(|a| a.question_id == question.id && !a.is_empty())
                .map(|a| &a.answer)
                .collect();

            let summary = match question.question_type {
                QuestionType::MultipleChoice | QuestionType::YesNo => {
                    summarize_choice(question.question_type, &question.options, &answers)
                }
                QuestionType::Rating => summarize_rating(&answers),
                QuestionType::Text => summarize_text(&answers),
            };

            QuestionResult {
                question_id: question.id.clone(),
                question_text: question.question_text.clone(),
                question_type: question.question_type,
                total_responses: answers.len(),
                summary,
            }
        })
        .collect();

    SurveyResults {
        survey: SurveySummary {
            id: survey.id.clone(),
            title: survey.title.clone(),
            description: survey.description.clone(),
        },
        total_responses: responses.len(),
        results,
    }
}

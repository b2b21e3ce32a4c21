//! Surveys, responses and results

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};

use ppc_core::error::DomainError;
use ppc_core::registry::SurveyRegistry;
use ppc_core::types::{parse_answers, NewSurvey, SurveyId};

use crate::dto::{AnswersRequest, ApiResponse, ResponseData, ResultsData, SurveyData, SurveyList};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthClaims;
use crate::state::AppState;

use super::{admin_only, protected};

pub fn router(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/surveys/:id/results", get(survey_results))
        .route("/surveys/:id/close", put(close_survey));

    Router::new()
        .route("/surveys", get(active_surveys))
        .merge(admin_only(state, Router::new().route("/surveys", post(create_survey))))
        .route("/surveys/:id", get(get_survey))
        .merge(protected(
            state,
            Router::new().route("/surveys/:id/responses", post(submit_response)),
        ))
        .merge(admin_only(state, admin))
}

pub async fn create_survey(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    ApiJson(input): ApiJson<NewSurvey>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SurveyData>>)> {
    let survey = state.surveys.create_survey(&claims.actor(), input).await?;
    Ok(ApiResponse::created(SurveyData { survey }))
}

pub async fn active_surveys(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SurveyList>>> {
    let surveys = state.surveys.active_surveys().await?;
    Ok(ApiResponse::ok(SurveyList {
        count: surveys.len(),
        surveys,
    }))
}

pub async fn get_survey(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<SurveyData>>> {
    let survey = state
        .surveys
        .get_survey(&SurveyId::new(id))
        .await?
        .ok_or(DomainError::NotFound("Survey"))?;

    Ok(ApiResponse::ok(SurveyData { survey }))
}

pub async fn submit_response(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AnswersRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ResponseData>>)> {
    let answers = parse_answers(req.answers)?;
    let response = state
        .surveys
        .submit_response(&claims.actor(), &SurveyId::new(id), answers)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(
            "Survey response submitted successfully",
            ResponseData { response },
        ),
    ))
}

pub async fn survey_results(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ResultsData>>> {
    let results = state
        .surveys
        .survey_results(&claims.actor(), &SurveyId::new(id))
        .await?;
    Ok(ApiResponse::ok(results))
}

pub async fn close_survey(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<SurveyData>>> {
    let survey = state
        .surveys
        .close_survey(&claims.actor(), &SurveyId::new(id))
        .await?;

    Ok(ApiResponse::with_message(
        "Survey closed successfully",
        SurveyData { survey },
    ))
}

//! Public citizen profiles and self-service account updates

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde_json::Value;

use ppc_core::error::{codes, DomainError};
use ppc_core::registry::{CitizenRegistry, IssueRegistry};
use ppc_core::types::{CitizenId, PasswordChange, ProfileUpdate};

use crate::dto::{ApiResponse, CitizenData, CitizenIssues, InterestsRequest, LocationRequest};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::middleware::auth::AuthClaims;
use crate::state::AppState;

use super::protected;

pub fn router(state: &AppState) -> Router<AppState> {
    let owner_only = Router::new()
        .route("/citizens/:id/password", put(change_password))
        .route("/citizens/:id/interests", put(update_interests))
        .route("/citizens/:id/location", put(update_location));

    Router::new()
        .route("/citizens/:id/issues", get(citizen_issues))
        .merge(protected(state, owner_only))
        .route("/citizens/:id", get(get_citizen))
        .merge(protected(
            state,
            Router::new().route("/citizens/:id", put(update_profile)),
        ))
}

pub async fn get_citizen(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<CitizenData>>> {
    let citizen = state
        .citizens
        .get_citizen(&CitizenId::new(id))
        .await?
        .ok_or(DomainError::NotFound("Citizen"))?;

    Ok(ApiResponse::ok(CitizenData {
        citizen: citizen.to_public(),
    }))
}

pub async fn citizen_issues(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<CitizenIssues>>> {
    let issues = state.issues.issues_by_citizen(&CitizenId::new(id)).await?;
    Ok(ApiResponse::ok(CitizenIssues {
        count: issues.len(),
        issues,
    }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> ApiResult<Json<ApiResponse<CitizenData>>> {
    let citizen = state
        .citizens
        .update_profile(&claims.actor(), &CitizenId::new(id), update)
        .await?;

    Ok(ApiResponse::ok(CitizenData {
        citizen: citizen.to_public(),
    }))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
    ApiJson(change): ApiJson<PasswordChange>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state
        .citizens
        .change_password(&claims.actor(), &CitizenId::new(id), change)
        .await?;

    Ok(ApiResponse::message("Password updated successfully"))
}

pub async fn update_interests(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<InterestsRequest>,
) -> ApiResult<Json<ApiResponse<CitizenData>>> {
    let actor = claims.actor();
    let id = CitizenId::new(id);
    actor.ensure_self(&id, "interests")?;

    let interests = match req.interests {
        Some(Value::Array(values)) => values
            .into_iter()
            .map(|v| match v {
                Value::String(s) => Ok(s),
                other => Err(DomainError::invalid(format!("Unknown interest: {}", other))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(ApiError::bad_request(
                codes::INVALID_FORMAT,
                "Interests must be an array",
            ))
        }
    };

    let citizen = state
        .citizens
        .update_interests(&actor, &id, interests)
        .await?;

    Ok(ApiResponse::ok(CitizenData {
        citizen: citizen.to_public(),
    }))
}

pub async fn update_location(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<LocationRequest>,
) -> ApiResult<Json<ApiResponse<CitizenData>>> {
    let citizen = state
        .citizens
        .update_location(&claims.actor(), &CitizenId::new(id), req.location)
        .await?;

    Ok(ApiResponse::ok(CitizenData {
        citizen: citizen.to_public(),
    }))
}

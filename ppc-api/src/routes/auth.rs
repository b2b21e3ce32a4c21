//! Registration, login and the current account

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Extension, Json, Router};

use ppc_core::error::DomainError;
use ppc_core::registry::CitizenRegistry;
use ppc_core::types::NewCitizen;

use crate::dto::{ApiResponse, AuthData, CitizenData, LoginRequest};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthClaims;
use crate::state::AppState;

use super::protected;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .merge(protected(state, Router::new().route("/auth/me", get(me))))
}

/// Create an account and sign the caller in
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewCitizen>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthData>>)> {
    let citizen = state.citizens.register(input).await?;
    let token = state.jwt.issue(&citizen)?;

    Ok(ApiResponse::created(AuthData {
        citizen: citizen.to_public(),
        token,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthData>>> {
    let citizen = state
        .citizens
        .authenticate(req.email.as_deref(), req.password.as_deref())
        .await?;
    let token = state.jwt.issue(&citizen)?;

    Ok(ApiResponse::ok(AuthData {
        citizen: citizen.to_public(),
        token,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
) -> ApiResult<Json<ApiResponse<CitizenData>>> {
    let citizen = state
        .citizens
        .get_citizen(&claims.citizen_id())
        .await?
        .ok_or(DomainError::NotFound("Citizen"))?;

    Ok(ApiResponse::ok(CitizenData {
        citizen: citizen.to_public(),
    }))
}

//! Council membership, decisions and governance metrics
//!
//! Reads are public; everything under `/governance/admin` needs an
//! administrator.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};

use ppc_core::registry::GovernanceRegistry;
use ppc_core::types::{DecisionId, DecisionInput, DecisionStatus, MemberId, MemberInput};

use crate::dto::{
    parse_number, ApiResponse, DecisionData, DecisionList, DecisionQuery, MemberData, MemberList,
    MetricsData,
};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthClaims;
use crate::state::AppState;

use super::admin_only;

pub fn router(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route(
            "/governance/admin/council",
            get(all_council).post(add_member),
        )
        .route(
            "/governance/admin/council/:id",
            put(update_member).delete(deactivate_member),
        )
        .route(
            "/governance/admin/decisions",
            get(all_decisions).post(propose_decision),
        )
        .route("/governance/admin/decisions/:id", put(update_decision));

    Router::new()
        .route("/governance/council", get(active_council))
        .route("/governance/decisions", get(decisions))
        .route("/governance/metrics", get(metrics))
        .merge(admin_only(state, admin))
}

pub async fn active_council(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<MemberList>>> {
    let members = state.governance.active_council().await?;
    Ok(ApiResponse::ok(MemberList { members }))
}

/// `?status=` filters by decision status, `?limit=` defaults to 10
pub async fn decisions(
    State(state): State<AppState>,
    Query(query): Query<DecisionQuery>,
) -> ApiResult<Json<ApiResponse<DecisionList>>> {
    let status = query
        .status
        .as_deref()
        .map(DecisionStatus::parse)
        .transpose()?;
    let limit = parse_number(query.limit.as_deref());

    let decisions = state.governance.decisions(status, limit).await?;
    Ok(ApiResponse::ok(DecisionList { decisions }))
}

pub async fn metrics(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<MetricsData>>> {
    let metrics = state.governance.metrics().await?;
    Ok(ApiResponse::ok(MetricsData { metrics }))
}

pub async fn all_council(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
) -> ApiResult<Json<ApiResponse<MemberList>>> {
    let members = state.governance.all_council(&claims.actor()).await?;
    Ok(ApiResponse::ok(MemberList { members }))
}

pub async fn add_member(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    ApiJson(input): ApiJson<MemberInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MemberData>>)> {
    let member = state.governance.add_member(&claims.actor(), input).await?;
    Ok(ApiResponse::created(MemberData { member }))
}

pub async fn update_member(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<MemberInput>,
) -> ApiResult<Json<ApiResponse<MemberData>>> {
    let member = state
        .governance
        .update_member(&claims.actor(), &MemberId::new(id), input)
        .await?;
    Ok(ApiResponse::ok(MemberData { member }))
}

/// Members are never removed, only marked inactive
pub async fn deactivate_member(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state
        .governance
        .deactivate_member(&claims.actor(), &MemberId::new(id))
        .await?;
    Ok(ApiResponse::message("Council member deactivated successfully"))
}

pub async fn all_decisions(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<DecisionList>>> {
    let decisions = state.governance.decisions(None, Some(usize::MAX)).await?;
    Ok(ApiResponse::ok(DecisionList { decisions }))
}

pub async fn propose_decision(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    ApiJson(input): ApiJson<DecisionInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<DecisionData>>)> {
    let decision = state
        .governance
        .propose_decision(&claims.actor(), input)
        .await?;
    Ok(ApiResponse::created(DecisionData { decision }))
}

pub async fn update_decision(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<DecisionInput>,
) -> ApiResult<Json<ApiResponse<DecisionData>>> {
    let decision = state
        .governance
        .update_decision(&claims.actor(), &DecisionId::new(id), input)
        .await?;
    Ok(ApiResponse::ok(DecisionData { decision }))
}

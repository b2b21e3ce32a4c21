//! Administrator dashboard and citizen management

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::Utc;

use ppc_core::constants::DEFAULT_CITIZEN_PAGE_SIZE;
use ppc_core::registry::{CitizenRegistry, Dashboard};
use ppc_core::types::{CitizenId, PageRequest};

use crate::dto::{
    parse_number, ActivityData, ApiResponse, CitizenData, CitizenList, CitizenQuery,
    DashboardData, RoleRequest,
};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthClaims;
use crate::state::AppState;

use super::admin_only;

pub fn router(state: &AppState) -> Router<AppState> {
    admin_only(
        state,
        Router::new()
            .route("/admin/dashboard", get(dashboard))
            .route("/admin/recent-activity", get(recent_activity))
            .route("/admin/citizens", get(list_citizens))
            .route("/admin/citizens/:id/role", put(set_role)),
    )
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
) -> ApiResult<Json<ApiResponse<DashboardData>>> {
    let stats = state.dashboard.stats(&claims.actor(), Utc::now()).await?;
    Ok(ApiResponse::ok(stats))
}

pub async fn recent_activity(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
) -> ApiResult<Json<ApiResponse<ActivityData>>> {
    let activity = state.dashboard.recent_activity(&claims.actor()).await?;
    Ok(ApiResponse::ok(activity))
}

/// `?search=` matches name or email, newest accounts first
pub async fn list_citizens(
    State(state): State<AppState>,
    Query(query): Query<CitizenQuery>,
) -> ApiResult<Json<ApiResponse<CitizenList>>> {
    let page = PageRequest::new(
        parse_number(query.page.as_deref()),
        parse_number(query.limit.as_deref()),
        DEFAULT_CITIZEN_PAGE_SIZE,
    );
    let page = state
        .citizens
        .list_citizens(query.search.as_deref(), page)
        .await?
        .map(|c| c.to_public());

    Ok(ApiResponse::ok(CitizenList {
        citizens: page.items,
        pagination: page.pagination,
    }))
}

pub async fn set_role(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<RoleRequest>,
) -> ApiResult<Json<ApiResponse<CitizenData>>> {
    let citizen = state
        .citizens
        .set_role(
            &claims.actor(),
            &CitizenId::new(id),
            &req.role.unwrap_or_default(),
        )
        .await?;

    Ok(ApiResponse::ok(CitizenData {
        citizen: citizen.to_public(),
    }))
}

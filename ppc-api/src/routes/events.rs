//! Community events and attendance

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;

use ppc_core::error::DomainError;
use ppc_core::registry::EventRegistry;
use ppc_core::types::{EventId, NewEvent};

use crate::dto::{ApiResponse, EventData, EventList};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthClaims;
use crate::state::AppState;

use super::{admin_only, protected};

pub fn router(state: &AppState) -> Router<AppState> {
    let attendance = Router::new().route(
        "/events/:id/register",
        post(register_attendee).delete(unregister_attendee),
    );

    Router::new()
        .route("/events", get(upcoming_events))
        .merge(admin_only(state, Router::new().route("/events", post(create_event))))
        .route("/events/:id", get(get_event))
        .merge(protected(state, attendance))
}

pub async fn create_event(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    ApiJson(input): ApiJson<NewEvent>,
) -> ApiResult<(StatusCode, Json<ApiResponse<EventData>>)> {
    let event = state.events.create_event(&claims.actor(), input).await?;
    Ok(ApiResponse::created(EventData { event }))
}

/// Upcoming events, soonest first
pub async fn upcoming_events(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<EventList>>> {
    let events = state.events.upcoming_events(Utc::now()).await?;
    Ok(ApiResponse::ok(EventList {
        count: events.len(),
        events,
    }))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<EventData>>> {
    let event = state
        .events
        .get_event(&EventId::new(id))
        .await?
        .ok_or(DomainError::NotFound("Event"))?;

    Ok(ApiResponse::ok(EventData { event }))
}

pub async fn register_attendee(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<EventData>>> {
    let event = state
        .events
        .register_attendee(&claims.actor(), &EventId::new(id))
        .await?;

    Ok(ApiResponse::with_message(
        "Successfully registered for event",
        EventData { event },
    ))
}

pub async fn unregister_attendee(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state
        .events
        .unregister_attendee(&claims.actor(), &EventId::new(id))
        .await?;

    Ok(ApiResponse::message("Successfully unregistered from event"))
}

//! API route handlers
//!
//! Each area exposes a `router` mounted under `/api` by [`api_router`].
//! Access control is attached per route group with [`protected`] and
//! [`admin_only`].

pub mod admin;
pub mod auth;
pub mod citizens;
pub mod events;
pub mod governance;
pub mod health;
pub mod issues;
pub mod surveys;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};

use crate::middleware::auth::{require_admin, require_auth};
use crate::state::AppState;

/// Require a valid bearer token on every route of `router`
pub(crate) fn protected(state: &AppState, router: Router<AppState>) -> Router<AppState> {
    router.route_layer(from_fn_with_state(state.clone(), require_auth))
}

/// Require an authenticated administrator on every route of `router`
pub(crate) fn admin_only(state: &AppState, router: Router<AppState>) -> Router<AppState> {
    // the last route layer runs first
    router
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_auth))
}

/// Every `/api` route
pub fn api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(auth::router(state))
        .merge(citizens::router(state))
        .merge(issues::router(state))
        .merge(events::router(state))
        .merge(surveys::router(state))
        .merge(governance::router(state))
        .merge(admin::router(state))
}

//! Health check endpoint

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::warn;

use crate::dto::HealthResponse;
use crate::state::AppState;

/// Reports `healthy` when the store answers, `degraded` (503) otherwise
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = match state.database.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "Storage health check failed");
            false
        }
    };

    let (status, label) = if healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: state.version.clone(),
            storage: state.database.backend().to_string(),
            timestamp: Utc::now(),
        }),
    )
}

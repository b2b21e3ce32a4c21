//! API server setup

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use ppc_core::logging::operations;

use crate::error::ApiError;
use crate::middleware::rate_limit::{rate_limit, RateLimitConfig, RateLimiter};
use crate::routes::{api_router, health};
use crate::state::{ApiConfig, AppState};
use crate::upload::UPLOADS_PREFIX;

type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// How often idle rate limit buckets are dropped
const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

fn cors_layer(client_url: Option<&str>) -> Result<CorsLayer, ServerError> {
    let layer = match client_url {
        Some(origin) => CorsLayer::new()
            .allow_origin(HeaderValue::from_str(origin)?)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };
    Ok(layer)
}

/// Build the full application router
///
/// Must be called inside a Tokio runtime when rate limiting is enabled.
pub fn create_app(state: AppState, config: &ApiConfig) -> Result<Router, ServerError> {
    let uploads = ServeDir::new(state.uploads.root());

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_router(&state))
        .nest_service(UPLOADS_PREFIX, uploads)
        .fallback(|| async { ApiError::RouteNotFound })
        .with_state(state);

    if config.rate_limit_per_minute > 0 {
        let limiter = RateLimiter::new(RateLimitConfig::per_minute(config.rate_limit_per_minute));
        limiter.spawn_cleanup(RATE_LIMIT_CLEANUP_INTERVAL);
        router = router.layer(from_fn_with_state(limiter, rate_limit));
    }

    let router = router
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(cors_layer(config.client_url.as_deref())?)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

/// Run the API server until ctrl-c or SIGTERM
pub async fn run_server(state: AppState, config: ApiConfig) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let database = state.database.clone();
    let app = create_app(state, &config)?;

    let listener = TcpListener::bind(addr).await?;
    info!(
        operation = operations::SERVER_START,
        %addr,
        storage = database.backend(),
        "People Center API listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Err(e) = database.flush().await {
        warn!(error = %e, "Failed to flush storage on shutdown");
    }
    info!(operation = operations::SERVER_STOP, "People Center API stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

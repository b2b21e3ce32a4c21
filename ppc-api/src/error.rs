//! API Error types
//!
//! Every failure leaves the server as `{success:false, error:{message, code}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use ppc_core::error::{codes, DomainError, ErrorKind};

use crate::middleware::auth::AuthError;

pub const INVALID_JSON: &str = "INVALID_JSON";
pub const INVALID_FILE: &str = "INVALID_FILE";
pub const FILE_TOO_LARGE: &str = "FILE_TOO_LARGE";
pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Request rejected before it reached a service
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Route not found")]
    RouteNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => match e.kind() {
                ErrorKind::Validation | ErrorKind::State => StatusCode::BAD_REQUEST,
                ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
                ErrorKind::Forbidden => StatusCode::FORBIDDEN,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Auth(e) => e.status(),
            ApiError::BadRequest { .. } | ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Domain(e) => e.code(),
            ApiError::Auth(e) => e.code(),
            ApiError::BadRequest { code, .. } => code,
            ApiError::InvalidJson(_) => INVALID_JSON,
            ApiError::PayloadTooLarge => PAYLOAD_TOO_LARGE,
            ApiError::RouteNotFound => codes::NOT_FOUND,
            ApiError::Internal(_) => codes::SERVER_ERROR,
        }
    }
}

/// Error envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
    /// Underlying cause, only in debug builds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                message: message.into(),
                code: code.to_string(),
                details: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Unhandled server error");
            let mut body = ErrorResponse::new(codes::SERVER_ERROR, "Something went wrong");
            if cfg!(debug_assertions) {
                body.error.details = Some(self.to_string());
            }
            body
        } else {
            ErrorResponse::new(self.code(), self.to_string())
        };

        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

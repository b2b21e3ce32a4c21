//! JWT Authentication Middleware
//!
//! Issues and validates bearer tokens. Validated claims are stored in the
//! request extensions; handlers read them with `Extension<AuthClaims>`.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ppc_core::access::Actor;
use ppc_core::constants::DEFAULT_TOKEN_EXPIRE_HOURS;
use ppc_core::error::DomainError;
use ppc_core::types::{Citizen, CitizenId, Role};

use crate::error::ApiError;
use crate::state::AppState;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    /// Token lifetime
    pub expire_hours: i64,
    pub algorithm: Algorithm,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expire_hours", &self.expire_hours)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl JwtConfig {
    /// Minimum secret length for security
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Create a new JWT config
    ///
    /// # Returns
    /// Error if the secret is shorter than 32 bytes.
    pub fn try_new(secret: impl Into<String>, expire_hours: i64) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(AuthError::WeakSecret {
                min: Self::MIN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }
        Ok(Self {
            secret,
            expire_hours: if expire_hours > 0 {
                expire_hours
            } else {
                DEFAULT_TOKEN_EXPIRE_HOURS
            },
            algorithm: Algorithm::HS256,
        })
    }

    /// Sign a token for `citizen`
    pub fn issue(&self, citizen: &Citizen) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = AuthClaims {
            sub: citizen.id.to_string(),
            email: citizen.email.clone(),
            role: citizen.role.as_str().to_string(),
            iat: now.timestamp().max(0) as u64,
            exp: (now + Duration::hours(self.expire_hours)).timestamp().max(0) as u64,
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &AuthClaims) -> Result<String, AuthError> {
        encode(
            &Header::new(self.algorithm),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Validate a token and extract its claims
    pub fn verify(&self, token: &str) -> Result<AuthClaims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        let key = DecodingKey::from_secret(self.secret.as_bytes());

        decode::<AuthClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Citizen id
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl AuthClaims {
    pub fn citizen_id(&self) -> CitizenId {
        CitizenId::new(&self.sub)
    }

    pub fn is_admin(&self) -> bool {
        Role::parse(&self.role) == Some(Role::Admin)
    }

    /// The caller as seen by the registries
    pub fn actor(&self) -> Actor {
        Actor::new(
            self.citizen_id(),
            Role::parse(&self.role).unwrap_or_default(),
        )
    }
}

/// Authentication error
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authorized to access this route")]
    MissingToken,

    #[error("Invalid token. Please log in again.")]
    InvalidToken,

    #[error("Your token has expired. Please log in again.")]
    TokenExpired,

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("JWT secret must be at least {min} bytes, got {actual}")]
    WeakSecret { min: usize, actual: usize },
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "NO_TOKEN",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::Signing(_) | AuthError::WeakSecret { .. } => "SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Signing(_) | AuthError::WeakSecret { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Extract the token from a `Bearer <token>` header value
pub fn extract_token(auth_header: &str) -> Result<&str, AuthError> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}

/// Require authentication middleware
///
/// Validates the bearer token and stores the claims in request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = extract_token(auth_header)?;
    let claims = state.jwt.verify(token)?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Admin gate; must run after [`require_auth`]
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let claims = request
        .extensions()
        .get::<AuthClaims>()
        .ok_or(AuthError::MissingToken)?;

    if !claims.is_admin() {
        return Err(DomainError::AdminOnly.into());
    }
    Ok(next.run(request).await)
}

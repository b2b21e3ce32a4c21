//! Request middleware

pub mod auth;
pub mod rate_limit;

pub use auth::{require_admin, require_auth, AuthClaims, AuthError, JwtConfig};
pub use rate_limit::{rate_limit, RateLimitConfig, RateLimiter};

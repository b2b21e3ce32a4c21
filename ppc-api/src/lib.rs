//! Politikos People Center REST API
//!
//! JSON over HTTP. Successful responses are `{success: true, message?, data?}`,
//! failures are `{success: false, error: {message, code}}`.
//!
//! ## Endpoints
//!
//! ### Health
//! - GET /health - Storage status and version
//!
//! ### Auth
//! - POST /api/auth/register - Create an account
//! - POST /api/auth/login - Exchange credentials for a token
//! - GET /api/auth/me - Current account
//!
//! ### Citizens
//! - GET /api/citizens/:id - Public profile
//! - GET /api/citizens/:id/issues - Issues reported by a citizen
//! - PUT /api/citizens/:id - Update own profile
//! - PUT /api/citizens/:id/password - Change own password
//! - PUT /api/citizens/:id/interests - Replace own interests
//! - PUT /api/citizens/:id/location - Replace own location
//!
//! ### Issues
//! - GET /api/issues - Filtered, paginated listing
//! - POST /api/issues - Report an issue (JSON or multipart with image)
//! - GET /api/issues/:id - Get issue
//! - PUT /api/issues/:id/status - Change status (admin)
//! - POST /api/issues/:id/comments - Add an admin comment (admin)
//!
//! ### Events
//! - GET /api/events - Upcoming events
//! - POST /api/events - Create event (admin)
//! - GET /api/events/:id - Get event
//! - POST /api/events/:id/register - Attend
//! - DELETE /api/events/:id/register - Cancel attendance
//!
//! ### Surveys
//! - GET /api/surveys - Active surveys
//! - POST /api/surveys - Create survey (admin)
//! - GET /api/surveys/:id - Get survey
//! - POST /api/surveys/:id/responses - Respond once
//! - GET /api/surveys/:id/results - Aggregated results (admin)
//! - PUT /api/surveys/:id/close - Close survey (admin)
//!
//! ### Governance
//! - GET /api/governance/council - Active council
//! - GET /api/governance/decisions - Recent decisions
//! - GET /api/governance/metrics - Participation and consensus
//! - GET, POST /api/governance/admin/council - Manage members (admin)
//! - PUT, DELETE /api/governance/admin/council/:id - Update or deactivate (admin)
//! - GET, POST /api/governance/admin/decisions - Manage decisions (admin)
//! - PUT /api/governance/admin/decisions/:id - Record votes and progress (admin)
//!
//! ### Admin
//! - GET /api/admin/dashboard - Headline counts
//! - GET /api/admin/recent-activity - Activity feed
//! - GET /api/admin/citizens - Citizen directory
//! - PUT /api/admin/citizens/:id/role - Change a citizen's role
//!
//! ### Uploads
//! - GET /uploads/issues/:file - Issue images

pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod upload;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use middleware::{AuthClaims, AuthError, JwtConfig, RateLimitConfig, RateLimiter};
pub use routes::api_router;
pub use server::{create_app, run_server};
pub use state::{ApiConfig, AppState};
pub use upload::ImageStore;

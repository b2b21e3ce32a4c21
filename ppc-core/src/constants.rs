//! Domain Constants
//!
//! Field limits, defaults and thresholds shared by the domain rules and the
//! API layer.

// ============================================================================
// Credentials
// ============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Default token lifetime in hours
pub const DEFAULT_TOKEN_EXPIRE_HOURS: i64 = 24;

// ============================================================================
// Field Limits
// ============================================================================

/// Citizen display name bounds
pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 100;

/// Issue title bounds
pub const ISSUE_TITLE_MIN_LENGTH: usize = 5;
pub const ISSUE_TITLE_MAX_LENGTH: usize = 200;

/// Issue description bounds
pub const ISSUE_DESCRIPTION_MIN_LENGTH: usize = 10;
pub const ISSUE_DESCRIPTION_MAX_LENGTH: usize = 2000;

/// Event title bounds
pub const EVENT_TITLE_MIN_LENGTH: usize = 5;
pub const EVENT_TITLE_MAX_LENGTH: usize = 200;

/// Event description limit
pub const EVENT_DESCRIPTION_MAX_LENGTH: usize = 2000;

/// Survey title bounds
pub const SURVEY_TITLE_MIN_LENGTH: usize = 5;
pub const SURVEY_TITLE_MAX_LENGTH: usize = 200;

/// Survey description limit
pub const SURVEY_DESCRIPTION_MAX_LENGTH: usize = 1000;

/// Council member bio limit
pub const BIO_MAX_LENGTH: usize = 500;

// ============================================================================
// Governance
// ============================================================================

/// Consensus percentage at or above which a decision is approved
pub const CONSENSUS_THRESHOLD: u32 = 70;

/// Council term assigned when none is supplied
pub const DEFAULT_COUNCIL_TERM: &str = "2024-2025";

/// Default number of decisions returned by the public listing
pub const DEFAULT_DECISION_LIMIT: usize = 10;

// ============================================================================
// Pagination
// ============================================================================

/// Default page size for issue listings
pub const DEFAULT_ISSUE_PAGE_SIZE: u32 = 10;

/// Default page size for the admin citizen listing
pub const DEFAULT_CITIZEN_PAGE_SIZE: u32 = 20;

/// Upper bound for any page size
pub const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// Dashboard
// ============================================================================

/// Entries taken from each category for the recent activity feed
pub const ACTIVITY_PER_CATEGORY: usize = 2;

/// Maximum entries in the recent activity feed
pub const ACTIVITY_FEED_LIMIT: usize = 8;

//! Logging Standards and Conventions
//!
//! | Level | Usage | Examples |
//! |-------|-------|----------|
//! | ERROR | Unexpected failures | Storage failure, hashing failure |
//! | WARN  | Refused or suspicious requests | Failed login, rate limit hit |
//! | INFO  | Accepted state changes | Citizen registered, issue resolved |
//! | DEBUG | Detailed operation flow | CAS retry, filter values |
//!
//! Always use structured fields for key information:
//!
//! ```ignore
//! use tracing::info;
//! use ppc_core::logging::operations;
//!
//! info!(
//!     operation = operations::ISSUE_STATUS,
//!     issue_id = %issue.id,
//!     status = %issue.status,
//!     "Issue status updated"
//! );
//! ```

/// Standard log field names
pub mod fields {
    pub const OPERATION: &str = "operation";
    pub const CITIZEN_ID: &str = "citizen_id";
    pub const ISSUE_ID: &str = "issue_id";
    pub const EVENT_ID: &str = "event_id";
    pub const SURVEY_ID: &str = "survey_id";
    pub const DECISION_ID: &str = "decision_id";
    pub const MEMBER_ID: &str = "member_id";
    pub const ERROR: &str = "error";
    pub const COUNT: &str = "count";
}

/// Operation names for consistent logging
pub mod operations {
    // Identity
    pub const REGISTER: &str = "register";
    pub const LOGIN: &str = "login";
    pub const PROFILE_UPDATE: &str = "profile_update";
    pub const PASSWORD_CHANGE: &str = "password_change";
    pub const ROLE_CHANGE: &str = "role_change";
    pub const EMAIL_CLEANUP: &str = "email_cleanup";

    // Issues
    pub const ISSUE_SUBMIT: &str = "issue_submit";
    pub const ISSUE_STATUS: &str = "issue_status";
    pub const ISSUE_COMMENT: &str = "issue_comment";

    // Events
    pub const EVENT_CREATE: &str = "event_create";
    pub const EVENT_REGISTER: &str = "event_register";
    pub const EVENT_UNREGISTER: &str = "event_unregister";

    // Surveys
    pub const SURVEY_CREATE: &str = "survey_create";
    pub const SURVEY_RESPOND: &str = "survey_respond";
    pub const SURVEY_CLOSE: &str = "survey_close";

    // Governance
    pub const MEMBER_ADD: &str = "member_add";
    pub const MEMBER_UPDATE: &str = "member_update";
    pub const MEMBER_DEACTIVATE: &str = "member_deactivate";
    pub const DECISION_PROPOSE: &str = "decision_propose";
    pub const DECISION_UPDATE: &str = "decision_update";

    // Storage
    pub const CAS_RETRY: &str = "cas_retry";

    // Server
    pub const SERVER_START: &str = "server_start";
    pub const SERVER_STOP: &str = "server_stop";
}

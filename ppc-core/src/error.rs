//! Error types for PPC Core
//!
//! Every domain failure carries a stable machine code. The API layer maps
//! the [`ErrorKind`] of an error onto an HTTP status.

use thiserror::Error;

/// Machine-readable error codes
pub mod codes {
    pub const MISSING_FIELDS: &str = "MISSING_FIELDS";
    pub const MISSING_NAME: &str = "MISSING_NAME";
    pub const MISSING_CREDENTIALS: &str = "MISSING_CREDENTIALS";
    pub const MISSING_COMMENT: &str = "MISSING_COMMENT";
    pub const MISSING_ANSWERS: &str = "MISSING_ANSWERS";
    pub const MISSING_LOCATION: &str = "MISSING_LOCATION";
    pub const INVALID_EMAIL_FORMAT: &str = "INVALID_EMAIL_FORMAT";
    pub const INVALID_PASSWORD: &str = "INVALID_PASSWORD";
    pub const INVALID_LOCATION: &str = "INVALID_LOCATION";
    pub const INVALID_FORMAT: &str = "INVALID_FORMAT";
    pub const INVALID_ROLE: &str = "INVALID_ROLE";
    pub const INVALID_STATUS: &str = "INVALID_STATUS";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const COMMENT_REQUIRED: &str = "COMMENT_REQUIRED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const ADMIN_ONLY: &str = "ADMIN_ONLY";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const DUPLICATE_EMAIL: &str = "DUPLICATE_EMAIL";
    pub const EMAIL_IN_USE: &str = "EMAIL_IN_USE";
    pub const ALREADY_REGISTERED: &str = "ALREADY_REGISTERED";
    pub const NOT_REGISTERED: &str = "NOT_REGISTERED";
    pub const EVENT_PAST: &str = "EVENT_PAST";
    pub const EVENT_FULL: &str = "EVENT_FULL";
    pub const SURVEY_CLOSED: &str = "SURVEY_CLOSED";
    pub const ALREADY_CLOSED: &str = "ALREADY_CLOSED";
    pub const MISSING_REQUIRED_ANSWERS: &str = "MISSING_REQUIRED_ANSWERS";
    pub const DUPLICATE_RESPONSE: &str = "DUPLICATE_RESPONSE";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
}

/// Broad class of a domain failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or incomplete input (400)
    Validation,
    /// Credentials rejected (401)
    Authentication,
    /// Caller lacks the right to act (403)
    Forbidden,
    /// Referenced entity does not exist (404)
    NotFound,
    /// Uniqueness violated (409)
    Conflict,
    /// Operation refused by the entity's current state (400)
    State,
    /// Storage or other unexpected failure (500)
    Internal,
}

/// Domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{message}")]
    Validation { code: &'static str, message: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("{0}")]
    Forbidden(String),

    #[error("Admin access required")]
    AdminOnly,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Email already in use")]
    EmailInUse,

    #[error("You are already registered for this event")]
    AlreadyRegistered,

    #[error("You are not registered for this event")]
    NotRegistered,

    #[error("Cannot register for past events")]
    EventPast,

    #[error("Event is full")]
    EventFull,

    #[error("Please provide a valid status")]
    InvalidStatus,

    #[error("Resolution comment is required when marking an issue as resolved")]
    CommentRequired,

    #[error("This survey is closed")]
    SurveyClosed,

    #[error("Survey is already closed")]
    AlreadyClosed,

    #[error("Please answer all required questions")]
    MissingRequiredAnswers,

    #[error("You have already responded to this survey")]
    DuplicateResponse,

    #[error("{0}")]
    InvalidTransition(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Build a validation error with an explicit code
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            code,
            message: message.into(),
        }
    }

    /// Build a generic `VALIDATION_ERROR`
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::validation(codes::VALIDATION_ERROR, message)
    }

    /// Build a `MISSING_FIELDS` error
    pub fn missing_fields(message: impl Into<String>) -> Self {
        Self::validation(codes::MISSING_FIELDS, message)
    }

    /// Machine code carried in the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { code, .. } => code,
            DomainError::InvalidCredentials => codes::INVALID_CREDENTIALS,
            DomainError::IncorrectPassword => codes::INVALID_PASSWORD,
            DomainError::Forbidden(_) => codes::FORBIDDEN,
            DomainError::AdminOnly => codes::ADMIN_ONLY,
            DomainError::NotFound(_) => codes::NOT_FOUND,
            DomainError::DuplicateEmail => codes::DUPLICATE_EMAIL,
            DomainError::EmailInUse => codes::EMAIL_IN_USE,
            DomainError::AlreadyRegistered => codes::ALREADY_REGISTERED,
            DomainError::NotRegistered => codes::NOT_REGISTERED,
            DomainError::EventPast => codes::EVENT_PAST,
            DomainError::EventFull => codes::EVENT_FULL,
            DomainError::InvalidStatus => codes::INVALID_STATUS,
            DomainError::CommentRequired => codes::COMMENT_REQUIRED,
            DomainError::SurveyClosed => codes::SURVEY_CLOSED,
            DomainError::AlreadyClosed => codes::ALREADY_CLOSED,
            DomainError::MissingRequiredAnswers => codes::MISSING_REQUIRED_ANSWERS,
            DomainError::DuplicateResponse => codes::DUPLICATE_RESPONSE,
            DomainError::InvalidTransition(_) => codes::INVALID_TRANSITION,
            DomainError::Storage(_) | DomainError::Internal(_) => codes::SERVER_ERROR,
        }
    }

    /// Error class, used to select the response status
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. }
            | DomainError::InvalidStatus
            | DomainError::CommentRequired
            | DomainError::MissingRequiredAnswers => ErrorKind::Validation,
            DomainError::InvalidCredentials | DomainError::IncorrectPassword => {
                ErrorKind::Authentication
            }
            DomainError::Forbidden(_) | DomainError::AdminOnly => ErrorKind::Forbidden,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::DuplicateEmail
            | DomainError::EmailInUse
            | DomainError::AlreadyRegistered
            | DomainError::DuplicateResponse => ErrorKind::Conflict,
            DomainError::NotRegistered
            | DomainError::EventPast
            | DomainError::EventFull
            | DomainError::SurveyClosed
            | DomainError::AlreadyClosed
            | DomainError::InvalidTransition(_) => ErrorKind::State,
            DomainError::Storage(_) | DomainError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_errors_share_code_but_not_kind() {
        let weak = DomainError::validation(codes::INVALID_PASSWORD, "too short");
        let wrong = DomainError::IncorrectPassword;
        assert_eq!(weak.code(), wrong.code());
        assert_eq!(weak.kind(), ErrorKind::Validation);
        assert_eq!(wrong.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_not_found_message() {
        let err = DomainError::NotFound("Issue");
        assert_eq!(err.to_string(), "Issue not found");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_storage_is_internal() {
        let err = DomainError::Storage("disk".into());
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.code(), codes::SERVER_ERROR);
    }
}

//! Input validation shared by registration, profile updates and the
//! maintenance commands.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::error::{codes, DomainError, DomainResult};

// =============================================================================
// Regex Patterns (compiled once)
// =============================================================================

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid email regex")
});

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s\-\+\(\)]+$").expect("Invalid phone regex"));

/// Misspellings of common mail providers, rejected at registration
pub const TYPO_DOMAINS: &[&str] = &[
    "gmai.com",
    "gmial.com",
    "gamil.com",
    "gmil.com",
    "gma.com",
    "yahooo.com",
    "yaho.com",
    "yhoo.com",
    "outlok.com",
    "outloo.com",
    "hotmial.com",
    "iclou.com",
    "icloud.co",
];

/// Canonical stored form of an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check syntax and reject known provider typos
///
/// Returns the normalized address.
pub fn validate_email(email: &str) -> DomainResult<String> {
    let trimmed = email.trim();
    if !EMAIL_PATTERN.is_match(trimmed) {
        return Err(DomainError::validation(
            codes::INVALID_EMAIL_FORMAT,
            "Please provide a valid email address",
        ));
    }

    let normalized = normalize_email(trimmed);
    if let Some((_, domain)) = normalized.rsplit_once('@') {
        if TYPO_DOMAINS.contains(&domain) {
            return Err(DomainError::validation(
                codes::INVALID_EMAIL_FORMAT,
                format!("The email domain \"{}\" looks misspelled", domain),
            ));
        }
    }
    Ok(normalized)
}

/// True when a stored address would pass registration today
pub fn is_valid_email(email: &str) -> bool {
    validate_email(email).is_ok()
}

pub fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::validation(
            codes::INVALID_PASSWORD,
            format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ),
        ));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> DomainResult<()> {
    if !PHONE_PATTERN.is_match(phone) {
        return Err(DomainError::invalid("Please provide a valid phone number"));
    }
    Ok(())
}

/// Trim `value` and check its length in characters
pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> DomainResult<String> {
    let value = value.trim();
    let len = value.chars().count();
    if len < min {
        return Err(DomainError::invalid(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if len > max {
        return Err(DomainError::invalid(format!(
            "{} cannot exceed {} characters",
            field, max
        )));
    }
    Ok(value.to_string())
}

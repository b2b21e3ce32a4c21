//! Citizen accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{non_blank, CitizenId, Location};
use crate::constants::{NAME_MAX_LENGTH, NAME_MIN_LENGTH};
use crate::error::{codes, DomainError, DomainResult};
use crate::validation::{check_length, validate_email, validate_password, validate_phone};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Citizen,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "citizen" => Some(Role::Citizen),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            "prefer-not-to-say" => Some(Gender::PreferNotToSay),
            _ => None,
        }
    }
}

/// Civic topics a citizen can follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interest {
    Infrastructure,
    Education,
    Healthcare,
    Environment,
    PublicSafety,
    Transportation,
    Housing,
    EconomicDevelopment,
}

impl Interest {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "infrastructure" => Some(Interest::Infrastructure),
            "education" => Some(Interest::Education),
            "healthcare" => Some(Interest::Healthcare),
            "environment" => Some(Interest::Environment),
            "public-safety" => Some(Interest::PublicSafety),
            "transportation" => Some(Interest::Transportation),
            "housing" => Some(Interest::Housing),
            "economic-development" => Some(Interest::EconomicDevelopment),
            _ => None,
        }
    }

    /// Parse a full interest list, dropping duplicates while keeping order
    pub fn parse_list(values: &[String]) -> DomainResult<Vec<Self>> {
        let mut interests = Vec::with_capacity(values.len());
        for value in values {
            let interest = Interest::parse(value.trim())
                .ok_or_else(|| DomainError::invalid(format!("Unknown interest: {}", value)))?;
            if !interests.contains(&interest) {
                interests.push(interest);
            }
        }
        Ok(interests)
    }
}

/// Stored citizen record
///
/// Holds the password hash and must never be serialized to clients; use
/// [`Citizen::to_public`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citizen {
    pub id: CitizenId,
    pub name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub interests: Vec<Interest>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-facing view of a citizen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCitizen {
    pub id: CitizenId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub interests: Vec<Interest>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Citizen {
    pub fn new(registration: Registration, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: CitizenId::generate(),
            name: registration.name,
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: registration.email,
            password_hash,
            role: Role::Citizen,
            phone_number: registration.phone_number,
            gender: registration.gender,
            location: registration.location,
            interests: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn to_public(&self) -> PublicCitizen {
        PublicCitizen {
            id: self.id.clone(),
            name: self.name.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            role: self.role,
            phone_number: self.phone_number.clone(),
            gender: self.gender,
            location: self.location.clone(),
            interests: self.interests.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Raw registration input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCitizen {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Registration input that passed validation
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Normalized (trimmed, lower-cased)
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub gender: Option<Gender>,
    pub location: Option<Location>,
}

impl NewCitizen {
    /// Validate in the order clients rely on: required fields, email,
    /// name, password
    pub fn validate(self) -> DomainResult<Registration> {
        let email = non_blank(self.email);
        let password = self.password.filter(|p| !p.is_empty());
        let (email, password) = match (email, password) {
            (Some(email), Some(password)) => (email, password),
            _ => {
                return Err(DomainError::missing_fields(
                    "Email and password are required",
                ))
            }
        };

        let email = validate_email(&email)?;

        let first_name = non_blank(self.first_name);
        let last_name = non_blank(self.last_name);
        let name = match (non_blank(self.name), &first_name, &last_name) {
            (Some(name), _, _) => name,
            (None, Some(first), Some(last)) => format!("{} {}", first, last),
            _ => {
                return Err(DomainError::validation(
                    codes::MISSING_NAME,
                    "Please provide your name",
                ))
            }
        };
        let name = check_length("Name", &name, NAME_MIN_LENGTH, NAME_MAX_LENGTH)?;

        validate_password(&password)?;

        let phone_number = non_blank(self.phone_number);
        if let Some(phone) = &phone_number {
            validate_phone(phone)?;
        }

        let gender = match non_blank(self.gender) {
            Some(g) => Some(
                Gender::parse(&g)
                    .ok_or_else(|| DomainError::invalid(format!("Unknown gender: {}", g)))?,
            ),
            None => None,
        };

        let location = Location {
            city: non_blank(self.city),
            state: non_blank(self.state),
            ..Location::default()
        };
        let location = (!location.is_empty()).then_some(location);

        Ok(Registration {
            name,
            first_name,
            last_name,
            email,
            password,
            phone_number,
            gender,
            location,
        })
    }
}

/// Profile fields a citizen may change
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Profile update that passed validation
#[derive(Debug, Clone, Default)]
pub struct ValidProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(self) -> DomainResult<ValidProfileUpdate> {
        let name = match non_blank(self.name) {
            Some(name) => Some(check_length("Name", &name, NAME_MIN_LENGTH, NAME_MAX_LENGTH)?),
            None => None,
        };
        let email = match non_blank(self.email) {
            Some(email) => Some(validate_email(&email)?),
            None => None,
        };
        let phone_number = non_blank(self.phone_number);
        if let Some(phone) = &phone_number {
            validate_phone(phone)?;
        }
        Ok(ValidProfileUpdate {
            name,
            email,
            phone_number,
        })
    }
}

impl ValidProfileUpdate {
    pub fn apply(&self, citizen: &mut Citizen, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            citizen.name = name.clone();
        }
        if let Some(email) = &self.email {
            citizen.email = email.clone();
        }
        if let Some(phone) = &self.phone_number {
            citizen.phone_number = Some(phone.clone());
        }
        citizen.updated_at = now;
    }
}

/// Password change request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

impl PasswordChange {
    /// Returns `(current, new)` once both are present and the new one is long enough
    pub fn validate(self) -> DomainResult<(String, String)> {
        let current = self.current_password.filter(|p| !p.is_empty());
        let new = self.new_password.filter(|p| !p.is_empty());
        match (current, new) {
            (Some(current), Some(new)) => {
                validate_password(&new)?;
                Ok((current, new))
            }
            _ => Err(DomainError::missing_fields(
                "Current password and new password are required",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> NewCitizen {
        NewCitizen {
            name: Some("Jane Citizen".into()),
            email: Some(" Jane@Example.com ".into()),
            password: Some("password123".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_registration_normalizes_email() {
        let reg = registration().validate().unwrap();
        assert_eq!(reg.email, "jane@example.com");
        assert_eq!(reg.name, "Jane Citizen");
        assert!(reg.location.is_none());
    }

    #[test]
    fn test_registration_order() {
        let mut input = registration();
        input.password = None;
        input.email = Some("not-an-email".into());
        assert_eq!(input.validate().unwrap_err().code(), codes::MISSING_FIELDS);

        let mut input = registration();
        input.email = Some("jane@gmial.com".into());
        input.name = None;
        assert_eq!(input.validate().unwrap_err().code(), codes::INVALID_EMAIL_FORMAT);

        let mut input = registration();
        input.name = None;
        input.password = Some("short".into());
        assert_eq!(input.validate().unwrap_err().code(), codes::MISSING_NAME);

        let mut input = registration();
        input.password = Some("short".into());
        assert_eq!(input.validate().unwrap_err().code(), codes::INVALID_PASSWORD);
    }

    #[test]
    fn test_name_from_first_and_last() {
        let mut input = registration();
        input.name = None;
        input.first_name = Some("Jane".into());
        input.last_name = Some("Doe".into());
        input.city = Some("Nairobi".into());
        let reg = input.validate().unwrap();
        assert_eq!(reg.name, "Jane Doe");
        assert_eq!(reg.location.unwrap().city.as_deref(), Some("Nairobi"));

        let mut input = registration();
        input.name = None;
        input.first_name = Some("Jane".into());
        assert_eq!(input.validate().unwrap_err().code(), codes::MISSING_NAME);
    }

    #[test]
    fn test_public_view_hides_hash() {
        let reg = registration().validate().unwrap();
        let citizen = Citizen::new(reg, "$argon2id$secret".into(), Utc::now());
        let json = serde_json::to_value(citizen.to_public()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "citizen");
        assert_eq!(json["email"], "jane@example.com");
    }

    #[test]
    fn test_interest_list() {
        let parsed = Interest::parse_list(&[
            "housing".to_string(),
            "public-safety".to_string(),
            "housing".to_string(),
        ])
        .unwrap();
        assert_eq!(parsed, vec![Interest::Housing, Interest::PublicSafety]);
        assert!(Interest::parse_list(&["astrology".to_string()]).is_err());
    }

    #[test]
    fn test_password_change_validation() {
        let change = PasswordChange {
            current_password: Some("old-password".into()),
            new_password: None,
        };
        assert_eq!(change.validate().unwrap_err().code(), codes::MISSING_FIELDS);

        let change = PasswordChange {
            current_password: Some("old-password".into()),
            new_password: Some("short".into()),
        };
        assert_eq!(change.validate().unwrap_err().code(), codes::INVALID_PASSWORD);
    }
}

//! User data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Validation errors returned by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Name was blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Name exceeded [`NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacked a local part, an `@`, or a domain.
    #[error("email must look like name@example.com")]
    InvalidEmail,
    /// Role string was not one of the known roles.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Maximum allowed length for a user name.
pub const NAME_MAX: usize = 100;

/// Account role carried inside bearer tokens.
///
/// Roles do not form a hierarchy; authorization compares ownership ids and
/// only consults the role for the optional company-creation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular traveller.
    #[default]
    User,
    /// Account operating companies and vehicle offers.
    Company,
    /// Account organising trips.
    Organizer,
}

impl Role {
    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Company => "COMPANY",
            Self::Organizer => "ORGANIZER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "COMPANY" => Ok(Self::Company),
            "ORGANIZER" => Ok(Self::Organizer),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Normalised email address.
///
/// ## Invariants
/// - Trimmed and lower-cased.
/// - Exactly one `@` with non-empty text on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use eventgo::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  Ada@Example.COM ").unwrap();
    /// assert_eq!(email.as_ref(), "ada@example.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        match normalised.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(normalised))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validate a display name: trimmed, non-empty, at most [`NAME_MAX`] chars.
pub fn validate_name(raw: &str) -> Result<String, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyName);
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(UserValidationError::NameTooLong { max: NAME_MAX });
    }
    Ok(trimmed.to_owned())
}

/// Registered account.
///
/// `password_hash` is never serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: EmailAddress,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub profile_public_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
}

impl NewUser {
    /// Materialise a [`User`] with a fresh id and timestamp.
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: UserId::random(),
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            avatar_url: None,
            profile_public_info: None,
            created_at: now,
        }
    }
}

//! Authentication primitives: caller identity and credential payloads.
//!
//! Token verification never fails a request on its own. The outcome is a
//! [`CallerIdentity`], which is either a verified [`Identity`] or an
//! [`Anonymous`] reason, and each use-case decides whether anonymous callers
//! are acceptable.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{EmailAddress, Error, Role, User, UserId, UserValidationError, validate_name};

/// Verified token payload attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    /// Build an identity for a persisted user.
    pub fn of(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
        }
    }
}

/// Why a request is being served anonymously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anonymous {
    /// No `Authorization` header was sent.
    MissingToken,
    /// The header was present but not a `Bearer` credential.
    MalformedHeader,
    /// The token failed verification (expired, bad signature, garbled).
    InvalidToken,
}

impl fmt::Display for Anonymous {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken => write!(f, "missing token"),
            Self::MalformedHeader => write!(f, "malformed authorization header"),
            Self::InvalidToken => write!(f, "invalid token"),
        }
    }
}

/// Outcome of resolving the caller of a request.
pub type CallerIdentity = Result<Identity, Anonymous>;

/// Require an authenticated caller, mapping anonymity to `Unauthorized`.
///
/// # Examples
/// ```
/// use eventgo::domain::{Anonymous, ErrorCode, require_identity};
///
/// let err = require_identity(&Err(Anonymous::MissingToken)).unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Unauthorized);
/// ```
pub fn require_identity(caller: &CallerIdentity) -> Result<Identity, Error> {
    caller
        .as_ref()
        .copied()
        .map_err(|_| Error::unauthorized("login required"))
}

/// Domain error returned when auth payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Email failed validation.
    #[error(transparent)]
    Email(UserValidationError),
    /// Name failed validation.
    #[error(transparent)]
    Name(UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
}

impl CredentialsValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Name(_) => "name",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
        }
    }
}

impl From<CredentialsValidationError> for Error {
    fn from(value: CredentialsValidationError) -> Self {
        Self::invalid_request(value.to_string())
            .with_details(serde_json::json!({ "field": value.field() }))
    }
}

/// Minimum password length accepted at signup.
pub const PASSWORD_MIN: usize = 6;

/// Validated login credentials used by the auth service.
///
/// ## Invariants
/// - `email` is normalised via [`EmailAddress`].
/// - `password` is non-empty and keeps caller-provided whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the user lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated signup payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    name: String,
    email: EmailAddress,
    password: Zeroizing<String>,
    role: Role,
}

impl SignupRequest {
    /// Validate raw signup inputs. `role` defaults to [`Role::User`].
    pub fn try_new(
        name: &str,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<Self, CredentialsValidationError> {
        let name = validate_name(name).map_err(CredentialsValidationError::Name)?;
        let email = EmailAddress::new(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            name,
            email,
            password: Zeroizing::new(password.to_owned()),
            role: role.unwrap_or_default(),
        })
    }

    /// Trimmed display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalised email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plain-text password, hashed by the service before storage.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Requested role.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Token plus the user it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

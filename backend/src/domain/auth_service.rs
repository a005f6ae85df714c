//! Signup, login and current-user lookups.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, TokenError, TokenService, UserRepository, constraint,
};
use crate::domain::{
    AuthPayload, CallerIdentity, Error, Identity, LoginCredentials, NewUser, SignupRequest, User,
    UserId,
};

const DUPLICATE_EMAIL: &str = "a user with this email already exists";
const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account use-cases backed by the user repository and credential adapters.
pub struct AuthService<U: ?Sized, H: ?Sized, T: ?Sized> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U: ?Sized, H: ?Sized, T: ?Sized> Clone for AuthService<U, H, T> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            hasher: Arc::clone(&self.hasher),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<U, H, T> AuthService<U, H, T>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenService + ?Sized,
{
    /// Create a new service with the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(error.to_string())
    }

    fn map_token_error(error: TokenError) -> Error {
        Error::internal(error.to_string())
    }

    fn payload_for(&self, user: User) -> Result<AuthPayload, Error> {
        let token = self
            .tokens
            .issue(&Identity::of(&user))
            .map_err(Self::map_token_error)?;
        Ok(AuthPayload { token, user })
    }

    /// Register a new account and return a token for it.
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthPayload, Error> {
        if self.users.find_by_email(request.email()).await?.is_some() {
            return Err(Error::conflict(DUPLICATE_EMAIL));
        }

        let password_hash = self
            .hasher
            .hash(request.password())
            .await
            .map_err(Self::map_hash_error)?;
        let user = NewUser {
            name: request.name().to_owned(),
            email: request.email().clone(),
            password_hash,
            role: request.role(),
        }
        .into_user(Utc::now());

        self.users.insert(&user).await.map_err(|err| match err {
            err if err.violates(constraint::USERS_EMAIL_KEY) => Error::conflict(DUPLICATE_EMAIL),
            other => other.into(),
        })?;
        info!(user_id = %user.id, role = %user.role, "user signed up");
        self.payload_for(user)
    }

    /// Exchange credentials for a token.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<AuthPayload, Error> {
        let Some(user) = self.users.find_by_email(credentials.email()).await? else {
            debug!("login for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(Self::map_hash_error)?;
        if !matches {
            debug!(user_id = %user.id, "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        info!(user_id = %user.id, "user logged in");
        self.payload_for(user)
    }

    /// The caller's account, or `None` when anonymous.
    pub async fn me(&self, caller: &CallerIdentity) -> Result<Option<User>, Error> {
        match caller {
            Ok(identity) => self.user(&identity.user_id).await,
            Err(_) => Ok(None),
        }
    }

    /// Look up any user by id.
    pub async fn user(&self, id: &UserId) -> Result<Option<User>, Error> {
        Ok(self.users.find_by_id(id).await?)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;

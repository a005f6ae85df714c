//! `TokenService` issuing HS256 JSON Web Tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{Identity, Role, UserId};

/// Token lifetime used when none is configured.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Signs identities with a shared secret.
///
/// Tokens carry the user id in `sub` plus the role, and expire after the
/// configured lifetime. Verification rejects any algorithm other than HS256.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokenService {
    /// HS256 tokens signed with `secret`, valid for `ttl`.
    pub fn new(secret: &Zeroizing<String>, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Service with the default seven-day lifetime.
    pub fn with_default_ttl(secret: &Zeroizing<String>) -> Self {
        Self::new(secret, Duration::days(DEFAULT_TOKEN_TTL_DAYS))
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.user_id.to_string(),
            role: identity.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::issue(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        let user_id = UserId::parse(&data.claims.sub)
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        Ok(Identity {
            user_id,
            role: data.claims.role,
        })
    }
}

//! Port for issuing and verifying bearer tokens.
use crate::domain::Identity;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token could not be signed.
        Issue { message: String } => "token could not be issued: {message}",
        /// The token is expired, malformed or carries a bad signature.
        Invalid { message: String } => "token rejected: {message}",
    }
}

/// Signs identities into bearer tokens and verifies them back.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, identity: &Identity) -> Result<String, TokenError>;

    fn verify(&self, token: &str) -> Result<Identity, TokenError>;
}

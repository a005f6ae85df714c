//! `PasswordHasher` backed by bcrypt.
//!
//! Hashing is CPU bound, so both operations run on Tokio's blocking pool to
//! keep the Actix workers responsive.

use async_trait::async_trait;
use tokio::task;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Work factor used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// Bcrypt hasher with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl BcryptPasswordHasher {
    /// Create a hasher, clamping `cost` to the range bcrypt accepts.
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    /// Effective work factor after clamping.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

fn join_failure(err: task::JoinError) -> PasswordHashError {
    PasswordHashError::hash(format!("hashing task failed: {err}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let cost = self.cost;
        task::spawn_blocking(move || bcrypt::hash(password.as_bytes(), cost))
            .await
            .map_err(join_failure)?
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        let outcome = task::spawn_blocking(move || bcrypt::verify(password.as_bytes(), &hash))
            .await
            .map_err(join_failure)?;
        outcome.map_err(|err| {
            debug!(error = %err, "stored password hash rejected");
            PasswordHashError::hash(err.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fast() -> BcryptPasswordHasher {
        BcryptPasswordHasher::new(MIN_COST)
    }

    #[tokio::test]
    async fn verifies_the_hashed_password_only() {
        let hasher = fast();
        let hash = hasher.hash("correct horse").await.expect("hash");

        assert_ne!(hash, "correct horse");
        assert!(hasher.verify("correct horse", &hash).await.expect("verify"));
        assert!(!hasher.verify("wrong horse", &hash).await.expect("verify"));
    }

    #[tokio::test]
    async fn corrupt_hashes_are_adapter_errors() {
        let err = fast()
            .verify("anything", "not-a-bcrypt-hash")
            .await
            .expect_err("corrupt hash");
        assert!(matches!(err, PasswordHashError::Hash { .. }));
    }

    #[rstest]
    #[case(0, MIN_COST)]
    #[case(10, 10)]
    #[case(99, MAX_COST)]
    fn cost_is_clamped(#[case] requested: u32, #[case] expected: u32) {
        assert_eq!(BcryptPasswordHasher::new(requested).cost(), expected);
    }
}

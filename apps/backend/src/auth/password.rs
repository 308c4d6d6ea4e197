//! Argon2id password hashing.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use std::sync::Arc;

use argon2::{Algorithm, Argon2, Params, Version};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::errors::domain::{DomainError, InfraErrorKind};

const DECOY_PASSWORD: &str = "decoy-password-never-issued";

/// Salted, memory-hard one-way hashing of user passwords.
///
/// Output is a self-describing PHC string (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`),
/// so hashes produced under older cost parameters keep verifying after the
/// defaults change.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
    /// Hash of [`DECOY_PASSWORD`] under `params`, built on first use
    decoy: Arc<OnceCell<String>>,
}

impl CredentialHasher {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            decoy: Arc::new(OnceCell::new()),
        }
    }

    /// Minimal cost parameters. Only for tests, where hashing speed matters.
    pub fn for_tests() -> Self {
        match Params::new(Params::MIN_M_COST, 1, 1, None) {
            Ok(params) => Self::new(params),
            Err(_) => Self::default(),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes `password` under a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| {
                DomainError::infra(InfraErrorKind::Crypto, format!("password hashing failed: {e}"))
            })
    }

    /// `true` only when `password` matches `stored`. A malformed hash verifies as `false`.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, "stored password hash is not a PHC string");
                return false;
            }
        };
        // parameters come from the PHC string, not from self
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Full-cost verification against a throwaway hash, for logins whose
    /// username matched nothing. Always `false`.
    pub fn verify_decoy(&self, password: &str) -> bool {
        match self.decoy.get_or_try_init(|| self.hash(DECOY_PASSWORD)) {
            Ok(decoy) => {
                self.verify(password, decoy);
                false
            }
            Err(e) => {
                debug!(error = %e, "decoy hash unavailable");
                false
            }
        }
    }
}

impl Default for CredentialHasher {
    /// m=19456 KiB, t=2, p=1.
    fn default() -> Self {
        Self::new(Params::default())
    }
}

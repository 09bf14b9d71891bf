//! Password hashing using Argon2.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2, Params,
};
use messenger_config::SecurityConfig;
use messenger_core::{MessengerError, MessengerResult};
use std::sync::Arc;
use tracing::debug;

/// Hashes and verifies passwords.
pub trait PasswordHasherInterface: Send + Sync {
    /// Hashes a password into a PHC string.
    fn hash(&self, password: &str) -> MessengerResult<String>;

    /// Verifies a password against a PHC string.
    fn verify(&self, password: &str, hash: &str) -> MessengerResult<bool>;
}

/// Argon2id password hasher.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Arc<Argon2<'static>>,
}

impl PasswordHasher {
    /// Creates a new password hasher with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    /// Creates a new password hasher with custom parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        Self {
            argon2: Arc::new(argon2),
        }
    }

    /// Creates a password hasher from a memory cost in MiB.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        let params = Params::new(cost * 1024, 2, 1, None).unwrap_or(Params::DEFAULT);
        Self::with_params(params)
    }

    /// Creates a password hasher from configuration.
    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::with_cost(config.password_hash_cost)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherInterface for PasswordHasher {
    fn hash(&self, password: &str) -> MessengerResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| MessengerError::Internal(format!("Failed to hash password: {}", e)))?;

        debug!("Password hashed successfully");
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> MessengerResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| MessengerError::Internal(format!("Invalid password hash format: {}", e)))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: incorrect password");
                Ok(false)
            }
            Err(e) => Err(MessengerError::Internal(format!(
                "Password verification error: {}",
                e
            ))),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

//! Password hashing and verification with Argon2id

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use std::sync::Arc;

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            memory_kib: 19_456, // 19 MiB
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl PasswordParams {
    /// Create PasswordParams from environment variables
    ///
    /// # Environment Variables
    /// - `PASSWORD_HASH_MEMORY_KIB`: Memory cost (default: 19456)
    /// - `PASSWORD_HASH_ITERATIONS`: Time cost (default: 2)
    /// - `PASSWORD_HASH_PARALLELISM`: Lanes (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |key: &str, default: u32| {
            std::env::var(key)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        };

        Self {
            memory_kib: read("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib),
            iterations: read("PASSWORD_HASH_ITERATIONS", defaults.iterations),
            parallelism: read("PASSWORD_HASH_PARALLELISM", defaults.parallelism),
        }
    }
}

/// Salted password hashing
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    /// Hash of a random throwaway secret, checked when a login names an
    /// unknown account so both paths cost one verification.
    decoy_hash: Arc<str>,
}

impl PasswordService {
    /// Build a hasher with the given cost parameters
    pub fn new(params: PasswordParams) -> Result<Self> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid password hash parameters: {}", e))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy_secret = uuid::Uuid::new_v4().to_string();
        let decoy_hash = hash_with(&argon2, &decoy_secret)?;

        Ok(Self {
            argon2,
            decoy_hash: decoy_hash.into(),
        })
    }

    /// Hash a password with a fresh salt
    pub fn hash(&self, password: &str) -> Result<String> {
        hash_with(&self.argon2, password)
    }

    /// Check a password against a stored hash
    ///
    /// The cost parameters are taken from the stored hash, so hashes made
    /// under older settings keep verifying.
    pub fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Burn one verification against the decoy hash
    pub fn verify_decoy(&self, password: &str) {
        let _ = self.verify(password, &self.decoy_hash);
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

#[cfg(test)]
pub(crate) fn test_params() -> PasswordParams {
    PasswordParams {
        memory_kib: 256,
        iterations: 1,
        parallelism: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn hash_and_verify() {
        let passwords = PasswordService::new(test_params()).unwrap();
        let hash = passwords.hash("secret1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("secret1"));
        assert!(passwords.verify("secret1", &hash).unwrap());
        assert!(!passwords.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        let passwords = PasswordService::new(test_params()).unwrap();
        let first = passwords.hash("secret1").unwrap();
        let second = passwords.hash("secret1").unwrap();

        assert_ne!(first, second);
        assert!(passwords.verify("secret1", &first).unwrap());
        assert!(passwords.verify("secret1", &second).unwrap());
    }

    #[test]
    fn hashes_from_other_params_still_verify() {
        let cheap = PasswordService::new(test_params()).unwrap();
        let other = PasswordService::new(PasswordParams {
            memory_kib: 512,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();

        let hash = cheap.hash("secret1").unwrap();
        assert!(other.verify("secret1", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let passwords = PasswordService::new(test_params()).unwrap();
        assert!(passwords.verify("secret1", "not-a-hash").is_err());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let result = PasswordService::new(PasswordParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn params_from_env() {
        unsafe {
            std::env::set_var("PASSWORD_HASH_ITERATIONS", "4");
            std::env::set_var("PASSWORD_HASH_MEMORY_KIB", "bogus");
        }

        let params = PasswordParams::from_env();
        assert_eq!(params.iterations, 4);
        assert_eq!(params.memory_kib, PasswordParams::default().memory_kib);

        unsafe {
            std::env::remove_var("PASSWORD_HASH_ITERATIONS");
            std::env::remove_var("PASSWORD_HASH_MEMORY_KIB");
        }
    }
}

//! Password hashing using Argon2id.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...`), which embed the
//! salt and cost parameters, so verification never needs side-channel state.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    /// Memory in KiB (default: 19456 = 19 MiB).
    pub memory_kib: u32,
    /// Time iterations (default: 2).
    pub iterations: u32,
    /// Parallelism degree (default: 1).
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HashParams {
    /// Minimal-cost parameters for tests and seeding in CI.
    pub fn fast_insecure() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Salted one-way password hasher.
///
/// Hashing is CPU-bound; async callers should run it on a blocking thread.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher").finish_non_exhaustive()
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        // Argon2id v19, m=19456 t=2 p=1; matches HashParams::default().
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Argon2Hasher {
    pub fn with_params(params: HashParams) -> CryptoResult<Self> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|e| CryptoError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, password: &str) -> CryptoResult<String> {
        let mut salt_bytes = Zeroizing::new([0u8; SALT_LENGTH]);
        rand::thread_rng().fill_bytes(&mut *salt_bytes);
        let salt = SaltString::encode_b64(&*salt_bytes)
            .map_err(|e| CryptoError::Hash(e.to_string()))?;

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CryptoError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored PHC hash.
    ///
    /// A wrong password is `Ok(false)`; only a malformed hash is an error.
    pub fn verify(&self, password: &str, stored_hash: &str) -> CryptoResult<bool> {
        let parsed =
            PasswordHash::new(stored_hash).map_err(|e| CryptoError::MalformedHash(e.to_string()))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(HashParams::fast_insecure()).unwrap()
    }

    #[test]
    fn test_hash_params_default() {
        let params = HashParams::default();
        assert_eq!(params.memory_kib, 19456);
        assert_eq!(params.iterations, 2);
        assert_eq!(params.parallelism, 1);
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = hasher().hash("password").unwrap();
        assert_ne!(hash, "password");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_hash_is_salted() {
        let h = hasher();
        let a = h.hash("password").unwrap();
        let b = h.hash("password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_correct_and_wrong_password() {
        let h = hasher();
        let hash = h.hash("correct horse").unwrap();
        assert!(h.verify("correct horse", &hash).unwrap());
        assert!(!h.verify("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_verify_uses_params_embedded_in_hash() {
        let hash = hasher().hash("password").unwrap();
        // A hasher with different costs still verifies older hashes.
        assert!(Argon2Hasher::default().verify("password", &hash).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash() {
        let result = hasher().verify("password", "password");
        assert!(matches!(result, Err(CryptoError::MalformedHash(_))));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = HashParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(matches!(
            Argon2Hasher::with_params(params),
            Err(CryptoError::InvalidParams(_))
        ));
    }
}

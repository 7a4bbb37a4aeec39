// ============================
// hwcatalog-backend-lib/src/auth/password.rs
// ============================
//! Credential hashing and password policy.
use scrypt::{errors::InvalidParams, Params};
use serde::{Deserialize, Serialize};

/// Raw digest length in bytes (hex output is twice as long)
pub const DIGEST_LEN: usize = 32;

/// Deterministic scrypt digest of credential material.
///
/// The password is the scrypt password input and the username is the salt,
/// so material is always taken password-then-username. The same inputs give
/// the same lowercase hex string for the lifetime of the cost parameters.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self, InvalidParams> {
        Ok(Self {
            params: Params::new(log_n, r, p, DIGEST_LEN)?,
        })
    }

    /// Digest `password` salted with `username`
    pub fn digest(&self, password: &str, username: &str) -> String {
        let mut output = [0u8; DIGEST_LEN];
        scrypt::scrypt(
            password.as_bytes(),
            username.as_bytes(),
            &self.params,
            &mut output,
        )
        .expect("DIGEST_LEN is a valid scrypt output length");
        hex::encode(output)
    }

    /// Recompute the digest and compare it with a stored one
    pub fn verify(&self, password: &str, username: &str, stored_digest: &str) -> bool {
        self.digest(password, username) == stored_digest
    }
}

/// Password complexity requirements applied at registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordRequirements {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: 1,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_special: false,
        }
    }
}

/// Check if a password meets the complexity requirements
pub fn validate_password_strength(password: &str, requirements: &PasswordRequirements) -> bool {
    if password.chars().count() < requirements.min_length {
        return false;
    }

    if requirements.require_uppercase && !password.chars().any(char::is_uppercase) {
        return false;
    }

    if requirements.require_lowercase && !password.chars().any(char::is_lowercase) {
        return false;
    }

    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    if requirements.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        return false;
    }

    true
}

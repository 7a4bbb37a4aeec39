// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Deterministic bearer token issuance.
//!
//! A token is the credential digest of the account's stored digest salted
//! with its username. Logging in again with unchanged credentials yields the
//! same token, so a single token cannot be revoked without changing the
//! password.
use super::password::CredentialHasher;
use super::session::IdentityTable;
use crate::storage::Account;

/// Derive the token for `account` without registering it
pub fn derive_token(hasher: &CredentialHasher, account: &Account) -> String {
    hasher.digest(&account.password_digest, &account.username)
}

/// Issues tokens and records them in the identity table
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    hasher: CredentialHasher,
    identities: IdentityTable,
}

impl TokenIssuer {
    pub fn new(hasher: CredentialHasher, identities: IdentityTable) -> Self {
        Self { hasher, identities }
    }

    pub fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    pub fn identities(&self) -> &IdentityTable {
        &self.identities
    }

    /// Derive and register the token for `account`. CPU bound.
    pub fn issue(&self, account: &Account) -> String {
        let token = derive_token(&self.hasher, account);
        self.identities.insert(token.clone(), account.clone());
        token
    }

    pub fn resolve(&self, token: &str) -> Option<Account> {
        self.identities.resolve(token)
    }
}

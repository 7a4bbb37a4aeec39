// ============================
// hwcatalog-backend-lib/src/auth/session.rs
// ============================
//! In-process identity table: bearer token to account.
//!
//! The table is owned by the application state and lives exactly as long as
//! the server does. Nothing is persisted, so every token becomes unknown
//! after a restart.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use metrics::gauge;

use crate::storage::Account;
use crate::telemetry::IDENTITY_ACTIVE;

/// An issued token and the account captured when it was issued
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
    /// First issuance in this process lifetime
    pub issued_at: DateTime<Utc>,
    /// Number of logins that produced this token
    pub issue_count: u64,
}

/// Concurrent token to identity map shared by every handler
#[derive(Debug, Clone, Default)]
pub struct IdentityTable {
    sessions: Arc<DashMap<String, Session>>,
}

impl IdentityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token` for `account`; re-registering the same token only bumps its count
    pub fn insert(&self, token: String, account: Account) {
        self.sessions
            .entry(token)
            .and_modify(|session| {
                session.account = account.clone();
                session.issue_count += 1;
            })
            .or_insert_with(|| Session {
                account,
                issued_at: Utc::now(),
                issue_count: 1,
            });

        gauge!(IDENTITY_ACTIVE).set(self.sessions.len() as f64);
    }

    /// Look up the account a token was issued to
    pub fn resolve(&self, token: &str) -> Option<Account> {
        self.sessions
            .get(token)
            .map(|session| session.account.clone())
    }

    pub fn session(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|session| session.value().clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Forget every token, returning how many were dropped
    pub fn clear(&self) -> usize {
        let dropped = self.sessions.len();
        self.sessions.clear();
        gauge!(IDENTITY_ACTIVE).set(0.0);
        dropped
    }
}

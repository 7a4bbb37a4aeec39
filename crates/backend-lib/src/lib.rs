// ============================
// hwcatalog-backend-lib/src/lib.rs
// ============================
//! Core functionality for the hardware catalog HTTP service.

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod telemetry;
pub mod validation;

use std::sync::Arc;

use tracing::info;

use crate::auth::{AuthService, DefaultAuth, IdentityTable, TokenIssuer};
use crate::config::Settings;
use crate::events::EventPublisher;
use crate::storage::Storage;

pub use crate::router::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Registration, login and token resolution
    pub auth: Arc<dyn AuthService>,
    /// Tokens issued during this process lifetime
    pub identities: IdentityTable,
    pub settings: Arc<Settings>,
    /// Storage backend
    pub storage: S,
    /// Outbound notifications
    pub events: Arc<dyn EventPublisher>,
}

impl<S: Storage> AppState<S> {
    /// Wire the services together around `storage`
    pub fn new(
        storage: S,
        settings: Settings,
        events: Arc<dyn EventPublisher>,
    ) -> anyhow::Result<Self> {
        let hasher = settings.hashing.hasher()?;
        let identities = IdentityTable::new();
        let issuer = TokenIssuer::new(hasher, identities.clone());
        let auth = Arc::new(DefaultAuth::new(
            Arc::new(storage.clone()),
            issuer,
            settings.password_requirements.clone(),
            Arc::clone(&events),
        ));

        Ok(Self {
            auth,
            identities,
            settings: Arc::new(settings),
            storage,
            events,
        })
    }

    /// Drop every issued token. Called once the server stops accepting requests.
    pub fn shutdown(&self) {
        let dropped = self.identities.clear();
        info!(dropped, "identity table cleared");
    }
}

// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! Storage abstraction for accounts and catalog records.
use async_trait::async_trait;
use hwcatalog_common::{Display, Monitor, MonitorRecord, RecordId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod catalog;
mod flat_file;
mod memory;

pub use flat_file::FlatFileStorage;
pub use memory::MemoryStorage;

/// A registered account as persisted by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: RecordId,
    pub username: String,
    /// Hex digest of password and username, never the password itself
    pub password_digest: String,
    pub email: String,
    pub is_admin: bool,
}

/// An account about to be inserted; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub password_digest: String,
    pub email: String,
    pub is_admin: bool,
}

/// Failures reported by a store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("username {0} already exists")]
    Duplicate(String),

    #[error("display {0} does not exist")]
    UnknownDisplay(RecordId),

    #[error("no identifiers left in the {0} table")]
    IdsExhausted(&'static str),

    #[error("monitor {monitor} references missing display {display}")]
    BrokenReference { monitor: RecordId, display: RecordId },
}

/// Account persistence used by registration, login and the gate
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, StorageError>;

    /// Insert a new account. Fails with `Duplicate` if the username is taken.
    async fn insert_account(&self, account: NewAccount) -> Result<Account, StorageError>;
}

/// Display and monitor persistence
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_display(&self, display: Display) -> Result<RecordId, StorageError>;

    /// Insert a monitor. Fails with `UnknownDisplay` if the reference does not resolve.
    async fn insert_monitor(&self, monitor: Monitor) -> Result<RecordId, StorageError>;

    /// Every monitor joined with its display, in insertion order
    async fn list_monitors_joined(&self) -> Result<Vec<MonitorRecord>, StorageError>;

    async fn get_monitor_joined(&self, id: RecordId)
        -> Result<Option<MonitorRecord>, StorageError>;
}

/// A backend usable as application storage
pub trait Storage: AccountStore + RecordStore + Clone + 'static {}

impl<T> Storage for T where T: AccountStore + RecordStore + Clone + 'static {}

//! In-memory storage for ephemeral deployments and tests.
use std::sync::Arc;

use async_trait::async_trait;
use hwcatalog_common::{Display, Monitor, MonitorRecord, RecordId};
use tokio::sync::RwLock;

use super::catalog::Catalog;
use super::{Account, AccountStore, NewAccount, RecordStore, StorageError};

#[derive(Clone, Default)]
pub struct MemoryStorage {
    catalog: Arc<RwLock<Catalog>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStorage {
    async fn find_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, StorageError> {
        Ok(self.catalog.read().await.find_account(username))
    }

    async fn insert_account(&self, account: NewAccount) -> Result<Account, StorageError> {
        self.catalog.write().await.insert_account(account)
    }
}

#[async_trait]
impl RecordStore for MemoryStorage {
    async fn insert_display(&self, display: Display) -> Result<RecordId, StorageError> {
        self.catalog.write().await.insert_display(display)
    }

    async fn insert_monitor(&self, monitor: Monitor) -> Result<RecordId, StorageError> {
        self.catalog.write().await.insert_monitor(monitor)
    }

    async fn list_monitors_joined(&self) -> Result<Vec<MonitorRecord>, StorageError> {
        self.catalog.read().await.list_monitors_joined()
    }

    async fn get_monitor_joined(
        &self,
        id: RecordId,
    ) -> Result<Option<MonitorRecord>, StorageError> {
        self.catalog.read().await.get_monitor_joined(id)
    }
}

// ============================
// crates/backend-lib/src/storage/flat_file.rs
// ============================
//! JSON flat-file implementation of the storage traits.
//!
//! Each table lives in its own document under the data directory and is
//! rewritten whole (temp file + rename) after every insert.
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use hwcatalog_common::{Display, Monitor, MonitorRecord, RecordId};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs as tokio_fs, sync::Mutex};

use super::catalog::Catalog;
use super::{Account, AccountStore, NewAccount, RecordStore, StorageError};

const ACCOUNTS_FILE: &str = "accounts.json";
const DISPLAYS_FILE: &str = "displays.json";
const MONITORS_FILE: &str = "monitors.json";

/// Flat-file store rooted at a data directory
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
    catalog: Arc<Mutex<Catalog>>,
}

impl FlatFileStorage {
    /// Open (or create) the store at `root`, loading any existing tables.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let catalog = Catalog {
            accounts: load_table(&root.join(ACCOUNTS_FILE))?,
            displays: load_table(&root.join(DISPLAYS_FILE))?,
            monitors: load_table(&root.join(MONITORS_FILE))?,
        };
        tracing::debug!(
            root = %root.display(),
            accounts = catalog.accounts.len(),
            displays = catalog.displays.len(),
            monitors = catalog.monitors.len(),
            "flat-file storage opened"
        );

        Ok(Self {
            root,
            catalog: Arc::new(Mutex::new(catalog)),
        })
    }

    async fn persist<T: Serialize>(&self, file: &str, rows: &[T]) -> Result<(), StorageError> {
        let path = self.root.join(file);
        let tmp = path.with_extension("json.tmp");

        let json = serde_json::to_vec_pretty(rows)?;
        tokio_fs::write(&tmp, json).await?;
        if let Err(err) = tokio_fs::rename(&tmp, &path).await {
            // best effort; the rename error is the one worth reporting
            let _ = tokio_fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        Ok(())
    }
}

fn load_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

#[async_trait]
impl AccountStore for FlatFileStorage {
    async fn find_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, StorageError> {
        Ok(self.catalog.lock().await.find_account(username))
    }

    async fn insert_account(&self, account: NewAccount) -> Result<Account, StorageError> {
        let mut catalog = self.catalog.lock().await;
        let created = catalog.insert_account(account)?;

        if let Err(err) = self.persist(ACCOUNTS_FILE, &catalog.accounts).await {
            catalog.accounts.pop();
            return Err(err);
        }
        Ok(created)
    }
}

#[async_trait]
impl RecordStore for FlatFileStorage {
    async fn insert_display(&self, display: Display) -> Result<RecordId, StorageError> {
        let mut catalog = self.catalog.lock().await;
        let id = catalog.insert_display(display)?;

        if let Err(err) = self.persist(DISPLAYS_FILE, &catalog.displays).await {
            catalog.displays.pop();
            return Err(err);
        }
        Ok(id)
    }

    async fn insert_monitor(&self, monitor: Monitor) -> Result<RecordId, StorageError> {
        let mut catalog = self.catalog.lock().await;
        let id = catalog.insert_monitor(monitor)?;

        if let Err(err) = self.persist(MONITORS_FILE, &catalog.monitors).await {
            catalog.monitors.pop();
            return Err(err);
        }
        Ok(id)
    }

    async fn list_monitors_joined(&self) -> Result<Vec<MonitorRecord>, StorageError> {
        self.catalog.lock().await.list_monitors_joined()
    }

    async fn get_monitor_joined(
        &self,
        id: RecordId,
    ) -> Result<Option<MonitorRecord>, StorageError> {
        self.catalog.lock().await.get_monitor_joined(id)
    }
}

//! Table semantics shared by the storage backends.
use hwcatalog_common::{Display, DisplayRecord, Monitor, MonitorRecord, RecordId};
use serde::{Deserialize, Serialize};

use super::{Account, NewAccount, StorageError};

/// Monitor row as stored: the display is kept by reference only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct MonitorRow {
    pub id: RecordId,
    pub voltage: f64,
    pub gsync_prem: bool,
    pub curved: bool,
    pub type_display_id: RecordId,
}

#[derive(Debug, Default)]
pub(crate) struct Catalog {
    pub accounts: Vec<Account>,
    pub displays: Vec<DisplayRecord>,
    pub monitors: Vec<MonitorRow>,
}

fn next_id(
    table: &'static str,
    ids: impl Iterator<Item = RecordId>,
) -> Result<RecordId, StorageError> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or(StorageError::IdsExhausted(table))
}

impl Catalog {
    pub fn find_account(&self, username: &str) -> Option<Account> {
        self.accounts
            .iter()
            .find(|account| account.username == username)
            .cloned()
    }

    pub fn insert_account(&mut self, new: NewAccount) -> Result<Account, StorageError> {
        if self.accounts.iter().any(|a| a.username == new.username) {
            return Err(StorageError::Duplicate(new.username));
        }

        let account = Account {
            id: next_id("accounts", self.accounts.iter().map(|a| a.id))?,
            username: new.username,
            password_digest: new.password_digest,
            email: new.email,
            is_admin: new.is_admin,
        };
        self.accounts.push(account.clone());
        Ok(account)
    }

    pub fn insert_display(&mut self, display: Display) -> Result<RecordId, StorageError> {
        let id = next_id("displays", self.displays.iter().map(|d| d.id))?;
        self.displays.push(DisplayRecord { id, display });
        Ok(id)
    }

    pub fn insert_monitor(&mut self, monitor: Monitor) -> Result<RecordId, StorageError> {
        if !self.displays.iter().any(|d| d.id == monitor.type_display_id) {
            return Err(StorageError::UnknownDisplay(monitor.type_display_id));
        }

        let id = next_id("monitors", self.monitors.iter().map(|m| m.id))?;
        self.monitors.push(MonitorRow {
            id,
            voltage: monitor.voltage,
            gsync_prem: monitor.gsync_prem,
            curved: monitor.curved,
            type_display_id: monitor.type_display_id,
        });
        Ok(id)
    }

    pub fn list_monitors_joined(&self) -> Result<Vec<MonitorRecord>, StorageError> {
        self.monitors.iter().map(|row| self.join(row)).collect()
    }

    pub fn get_monitor_joined(&self, id: RecordId) -> Result<Option<MonitorRecord>, StorageError> {
        self.monitors
            .iter()
            .find(|row| row.id == id)
            .map(|row| self.join(row))
            .transpose()
    }

    fn join(&self, row: &MonitorRow) -> Result<MonitorRecord, StorageError> {
        let display = self
            .displays
            .iter()
            .find(|d| d.id == row.type_display_id)
            .ok_or(StorageError::BrokenReference {
                monitor: row.id,
                display: row.type_display_id,
            })?;

        Ok(MonitorRecord {
            id: row.id,
            voltage: row.voltage,
            display: display.clone(),
            gsync_prem: row.gsync_prem,
            curved: row.curved,
            type_display_id: row.type_display_id,
        })
    }
}

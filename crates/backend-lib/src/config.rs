// ============================
// hwcatalog-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::{CredentialHasher, PasswordRequirements};

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "hwcatalog.toml";
/// Prefix for environment overrides; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "HWCATALOG_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory for the flat-file store
    pub data_dir: PathBuf,
    /// Which store backs accounts and records
    pub storage: StorageKind,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
    /// Credential digest cost
    pub hashing: HashingSettings,
    /// Password complexity requirements
    pub password_requirements: PasswordRequirements,
    /// Event fan-out
    pub events: EventSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    File,
    Memory,
}

/// scrypt cost parameters; defaults are scrypt's recommended values.
///
/// Every stored digest depends on these values: changing them makes existing
/// accounts unable to log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingSettings {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    /// Broadcast channel capacity
    pub capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_dir: PathBuf::from("data"),
            storage: StorageKind::File,
            log_level: "info".to_string(),
            log_json: false,
            hashing: HashingSettings::default(),
            password_requirements: PasswordRequirements::default(),
            events: EventSettings::default(),
        }
    }
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            log_n: 17,
            r: 8,
            p: 1,
        }
    }
}

impl Default for EventSettings {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl HashingSettings {
    pub fn hasher(&self) -> Result<CredentialHasher> {
        if self.p == 0 {
            bail!("hashing.p must be at least 1");
        }
        CredentialHasher::new(self.log_n, self.r, self.p)
            .map_err(|_| anyhow::anyhow!("invalid scrypt parameters: {self:?}"))
    }
}

impl Settings {
    /// Layered sources: defaults, then the TOML file, then `HWCATALOG_*` variables
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate settings
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings: Settings = Self::figment(path).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!(
                "log_level must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.log_level
            );
        }

        self.hashing.hasher()?;

        if self.password_requirements.min_length == 0 {
            bail!("password_requirements.min_length must be at least 1");
        }

        if self.events.capacity == 0 {
            bail!("events.capacity must be at least 1");
        }

        Ok(())
    }
}

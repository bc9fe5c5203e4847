//! Configuration management with file persistence

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Leasehold configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseSettings,
    pub lease: LeaseSettings,
}

/// Location of the lock database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

/// Lease lifetime values consumed by the expiry sweeper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseSettings {
    /// Age in seconds beyond which an unrenewed lease is sweep-eligible
    pub ttl_secs: u64,
    /// Cadence in seconds of the background reclaim pass
    pub sweep_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseSettings {
                path: crate::storage::default_database_path(),
            },
            lease: LeaseSettings {
                ttl_secs: 30,
                sweep_interval_secs: 5,
            },
        }
    }
}

impl LeaseSettings {
    /// Lease TTL as a std Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Sweep cadence as a std Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Config {
    /// Get the configuration directory
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("leasehold");
        Ok(dir)
    }

    /// Get the configuration file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk, falling back to defaults when no file
    /// has been written yet
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        let path = Self::config_path()?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

//! Configuration for devstore
//!
//! Centralized configuration with sensible defaults.

use std::ffi::OsString;
use std::path::PathBuf;

/// Main configuration for a device store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// The record file. Concatenation of fixed-size blocks, no header.
    pub store_path: PathBuf,

    /// Rewrite target used by remove. `None` means `{store_path}.tmp`.
    /// Must live on the same filesystem as the store for the rename to be atomic.
    pub temp_path: Option<PathBuf>,

    /// Sync strategy: when to fsync written blocks
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Policy Configuration
    // -------------------------------------------------------------------------
    /// Accept `Field::Serial` as a removal criterion
    pub allow_serial_removal: bool,
}

/// Write sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every appended block and before every rename (safest)
    EveryWrite,

    /// flush buffers on close, leave syncing to the OS
    OnClose,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("devices.dat"),
            temp_path: None,
            sync_strategy: SyncStrategy::EveryWrite,
            allow_serial_removal: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Effective path of the rewrite file
    pub fn temp_path(&self) -> PathBuf {
        match &self.temp_path {
            Some(path) => path.clone(),
            None => {
                let mut name = OsString::from(self.store_path.as_os_str());
                name.push(".tmp");
                PathBuf::from(name)
            }
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store file path
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store_path = path.into();
        self
    }

    /// Override the rewrite file path
    pub fn temp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.temp_path = Some(path.into());
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Allow or forbid removal by serial number
    pub fn allow_serial_removal(mut self, allow: bool) -> Self {
        self.config.allow_serial_removal = allow;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

//! Configuration for itemstore
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// Main configuration for an itemstore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Snapshot file holding the full record set after the last compaction
    pub data_path: PathBuf,

    /// Operation log holding mutations since the last compaction
    pub log_path: PathBuf,

    // -------------------------------------------------------------------------
    // Operation Log Configuration
    // -------------------------------------------------------------------------
    /// Number of pending operations that forces a compaction
    pub log_threshold: usize,

    /// Sync strategy: how often to fsync the operation log
    pub log_sync_strategy: LogSyncStrategy,

    // -------------------------------------------------------------------------
    // Cache Configuration
    // -------------------------------------------------------------------------
    /// Max number of records held by the read cache
    pub cache_capacity: usize,
}

/// Operation log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSyncStrategy {
    /// fsync after every append (safest, slowest)
    EveryWrite,

    /// fsync after N appended operations (balanced durability/performance)
    EveryNEntries { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        let dir = PathBuf::from("./itemstore_data");
        Self {
            data_path: dir.join(Self::DATA_FILENAME),
            log_path: dir.join(Self::LOG_FILENAME),
            log_threshold: 50,
            log_sync_strategy: LogSyncStrategy::EveryWrite,
            cache_capacity: 10,
        }
    }
}

impl Config {
    const DATA_FILENAME: &'static str = "items.dat";
    const LOG_FILENAME: &'static str = "operations.log";

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default config with both files placed under `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::builder().dir(dir).build()
    }

    /// Reject values the store cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(StoreError::Config(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.log_threshold == 0 {
            return Err(StoreError::Config(
                "log_threshold must be at least 1".to_string(),
            ));
        }
        if let LogSyncStrategy::EveryNEntries { count: 0 } = self.log_sync_strategy {
            return Err(StoreError::Config(
                "log sync interval must be at least 1".to_string(),
            ));
        }
        if self.data_path == self.log_path {
            return Err(StoreError::Config(format!(
                "data and log paths must differ (both {})",
                self.data_path.display()
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Place the snapshot and operation log under one directory
    pub fn dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.config.data_path = dir.join(Config::DATA_FILENAME);
        self.config.log_path = dir.join(Config::LOG_FILENAME);
        self
    }

    /// Set the snapshot file path
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_path = path.into();
        self
    }

    /// Set the operation log file path
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_path = path.into();
        self
    }

    /// Set the number of pending operations that triggers compaction
    pub fn log_threshold(mut self, count: usize) -> Self {
        self.config.log_threshold = count;
        self
    }

    /// Set the operation log sync strategy
    pub fn log_sync_strategy(mut self, strategy: LogSyncStrategy) -> Self {
        self.config.log_sync_strategy = strategy;
        self
    }

    /// Set the read cache capacity (in records)
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

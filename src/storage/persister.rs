//! Persistence layer
//!
//! Composes the snapshot and the operation log.
//!
//! ## Responsibilities
//! - Make mutations durable as cheap log appends
//! - Compact the log onto the snapshot once it reaches the threshold
//! - Serve the full, compacted record set on startup
//!
//! ## Compaction
//! 1. Read the snapshot
//! 2. Read the log and replay it in order
//! 3. Sort by code and rewrite the snapshot
//! 4. Truncate the log
//!
//! The log is only truncated once the new snapshot is in place, so a failed
//! replay or write leaves every pending operation on disk.

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::record::Item;
use crate::wal::{self, Operation, OperationLog};

use super::SnapshotStore;

/// Durable backing for the record set
pub struct Persister {
    /// Full record set as of the last compaction
    snapshot: SnapshotStore,

    /// Operations since the last compaction (open until `close`)
    log: OperationLog,

    /// Pending operations that force a compaction
    threshold: usize,

    closed: bool,
}

impl Persister {
    /// Open the snapshot/log pair named by `config`
    ///
    /// Parent directories are created as needed.
    pub fn open(config: &Config) -> Result<Self> {
        for path in [&config.data_path, &config.log_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        let log = OperationLog::open(&config.log_path, config.log_sync_strategy)?;

        Ok(Self {
            snapshot: SnapshotStore::new(&config.data_path),
            log,
            threshold: config.log_threshold,
            closed: false,
        })
    }

    /// Compact, then return the full record set sorted by code
    pub fn select(&mut self) -> Result<Vec<Item>> {
        self.ensure_open()?;
        let (_, items) = self.compact_inner()?;
        Ok(items)
    }

    /// Log an insert
    pub fn insert(&mut self, item: &Item) -> Result<()> {
        self.write_operation(Operation::Insert(item))
    }

    /// Log an update (whole-record replacement)
    pub fn update(&mut self, item: &Item) -> Result<()> {
        self.write_operation(Operation::Update(item))
    }

    /// Log a delete
    pub fn del(&mut self, code: i64) -> Result<()> {
        self.write_operation(Operation::Delete { code })
    }

    /// Replay the log onto the snapshot
    ///
    /// Returns the number of operations replayed.
    pub fn compact(&mut self) -> Result<usize> {
        self.ensure_open()?;
        let (replayed, _) = self.compact_inner()?;
        Ok(replayed)
    }

    /// Compact and release the log
    ///
    /// Returns `Ok(false)` if already closed.
    pub fn close(&mut self) -> Result<bool> {
        if self.closed {
            return Ok(false);
        }

        self.compact_inner()?;
        self.log.close()?;
        self.closed = true;

        tracing::debug!(log = %self.log.path().display(), "persister closed");
        Ok(true)
    }

    /// Number of operations waiting for compaction
    pub fn pending_operations(&self) -> usize {
        self.log.size()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn data_path(&self) -> &Path {
        self.snapshot.path()
    }

    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Append an operation, compacting once the threshold is reached
    ///
    /// The return value reports the append only. A failed compaction leaves
    /// the operations in the log and is retried on the next trigger.
    fn write_operation(&mut self, operation: Operation<'_>) -> Result<()> {
        self.ensure_open()?;
        self.log.append(&operation)?;

        if self.log.size() >= self.threshold {
            tracing::debug!(
                pending = self.log.size(),
                threshold = self.threshold,
                "log threshold reached, compacting"
            );
            if let Err(e) = self.compact_inner() {
                tracing::warn!(error = %e, "automatic compaction failed");
            }
        }

        Ok(())
    }

    fn compact_inner(&mut self) -> Result<(usize, Vec<Item>)> {
        let mut items = self.snapshot.read()?;
        let lines = self.log.lines()?;

        if lines.iter().all(|line| line.trim().is_empty()) {
            return Ok((0, items));
        }

        let result = wal::replay(&mut items, &lines)?;

        items.sort_by_key(|item| item.code);
        self.snapshot.write(&items)?;
        self.log.clear()?;

        tracing::info!(
            replayed = result.operations_replayed,
            inserted = result.inserted,
            updated = result.updated,
            deleted = result.deleted,
            records = items.len(),
            "compacted operation log"
        );

        Ok((result.operations_replayed, items))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

impl Drop for Persister {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "failed to close persister on drop");
        }
    }
}

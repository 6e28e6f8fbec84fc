//! Operation log file
//!
//! Append-only file of pending mutations since the last compaction.

use std::path::Path;

use crate::config::LogSyncStrategy;
use crate::error::Result;
use crate::record::codec::LogicalLines;
use crate::storage::FileHandle;

use super::entry::{is_marker_line, Operation};

/// Appends operations to, and drains them from, the log file
pub struct OperationLog {
    /// Backing file, open for the log's whole lifetime
    handle: FileHandle,
    /// Number of operation markers currently in the file
    operations: usize,
    /// When to fsync
    sync_strategy: LogSyncStrategy,
    /// Appends since the last fsync
    unsynced: usize,
}

impl OperationLog {
    /// Open or create a log file
    ///
    /// Pending operations left by a previous process are counted so the
    /// compaction threshold carries across restarts.
    pub fn open(path: &Path, sync_strategy: LogSyncStrategy) -> Result<Self> {
        let mut handle = FileHandle::new(path);
        handle.open()?;

        let contents = handle.read_to_string()?;
        let operations = LogicalLines::new(&contents)
            .filter(|line| is_marker_line(line))
            .count();

        if operations > 0 {
            tracing::info!(
                path = %path.display(),
                operations,
                "found pending operations in log"
            );
        }

        Ok(Self {
            handle,
            operations,
            sync_strategy,
            unsynced: 0,
        })
    }

    /// Append one operation
    pub fn append(&mut self, operation: &Operation<'_>) -> Result<()> {
        self.handle.append(&operation.encode())?;
        self.operations += 1;
        self.unsynced += 1;

        let should_sync = match self.sync_strategy {
            LogSyncStrategy::EveryWrite => true,
            LogSyncStrategy::EveryNEntries { count } => self.unsynced >= count,
        };
        if should_sync {
            self.sync()?;
        }

        Ok(())
    }

    /// Remove and return the last line, `None` if the log is empty
    pub fn pop(&mut self) -> Result<Option<String>> {
        let contents = self.handle.read_to_string()?;
        let mut lines: Vec<String> = LogicalLines::new(&contents).collect();

        let last = match lines.pop() {
            Some(last) => last,
            None => return Ok(None),
        };

        let mut rest = String::with_capacity(contents.len());
        for line in &lines {
            rest.push_str(line);
            rest.push('\n');
        }

        self.handle.truncate()?;
        self.handle.append(&rest)?;
        self.sync()?;

        if is_marker_line(&last) {
            self.operations = self.operations.saturating_sub(1);
        }

        Ok(Some(last))
    }

    /// Read every logical line without modifying the file
    pub fn lines(&mut self) -> Result<Vec<String>> {
        let contents = self.handle.read_to_string()?;
        Ok(LogicalLines::new(&contents).collect())
    }

    /// Read every logical line, then empty the file
    pub fn drain(&mut self) -> Result<Vec<String>> {
        let lines = self.lines()?;
        self.clear()?;
        Ok(lines)
    }

    /// Empty the file
    pub fn clear(&mut self) -> Result<()> {
        self.handle.truncate()?;
        self.sync()?;
        self.operations = 0;
        Ok(())
    }

    /// Force appended operations to disk
    pub fn sync(&mut self) -> Result<()> {
        self.handle.sync()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Sync and release the file
    pub fn close(&mut self) -> Result<()> {
        if self.handle.is_open() {
            self.sync()?;
        }
        self.handle.close()
    }

    /// Number of pending operations
    pub fn size(&self) -> usize {
        self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations == 0
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    pub fn path(&self) -> &Path {
        self.handle.path()
    }
}

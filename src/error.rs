//! Error types for itemstore
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for itemstore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File is not open: {}", .0.display())]
    FileClosed(PathBuf),

    #[error("File is already open: {}", .0.display())]
    FileAlreadyOpen(PathBuf),

    #[error("Store is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // On-disk Format Errors
    // -------------------------------------------------------------------------
    #[error("Operation log corruption detected: {0}")]
    LogCorruption(String),

    #[error("Snapshot corruption detected: {0}")]
    SnapshotCorruption(String),

    #[error("Codec error: {0}")]
    Codec(String),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Brand limit exceeded: an item holds at most {max} brands")]
    BrandLimit { max: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Lookup miss by id, name, or fuzzy match
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// A write did not reach the backing file; in-memory state was left untouched
    pub fn is_durability_failure(&self) -> bool {
        matches!(
            self,
            StoreError::Io(_)
                | StoreError::FileClosed(_)
                | StoreError::FileAlreadyOpen(_)
                | StoreError::Closed
        )
    }

    /// Malformed on-disk content found during replay or load
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            StoreError::LogCorruption(_) | StoreError::SnapshotCorruption(_) | StoreError::Codec(_)
        )
    }

    pub(crate) fn record_not_found(code: i64) -> Self {
        StoreError::NotFound(format!("no item with code {}", code))
    }

    pub(crate) fn name_not_found(name: &str) -> Self {
        StoreError::NotFound(format!("no item named {:?}", name))
    }
}

//! Tests for OperationLog
//!
//! These tests verify:
//! - Appending operations and the on-disk line format
//! - Pending operation counting (including across reopen)
//! - pop / lines / drain / clear
//! - Sync strategies

use std::fs;
use std::path::PathBuf;

use itemstore::config::LogSyncStrategy;
use itemstore::wal::{Operation, OperationLog};
use itemstore::{Brand, Item};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_log() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("operations.log");
    (temp_dir, log_path)
}

fn shirt() -> Item {
    Item::new("Shirt", 1001, "Red", 150)
        .with_brand(Brand::new("Cotton Co", 2001, 80, 89.99))
        .unwrap()
        .with_brand(Brand::new("Plain", 2002, 70, 79.5))
        .unwrap()
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_append_format() {
    let (_temp, log_path) = setup_temp_log();
    let mut log = OperationLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();

    let item = shirt();
    log.append(&Operation::Insert(&item)).unwrap();
    log.append(&Operation::Update(&Item::new("Shirt", 1001, "Blue", 0))).unwrap();
    log.append(&Operation::Delete { code: 1001 }).unwrap();

    assert_eq!(
        fs::read_to_string(&log_path).unwrap(),
        "[insert]\n\
         ITEM|Shirt,1001,Red,150\n\
         BRAND|Cotton Co,2001,80,89.99\n\
         BRAND|Plain,2002,70,79.5\n\
         [update]\n\
         ITEM|Shirt,1001,Blue,0\n\
         [delete]1001\n"
    );
    assert_eq!(log.size(), 3);
}

#[test]
fn test_new_log_is_empty() {
    let (_temp, log_path) = setup_temp_log();
    let log = OperationLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();

    assert!(log.is_empty());
    assert!(log.is_open());
    assert!(log_path.exists());
}

#[test]
fn test_reopen_counts_pending_operations() {
    let (_temp, log_path) = setup_temp_log();

    {
        let mut log = OperationLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();
        let item = shirt();
        log.append(&Operation::Insert(&item)).unwrap();
        log.append(&Operation::Delete { code: 7 }).unwrap();
        log.close().unwrap();
    }

    let log = OperationLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();
    assert_eq!(log.size(), 2);
}

#[test]
fn test_marker_like_text_inside_quoted_field_is_not_counted() {
    let (_temp, log_path) = setup_temp_log();

    {
        let mut log = OperationLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();
        let item = Item::new("two\n[delete]lines", 1, "Red", 0);
        log.append(&Operation::Insert(&item)).unwrap();
        log.close().unwrap();
    }

    let log = OperationLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();
    assert_eq!(log.size(), 1);
}

#[test]
fn test_batched_sync_strategy() {
    let (_temp, log_path) = setup_temp_log();
    let mut log =
        OperationLog::open(&log_path, LogSyncStrategy::EveryNEntries { count: 3 }).unwrap();

    for code in 0..5 {
        log.append(&Operation::Delete { code }).unwrap();
    }

    assert_eq!(log.size(), 5);
    assert_eq!(log.lines().unwrap().len(), 5);
}

// =============================================================================
// Pop / Drain Tests
// =============================================================================

#[test]
fn test_pop_returns_last_line() {
    let (_temp, log_path) = setup_temp_log();
    let mut log = OperationLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();

    log.append(&Operation::Delete { code: 1 }).unwrap();
    log.append(&Operation::Delete { code: 2 }).unwrap();

    assert_eq!(log.pop().unwrap(), Some("[delete]2".to_string()));
    assert_eq!(log.size(), 1);
    assert_eq!(fs::read_to_string(&log_path).unwrap(), "[delete]1\n");
}

#[test]
fn test_pop_record_line_keeps_operation_count() {
    let (_temp, log_path) = setup_temp_log();
    let mut log = OperationLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();

    let item = shirt();
    log.append(&Operation::Insert(&item)).unwrap();

    assert_eq!(
        log.pop().unwrap(),
        Some("BRAND|Plain,2002,70,79.5".to_string())
    );
    assert_eq!(log.size(), 1);
}

#[test]
fn test_pop_empty_log() {
    let (_temp, log_path) = setup_temp_log();
    let mut log = OperationLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();

    assert_eq!(log.pop().unwrap(), None);
}

#[test]
fn test_drain_returns_lines_and_truncates() {
    let (_temp, log_path) = setup_temp_log();
    let mut log = OperationLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();

    let item = Item::new("Cap", 3, "Black", 4);
    log.append(&Operation::Insert(&item)).unwrap();
    log.append(&Operation::Delete { code: 3 }).unwrap();

    let lines = log.drain().unwrap();

    assert_eq!(lines, vec!["[insert]", "ITEM|Cap,3,Black,4", "[delete]3"]);
    assert!(log.is_empty());
    assert_eq!(fs::read_to_string(&log_path).unwrap(), "");

    // Still usable after draining
    log.append(&Operation::Delete { code: 4 }).unwrap();
    assert_eq!(log.lines().unwrap(), vec!["[delete]4"]);
}

#[test]
fn test_close_twice_fails() {
    let (_temp, log_path) = setup_temp_log();
    let mut log = OperationLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();

    log.close().unwrap();
    assert!(log.close().is_err());
    assert!(log.append(&Operation::Delete { code: 1 }).is_err());
}

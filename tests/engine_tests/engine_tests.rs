//! Tests for Engine
//!
//! These tests verify:
//! - Basic insert/update/delete/select operations
//! - Cache refill, promotion, and invalidation
//! - Name and fuzzy-name lookups
//! - Failure paths leave in-memory state untouched
//! - Recovery across engine restarts
//! - Shared access through SharedEngine

use std::thread;

use itemstore::config::Config;
use itemstore::engine::{Engine, SharedEngine};
use itemstore::{Brand, Item, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn test_config(temp_dir: &TempDir) -> Config {
    Config::builder()
        .dir(temp_dir.path())
        .cache_capacity(3)
        .log_threshold(5)
        .build()
}

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::open(test_config(&temp_dir)).unwrap();
    (temp_dir, engine)
}

fn test_item(code: i64) -> Item {
    Item::new(format!("Item{}", code), code, "Red", 100)
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_engine_open_creates_files() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("mydb");

    let engine = Engine::open_path(&data_dir).unwrap();

    assert!(engine.is_empty());
    assert!(data_dir.join("items.dat").exists());
    assert!(data_dir.join("operations.log").exists());
}

#[test]
fn test_engine_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .dir(temp_dir.path())
        .cache_capacity(0)
        .build();

    assert!(matches!(Engine::open(config), Err(StoreError::Config(_))));
}

#[test]
fn test_engine_insert_and_select() {
    let (_temp, mut engine) = setup_temp_engine();

    let returned = engine.insert(test_item(1)).unwrap();

    assert_eq!(returned, test_item(1));
    assert_eq!(engine.select_by_code(1), Some(test_item(1)));
    assert_eq!(engine.len(), 1);
}

#[test]
fn test_engine_select_missing_code() {
    let (_temp, mut engine) = setup_temp_engine();

    assert_eq!(engine.select_by_code(404), None);
    assert_eq!(engine.cached_count(), 0);
}

#[test]
fn test_engine_delete() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(test_item(2)).unwrap();

    let removed = engine.del(2).unwrap();

    assert_eq!(removed, test_item(2));
    assert_eq!(engine.select_by_code(2), None);
    assert_eq!(engine.select_by_name("Item2"), None);
    assert_eq!(engine.indexed_count(), 0);
}

#[test]
fn test_engine_delete_by_value() {
    let (_temp, mut engine) = setup_temp_engine();
    let item = engine.insert(test_item(8)).unwrap();

    assert_eq!(engine.del_item(&item).unwrap(), item);
    assert!(engine.is_empty());
}

#[test]
fn test_engine_update() {
    let (_temp, mut engine) = setup_temp_engine();
    let mut item = test_item(3);
    engine.insert(item.clone()).unwrap();

    item.name = "UpdatedItem".to_string();
    item.add_brand(Brand::new("New", 30, 100, 9.5)).unwrap();
    engine.update(item.clone()).unwrap();

    assert_eq!(engine.select_by_code(3), Some(item.clone()));
    assert_eq!(engine.select_by_name("UpdatedItem"), Some(item));
    assert_eq!(engine.select_by_name("Item3"), None);
    assert_eq!(engine.len(), 1);
}

// =============================================================================
// Cache Tests
// =============================================================================

#[test]
fn test_engine_read_fills_cache() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(test_item(1)).unwrap();

    assert!(!engine.is_cached(1));
    engine.select_by_code(1);
    assert!(engine.is_cached(1));
}

#[test]
fn test_engine_cache_evicts_least_recent() {
    let (_temp, mut engine) = setup_temp_engine();
    for code in 4..=7 {
        engine.insert(test_item(code)).unwrap();
    }

    engine.select_by_code(4);
    engine.select_by_code(5);
    engine.select_by_code(6);

    // Keep 4 and 5 active
    engine.select_by_code(4);
    engine.select_by_code(5);

    engine.select_by_code(7);

    assert!(!engine.is_cached(6));
    assert!(engine.is_cached(4));
    assert!(engine.is_cached(5));
    assert!(engine.is_cached(7));

    // Evicted items are still served from the record list
    assert_eq!(engine.select_by_code(6).unwrap().code, 6);
}

#[test]
fn test_engine_update_invalidates_cache() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(test_item(5)).unwrap();
    engine.select_by_code(5);
    assert!(engine.is_cached(5));

    let mut changed = test_item(5);
    changed.colour = "Green".to_string();
    engine.update(changed.clone()).unwrap();

    assert!(!engine.is_cached(5));
    assert_eq!(engine.select_by_code(5), Some(changed));
}

#[test]
fn test_engine_delete_invalidates_cache() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(test_item(5)).unwrap();
    engine.select_by_code(5);

    engine.del(5).unwrap();

    assert!(!engine.is_cached(5));
    assert_eq!(engine.cached_count(), 0);
}

// =============================================================================
// Name Lookup Tests
// =============================================================================

#[test]
fn test_engine_select_by_name() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(test_item(11)).unwrap();

    // Index path, then cache path
    assert_eq!(engine.select_by_name("Item11"), Some(test_item(11)));
    assert!(engine.is_cached(11));
    assert_eq!(engine.select_by_name("Item11"), Some(test_item(11)));

    assert_eq!(engine.select_by_name("Item12"), None);
}

#[test]
fn test_engine_like_query() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(Item::new("Apple", 20, "Red", 50)).unwrap();
    engine.insert(Item::new("App", 21, "Green", 30)).unwrap();
    engine.insert(Item::new("Banana", 22, "Yellow", 40)).unwrap();

    let results = engine.select_by_name_like("App");

    let codes: Vec<i64> = results.iter().map(|i| i.code).collect();
    assert_eq!(codes, vec![21, 20]);
}

#[test]
fn test_engine_like_query_within_distance() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(Item::new("Shirt", 1001, "Red", 150)).unwrap();
    engine.insert(Item::new("Shirts", 1002, "Red", 10)).unwrap();

    assert_eq!(engine.select_by_name_like_within("Shirt", 0).len(), 1);
    assert_eq!(engine.select_by_name_like_within("Shirt", 2).len(), 2);
    assert!(engine.select_by_name_like("").is_empty());
}

// =============================================================================
// Failure Path Tests
// =============================================================================

#[test]
fn test_engine_delete_missing_is_not_found() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(test_item(1)).unwrap();
    engine.insert(test_item(2)).unwrap();
    engine.select_by_code(1);

    let err = engine.del(999).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(engine.len(), 2);
    assert_eq!(engine.indexed_count(), 2);
    assert_eq!(engine.cached_count(), 1);
    assert_eq!(engine.select_by_code(1), Some(test_item(1)));
    assert_eq!(engine.select_by_name("Item2"), Some(test_item(2)));
}

#[test]
fn test_engine_delete_error_kinds() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(test_item(1)).unwrap();

    assert!(matches!(engine.del(999), Err(StoreError::NotFound(_))));

    engine.close().unwrap();
    let err = engine.del(1).unwrap_err();
    assert!(matches!(err, StoreError::Closed));
    assert!(!err.is_not_found());
    assert_eq!(engine.select_by_code(1), Some(test_item(1)));
}

#[test]
fn test_engine_mutations_after_close_leave_state_untouched() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(test_item(1)).unwrap();

    assert!(engine.close().unwrap());
    assert!(!engine.close().unwrap());

    let err = engine.insert(test_item(2)).unwrap_err();
    assert!(err.is_durability_failure());
    assert!(engine.update(Item::new("X", 1, "Red", 0)).is_err());
    assert!(engine.del(1).is_err());

    assert_eq!(engine.len(), 1);
    assert_eq!(engine.indexed_count(), 1);
    assert_eq!(engine.select_by_code(1), Some(test_item(1)));
    assert_eq!(engine.select_by_code(2), None);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_engine_threshold_compaction() {
    let (_temp, mut engine) = setup_temp_engine();

    for code in 1..=4 {
        engine.insert(test_item(code)).unwrap();
    }
    assert_eq!(engine.pending_operations(), 4);

    engine.insert(test_item(5)).unwrap();
    assert_eq!(engine.pending_operations(), 0);
}

#[test]
fn test_engine_manual_compact() {
    let (_temp, mut engine) = setup_temp_engine();
    engine.insert(test_item(1)).unwrap();
    engine.insert(test_item(2)).unwrap();

    assert_eq!(engine.compact().unwrap(), 2);
    assert_eq!(engine.compact().unwrap(), 0);
}

#[test]
fn test_engine_persistence_recovery() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut engine = Engine::open(test_config(&temp_dir)).unwrap();
        engine.insert(test_item(9)).unwrap();
    } // dropping compacts

    let mut engine = Engine::open(test_config(&temp_dir)).unwrap();
    assert_eq!(engine.select_by_code(9), Some(test_item(9)));
    assert_eq!(engine.select_by_name("Item9"), Some(test_item(9)));
}

#[test]
fn test_engine_recovers_sorted_by_code() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut engine = Engine::open(test_config(&temp_dir)).unwrap();
        for code in [30, 10, 20] {
            engine.insert(test_item(code)).unwrap();
        }
        engine.close().unwrap();
    }

    let engine = Engine::open(test_config(&temp_dir)).unwrap();
    let codes: Vec<i64> = engine.items().iter().map(|i| i.code).collect();
    assert_eq!(codes, vec![10, 20, 30]);
}

// =============================================================================
// Shared Access Tests
// =============================================================================

#[test]
fn test_shared_engine_concurrent_inserts() {
    let temp_dir = TempDir::new().unwrap();
    let shared = SharedEngine::open(test_config(&temp_dir)).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..10 {
                    let code = t * 100 + i;
                    shared.with(|engine| engine.insert(test_item(code))).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let engine = shared.lock();
    assert_eq!(engine.len(), 40);
    assert_eq!(engine.indexed_count(), 40);
}

#[test]
fn test_shared_engine_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let shared = SharedEngine::open(test_config(&temp_dir)).unwrap();
        shared.with(|engine| engine.insert(test_item(77))).unwrap();
        shared.with(|engine| engine.close()).unwrap();
    }

    let mut engine = Engine::open(test_config(&temp_dir)).unwrap();
    assert_eq!(engine.select_by_code(77), Some(test_item(77)));
}

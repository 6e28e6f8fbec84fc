//! Engine Module
//!
//! The record engine that coordinates all components.
//!
//! ## Responsibilities
//! - Load the compacted record set on startup and build the name index
//! - Make every mutation durable before touching in-memory state
//! - Keep the record list, cache, and index consistent per mutation
//! - Serve reads cache → index → linear scan, refilling the cache

use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::cache::RecordCache;
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::index::{FuzzyIndex, DEFAULT_MAX_DISTANCE};
use crate::query::QueryBuilder;
use crate::record::Item;
use crate::storage::Persister;

/// The main record engine
///
/// Single-threaded: every call runs to completion on the caller's thread,
/// including any compaction a mutation triggers. Wrap in [`SharedEngine`]
/// to use from several threads.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Source of truth for reads that miss the cache, in insertion order
    items: Vec<Item>,

    /// Snapshot + operation log
    persister: Persister,

    /// Recently read records
    cache: RecordCache,

    /// Name → code
    index: FuzzyIndex,
}

impl Engine {
    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Validate the config
    /// 2. Open the snapshot/log pair, compacting any pending operations
    /// 3. Load every record and index its name
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let cache = RecordCache::new(config.cache_capacity)?;
        let mut persister = Persister::open(&config)?;
        let items = persister.select()?;

        let mut index = FuzzyIndex::new();
        for item in &items {
            index.insert(&item.name, item.code);
        }

        tracing::info!(
            data = %config.data_path.display(),
            log = %config.log_path.display(),
            records = items.len(),
            "engine opened"
        );

        Ok(Self {
            config,
            items,
            persister,
            cache,
            index,
        })
    }

    /// Open with both files under `dir` (convenience method)
    pub fn open_path(dir: &Path) -> Result<Self> {
        Self::open(Config::in_dir(dir))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a new item
    ///
    /// The cache is not filled; the first read does that.
    pub fn insert(&mut self, item: Item) -> Result<Item> {
        self.persister.insert(&item)?;

        self.index.insert(&item.name, item.code);
        self.items.push(item.clone());

        tracing::debug!(code = item.code, "inserted item");
        Ok(item)
    }

    /// Replace the item sharing `item.code` as a whole
    ///
    /// The updated item moves to the end of the insertion order and its
    /// cache entry is dropped.
    pub fn update(&mut self, item: Item) -> Result<Item> {
        self.persister.update(&item)?;

        self.items.retain(|existing| existing.code != item.code);
        self.items.push(item.clone());

        self.index.del(item.code);
        self.index.insert(&item.name, item.code);
        self.cache.del(item.code);

        tracing::debug!(code = item.code, "updated item");
        Ok(item)
    }

    /// Delete by code, returning the removed item
    ///
    /// # Errors
    /// - `StoreError::Closed` or `StoreError::Io` if the delete could not be
    ///   logged; nothing in memory changes.
    /// - `StoreError::NotFound` if the delete was logged but no item has
    ///   `code`; the list, cache, and index are unchanged.
    pub fn del(&mut self, code: i64) -> Result<Item> {
        self.persister.del(code)?;

        let position = self
            .items
            .iter()
            .position(|item| item.code == code)
            .ok_or_else(|| StoreError::record_not_found(code))?;

        let item = self.items.remove(position);
        self.index.del(code);
        self.cache.del(code);

        tracing::debug!(code, "deleted item");
        Ok(item)
    }

    /// Delete by value (only the code is used)
    pub fn del_item(&mut self, item: &Item) -> Result<Item> {
        self.del(item.code)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Start a filtered query over the record list
    pub fn select(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(self)
    }

    /// Look up by code
    ///
    /// Search order:
    /// 1. Cache (hit is promoted)
    /// 2. Record list (hit is cached)
    pub fn select_by_code(&mut self, code: i64) -> Option<Item> {
        if let Ok(item) = self.cache.select(code) {
            return Some(item);
        }

        let item = self.items.iter().find(|item| item.code == code)?.clone();
        self.cache.insert(item.clone());
        Some(item)
    }

    /// Look up by exact name
    ///
    /// Search order:
    /// 1. Cache by name
    /// 2. Index → `select_by_code`
    pub fn select_by_name(&mut self, name: &str) -> Option<Item> {
        if let Ok(item) = self.cache.select_by_name(name) {
            return Some(item);
        }

        let code = self.index.select(name).ok()?;
        self.select_by_code(code)
    }

    /// Approximate name lookup within the default edit distance
    pub fn select_by_name_like(&mut self, name: &str) -> Vec<Item> {
        self.select_by_name_like_within(name, DEFAULT_MAX_DISTANCE)
    }

    /// Approximate name lookup within `max_distance`
    ///
    /// Results follow the index order: closest names first.
    pub fn select_by_name_like_within(&mut self, name: &str, max_distance: usize) -> Vec<Item> {
        let codes = self.index.find(name, max_distance);
        let mut result = Vec::with_capacity(codes.len());

        for code in codes {
            match self.select_by_code(code) {
                Some(item) => result.push(item),
                None => tracing::warn!(code, "indexed code has no record; skipping"),
            }
        }

        result
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Replay pending operations onto the snapshot now
    ///
    /// Returns the number of operations replayed.
    pub fn compact(&mut self) -> Result<usize> {
        self.persister.compact()
    }

    /// Compact and release the operation log
    ///
    /// Returns `Ok(false)` if already closed. Mutations fail with
    /// `StoreError::Closed` afterwards; reads keep working from memory.
    pub fn close(&mut self) -> Result<bool> {
        self.persister.close()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Every record, in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of records in the cache
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Whether `code` is currently cached
    pub fn is_cached(&self, code: i64) -> bool {
        self.cache.contains(code)
    }

    /// Number of names in the index
    pub fn indexed_count(&self) -> usize {
        self.index.len()
    }

    /// Operations logged since the last compaction
    pub fn pending_operations(&self) -> usize {
        self.persister.pending_operations()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// An engine behind one exclusive lock
///
/// Every call holds the lock for the whole operation, so log, list, cache,
/// and index are still updated as one sequence.
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn open(config: Config) -> Result<Self> {
        Ok(Self::new(Engine::open(config)?))
    }

    /// Run `f` with exclusive access
    pub fn with<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        let mut engine = self.inner.lock();
        f(&mut engine)
    }

    /// Hold exclusive access across several calls
    pub fn lock(&self) -> MutexGuard<'_, Engine> {
        self.inner.lock()
    }
}

//! Dual-keyed LRU record cache

use std::collections::HashMap;
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::error::{Result, StoreError};
use crate::record::Item;

/// Most-recently-used cache of items, addressable by code and by name
///
/// Names are a last-writer-wins key: when two cached items share a name,
/// only the most recently inserted one is reachable by it.
pub struct RecordCache {
    /// Code → item, in recency order
    entries: LruCache<i64, Item>,
    /// Name → code of the entry holding that name
    names: HashMap<String, i64>,
}

impl RecordCache {
    /// Create a cache holding at most `capacity` items
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            StoreError::Config("cache capacity must be at least 1".to_string())
        })?;

        Ok(Self {
            entries: LruCache::new(capacity),
            names: HashMap::new(),
        })
    }

    /// Insert or overwrite an item and mark it most-recently-used
    ///
    /// Overwriting a cached code never evicts; inserting a new code evicts
    /// the least-recently-used item once capacity is exceeded.
    pub fn insert(&mut self, item: Item) {
        let code = item.code;
        let name = item.name.clone();

        if let Some(old_name) = self.entries.peek(&code).map(|old| old.name.clone()) {
            if old_name != name {
                self.unlink_name(&old_name, code);
            }
        }

        if let Some((evicted_code, evicted)) = self.entries.push(code, item) {
            if evicted_code != code {
                self.unlink_name(&evicted.name, evicted_code);
                tracing::trace!(code = evicted_code, "evicted least-recently-used item");
            }
        }

        self.names.insert(name, code);
    }

    /// Look up by code, promoting the hit
    pub fn select(&mut self, code: i64) -> Result<Item> {
        self.entries
            .get(&code)
            .cloned()
            .ok_or_else(|| StoreError::record_not_found(code))
    }

    /// Look up by name, promoting the hit
    pub fn select_by_name(&mut self, name: &str) -> Result<Item> {
        let code = *self
            .names
            .get(name)
            .ok_or_else(|| StoreError::name_not_found(name))?;

        self.entries
            .get(&code)
            .cloned()
            .ok_or_else(|| StoreError::name_not_found(name))
    }

    /// Remove by code; returns whether an entry was removed
    pub fn del(&mut self, code: i64) -> bool {
        match self.entries.pop(&code) {
            Some(item) => {
                self.unlink_name(&item.name, code);
                true
            }
            None => false,
        }
    }

    /// Remove by name; returns whether an entry was removed
    pub fn del_by_name(&mut self, name: &str) -> bool {
        match self.names.remove(name) {
            Some(code) => self.entries.pop(&code).is_some(),
            None => false,
        }
    }

    pub fn contains(&self, code: i64) -> bool {
        self.entries.contains(&code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Drop a name mapping only if it still points at `code`
    fn unlink_name(&mut self, name: &str, code: i64) {
        if self.names.get(name) == Some(&code) {
            self.names.remove(name);
        }
    }
}

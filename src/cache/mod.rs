//! Cache Module
//!
//! Bounded most-recently-used cache of records.
//!
//! ## Responsibilities
//! - Serve recent lookups by code or by name in O(1)
//! - Promote every hit to most-recently-used
//! - Evict the least-recently-used record once capacity is exceeded
//!
//! ## Data Structure Choice
//! One `LruCache` keyed by code owns the records and their recency order.
//! A side map from name to code gives the second key without duplicating
//! the payload; both keys always resolve to the same entry.

mod record_cache;

pub use record_cache::RecordCache;

//! # itemstore
//!
//! A single-process record store for a small catalog of items, with:
//! - An operation log for cheap durable mutations
//! - A snapshot rewritten by compacting the log
//! - A dual-keyed LRU read cache
//! - A fuzzy name index (weighted edit distance)
//! - A composable query facade
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Engine                             │
//! │         (record list = source of truth in memory)           │
//! └──────┬──────────────────┬──────────────────┬────────────────┘
//!        │ mutations        │ reads            │ reads
//!        ▼                  ▼                  ▼
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Persister  │    │  LRU Cache  │    │ Fuzzy Index │
//! └──────┬──────┘    └─────────────┘    └─────────────┘
//!        │
//!   ┌────┴───────────────┐
//!   ▼                    ▼
//! ┌─────────────┐  ┌─────────────┐
//! │Operation Log│─▶│  Snapshot   │
//! │  (append)   │  │ (compacted) │
//! └─────────────┘  └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod wal;
pub mod storage;
pub mod cache;
pub mod index;
pub mod engine;
pub mod query;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::Config;
pub use engine::{Engine, SharedEngine};
pub use query::{Limit, Predicate, QueryBuilder};
pub use record::{Brand, Item, MAX_BRANDS};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of itemstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
